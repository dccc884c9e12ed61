use winit::dpi::PhysicalSize;

use super::surface::is_zero_sized;
use super::{Acquire, DrawableImage, DrawableSource};

/// A texture that stands in for a window surface.
///
/// Used for headless rendering and tests. While suspended, or while its size
/// is zero, it yields no drawable, like a minimized window.
pub struct OffscreenTarget {
    texture: Option<wgpu::Texture>,
    format: wgpu::TextureFormat,
    size: PhysicalSize<u32>,
    suspended: bool,
    acquired: u64,
}

impl OffscreenTarget {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: PhysicalSize<u32>,
    ) -> Self {
        Self {
            texture: Self::create_texture(device, format, size),
            format,
            size,
            suspended: false,
            acquired: 0,
        }
    }

    fn create_texture(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: PhysicalSize<u32>,
    ) -> Option<wgpu::Texture> {
        if is_zero_sized(size) {
            return None;
        }

        Some(device.create_texture(&wgpu::TextureDescriptor {
            label: Some("meridian offscreen target"),
            size: wgpu::Extent3d {
                width: size.width,
                height: size.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        }))
    }

    /// Replaces the backing texture with one of `size`.
    pub fn resize(&mut self, device: &wgpu::Device, size: PhysicalSize<u32>) {
        self.texture = Self::create_texture(device, self.format, size);
        self.size = size;
    }

    /// While suspended, `acquire` yields nothing.
    pub fn set_suspended(&mut self, suspended: bool) {
        self.suspended = suspended;
    }

    pub fn texture(&self) -> Option<&wgpu::Texture> {
        self.texture.as_ref()
    }

    /// Number of images handed out so far.
    pub fn acquired(&self) -> u64 {
        self.acquired
    }
}

impl DrawableSource for OffscreenTarget {
    fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    fn drawable_size(&self) -> PhysicalSize<u32> {
        self.size
    }

    fn acquire(&mut self) -> Acquire {
        if self.suspended {
            return Acquire::Skip;
        }
        let Some(texture) = self.texture.as_ref() else {
            return Acquire::Skip;
        };

        self.acquired += 1;
        Acquire::Ready(DrawableImage::from_texture(texture))
    }
}
