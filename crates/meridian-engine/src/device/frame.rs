use winit::dpi::PhysicalSize;

/// One presentable image, valid for a single frame.
///
/// Consume it with [`DrawableImage::present`] after submission. Dropping it
/// without presenting discards the image. Holding it prevents acquisition of
/// the next one.
pub struct DrawableImage {
    view: wgpu::TextureView,
    size: PhysicalSize<u32>,
    surface_texture: Option<wgpu::SurfaceTexture>,
}

impl DrawableImage {
    pub(crate) fn from_surface(surface_texture: wgpu::SurfaceTexture) -> Self {
        let texture = &surface_texture.texture;
        let size = PhysicalSize::new(texture.width(), texture.height());
        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("meridian drawable view"),
            ..Default::default()
        });

        Self {
            view,
            size,
            surface_texture: Some(surface_texture),
        }
    }

    pub(crate) fn from_texture(texture: &wgpu::Texture) -> Self {
        Self {
            view: texture.create_view(&wgpu::TextureViewDescriptor {
                label: Some("meridian offscreen view"),
                ..Default::default()
            }),
            size: PhysicalSize::new(texture.width(), texture.height()),
            surface_texture: None,
        }
    }

    /// View the frame resolves (or renders) into.
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    /// Queues the image for presentation. Call after the frame's commands
    /// have been submitted.
    pub fn present(self) {
        let Self {
            view,
            surface_texture,
            ..
        } = self;
        drop(view);
        if let Some(surface_texture) = surface_texture {
            surface_texture.present();
        }
    }
}

/// Result of asking a [`DrawableSource`] for the next image.
pub enum Acquire {
    Ready(DrawableImage),
    /// No image this frame (minimized, timed out, surface reconfigured).
    Skip,
    /// The surface cannot recover; the loop should stop.
    Fatal,
}

/// Something that yields one presentable image per frame.
pub trait DrawableSource {
    /// Pixel format of the images this source yields.
    fn format(&self) -> wgpu::TextureFormat;

    /// Current drawable size in physical pixels.
    fn drawable_size(&self) -> PhysicalSize<u32>;

    /// Acquires the next image.
    fn acquire(&mut self) -> Acquire;
}
