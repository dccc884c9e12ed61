use anyhow::Result;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::error::StartupError;

use super::surface;
use super::{Acquire, DrawableImage, DrawableSource, GpuContext, GpuInit, SurfaceErrorAction};

/// Window-bound GPU state: the shared [`GpuContext`] plus the configured surface.
pub struct Gpu<'w> {
    /// Device/queue shared with the rest of the engine.
    context: GpuContext,

    /// Surface bound to the window.
    ///
    /// Surface lifetime is tied to the window; the runtime keeps the window
    /// alive for as long as this value exists.
    surface: wgpu::Surface<'w>,

    /// Active surface configuration.
    config: wgpu::SurfaceConfiguration,

    /// Current drawable size in physical pixels.
    size: PhysicalSize<u32>,
}

impl<'w> Gpu<'w> {
    /// Creates a GPU context bound to a window.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&init.instance_descriptor());

        let surface = instance
            .create_surface(window)
            .map_err(|e| StartupError::Device(format!("failed to create surface: {e}")))?;

        let context = GpuContext::request(&instance, Some(&surface), &init).await?;

        let caps = surface.get_capabilities(context.adapter());
        let format = surface::choose_surface_format(&caps.formats, init.prefer_srgb)
            .ok_or_else(|| StartupError::Device("surface reports no supported formats".into()))?;
        let alpha_mode = surface::choose_alpha_mode(&caps.alpha_modes, init.alpha_mode);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: init.present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };

        surface.configure(context.device(), &config);
        log::info!(
            "surface configured: {}x{} {:?} {:?}",
            config.width,
            config.height,
            format,
            init.present_mode
        );

        Ok(Self {
            context,
            surface,
            config,
            size,
        })
    }

    /// Returns the shared device context.
    pub fn context(&self) -> &GpuContext {
        &self.context
    }

    /// Reconfigures the surface after a resize.
    ///
    /// A 0x0 size (minimized window) only records the size; frames are skipped
    /// until a usable size arrives.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        let configured = surface::apply_resize(
            &self.surface,
            self.context.device(),
            &mut self.config,
            &mut self.size,
            new_size,
        );
        log::debug!(
            "surface resize to {}x{} (configured: {configured})",
            new_size.width,
            new_size.height
        );
    }

    /// Converts a `SurfaceError` into a higher-level action.
    pub fn handle_surface_error(&mut self, err: wgpu::SurfaceError) -> SurfaceErrorAction {
        let action = surface::map_surface_error(
            &self.surface,
            self.context.device(),
            &self.config,
            self.size,
            &err,
        );
        log::debug!("surface error {err:?} -> {action:?}");
        action
    }
}

impl DrawableSource for Gpu<'_> {
    fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    fn drawable_size(&self) -> PhysicalSize<u32> {
        self.size
    }

    fn acquire(&mut self) -> Acquire {
        if surface::is_zero_sized(self.size) {
            return Acquire::Skip;
        }

        match self.surface.get_current_texture() {
            Ok(surface_texture) => {
                if surface_texture.suboptimal {
                    log::trace!("acquired suboptimal surface texture");
                }
                Acquire::Ready(DrawableImage::from_surface(surface_texture))
            }
            Err(err) => {
                if self.handle_surface_error(err).is_recoverable() {
                    Acquire::Skip
                } else {
                    Acquire::Fatal
                }
            }
        }
    }
}
