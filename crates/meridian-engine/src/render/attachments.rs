use winit::dpi::PhysicalSize;

/// Formats and sample count shared by the attachments and every pipeline.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AttachmentSpec {
    pub color_format: wgpu::TextureFormat,
    pub depth_format: wgpu::TextureFormat,
    pub sample_count: u32,
}

impl AttachmentSpec {
    pub fn is_multisampled(&self) -> bool {
        self.sample_count > 1
    }
}

struct Target {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl Target {
    fn new(
        device: &wgpu::Device,
        label: &str,
        format: wgpu::TextureFormat,
        sample_count: u32,
        size: PhysicalSize<u32>,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: size.width,
                height: size.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }
}

/// Size-dependent render targets: multisampled color (when MSAA is on) and depth.
///
/// Both targets always share `size` and one sample count. Rebuilding
/// drops the previous textures.
pub struct AttachmentSet {
    spec: AttachmentSpec,
    msaa: Option<Target>,
    depth: Target,
    size: PhysicalSize<u32>,
    generation: u64,
}

impl AttachmentSet {
    /// Creates targets for `size`; zero dimensions are clamped to 1.
    pub fn build(device: &wgpu::Device, spec: AttachmentSpec, size: PhysicalSize<u32>) -> Self {
        let size = Self::clamp(size);
        let (msaa, depth) = Self::create_targets(device, &spec, size);
        Self {
            spec,
            msaa,
            depth,
            size,
            generation: 0,
        }
    }

    fn clamp(size: PhysicalSize<u32>) -> PhysicalSize<u32> {
        PhysicalSize::new(size.width.max(1), size.height.max(1))
    }

    fn create_targets(
        device: &wgpu::Device,
        spec: &AttachmentSpec,
        size: PhysicalSize<u32>,
    ) -> (Option<Target>, Target) {
        let msaa = spec.is_multisampled().then(|| {
            Target::new(
                device,
                "meridian msaa color",
                spec.color_format,
                spec.sample_count,
                size,
            )
        });
        let depth = Target::new(
            device,
            "meridian depth",
            spec.depth_format,
            spec.sample_count,
            size,
        );
        (msaa, depth)
    }

    /// Replaces both targets with new ones of `size`.
    ///
    /// A zero-sized request keeps the current targets.
    pub fn rebuild(&mut self, device: &wgpu::Device, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            log::debug!("ignoring zero-sized attachment rebuild");
            return;
        }

        let (msaa, depth) = Self::create_targets(device, &self.spec, size);
        self.msaa = msaa;
        self.depth = depth;
        self.size = size;
        self.generation += 1;
        log::debug!(
            "attachments rebuilt at {}x{} (generation {})",
            size.width,
            size.height,
            self.generation
        );
    }

    /// Rebuilds only when `size` differs from the current size. Returns
    /// whether a rebuild happened.
    pub fn ensure(&mut self, device: &wgpu::Device, size: PhysicalSize<u32>) -> bool {
        if self.matches(size) {
            return false;
        }
        let before = self.generation;
        self.rebuild(device, size);
        self.generation != before
    }

    pub fn matches(&self, size: PhysicalSize<u32>) -> bool {
        self.size == size
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    /// Bumped on every rebuild.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Multisampled color view, `None` when the sample count is 1.
    pub fn msaa_view(&self) -> Option<&wgpu::TextureView> {
        self.msaa.as_ref().map(|t| &t.view)
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth.view
    }

    pub fn msaa_texture(&self) -> Option<&wgpu::Texture> {
        self.msaa.as_ref().map(|t| &t.texture)
    }

    pub fn depth_texture(&self) -> &wgpu::Texture {
        &self.depth.texture
    }
}
