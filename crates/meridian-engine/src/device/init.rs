/// Initialization parameters for the GPU layer.
///
/// Keep this structure stable and minimal. Add configuration flags only when a
/// concrete platform or backend requirement exists.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Backends wgpu may pick an adapter from.
    pub backends: wgpu::Backends,

    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior). FIFO is supported everywhere.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Required wgpu features. Empty for portability.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface (a hint).
    pub desired_maximum_frame_latency: u32,

    /// Allow wgpu's noop adapter. It accepts every call but executes nothing,
    /// so it is only useful for tests. Requires the `wgpu/noop` feature.
    pub allow_noop: bool,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
            allow_noop: false,
        }
    }
}

impl GpuInit {
    /// Settings for running without a window (tests, offscreen rendering).
    ///
    /// Restricted to the primary backends and downlevel limits so software
    /// adapters such as lavapipe qualify.
    pub fn headless() -> Self {
        Self {
            backends: wgpu::Backends::PRIMARY,
            required_limits: wgpu::Limits::downlevel_defaults(),
            ..Self::default()
        }
    }

    /// Settings for the noop backend: full validation, no execution.
    pub fn noop() -> Self {
        Self {
            backends: wgpu::Backends::NOOP,
            allow_noop: true,
            ..Self::headless()
        }
    }

    pub(crate) fn instance_descriptor(&self) -> wgpu::InstanceDescriptor {
        let mut desc = wgpu::InstanceDescriptor {
            backends: self.backends,
            ..Default::default()
        };
        desc.backend_options.noop.enable = self.allow_noop;
        desc
    }
}
