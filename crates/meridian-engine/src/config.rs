use std::path::PathBuf;

use crate::paint::Color;
use crate::render::FramePacing;
use crate::scene::SceneVariant;

/// Default shader library bundled with the engine crate.
pub const DEFAULT_SHADER_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/scene.wgsl");

/// Engine configuration.
///
/// Defaults reproduce the reference scene. [`EngineConfig::from_env`] layers
/// `MERIDIAN_*` environment overrides on top.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub shader_path: PathBuf,
    /// Image used as the sphere's material. `None` uses a generated checkerboard.
    pub texture_path: Option<PathBuf>,
    pub flip_texture: bool,
    /// 1 (no MSAA) or 4.
    pub sample_count: u32,
    pub depth_format: wgpu::TextureFormat,
    pub frames_in_flight: usize,
    pub pacing: FramePacing,
    pub scene: SceneVariant,
    pub sphere_subdivisions: u32,
    pub clear_color: Color,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            shader_path: PathBuf::from(DEFAULT_SHADER_PATH),
            texture_path: None,
            flip_texture: true,
            sample_count: 4,
            depth_format: wgpu::TextureFormat::Depth32Float,
            frames_in_flight: 2,
            pacing: FramePacing::Serialized,
            scene: SceneVariant::Sphere,
            sphere_subdivisions: 34,
            clear_color: Color::from_u8(41, 42, 48, 255),
        }
    }
}

impl EngineConfig {
    pub const ENV_SHADERS: &'static str = "MERIDIAN_SHADERS";
    pub const ENV_TEXTURE: &'static str = "MERIDIAN_TEXTURE";
    pub const ENV_MSAA: &'static str = "MERIDIAN_MSAA";
    pub const ENV_SCENE: &'static str = "MERIDIAN_SCENE";
    pub const ENV_PACING: &'static str = "MERIDIAN_PACING";

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`. Invalid values are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup(Self::ENV_SHADERS) {
            config.shader_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(Self::ENV_TEXTURE).filter(|p| !p.is_empty()) {
            config.texture_path = Some(PathBuf::from(path));
        }
        if let Some(raw) = lookup(Self::ENV_MSAA) {
            match raw.trim().parse::<u32>() {
                Ok(n) => config.sample_count = n,
                Err(_) => log::warn!("{}: `{raw}` is not a sample count", Self::ENV_MSAA),
            }
        }
        if let Some(raw) = lookup(Self::ENV_SCENE) {
            match raw.parse() {
                Ok(scene) => config.scene = scene,
                Err(e) => log::warn!("{}: {e}", Self::ENV_SCENE),
            }
        }
        if let Some(raw) = lookup(Self::ENV_PACING) {
            match raw.parse() {
                Ok(pacing) => config.pacing = pacing,
                Err(e) => log::warn!("{}: {e}", Self::ENV_PACING),
            }
        }

        config.sanitized()
    }

    /// Clamps values the engine cannot use to working defaults.
    pub fn sanitized(mut self) -> Self {
        if !matches!(self.sample_count, 1 | 4) {
            log::warn!(
                "unsupported sample count {}, using 4",
                self.sample_count
            );
            self.sample_count = 4;
        }
        if self.frames_in_flight == 0 {
            self.frames_in_flight = 1;
        }
        self.sphere_subdivisions = self.sphere_subdivisions.max(3);
        self
    }
}
