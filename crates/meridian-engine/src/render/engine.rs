use std::str::FromStr;

use winit::dpi::PhysicalSize;

use crate::assets::{DecodedImage, GeometryBuffer, TextureAsset};
use crate::config::EngineConfig;
use crate::device::{Acquire, DrawableSource, GpuContext};
use crate::error::StartupError;
use crate::scene::{Camera, Scene, TransformRule};

use super::attachments::{AttachmentSet, AttachmentSpec};
use super::pass::PassTemplate;
use super::pipelines::{PipelineCatalog, ProgramPair};
use super::shader_library::ShaderLibrary;
use super::uniforms::{FrameFences, LightingUniform, TransformUniform, UniformRing};

/// How the CPU waits for the GPU between frames.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum FramePacing {
    /// Block after every submission until the GPU is idle.
    #[default]
    Serialized,
    /// Keep up to `frames_in_flight` frames queued; block only when a
    /// uniform slot is reused before its frame completed.
    Pipelined,
}

impl FromStr for FramePacing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "serialized" | "serial" => Ok(FramePacing::Serialized),
            "pipelined" => Ok(FramePacing::Pipelined),
            other => Err(format!("unknown frame pacing `{other}`")),
        }
    }
}

/// What happened to one `run_frame` call.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    Presented,
    /// No drawable was available; nothing was encoded, submitted or presented.
    Skipped,
    /// The drawable source cannot recover.
    Fatal,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub frames_presented: u64,
    pub frames_skipped: u64,
    pub last_draw_calls: u32,
    pub last_submissions: u32,
    pub total_draw_calls: u64,
    pub total_submissions: u64,
}

/// GPU resources for one scene object.
struct DrawItem {
    name: &'static str,
    pipeline: wgpu::RenderPipeline,
    uses_material: bool,
    geometry: GeometryBuffer,
    transform: TransformRule,
    transforms: UniformRing<TransformUniform>,
}

/// Runs the per-frame sequence: acquire, update uniforms, encode, submit, present.
///
/// Everything except the attachments is created once in [`FrameEngine::new`]
/// and read-only afterwards.
pub struct FrameEngine {
    context: GpuContext,
    scene: Scene,
    camera: Camera,
    catalog: PipelineCatalog,
    attachments: AttachmentSet,
    pass: PassTemplate,
    items: Vec<DrawItem>,
    lighting: UniformRing<LightingUniform>,
    material: wgpu::BindGroup,
    _texture: TextureAsset,
    fences: FrameFences,
    pacing: FramePacing,
    stats: FrameStats,
}

impl FrameEngine {
    /// Creates every startup resource for drawing into `color_format` images
    /// of `size`.
    pub fn new(
        context: &GpuContext,
        config: &EngineConfig,
        color_format: wgpu::TextureFormat,
        size: PhysicalSize<u32>,
    ) -> Result<Self, StartupError> {
        let device = context.device();
        let queue = context.queue();

        let library = ShaderLibrary::load(&config.shader_path)?;
        let spec = AttachmentSpec {
            color_format,
            depth_format: config.depth_format,
            sample_count: config.sample_count,
        };
        let catalog = PipelineCatalog::build(device, &library, &ProgramPair::defaults(), spec)?;

        let image = match &config.texture_path {
            Some(path) => DecodedImage::decode(path, config.flip_texture)?,
            None => {
                log::info!("no texture configured, using checkerboard");
                DecodedImage::checkerboard(256, 8, [222, 110, 70, 255], [120, 50, 35, 255])
            }
        };
        let texture = TextureAsset::upload(device, queue, &image);
        let material = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("meridian material bind group"),
            layout: &catalog.layouts().material,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(texture.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(texture.sampler()),
                },
            ],
        });

        let scene = Scene::new(config.scene, config.sphere_subdivisions);
        let slots = config.frames_in_flight;
        let items = scene
            .objects
            .iter()
            .map(|object| {
                let state = catalog.get(object.pipeline)?;
                Ok(DrawItem {
                    name: object.name,
                    pipeline: state.pipeline.clone(),
                    uses_material: state.uses_material,
                    geometry: GeometryBuffer::from_shape(device, object.mesh),
                    transform: object.transform,
                    transforms: UniformRing::new(
                        device,
                        &catalog.layouts().transforms,
                        slots,
                        &format!("meridian {} transforms", object.name),
                    ),
                })
            })
            .collect::<Result<Vec<_>, StartupError>>()?;

        let lighting =
            UniformRing::new(device, &catalog.layouts().lighting, slots, "meridian lighting");
        let attachments = AttachmentSet::build(device, spec, size);

        log::info!(
            "frame engine ready: {} objects, {} frames in flight, {:?} pacing",
            items.len(),
            slots,
            config.pacing
        );

        Ok(Self {
            context: context.clone(),
            scene,
            camera: Camera::default(),
            catalog,
            attachments,
            pass: PassTemplate::new(config.clear_color.to_wgpu()),
            items,
            lighting,
            material,
            _texture: texture,
            fences: FrameFences::new(slots),
            pacing: config.pacing,
            stats: FrameStats::default(),
        })
    }

    /// Rebuilds the size-dependent attachments. Zero sizes are ignored.
    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        self.attachments.ensure(self.context.device(), size);
    }

    /// Draws one frame into the next image from `source`.
    ///
    /// `elapsed` is the time in seconds since startup; it drives the
    /// per-object transform rules.
    pub fn run_frame(&mut self, source: &mut impl DrawableSource, elapsed: f32) -> FrameOutcome {
        self.run_frame_notifying(source, elapsed, || {})
    }

    /// Like [`FrameEngine::run_frame`], calling `before_present` right
    /// before the drawable is presented. Skipped and failed frames never
    /// call it.
    pub fn run_frame_notifying(
        &mut self,
        source: &mut impl DrawableSource,
        elapsed: f32,
        before_present: impl FnOnce(),
    ) -> FrameOutcome {
        let drawable = match source.acquire() {
            Acquire::Ready(drawable) => drawable,
            Acquire::Skip => {
                log::debug!("no drawable available, skipping frame");
                self.stats.frames_skipped += 1;
                self.stats.last_draw_calls = 0;
                self.stats.last_submissions = 0;
                return FrameOutcome::Skipped;
            }
            Acquire::Fatal => {
                log::error!("drawable source failed");
                return FrameOutcome::Fatal;
            }
        };

        let size = drawable.size();
        debug_assert!(
            self.attachments.matches(size),
            "attachments {:?} do not match drawable {:?}",
            self.attachments.size(),
            size
        );
        if self.attachments.ensure(self.context.device(), size) {
            log::warn!("attachments were stale; rebuilt before encoding");
        }

        let device = self.context.device();
        let queue = self.context.queue();
        let slot = self.fences.acquire(device);

        let view = self.camera.view();
        let projection = self.camera.projection(self.attachments.size());
        self.lighting.write(
            queue,
            slot,
            &LightingUniform::new(
                self.scene.light_color,
                self.scene.light_position,
                self.camera.eye,
            ),
        );
        for item in &self.items {
            let model = item.transform.model(elapsed);
            item.transforms
                .write(queue, slot, &TransformUniform::new(model, view, projection));
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("meridian frame encoder"),
        });

        let mut draw_calls = 0;
        {
            let mut rpass = self.pass.begin(&mut encoder, &self.attachments, drawable.view());

            for item in &self.items {
                rpass.set_pipeline(&item.pipeline);
                rpass.set_bind_group(0, item.transforms.bind_group(slot), &[]);
                rpass.set_bind_group(1, self.lighting.bind_group(slot), &[]);
                if item.uses_material {
                    rpass.set_bind_group(2, &self.material, &[]);
                }
                rpass.set_vertex_buffer(0, item.geometry.buffer().slice(..));
                rpass.draw(0..item.geometry.vertex_count(), 0..1);
                log::trace!("drew `{}` ({} vertices)", item.name, item.geometry.vertex_count());
                draw_calls += 1;
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
        self.fences.signal_on_completion(queue, slot);
        before_present();
        drawable.present();

        if self.pacing == FramePacing::Serialized {
            self.context.wait_idle();
        }

        self.stats.frames_presented += 1;
        self.stats.last_draw_calls = draw_calls;
        self.stats.last_submissions = 1;
        self.stats.total_draw_calls += u64::from(draw_calls);
        self.stats.total_submissions += 1;

        FrameOutcome::Presented
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn attachments(&self) -> &AttachmentSet {
        &self.attachments
    }

    pub fn catalog(&self) -> &PipelineCatalog {
        &self.catalog
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn pacing(&self) -> FramePacing {
        self.pacing
    }

    /// Times a frame had to wait for a uniform slot still in use by the GPU.
    pub fn slot_waits(&self) -> u64 {
        self.fences.waits()
    }
}
