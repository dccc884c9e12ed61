use anyhow::Context;
use meridian_engine::core::{App, AppControl, FrameCtx};
use meridian_engine::device::{DrawableSource, Gpu};
use meridian_engine::render::FrameEngine;
use meridian_engine::EngineConfig;
use winit::dpi::PhysicalSize;

/// Hosts the frame engine inside the window runtime.
pub struct SceneApp {
    config: EngineConfig,
    engine: Option<FrameEngine>,
    last_report: u64,
}

impl SceneApp {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            engine: None,
            last_report: 0,
        }
    }
}

impl App for SceneApp {
    fn on_start(&mut self, gpu: &Gpu<'_>) -> anyhow::Result<()> {
        let engine = FrameEngine::new(
            gpu.context(),
            &self.config,
            gpu.format(),
            gpu.drawable_size(),
        )
        .context("failed to build frame engine")?;

        self.engine = Some(engine);
        Ok(())
    }

    fn on_resize(&mut self, size: PhysicalSize<u32>) {
        if let Some(engine) = self.engine.as_mut() {
            engine.resize(size);
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(engine) = self.engine.as_mut() else {
            return AppControl::Exit;
        };

        let control = ctx.render(engine);

        let stats = engine.stats();
        if stats.frames_presented >= self.last_report + 600 {
            self.last_report = stats.frames_presented;
            log::debug!(
                "{} frames presented, {} skipped, {} draws last frame",
                stats.frames_presented,
                stats.frames_skipped,
                stats.last_draw_calls
            );
        }

        control
    }
}
