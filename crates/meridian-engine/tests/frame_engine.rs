use std::path::PathBuf;
use std::sync::OnceLock;

use meridian_engine::config::DEFAULT_SHADER_PATH;
use meridian_engine::device::{DrawableSource, GpuContext, GpuInit, OffscreenTarget};
use meridian_engine::logging::{init_logging, LoggingConfig};
use meridian_engine::render::{FrameEngine, FrameOutcome, FramePacing};
use meridian_engine::{EngineConfig, StartupError};
use winit::dpi::PhysicalSize;

const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// One shared headless device. Falls back to wgpu's noop backend, which
/// validates everything but executes nothing, when no real adapter exists.
fn context() -> Option<GpuContext> {
    static CONTEXT: OnceLock<Option<GpuContext>> = OnceLock::new();
    CONTEXT
        .get_or_init(|| {
            init_logging(LoggingConfig::for_tests());
            let real = pollster::block_on(GpuContext::headless(GpuInit::headless()));
            match real.or_else(|e| {
                eprintln!("no GPU adapter ({e:#}), using the noop backend");
                pollster::block_on(GpuContext::headless(GpuInit::noop()))
            }) {
                Ok(ctx) => Some(ctx),
                Err(e) => {
                    eprintln!("noop backend unavailable, skipping: {e:#}");
                    None
                }
            }
        })
        .clone()
}

fn is_noop(ctx: &GpuContext) -> bool {
    ctx.adapter().get_info().backend == wgpu::Backend::Noop
}

macro_rules! require_gpu {
    () => {
        match context() {
            Some(ctx) => ctx,
            None => return,
        }
    };
}

fn setup(
    ctx: &GpuContext,
    config: &EngineConfig,
    size: PhysicalSize<u32>,
) -> (FrameEngine, OffscreenTarget) {
    let target = OffscreenTarget::new(ctx.device(), FORMAT, size);
    let engine = FrameEngine::new(ctx, config, target.format(), target.drawable_size())
        .unwrap_or_else(|e| panic!("engine startup failed: {e}"));
    (engine, target)
}

fn startup_error(ctx: &GpuContext, config: &EngineConfig) -> StartupError {
    match FrameEngine::new(ctx, config, FORMAT, PhysicalSize::new(64, 64)) {
        Ok(_) => panic!("engine startup unexpectedly succeeded"),
        Err(e) => e,
    }
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("meridian-it-{}-{name}", std::process::id()))
}

// ── startup ───────────────────────────────────────────────────────────────

#[test]
fn catalog_holds_two_pipelines_and_one_depth_state() {
    let ctx = require_gpu!();
    let (engine, _) = setup(&ctx, &EngineConfig::default(), PhysicalSize::new(800, 600));

    let catalog = engine.catalog();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.get("shaded").map(|p| p.sample_count).ok(), Some(4));
    assert!(catalog.get("light").is_ok());
    assert_eq!(catalog.depth_state().compare, wgpu::CompareFunction::LessEqual);

    let err = catalog.get("wireframe").err().map(|e| e.exit_code());
    assert_eq!(err, Some(-2));
}

#[test]
fn missing_shader_library_is_fatal() {
    let ctx = require_gpu!();
    let config = EngineConfig {
        shader_path: PathBuf::from("/no/such/scene.wgsl"),
        ..EngineConfig::default()
    };

    let err = startup_error(&ctx, &config);
    assert!(matches!(err, StartupError::ShaderLibraryMissing { .. }));
    assert_eq!(err.exit_code(), -1);
}

#[test]
fn missing_program_is_fatal() {
    let ctx = require_gpu!();
    let source = std::fs::read_to_string(DEFAULT_SHADER_PATH).unwrap();
    let path = temp_path("no-sphere-fs.wgsl");
    std::fs::write(&path, source.replace("fn sphere_fs", "fn planet_fs")).unwrap();

    let config = EngineConfig {
        shader_path: path.clone(),
        ..EngineConfig::default()
    };
    let err = startup_error(&ctx, &config);
    std::fs::remove_file(&path).ok();

    match err {
        StartupError::MissingProgram { name, stage } => {
            assert_eq!(name, "sphere_fs");
            assert_eq!(stage, "fragment");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn undecodable_texture_is_fatal() {
    let ctx = require_gpu!();
    let path = temp_path("not-an-image.png");
    std::fs::write(&path, b"definitely not a png").unwrap();

    let config = EngineConfig {
        texture_path: Some(path.clone()),
        ..EngineConfig::default()
    };
    let err = startup_error(&ctx, &config);
    std::fs::remove_file(&path).ok();

    assert_eq!(err.exit_code(), -4);
}

#[test]
fn mismatched_vertex_interface_is_pipeline_error() {
    let ctx = require_gpu!();
    let source = std::fs::read_to_string(DEFAULT_SHADER_PATH).unwrap();
    let path = temp_path("vertex-location-5.wgsl");
    // The first `@location(2)` is the vertex normal; no buffer provides 5.
    std::fs::write(&path, source.replacen("@location(2)", "@location(5)", 1)).unwrap();

    let config = EngineConfig {
        shader_path: path.clone(),
        ..EngineConfig::default()
    };
    let err = startup_error(&ctx, &config);
    std::fs::remove_file(&path).ok();

    assert_eq!(err.exit_code(), -2);
    match err {
        StartupError::PipelineCreation { name, message } => {
            assert_eq!(name, "shaded");
            assert!(!message.is_empty());
        }
        other => panic!("unexpected error: {other}"),
    }
}

// ── frames ────────────────────────────────────────────────────────────────

#[test]
fn suspended_source_skips_without_gpu_work() {
    let ctx = require_gpu!();
    let (mut engine, mut target) =
        setup(&ctx, &EngineConfig::default(), PhysicalSize::new(800, 600));
    target.set_suspended(true);

    assert_eq!(engine.run_frame(&mut target, 0.0), FrameOutcome::Skipped);

    let stats = engine.stats();
    assert_eq!(stats.frames_skipped, 1);
    assert_eq!(stats.frames_presented, 0);
    assert_eq!(stats.last_draw_calls, 0);
    assert_eq!(stats.total_submissions, 0);
    assert_eq!(target.acquired(), 0);
}

#[test]
fn frame_draws_each_object_once() {
    let ctx = require_gpu!();
    let (mut engine, mut target) =
        setup(&ctx, &EngineConfig::default(), PhysicalSize::new(800, 600));

    assert_eq!(engine.run_frame(&mut target, 0.5), FrameOutcome::Presented);

    let stats = engine.stats();
    assert_eq!(stats.frames_presented, 1);
    assert_eq!(stats.last_draw_calls, 2);
    assert_eq!(stats.last_submissions, 1);
}

#[test]
fn resize_rebuilds_attachments_before_next_frame() {
    let ctx = require_gpu!();
    let (mut engine, mut target) =
        setup(&ctx, &EngineConfig::default(), PhysicalSize::new(800, 600));
    assert_eq!(engine.run_frame(&mut target, 0.0), FrameOutcome::Presented);

    let new_size = PhysicalSize::new(1024, 768);
    target.resize(ctx.device(), new_size);
    engine.resize(new_size);

    assert_eq!(engine.run_frame(&mut target, 0.016), FrameOutcome::Presented);
    let attachments = engine.attachments();
    assert_eq!(attachments.size(), new_size);
    assert_eq!(attachments.generation(), 1);

    let depth = attachments.depth_texture();
    assert_eq!((depth.width(), depth.height(), depth.sample_count()), (1024, 768, 4));
    let msaa = attachments.msaa_texture().expect("msaa is on by default");
    assert_eq!((msaa.width(), msaa.height(), msaa.sample_count()), (1024, 768, 4));
}

#[test]
fn same_size_resize_is_idempotent() {
    let ctx = require_gpu!();
    let size = PhysicalSize::new(640, 480);
    let (mut engine, _) = setup(&ctx, &EngineConfig::default(), size);

    engine.resize(size);
    engine.resize(size);

    assert_eq!(engine.attachments().generation(), 0);
    assert_eq!(engine.attachments().size(), size);
}

#[test]
fn minimized_window_keeps_attachments_and_skips() {
    let ctx = require_gpu!();
    let size = PhysicalSize::new(320, 240);
    let (mut engine, mut target) = setup(&ctx, &EngineConfig::default(), size);

    let zero = PhysicalSize::new(0, 0);
    target.resize(ctx.device(), zero);
    engine.resize(zero);

    assert_eq!(engine.run_frame(&mut target, 1.0), FrameOutcome::Skipped);
    assert_eq!(engine.attachments().size(), size);
    assert_eq!(engine.attachments().generation(), 0);
}

#[test]
fn present_hook_runs_only_for_presented_frames() {
    let ctx = require_gpu!();
    let (mut engine, mut target) =
        setup(&ctx, &EngineConfig::default(), PhysicalSize::new(128, 128));
    let mut notified = 0;

    let outcome = engine.run_frame_notifying(&mut target, 0.0, || notified += 1);
    assert_eq!(outcome, FrameOutcome::Presented);
    assert_eq!(notified, 1);

    target.set_suspended(true);
    let outcome = engine.run_frame_notifying(&mut target, 0.1, || notified += 1);
    assert_eq!(outcome, FrameOutcome::Skipped);
    assert_eq!(notified, 1);
}

#[test]
fn pipelined_pacing_reuses_slots() {
    let ctx = require_gpu!();
    let config = EngineConfig {
        pacing: FramePacing::Pipelined,
        ..EngineConfig::default()
    };
    let (mut engine, mut target) = setup(&ctx, &config, PhysicalSize::new(256, 256));

    for i in 0..6 {
        assert_eq!(engine.run_frame(&mut target, i as f32 / 60.0), FrameOutcome::Presented);
    }
    ctx.wait_idle();

    let stats = engine.stats();
    assert_eq!(stats.frames_presented, 6);
    assert_eq!(stats.total_draw_calls, 12);
    assert_eq!(engine.pacing(), FramePacing::Pipelined);
}

#[test]
fn every_scene_variant_renders_without_msaa() {
    let ctx = require_gpu!();
    for scene in ["sphere", "cube", "square", "triangle"] {
        let config = EngineConfig {
            sample_count: 1,
            scene: scene.parse().unwrap(),
            ..EngineConfig::default()
        };
        let (mut engine, mut target) = setup(&ctx, &config, PhysicalSize::new(128, 128));

        assert!(engine.attachments().msaa_view().is_none());
        assert_eq!(engine.run_frame(&mut target, 2.0), FrameOutcome::Presented, "{scene}");
    }
}

// ── output ────────────────────────────────────────────────────────────────

/// Copies a 64x64 RGBA8 texture back to the CPU.
fn read_back(ctx: &GpuContext, texture: &wgpu::Texture) -> Vec<u8> {
    const SIDE: u32 = 64;
    let buffer = ctx.device().create_buffer(&wgpu::BufferDescriptor {
        label: Some("readback"),
        size: u64::from(SIDE * SIDE * 4),
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = ctx
        .device()
        .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &buffer,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(SIDE * 4),
                rows_per_image: Some(SIDE),
            },
        },
        wgpu::Extent3d {
            width: SIDE,
            height: SIDE,
            depth_or_array_layers: 1,
        },
    );
    ctx.queue().submit(Some(encoder.finish()));

    let slice = buffer.slice(..);
    slice.map_async(wgpu::MapMode::Read, |result| result.unwrap());
    ctx.wait_idle();
    slice.get_mapped_range().to_vec()
}

#[test]
fn corners_show_clear_color_and_centre_shows_sphere() {
    let ctx = require_gpu!();
    if is_noop(&ctx) {
        eprintln!("noop backend produces no pixels, skipping readback");
        return;
    }
    let (mut engine, mut target) =
        setup(&ctx, &EngineConfig::default(), PhysicalSize::new(64, 64));
    assert_eq!(engine.run_frame(&mut target, 0.0), FrameOutcome::Presented);

    let pixels = read_back(&ctx, target.texture().unwrap());
    let texel = |x: usize, y: usize| &pixels[(y * 64 + x) * 4..][..4];

    assert_eq!(texel(0, 0), &[41, 42, 48, 255]);
    assert_eq!(texel(63, 63), &[41, 42, 48, 255]);
    assert_ne!(texel(32, 32), &[41, 42, 48, 255]);
}
