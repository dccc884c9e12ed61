mod app;

use meridian_engine::device::GpuInit;
use meridian_engine::logging::{init_logging, LoggingConfig};
use meridian_engine::window::{Runtime, RuntimeConfig};
use meridian_engine::{EngineConfig, StartupError};

use app::SceneApp;

fn main() {
    init_logging(LoggingConfig::default());

    let config = EngineConfig::from_env();
    log::info!(
        "starting meridian: scene {:?}, {}x MSAA, {:?} pacing",
        config.scene,
        config.sample_count,
        config.pacing
    );

    let app = SceneApp::new(config);
    if let Err(e) = Runtime::run(RuntimeConfig::default(), GpuInit::default(), app) {
        log::error!("meridian stopped: {e:#}");
        std::process::exit(StartupError::exit_code_of(&e));
    }
}
