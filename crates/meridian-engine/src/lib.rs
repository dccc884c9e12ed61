//! Meridian engine crate.
//!
//! A small real-time 3D renderer: window + surface management, a pipeline
//! catalog built from a WGSL shader library, resize-aware MSAA/depth
//! attachments, and a frame engine that draws a lit, textured scene each
//! refresh.

pub mod assets;
pub mod config;
pub mod core;
pub mod device;
pub mod error;
pub mod logging;
pub mod paint;
pub mod render;
pub mod scene;
pub mod time;
pub mod window;

pub use config::EngineConfig;
pub use error::StartupError;
