//! Core engine-facing contracts.
//!
//! This module defines the stable interface between the runtime (platform loop)
//! and the application that owns the frame engine.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;
