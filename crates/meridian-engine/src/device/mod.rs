//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue (`GpuContext`)
//! - creating & configuring the window Surface (`Gpu`)
//! - handing out one `DrawableImage` per frame through `DrawableSource`

mod context;
mod error;
mod frame;
mod gpu;
mod init;
mod offscreen;
mod surface;

pub use context::GpuContext;
pub use error::SurfaceErrorAction;
pub use frame::{Acquire, DrawableImage, DrawableSource};
pub use gpu::Gpu;
pub use init::GpuInit;
pub use offscreen::OffscreenTarget;
