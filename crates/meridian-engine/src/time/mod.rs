//! Frame timing.
//!
//! One `FrameClock` per render loop; `tick()` once per redraw yields the
//! delta used for diagnostics and the elapsed time that drives animation.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
