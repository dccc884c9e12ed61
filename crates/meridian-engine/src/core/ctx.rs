use winit::window::Window;

use crate::device::Gpu;
use crate::render::{FrameEngine, FrameOutcome};
use crate::time::FrameTime;

use super::app::AppControl;

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: &'a Window,
    pub gpu: &'a mut Gpu<'w>,
    pub time: FrameTime,
}

impl FrameCtx<'_, '_> {
    /// Runs one engine frame against the window surface.
    ///
    /// Skipped frames keep the loop running; a fatal surface error ends it.
    /// The window hears `pre_present_notify` only for frames that present.
    pub fn render(&mut self, engine: &mut FrameEngine) -> AppControl {
        let window = self.window;
        match engine.run_frame_notifying(&mut *self.gpu, self.time.elapsed, || {
            window.pre_present_notify()
        }) {
            FrameOutcome::Presented | FrameOutcome::Skipped => AppControl::Continue,
            FrameOutcome::Fatal => AppControl::Exit,
        }
    }
}
