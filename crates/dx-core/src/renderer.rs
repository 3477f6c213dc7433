//! The renderer capability consumed by the engine.

use crate::error::{DrawError, EngineError};
use crate::options::Options;
use crate::scheduler::LoopControl;
use crate::surface::{Surface, TextStyle};
use crate::throttle::{ThrottleId, ThrottleRegistry};
use kurbo::Point;

/// Everything a renderer may touch while drawing one frame.
pub struct Frame<'a, S: Surface> {
    pub timestamp: f64,
    /// Pointer position in backing space, or [`PointerTracker::ABSENT`].
    ///
    /// [`PointerTracker::ABSENT`]: crate::PointerTracker::ABSENT
    pub pointer: Point,
    pub scale: f64,
    pub surface: &'a mut S,
    pub(crate) throttles: &'a mut ThrottleRegistry,
    pub(crate) control: &'a LoopControl,
}

impl<S: Surface> Frame<'_, S> {
    /// Run `f` against the surface if throttle `id` is due at this frame's timestamp.
    pub fn limit_to<T>(
        &mut self,
        id: ThrottleId,
        f: impl FnOnce(&mut S) -> T,
    ) -> Result<Option<T>, EngineError> {
        let surface = &mut *self.surface;
        self.throttles.limit_to(id, self.timestamp, || f(surface))
    }

    pub fn pointer_inside(&self) -> bool {
        self.pointer != crate::PointerTracker::ABSENT
    }

    /// Stop the loop once this frame completes.
    pub fn stop_loop(&self) {
        self.control.stop();
    }
}

/// Draws a visualization onto a surface.
///
/// Only [`draw_frame`](Renderer::draw_frame) is required. The other hooks
/// default to no-ops, except [`draw_fps`](Renderer::draw_fps) which draws a
/// plain text readout.
pub trait Renderer<S: Surface> {
    fn draw_frame(&mut self, frame: &mut Frame<'_, S>) -> Result<(), DrawError>;

    /// Called once when the engine is built. Register throttles here.
    fn on_attach(&mut self, _throttles: &mut ThrottleRegistry) -> Result<(), EngineError> {
        Ok(())
    }

    /// Called after the backing width actually changed.
    fn on_resize_width(&mut self, _width: u32) {}

    /// Called after every options update.
    fn install_options(&mut self, _options: &Options) {}

    fn draw_fps(&mut self, fps: u32, surface: &mut S) {
        let at = Point::new(
            f64::from(surface.backing_width()) / 2.0,
            f64::from(surface.backing_height()) / 2.0,
        );
        surface.fill_text(&format!("FPS: {fps}"), at, &TextStyle::fps_overlay());
    }
}

impl<S: Surface, R: Renderer<S> + ?Sized> Renderer<S> for Box<R> {
    fn draw_frame(&mut self, frame: &mut Frame<'_, S>) -> Result<(), DrawError> {
        (**self).draw_frame(frame)
    }

    fn on_attach(&mut self, throttles: &mut ThrottleRegistry) -> Result<(), EngineError> {
        (**self).on_attach(throttles)
    }

    fn on_resize_width(&mut self, width: u32) {
        (**self).on_resize_width(width);
    }

    fn install_options(&mut self, options: &Options) {
        (**self).install_options(options);
    }

    fn draw_fps(&mut self, fps: u32, surface: &mut S) {
        (**self).draw_fps(fps, surface);
    }
}
