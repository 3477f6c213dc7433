//! The frame engine.
//!
//! [`Engine`] ties the pieces together: it resolves the scale once, keeps
//! the surface sized, tracks the pointer, and on every tick hands a
//! [`Frame`] to its [`Renderer`]. Ticks are driven by the host through a
//! [`FrameScheduler`]; the engine only ever asks for the next one.

use crate::density::{DisplayContext, resolve_scale};
use crate::error::EngineError;
use crate::options::{Options, OptionsPatch};
use crate::pointer::{PointerEvent, PointerTracker};
use crate::renderer::{Frame, Renderer};
use crate::scheduler::{FrameScheduler, FrameStatus, LoopControl, LoopState, frames_per_second};
use crate::sizing::SurfaceSizer;
use crate::surface::Surface;
use crate::throttle::{ThrottleId, ThrottleRegistry};
use kurbo::Point;

pub struct Engine<R, S, F> {
    renderer: R,
    surface: S,
    scheduler: F,
    sizer: SurfaceSizer,
    pointer: PointerTracker,
    throttles: ThrottleRegistry,
    options: Options,
    control: LoopControl,
    /// A frame has been requested and its tick has not run yet.
    pending: bool,
    last_frame: Option<f64>,
}

impl<R, S, F> Engine<R, S, F>
where
    R: Renderer<S>,
    S: Surface,
    F: FrameScheduler,
{
    /// Build an engine over an already-mounted surface.
    ///
    /// The loop starts out stopped.
    pub fn new(
        mut renderer: R,
        mut surface: S,
        scheduler: F,
        display: &DisplayContext,
        options: Options,
    ) -> Result<Self, EngineError> {
        let scale = resolve_scale(display);
        let sizer = SurfaceSizer::new(scale);
        sizer.setup(&mut surface, options.height);

        let mut throttles = ThrottleRegistry::new();
        renderer.on_attach(&mut throttles)?;

        log::debug!("engine ready at scale {scale}, {options:?}");
        Ok(Self {
            renderer,
            surface,
            scheduler,
            sizer,
            pointer: PointerTracker::new(scale),
            throttles,
            options,
            control: LoopControl::default(),
            pending: false,
            last_frame: None,
        })
    }

    /// Begin producing frames.
    ///
    /// Requests a frame unless one is already pending, so a stop/start pair
    /// between two ticks never doubles the loop. Resuming a halted loop drops
    /// the FPS baseline, so the first readout does not span the pause.
    pub fn start(&mut self) {
        let resuming = !self.control.is_running() && !self.pending;
        self.control.run();
        if resuming {
            self.last_frame = None;
        }
        if !self.pending {
            self.pending = true;
            self.scheduler.request_frame();
        }
        log::debug!("frame loop started");
    }

    /// Stop producing frames after the current or next tick.
    pub fn stop(&mut self) {
        self.control.stop();
        log::debug!("frame loop stopping");
    }

    pub fn state(&self) -> LoopState {
        self.control.state()
    }

    pub fn is_running(&self) -> bool {
        self.control.is_running()
    }

    /// A handle that can stop the loop without borrowing the engine.
    pub fn control(&self) -> LoopControl {
        self.control.clone()
    }

    /// Run one frame at `timestamp` (milliseconds, host clock).
    ///
    /// A draw failure stops the loop and is returned as is; the last good
    /// frame stays on the surface.
    pub fn tick(&mut self, timestamp: f64) -> Result<FrameStatus, EngineError> {
        self.pending = false;
        if !self.control.is_running() {
            return Ok(FrameStatus::Halted);
        }

        if self.sizer.adjust_width(&mut self.surface) {
            self.renderer.on_resize_width(self.surface.backing_width());
        }
        self.sizer.adjust_height(&mut self.surface, self.options.height);

        let mut frame = Frame {
            timestamp,
            pointer: self.pointer.position(),
            scale: self.sizer.scale(),
            surface: &mut self.surface,
            throttles: &mut self.throttles,
            control: &self.control,
        };
        if let Err(err) = self.renderer.draw_frame(&mut frame) {
            log::error!("draw failed at {timestamp}: {err}");
            self.control.stop();
            return Err(err.into());
        }

        if self.options.show_fps
            && let Some(previous) = self.last_frame
            && let Some(fps) = frames_per_second(previous, timestamp)
        {
            self.renderer.draw_fps(fps, &mut self.surface);
        }
        self.last_frame = Some(timestamp);

        if let Some(after_draw) = &self.options.after_draw {
            after_draw();
        }

        if self.control.is_running() {
            self.pending = true;
            self.scheduler.request_frame();
            Ok(FrameStatus::Continue)
        } else {
            Ok(FrameStatus::Halted)
        }
    }

    /// Merge `patch` into the options and let the renderer react.
    pub fn update_options(&mut self, patch: OptionsPatch) {
        let height_changed = patch.height.is_some_and(|h| h != self.options.height);
        self.options.merge(patch);
        if height_changed {
            self.sizer
                .apply_presentation(&mut self.surface, self.options.height);
        }
        log::debug!("options updated: {:?}", self.options);
        self.renderer.install_options(&self.options);
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        self.pointer.handle(event);
    }

    pub fn pointer(&self) -> Point {
        self.pointer.position()
    }

    pub fn create_throttle(&mut self, rate_per_second: f64) -> Result<ThrottleId, EngineError> {
        self.throttles.create(rate_per_second)
    }

    pub fn scale(&self) -> f64 {
        self.sizer.scale()
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Timestamp of the last completed frame.
    pub fn last_frame(&self) -> Option<f64> {
        self.last_frame
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DrawError;
    use crate::options::Height;
    use crate::support::{ManualScheduler, RecordingSurface};
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Counting {
        frames: usize,
        resizes: Vec<u32>,
        installs: usize,
        fps: Vec<u32>,
    }

    impl Renderer<RecordingSurface> for Counting {
        fn draw_frame(&mut self, _frame: &mut Frame<'_, RecordingSurface>) -> Result<(), DrawError> {
            self.frames += 1;
            Ok(())
        }

        fn on_resize_width(&mut self, width: u32) {
            self.resizes.push(width);
        }

        fn install_options(&mut self, _options: &Options) {
            self.installs += 1;
        }

        fn draw_fps(&mut self, fps: u32, _surface: &mut RecordingSurface) {
            self.fps.push(fps);
        }
    }

    type TestEngine = Engine<Counting, RecordingSurface, ManualScheduler>;

    fn engine(options: Options) -> TestEngine {
        Engine::new(
            Counting::default(),
            RecordingSurface::new(400.0, 300.0),
            ManualScheduler::default(),
            &DisplayContext::with_device_pixel_ratio(1.0),
            options,
        )
        .unwrap()
    }

    #[test]
    fn new_engine_is_stopped_and_set_up() {
        let engine = engine(Options::default());
        assert_eq!(engine.state(), LoopState::Stopped);
        assert_eq!(engine.scale(), 2.0);
        assert_eq!(engine.scheduler().total_requests(), 0);
        assert_eq!(engine.surface().transforms.len(), 1);
    }

    #[test]
    fn stopped_tick_does_nothing() {
        let mut engine = engine(Options::default());
        assert_eq!(engine.tick(16.0).unwrap(), FrameStatus::Halted);
        assert_eq!(engine.renderer().frames, 0);
        assert!(engine.surface().width_writes.is_empty());
    }

    #[test]
    fn running_tick_sizes_draws_and_reschedules() {
        let mut engine = engine(Options::default());
        engine.start();
        assert_eq!(engine.tick(16.0).unwrap(), FrameStatus::Continue);

        assert_eq!(engine.surface().width, 800);
        assert_eq!(engine.surface().height, 600);
        assert_eq!(engine.renderer().frames, 1);
        assert_eq!(engine.renderer().resizes, vec![800]);
        assert_eq!(engine.scheduler().total_requests(), 2);
        assert_eq!(engine.last_frame(), Some(16.0));
    }

    #[test]
    fn repeated_start_does_not_double_the_loop() {
        let mut engine = engine(Options::default());
        engine.start();
        engine.stop();
        engine.start();
        assert_eq!(engine.scheduler().total_requests(), 1);
    }

    #[test]
    fn fps_uses_previous_frame() {
        let mut engine = engine(Options {
            show_fps: true,
            ..Default::default()
        });
        engine.start();
        engine.tick(1000.0).unwrap();
        engine.tick(2000.0).unwrap();
        engine.tick(2016.0).unwrap();
        assert_eq!(engine.renderer().fps, vec![1, 62]);
    }

    #[test]
    fn update_options_installs_once() {
        let mut engine = engine(Options::fixed_height(120.0));
        engine.update_options(OptionsPatch::default().show_fps(true));

        assert_eq!(engine.renderer().installs, 1);
        assert!(engine.options().show_fps);
        assert_eq!(engine.options().height, Height::Fixed(120.0));
    }

    #[test]
    fn height_change_repins_presentation() {
        let mut engine = engine(Options::fixed_height(120.0));
        engine.update_options(OptionsPatch::default().height(Height::Fixed(90.0)));
        let presentation = engine.surface().presentation.unwrap();
        assert_eq!(presentation.height.to_string(), "90px");
    }

    #[test]
    fn boxed_renderers_drive_the_loop() {
        let renderer: Box<dyn Renderer<RecordingSurface>> = Box::new(Counting::default());
        let mut engine = Engine::new(
            renderer,
            RecordingSurface::new(10.0, 10.0),
            ManualScheduler::default(),
            &DisplayContext::default(),
            Options::default(),
        )
        .unwrap();
        engine.start();
        assert_eq!(engine.tick(0.0).unwrap(), FrameStatus::Continue);
        assert_eq!(engine.surface().width, 20);
    }

    #[test]
    fn pointer_is_scaled_by_engine_scale() {
        let mut engine = engine(Options::default());
        engine.handle_pointer(PointerEvent::Move {
            offset_x: 10.0,
            offset_y: 20.0,
        });
        assert_eq!(engine.pointer(), Point::new(20.0, 40.0));
    }
}
