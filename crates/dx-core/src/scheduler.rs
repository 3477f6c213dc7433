//! Frame scheduling primitives.

use std::cell::Cell;
use std::rc::Rc;

/// The host's vsync-aligned callback queue.
///
/// `request_frame` asks for exactly one future call to
/// [`Engine::tick`](crate::Engine::tick). Hosts must never run two ticks at
/// once; the next tick is issued only after the current one returns.
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

/// Frame loop lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    #[default]
    Stopped,
    Running,
}

/// Shared view of the loop state.
///
/// Stopping through a control is lazy: a tick already in flight finishes its
/// work and then declines to reschedule. Hosts hand clones to callbacks that
/// may run while the engine itself is mid-tick.
#[derive(Debug, Clone, Default)]
pub struct LoopControl {
    state: Rc<Cell<LoopState>>,
}

impl LoopControl {
    pub fn state(&self) -> LoopState {
        self.state.get()
    }

    pub fn is_running(&self) -> bool {
        self.state.get() == LoopState::Running
    }

    pub fn stop(&self) {
        self.state.set(LoopState::Stopped);
    }

    pub(crate) fn run(&self) {
        self.state.set(LoopState::Running);
    }
}

/// What a tick asks of its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// Another frame has been requested.
    Continue,
    /// The loop observed a stop and did not reschedule.
    Halted,
}

/// Whole frames per second between two timestamps in milliseconds.
///
/// `None` when the delta is not positive.
pub fn frames_per_second(previous: f64, current: f64) -> Option<u32> {
    let delta = current - previous;
    if delta.is_nan() || delta <= 0.0 {
        return None;
    }
    Some((1000.0 / delta).floor() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_from_frame_gap() {
        assert_eq!(frames_per_second(0.0, 1000.0), Some(1));
        assert_eq!(frames_per_second(1000.0, 1016.0), Some(62));
        assert_eq!(frames_per_second(0.0, 20.0), Some(50));
    }

    #[test]
    fn controls_share_state() {
        let control = LoopControl::default();
        let clone = control.clone();
        assert_eq!(control.state(), LoopState::Stopped);

        control.run();
        assert!(clone.is_running());

        clone.stop();
        assert!(!control.is_running());
    }

    #[test]
    fn fps_needs_forward_time() {
        assert_eq!(frames_per_second(500.0, 500.0), None);
        assert_eq!(frames_per_second(500.0, 400.0), None);
        assert_eq!(frames_per_second(f64::NAN, 400.0), None);
    }
}
