//! Pointer tracking in backing-pixel space.

use kurbo::Point;

/// Pointer input targeted at the surface.
///
/// Offsets are relative to the surface's top-left corner, in presentation
/// units (CSS pixels on the web).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Move { offset_x: f64, offset_y: f64 },
    Leave,
}

/// Latest pointer position, scaled to the surface's backing space.
///
/// Events are applied as they arrive; a draw tick only ever sees the most
/// recent one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerTracker {
    scale: f64,
    position: Point,
}

impl PointerTracker {
    /// Position reported while the pointer is outside the surface.
    pub const ABSENT: Point = Point::new(-1.0, -1.0);

    pub fn new(scale: f64) -> Self {
        Self {
            scale,
            position: Self::ABSENT,
        }
    }

    pub fn handle(&mut self, event: PointerEvent) {
        self.position = match event {
            PointerEvent::Move { offset_x, offset_y } => {
                Point::new(offset_x * self.scale, offset_y * self.scale)
            }
            PointerEvent::Leave => Self::ABSENT,
        };
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn is_inside(&self) -> bool {
        self.position != Self::ABSENT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn starts_absent() {
        let tracker = PointerTracker::new(2.0);
        assert_eq!(tracker.position(), Point::new(-1.0, -1.0));
        assert!(!tracker.is_inside());
    }

    #[test]
    fn move_is_scaled() {
        let mut tracker = PointerTracker::new(2.0);
        tracker.handle(PointerEvent::Move {
            offset_x: 10.0,
            offset_y: 20.0,
        });
        assert_eq!(tracker.position(), Point::new(20.0, 40.0));
        assert!(tracker.is_inside());
    }

    #[test]
    fn leave_resets_to_sentinel() {
        let mut tracker = PointerTracker::new(3.0);
        tracker.handle(PointerEvent::Move {
            offset_x: 5.0,
            offset_y: 5.0,
        });
        tracker.handle(PointerEvent::Leave);
        assert_eq!(tracker.position(), PointerTracker::ABSENT);
    }

    #[test]
    fn latest_move_wins() {
        let mut tracker = PointerTracker::new(2.0);
        for x in [1.0, 2.0, 3.0] {
            tracker.handle(PointerEvent::Move {
                offset_x: x,
                offset_y: 0.0,
            });
        }
        assert_eq!(tracker.position(), Point::new(6.0, 0.0));
    }
}
