//! Drag state machine
//!
//! Turns raw pointer events into overlay positions. A press only becomes a
//! drag once the pointer travels past the move threshold on either axis;
//! anything shorter is a tap.

use crate::geometry::Point;
use crate::input::{PointerAction, PointerEvent};

/// Phase of the current gesture
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragPhase {
    #[default]
    Idle,
    /// Pointer is down, movement not yet accepted
    Armed,
    Dragging,
    /// Snap animation in flight, pointer no longer involved
    Settling,
}

/// What the engine should do in response to one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// No gesture in progress for this event
    Ignored,
    /// Event swallowed below the move threshold
    Absorbed,
    /// Overlay follows the pointer to this position
    Moved(Point),
    /// Drag ended; snap from this position
    Released(Point),
    /// Press and release without movement
    Tap,
}

#[derive(Debug, Default)]
pub struct DragTracker {
    phase: DragPhase,
    /// Last pointer position in screen coordinates
    screen_touch: (f32, f32),
    /// Screen position of the press, for the threshold test
    screen_touch_down: (f32, f32),
    /// Pointer offset within the overlay at press time
    view_touch: (f32, f32),
    move_accepted: bool,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn is_move_accepted(&self) -> bool {
        self.move_accepted
    }

    /// Overlay top-left implied by the last pointer position
    pub fn position_by_touch(&self) -> Point {
        Point::new(
            (self.screen_touch.0 - self.view_touch.0) as i32,
            (self.screen_touch.1 - self.view_touch.1) as i32,
        )
    }

    /// Feed one event. `threshold_px` is the move threshold in device pixels.
    pub fn handle(&mut self, event: &PointerEvent, threshold_px: f32) -> DragOutcome {
        match (event.action, self.phase) {
            (PointerAction::Down, _) => {
                self.screen_touch = (event.raw_x, event.raw_y);
                self.screen_touch_down = self.screen_touch;
                self.view_touch = (event.local_x, event.local_y);
                self.move_accepted = false;
                self.phase = DragPhase::Armed;
                tracing::debug!(x = event.raw_x, y = event.raw_y, "pointer armed");
                DragOutcome::Absorbed
            }
            (PointerAction::Move, DragPhase::Armed) => {
                self.screen_touch = (event.raw_x, event.raw_y);
                let dx = (self.screen_touch.0 - self.screen_touch_down.0).abs();
                let dy = (self.screen_touch.1 - self.screen_touch_down.1).abs();
                if dx < threshold_px && dy < threshold_px {
                    return DragOutcome::Absorbed;
                }
                self.move_accepted = true;
                self.phase = DragPhase::Dragging;
                tracing::debug!(dx, dy, "drag accepted");
                DragOutcome::Moved(self.position_by_touch())
            }
            (PointerAction::Move, DragPhase::Dragging) => {
                self.screen_touch = (event.raw_x, event.raw_y);
                DragOutcome::Moved(self.position_by_touch())
            }
            (PointerAction::Up | PointerAction::Cancel, DragPhase::Dragging) => {
                self.screen_touch = (event.raw_x, event.raw_y);
                let start = self.position_by_touch();
                self.phase = DragPhase::Idle;
                DragOutcome::Released(start)
            }
            (PointerAction::Up | PointerAction::Cancel, DragPhase::Armed) => {
                self.screen_touch = (event.raw_x, event.raw_y);
                self.phase = DragPhase::Idle;
                DragOutcome::Tap
            }
            (_, DragPhase::Idle | DragPhase::Settling) => DragOutcome::Ignored,
        }
    }

    /// Clear the recorded press once the overlay has been placed
    pub fn reset_touch(&mut self) {
        self.view_touch = (0.0, 0.0);
        self.screen_touch_down = (0.0, 0.0);
        self.move_accepted = false;
    }

    pub fn begin_settling(&mut self) {
        self.phase = DragPhase::Settling;
    }

    /// Leave `Settling`; a gesture that already re-armed is left alone
    pub fn finish_settling(&mut self) {
        if self.phase == DragPhase::Settling {
            self.phase = DragPhase::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: f32 = 24.0;

    #[test]
    fn test_small_moves_are_absorbed() {
        let mut tracker = DragTracker::new();
        tracker.handle(&PointerEvent::down(500.0, 500.0, 50.0, 60.0), THRESHOLD);
        assert_eq!(tracker.phase(), DragPhase::Armed);

        let outcome = tracker.handle(&PointerEvent::moved(523.0, 477.0), THRESHOLD);
        assert_eq!(outcome, DragOutcome::Absorbed);
        assert!(!tracker.is_move_accepted());

        assert_eq!(tracker.handle(&PointerEvent::up(510.0, 505.0), THRESHOLD), DragOutcome::Tap);
        assert_eq!(tracker.phase(), DragPhase::Idle);
    }

    #[test]
    fn test_threshold_on_either_axis_starts_drag() {
        let mut tracker = DragTracker::new();
        tracker.handle(&PointerEvent::down(500.0, 500.0, 50.0, 60.0), THRESHOLD);

        let outcome = tracker.handle(&PointerEvent::moved(500.0, 524.0), THRESHOLD);
        assert_eq!(outcome, DragOutcome::Moved(Point::new(450, 464)));
        assert_eq!(tracker.phase(), DragPhase::Dragging);
        assert!(tracker.is_move_accepted());
    }

    #[test]
    fn test_drag_tracks_pointer_minus_offset() {
        let mut tracker = DragTracker::new();
        tracker.handle(&PointerEvent::down(100.0, 100.0, 30.0, 40.0), THRESHOLD);

        for step in 1..=10 {
            let raw = 100.0 + step as f32 * 50.0;
            let outcome = tracker.handle(&PointerEvent::moved(raw, raw * 2.0), THRESHOLD);
            let expected = Point::new((raw - 30.0) as i32, (raw * 2.0 - 40.0) as i32);
            assert_eq!(outcome, DragOutcome::Moved(expected));
        }

        let outcome = tracker.handle(&PointerEvent::up(900.0, 300.0), THRESHOLD);
        assert_eq!(outcome, DragOutcome::Released(Point::new(870, 260)));
    }

    #[test]
    fn test_cancel_ends_drag_like_up() {
        let mut tracker = DragTracker::new();
        tracker.handle(&PointerEvent::down(0.0, 0.0, 0.0, 0.0), THRESHOLD);
        tracker.handle(&PointerEvent::moved(100.0, 0.0), THRESHOLD);
        let outcome = tracker.handle(&PointerEvent::cancel(120.0, 0.0), THRESHOLD);
        assert_eq!(outcome, DragOutcome::Released(Point::new(120, 0)));
    }

    #[test]
    fn test_stray_events_without_press_are_ignored() {
        let mut tracker = DragTracker::new();
        assert_eq!(tracker.handle(&PointerEvent::moved(300.0, 300.0), THRESHOLD), DragOutcome::Ignored);
        assert_eq!(tracker.handle(&PointerEvent::up(300.0, 300.0), THRESHOLD), DragOutcome::Ignored);

        tracker.begin_settling();
        assert_eq!(tracker.handle(&PointerEvent::up(300.0, 300.0), THRESHOLD), DragOutcome::Ignored);
        assert_eq!(tracker.phase(), DragPhase::Settling);
    }

    #[test]
    fn test_press_while_settling_rearms() {
        let mut tracker = DragTracker::new();
        tracker.begin_settling();
        tracker.handle(&PointerEvent::down(10.0, 10.0, 5.0, 5.0), THRESHOLD);
        assert_eq!(tracker.phase(), DragPhase::Armed);

        tracker.finish_settling();
        assert_eq!(tracker.phase(), DragPhase::Armed);
    }
}
