//=========================================================================
// Pointer Tracker
//=========================================================================
//
// Low-level pointer state tracking with per-frame delta tracking.
//
// Architecture:
//   InputEvent → process_events() → HashSet (buttons held) → PointerEvent
//
// Frame lifecycle: clear() → process_events() → query
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, MouseButton, PointerEvent};

//=== PointerTracker ======================================================

/// Tracks persistent pointer state and turns raw events into
/// [`PointerEvent`]s, preserving their order.
pub struct PointerTracker {
    //--- Persistent State (survives frame boundary) ----------------------
    buttons_down: HashSet<MouseButton>,
    position: (f32, f32),

    //--- Frame Deltas (reset each frame via clear()) --------------------
    buttons_pressed_this_frame: HashSet<MouseButton>,
    buttons_released_this_frame: HashSet<MouseButton>,
}

impl PointerTracker {
    /// Creates a new tracker with the pointer at the origin.
    pub fn new() -> Self {
        Self {
            buttons_down: HashSet::new(),
            position: (0.0, 0.0),
            buttons_pressed_this_frame: HashSet::new(),
            buttons_released_this_frame: HashSet::new(),
        }
    }

    //--- Frame Processing -------------------------------------------------

    /// Clears frame-specific deltas (pressed/released flags).
    pub(super) fn clear(&mut self) {
        self.buttons_pressed_this_frame.clear();
        self.buttons_released_this_frame.clear();
    }

    /// Processes input events, appending the resulting pointer events.
    pub(super) fn process_events(&mut self, events: &[InputEvent], out: &mut Vec<PointerEvent>) {
        for event in events {
            if let Some(pointer) = self.process_event(event) {
                out.push(pointer);
            }
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn process_event(&mut self, event: &InputEvent) -> Option<PointerEvent> {
        match *event {
            InputEvent::PointerMoved { x, y } => {
                self.position = (x, y);
                Some(PointerEvent::Moved { x, y })
            }

            InputEvent::PointerDown { button, x, y } => {
                self.position = (x, y);
                // Only a fresh press counts; held buttons do not repeat
                if !self.buttons_down.insert(button) {
                    return None;
                }
                self.buttons_pressed_this_frame.insert(button);
                (button == MouseButton::Left).then_some(PointerEvent::Pressed { x, y })
            }

            InputEvent::PointerUp { button, x, y } => {
                self.position = (x, y);
                if self.buttons_down.remove(&button) {
                    self.buttons_released_this_frame.insert(button);
                }
                None
            }

            InputEvent::TouchStart { x, y } => {
                self.position = (x, y);
                Some(PointerEvent::Touched { x, y })
            }

            InputEvent::Unidentified => None,
        }
    }

    //=====================================================================
    // Query API
    //=====================================================================

    /// Returns the last known pointer position (pixels, top-left origin).
    pub fn position(&self) -> (f32, f32) {
        self.position
    }

    /// Returns `true` while the button is held.
    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    /// Returns `true` if the button transitioned UP → DOWN this frame.
    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons_pressed_this_frame.contains(&button)
    }

    /// Returns `true` if the button transitioned DOWN → UP this frame.
    pub fn is_button_released(&self, button: MouseButton) -> bool {
        self.buttons_released_this_frame.contains(&button)
    }
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn down(button: MouseButton, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerDown { button, x, y }
    }

    fn up(button: MouseButton, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerUp { button, x, y }
    }

    fn run(tracker: &mut PointerTracker, events: &[InputEvent]) -> Vec<PointerEvent> {
        let mut out = Vec::new();
        tracker.clear();
        tracker.process_events(events, &mut out);
        out
    }

    #[test]
    fn left_press_becomes_click_at_event_position() {
        let mut tracker = PointerTracker::new();
        let out = run(&mut tracker, &[down(MouseButton::Left, 40.0, 50.0)]);
        assert_eq!(out, vec![PointerEvent::Pressed { x: 40.0, y: 50.0 }]);
        assert_eq!(tracker.position(), (40.0, 50.0));
        assert!(tracker.is_button_pressed(MouseButton::Left));
    }

    #[test]
    fn right_press_is_tracked_but_not_a_click() {
        let mut tracker = PointerTracker::new();
        let out = run(&mut tracker, &[down(MouseButton::Right, 1.0, 1.0)]);
        assert!(out.is_empty());
        assert!(tracker.is_button_down(MouseButton::Right));
    }

    #[test]
    fn held_button_does_not_repeat_click() {
        let mut tracker = PointerTracker::new();
        run(&mut tracker, &[down(MouseButton::Left, 0.0, 0.0)]);
        let second = run(&mut tracker, &[down(MouseButton::Left, 0.0, 0.0)]);
        assert!(second.is_empty());
        assert!(!tracker.is_button_pressed(MouseButton::Left));

        run(&mut tracker, &[up(MouseButton::Left, 0.0, 0.0)]);
        assert!(tracker.is_button_released(MouseButton::Left));
        let third = run(&mut tracker, &[down(MouseButton::Left, 0.0, 0.0)]);
        assert_eq!(third.len(), 1);
    }

    #[test]
    fn order_is_preserved() {
        let mut tracker = PointerTracker::new();
        let out = run(
            &mut tracker,
            &[
                InputEvent::PointerMoved { x: 10.0, y: 10.0 },
                down(MouseButton::Left, 10.0, 10.0),
                InputEvent::TouchStart { x: 20.0, y: 20.0 },
                InputEvent::Unidentified,
            ],
        );
        assert_eq!(
            out,
            vec![
                PointerEvent::Moved { x: 10.0, y: 10.0 },
                PointerEvent::Pressed { x: 10.0, y: 10.0 },
                PointerEvent::Touched { x: 20.0, y: 20.0 },
            ]
        );
    }
}
