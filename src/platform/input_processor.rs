//=========================================================================
// Input Processor
//=========================================================================
//
// Converts platform-specific Winit events into engine InputEvents.
//
// Architecture:
//   Winit Events → InputProcessor → InputEvent (engine type) → InputBuffer
//
// Stateful cursor tracking: Winit reports button events without a
// position, so the last CursorMoved position (in logical pixels) is
// stamped onto every press and release.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::event::{ElementState, MouseButton as WinitMouseButton, TouchPhase};

//=== Internal Dependencies ===============================================

use crate::core::input::{InputEvent, MouseButton};

//=== InputProcessor ======================================================

/// Converts Winit events to engine InputEvents with cursor tracking.
pub(crate) struct InputProcessor {
    cursor: (f32, f32),
    scale_factor: f64,
}

impl InputProcessor {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        Self {
            cursor: (0.0, 0.0),
            scale_factor: 1.0,
        }
    }

    //--- DPI --------------------------------------------------------------

    /// Sets the physical-to-logical ratio used for all positions.
    pub(crate) fn set_scale_factor(&mut self, scale_factor: f64) {
        if scale_factor > 0.0 {
            self.scale_factor = scale_factor;
        }
    }

    pub(crate) fn cursor(&self) -> (f32, f32) {
        self.cursor
    }

    //--- Event Processing -------------------------------------------------

    /// Creates a move event from a physical cursor position.
    pub(crate) fn process_cursor_moved(&mut self, x: f64, y: f64) -> InputEvent {
        self.cursor = self.to_logical(x, y);
        let (x, y) = self.cursor;
        InputEvent::PointerMoved { x, y }
    }

    /// Converts a Winit mouse button event at the tracked cursor.
    pub(crate) fn process_mouse_button(
        &self,
        button: WinitMouseButton,
        state: ElementState,
    ) -> InputEvent {
        let button = MouseButton::from(button);
        let (x, y) = self.cursor;

        match state {
            ElementState::Pressed => InputEvent::PointerDown { button, x, y },
            ElementState::Released => InputEvent::PointerUp { button, x, y },
        }
    }

    /// Converts a touch. Only the start of a touch is an input; every
    /// phase still moves the tracked cursor.
    pub(crate) fn process_touch(&mut self, phase: TouchPhase, x: f64, y: f64) -> Option<InputEvent> {
        self.cursor = self.to_logical(x, y);
        let (x, y) = self.cursor;

        match phase {
            TouchPhase::Started => Some(InputEvent::TouchStart { x, y }),
            TouchPhase::Moved | TouchPhase::Ended | TouchPhase::Cancelled => None,
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn to_logical(&self, x: f64, y: f64) -> (f32, f32) {
        ((x / self.scale_factor) as f32, (y / self.scale_factor) as f32)
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Converts Winit mouse buttons to engine buttons.
///
/// Left/Right/Middle mapped directly; Back/Forward/Other → Other.
impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Other,
        }
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_origin() {
        let processor = InputProcessor::new();
        assert_eq!(processor.cursor(), (0.0, 0.0));
    }

    #[test]
    fn press_uses_last_cursor_position() {
        let mut processor = InputProcessor::new();
        processor.process_cursor_moved(120.0, 340.0);

        match processor.process_mouse_button(WinitMouseButton::Left, ElementState::Pressed) {
            InputEvent::PointerDown { button, x, y } => {
                assert_eq!(button, MouseButton::Left);
                assert_eq!((x, y), (120.0, 340.0));
            }
            other => panic!("Expected PointerDown, got {:?}", other),
        }
    }

    #[test]
    fn release_maps_to_pointer_up() {
        let processor = InputProcessor::new();
        let event = processor.process_mouse_button(WinitMouseButton::Right, ElementState::Released);
        assert!(matches!(event, InputEvent::PointerUp { button: MouseButton::Right, .. }));
    }

    #[test]
    fn positions_are_logical() {
        let mut processor = InputProcessor::new();
        processor.set_scale_factor(2.0);

        let event = processor.process_cursor_moved(200.0, 100.0);
        assert_eq!(event.position(), Some((100.0, 50.0)));
    }

    #[test]
    fn only_touch_start_is_an_input() {
        let mut processor = InputProcessor::new();

        let started = processor.process_touch(TouchPhase::Started, 10.0, 20.0);
        assert!(matches!(started, Some(InputEvent::TouchStart { x, y }) if (x, y) == (10.0, 20.0)));

        assert!(processor.process_touch(TouchPhase::Moved, 30.0, 40.0).is_none());
        assert_eq!(processor.cursor(), (30.0, 40.0));
    }

    #[test]
    fn mouse_button_conversion() {
        assert_eq!(MouseButton::from(WinitMouseButton::Left), MouseButton::Left);
        assert_eq!(MouseButton::from(WinitMouseButton::Middle), MouseButton::Middle);
        assert_eq!(MouseButton::from(WinitMouseButton::Back), MouseButton::Other);
    }
}
