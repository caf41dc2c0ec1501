//=========================================================================
// Input Buffer
//
// Collects pointer input between two frame boundaries and splits it
// into two categories: discrete and continuous.
//
// Responsibilities:
// - Store incoming platform events for the current frame
// - Deduplicate repeated discrete inputs (e.g., PointerDown)
// - Coalesce continuous inputs (PointerMoved → last position)
// - Hand both lists to the platform via `drain()`
//
//=========================================================================

//=== Standard Library Imports ============================================
use std::collections::HashSet;

//=== Internal Modules ====================================================
use crate::core::input::InputEvent;

//=== InputBuffer Struct ==================================================
//
// Internally maintains:
// - `discrete`: ordered one-shot inputs (presses, releases, touches)
// - `continuous`: last-known state of continuous inputs (cursor position)
//
pub(crate) struct InputBuffer {
    discrete: Vec<InputEvent>,
    continuous: HashSet<InputEvent>,
}

impl InputBuffer {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        const DISCRETE_BASE: usize = 32;
        const CONTINUOUS_BASE: usize = 4;

        Self {
            discrete: Vec::with_capacity(DISCRETE_BASE),
            continuous: HashSet::with_capacity(CONTINUOUS_BASE),
        }
    }

    //--- Continuous Event Handling ---------------------------------------
    //
    // The latest event always replaces any previous one of the same type.
    //
    pub(crate) fn push_continuous(&mut self, event: InputEvent) {
        self.continuous.replace(event);
    }

    //--- Discrete Event Handling -----------------------------------------
    //
    // Duplicate consecutive events are ignored to prevent flooding.
    //
    pub(crate) fn push_discrete(&mut self, event: InputEvent) {
        if self.discrete.last() != Some(&event) {
            self.discrete.push(event);
        }
    }

    //--- Drain ------------------------------------------------------------
    //
    // Returns `(discrete, continuous)` and clears the buffer, or `None`
    // when nothing was recorded this frame.
    //
    pub(crate) fn drain(&mut self) -> Option<(Vec<InputEvent>, Vec<InputEvent>)> {
        if self.is_empty() {
            return None;
        }
        let discrete = std::mem::take(&mut self.discrete);
        let continuous = self.continuous.drain().collect();
        Some((discrete, continuous))
    }

    //--- Utilities --------------------------------------------------------

    pub(crate) fn len(&self) -> usize {
        self.discrete.len() + self.continuous.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.discrete.is_empty() && self.continuous.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::MouseButton;

    fn press(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerDown { button: MouseButton::Left, x, y }
    }

    fn pointer_move(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMoved { x, y }
    }

    #[test]
    fn repeated_press_is_deduplicated() {
        let mut buffer = InputBuffer::new();
        buffer.push_discrete(press(1.0, 1.0));
        buffer.push_discrete(press(2.0, 2.0));
        buffer.push_discrete(InputEvent::PointerUp { button: MouseButton::Left, x: 2.0, y: 2.0 });
        assert_eq!(buffer.discrete.len(), 2, "Duplicates should be ignored");
    }

    #[test]
    fn moves_coalesce_to_latest() {
        let mut buffer = InputBuffer::new();

        buffer.push_continuous(pointer_move(10.0, 10.0));
        buffer.push_continuous(pointer_move(20.0, 30.0));
        assert_eq!(buffer.len(), 1);

        let (_, continuous) = buffer.drain().unwrap();
        assert_eq!(continuous[0].position(), Some((20.0, 30.0)));
    }

    #[test]
    fn drain_clears_buffer() {
        let mut buffer = InputBuffer::new();
        buffer.push_discrete(press(0.0, 0.0));
        buffer.push_continuous(pointer_move(5.0, 5.0));

        let (discrete, continuous) = buffer.drain().unwrap();
        assert_eq!(discrete.len() + continuous.len(), 2);
        assert!(buffer.is_empty());
        assert!(buffer.drain().is_none());
    }
}
