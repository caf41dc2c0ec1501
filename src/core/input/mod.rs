//=========================================================================
// Input System
//
// High-level interface for pointer input within the engine.
// Wraps the internal `PointerTracker`, providing per-frame updates
// and the ordered stream of pointer interactions for scenes and UI.
//
// Responsibilities:
// - Aggregate and process batches of raw input events
// - Update the persistent pointer state each frame
// - Expose the frame's PointerEvents in the order they happened
//
// Notes:
// This system is owned and updated by GameSystems on the logic thread.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod event;
mod pointer_tracker;

//=== Public API ==========================================================

pub use event::{InputEvent, MouseButton, PointerEvent};
pub use pointer_tracker::PointerTracker;

//=== External Crates =====================================================

use log::trace;

//=== InputSystem =========================================================

/// Owns the pointer tracker and converts frame batches into pointer events.
pub struct InputSystem {
    tracker: PointerTracker,
    events: Vec<PointerEvent>,
}

impl InputSystem {
    //--- Construction -----------------------------------------------------

    /// Creates an input system with no pointer history.
    pub fn new() -> Self {
        Self {
            tracker: PointerTracker::new(),
            events: Vec::with_capacity(16),
        }
    }

    //--- process_frame() --------------------------------------------------
    //
    // Consumes all input batches received during the current frame and
    // rebuilds the frame's pointer event list.
    //
    pub fn process_frame(&mut self, batches: &[Vec<InputEvent>]) -> &[PointerEvent] {
        self.events.clear();
        self.tracker.clear();

        for batch in batches {
            self.tracker.process_events(batch, &mut self.events);
        }

        if !self.events.is_empty() {
            trace!(target: "input", "{} pointer events this frame", self.events.len());
        }

        &self.events
    }

    //--- Query Methods ----------------------------------------------------

    /// Pointer events produced by the last `process_frame` call.
    pub fn events(&self) -> &[PointerEvent] {
        &self.events
    }

    /// Low-level pointer state.
    pub fn tracker(&self) -> &PointerTracker {
        &self.tracker
    }
}

impl Default for InputSystem {
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

    #[test]
    fn batches_are_flattened_in_order() {
        let mut system = InputSystem::new();
        let batches = vec![
            vec![InputEvent::PointerMoved { x: 1.0, y: 2.0 }],
            vec![InputEvent::PointerDown { button: MouseButton::Left, x: 1.0, y: 2.0 }],
        ];

        let events = system.process_frame(&batches).to_vec();
        assert_eq!(
            events,
            vec![PointerEvent::Moved { x: 1.0, y: 2.0 }, PointerEvent::Pressed { x: 1.0, y: 2.0 }]
        );
        assert_eq!(system.tracker().position(), (1.0, 2.0));
    }

    #[test]
    fn events_reset_between_frames() {
        let mut system = InputSystem::new();
        system.process_frame(&[vec![InputEvent::TouchStart { x: 0.0, y: 0.0 }]]);
        assert_eq!(system.events().len(), 1);

        system.process_frame(&[]);
        assert!(system.events().is_empty());
    }
}
