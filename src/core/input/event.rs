//=========================================================================
// Input Event Types
//
// Defines the internal representation of low-level pointer input.
//
// This module abstracts away platform-specific input (e.g. Winit) into
// a unified, engine-friendly format used by the input subsystem.
//
// Responsibilities:
// - Represent mouse and touch inputs in a stable, portable way
// - Provide equality and hashing semantics for deduplication
// - Enable event coalescing (multiple PointerMoved → last position)
//
// Event Flow:
// ```text
// Platform Layer (Winit)
//         ↓
//    InputEvent (this module)
//         ↓
//    PointerTracker (processes events)
//         ↓
//    PointerEvent (hit-tested by scenes and overlays)
// ```
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::hash::{Hash, Hasher};

//=== MouseButton =========================================================

/// Physical mouse button identifier.
///
/// The `Other` variant covers side buttons, macro buttons, and any
/// non-standard inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (typically left).
    Left,

    /// Secondary button (typically right).
    Right,

    /// Middle button (wheel click).
    Middle,

    /// Any other button.
    Other,
}

//=== InputEvent ==========================================================

/// Low-level input event from the platform layer.
///
/// Button and touch events carry the pointer position at the time they
/// happened, so a press can be hit-tested without a preceding move.
///
/// # Equality & Hashing Semantics
///
/// `PointerMoved` events are equal regardless of coordinates, allowing
/// coalescing (last position wins). Every other variant compares by
/// button only, so a repeated press at a different position is still
/// a duplicate.
///
/// ```text
/// PointerDown{Left, ..} == PointerDown{Left, ..}   ✓
/// PointerDown{Left, ..} == PointerUp{Left, ..}     ✗
/// PointerMoved{...}     == PointerMoved{...}       ✓ (always equal)
/// ```
#[derive(Debug, Clone, Copy)]
pub enum InputEvent {
    /// Cursor moved to a new position (screen space, top-left origin).
    PointerMoved { x: f32, y: f32 },

    /// Mouse button pressed at the given position.
    PointerDown { button: MouseButton, x: f32, y: f32 },

    /// Mouse button released at the given position.
    PointerUp { button: MouseButton, x: f32, y: f32 },

    /// Finger touched the screen.
    TouchStart { x: f32, y: f32 },

    /// Unrecognized or unsupported event. Ignored by the input system.
    Unidentified,
}

impl InputEvent {
    /// Returns the pointer position carried by this event, if any.
    pub fn position(&self) -> Option<(f32, f32)> {
        match *self {
            Self::PointerMoved { x, y }
            | Self::PointerDown { x, y, .. }
            | Self::PointerUp { x, y, .. }
            | Self::TouchStart { x, y } => Some((x, y)),
            Self::Unidentified => None,
        }
    }
}

//--- Trait Implementations -----------------------------------------------

impl PartialEq for InputEvent {
    fn eq(&self, other: &Self) -> bool {
        use InputEvent::*;
        match (self, other) {
            (PointerMoved { .. }, PointerMoved { .. }) => true,
            (PointerDown { button: a, .. }, PointerDown { button: b, .. }) => a == b,
            (PointerUp { button: a, .. }, PointerUp { button: b, .. }) => a == b,
            (TouchStart { .. }, TouchStart { .. }) => true,
            (Unidentified, Unidentified) => true,
            _ => false,
        }
    }
}

impl Eq for InputEvent {}

impl Hash for InputEvent {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);

        if let Self::PointerDown { button, .. } | Self::PointerUp { button, .. } = self {
            button.hash(state);
        }
    }
}

//=== PointerEvent ========================================================

/// High-level pointer interaction consumed by scenes and overlays.
///
/// Produced by [`PointerTracker`](super::PointerTracker) from raw
/// [`InputEvent`]s, in the order the user performed them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Pointer hovered to a new position.
    Moved { x: f32, y: f32 },

    /// Primary button pressed (a click).
    Pressed { x: f32, y: f32 },

    /// Touch started (a tap).
    Touched { x: f32, y: f32 },
}

impl PointerEvent {
    /// Returns the screen position of this event.
    pub fn position(&self) -> (f32, f32) {
        match *self {
            Self::Moved { x, y } | Self::Pressed { x, y } | Self::Touched { x, y } => (x, y),
        }
    }

    /// Returns `true` for clicks and taps.
    pub fn is_activation(&self) -> bool {
        matches!(self, Self::Pressed { .. } | Self::Touched { .. })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::collections::HashSet;

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn pointer_moves_are_equal_regardless_of_position() {
        let a = InputEvent::PointerMoved { x: 1.0, y: 2.0 };
        let b = InputEvent::PointerMoved { x: 300.0, y: 400.0 };
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn button_events_compare_by_button() {
        let left = InputEvent::PointerDown { button: MouseButton::Left, x: 0.0, y: 0.0 };
        let left_elsewhere = InputEvent::PointerDown { button: MouseButton::Left, x: 9.0, y: 9.0 };
        let right = InputEvent::PointerDown { button: MouseButton::Right, x: 0.0, y: 0.0 };
        let up = InputEvent::PointerUp { button: MouseButton::Left, x: 0.0, y: 0.0 };

        assert_eq!(left, left_elsewhere);
        assert_ne!(left, right);
        assert_ne!(left, up);
    }

    #[test]
    fn hash_set_coalesces_moves() {
        let mut set = HashSet::new();
        set.insert(InputEvent::PointerMoved { x: 1.0, y: 1.0 });
        set.replace(InputEvent::PointerMoved { x: 5.0, y: 6.0 });
        assert_eq!(set.len(), 1);
        let kept = set.iter().next().copied().and_then(|e| e.position());
        assert_eq!(kept, Some((5.0, 6.0)));
    }

    #[test]
    fn unidentified_has_no_position() {
        assert_eq!(InputEvent::Unidentified.position(), None);
        assert_eq!(InputEvent::TouchStart { x: 3.0, y: 4.0 }.position(), Some((3.0, 4.0)));
    }

    #[test]
    fn pointer_event_activation() {
        assert!(PointerEvent::Pressed { x: 0.0, y: 0.0 }.is_activation());
        assert!(PointerEvent::Touched { x: 0.0, y: 0.0 }.is_activation());
        assert!(!PointerEvent::Moved { x: 0.0, y: 0.0 }.is_activation());
    }
}
