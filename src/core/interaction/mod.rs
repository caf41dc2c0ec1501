//=========================================================================
// Interaction
//=========================================================================
//
// Interactive objects (hotspots) and the per-scene controller that turns
// pointer events into hover feedback, state changes and Interactions.
//
//=========================================================================

//=== Module Declarations =================================================

mod interaction_system;
mod interactive_object;

//=== Public API ==========================================================

pub use interaction_system::InteractionSystem;
pub use interactive_object::{Interaction, InteractiveObject};
