//=========================================================================
// Game Globals
//=========================================================================
//
// Separates systems (logic components) from context (shared data).
//
// Architecture:
//   GameSystems: input + scene manager + overlays (owned by orchestrator)
//   GameContext: display, assets, audio, tweens, state, bus (passed to scenes)
//
//=========================================================================

//=== Module Declarations =================================================

mod game_context;
mod game_systems;

//=== Public API ==========================================================

pub use game_context::GameContext;
pub use game_systems::GameSystems;

#[cfg(test)]
pub(crate) use game_context::test_support;
