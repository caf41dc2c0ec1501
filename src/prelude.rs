//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use cocoon_tour::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine core
pub use crate::engine::{Engine, EngineBuilder, EngineError};

// Configuration and catalog
pub use crate::core::catalog::{ObjectDescriptor, SceneCatalog, SceneDescriptor, TransitionKind};
pub use crate::core::config::GameConfig;

// Game context and systems
pub use crate::core::globals::{GameContext, GameSystems};

// Scene system
pub use crate::core::scene::{request_travel, BehaviorRegistry, SceneBehavior, SceneManager, SceneView};

// Interaction
pub use crate::core::interaction::Interaction;

// Message bus
pub use crate::core::message_bus::{Message, MessageBus};
