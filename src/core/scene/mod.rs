//=========================================================================
// Scene System
//=========================================================================
//
// Scene lifecycle, per-scene behaviours and transitions between scenes.
//
// Architecture:
//   SceneManager
//     ├─ instances: HashMap<id, Scene>  (created on first visit, reused)
//     ├─ registry:  BehaviorRegistry    (id → SceneBehavior)
//     └─ phase:     Idle | Exiting | Entering
//
// Flow:
//   click → SceneBehavior::on_interact → TravelRequest (message bus)
//         → SceneManager::process_travel_requests → load_scene()
//         → ... → SceneEntered (message bus)
//
//=========================================================================

//=== Module Declarations =================================================

mod behavior;
mod instance;
mod intro;
mod scene_manager;

//=== Public API ==========================================================

pub use behavior::{request_travel, BehaviorFactory, BehaviorRegistry, DefaultBehavior, SceneBehavior, SceneView};
pub use instance::{Scene, SceneStatus};
pub use intro::IntroBehavior;
pub use scene_manager::{LoadOutcome, SceneManager};

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::catalog::TransitionKind;

//=== Messages ============================================================

/// Asks the scene manager to switch scenes at the next tick boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct TravelRequest {
    pub scene_id: String,
    pub transition: TransitionKind,
}

/// Published once a scene's entry transition has completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneEntered {
    pub scene_id: String,
}

//=== SceneError ==========================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("scene `{0}` is not in the catalog")]
    UnknownScene(String),
}
