//=========================================================================
// Game State
//=========================================================================
//
// Session-wide progress: visited scenes and per-object states.
//
// Created at startup and owned by GameContext; never persisted.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::{HashMap, HashSet};

//=== Internal Dependencies ===============================================

use crate::core::catalog::DEFAULT_STATE;

//=== GameState ===========================================================

#[derive(Debug, Clone, Default)]
pub struct GameState {
    visited_scenes: HashSet<String>,
    object_states: HashMap<String, String>,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Object States ----------------------------------------------------

    /// State of an object; `"default"` until it is first changed.
    pub fn object_state(&self, object_id: &str) -> &str {
        self.object_states
            .get(object_id)
            .map(String::as_str)
            .unwrap_or(DEFAULT_STATE)
    }

    pub fn set_object_state(&mut self, object_id: &str, state: &str) {
        self.object_states.insert(object_id.to_string(), state.to_string());
    }

    /// Returns `true` if the object has a stored state.
    pub fn has_object_state(&self, object_id: &str) -> bool {
        self.object_states.contains_key(object_id)
    }

    //--- Visited Scenes ---------------------------------------------------

    pub fn mark_visited(&mut self, scene_id: &str) {
        self.visited_scenes.insert(scene_id.to_string());
    }

    pub fn has_visited(&self, scene_id: &str) -> bool {
        self.visited_scenes.contains(scene_id)
    }

    pub fn visited_scenes(&self) -> &HashSet<String> {
        &self.visited_scenes
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
