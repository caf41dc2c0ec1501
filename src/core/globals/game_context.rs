//=========================================================================
// Game Context
//=========================================================================
//
// Shared data container for scenes, overlays and the scene manager.
//
// Contains the collaborators every scene call needs:
// - display: retained display tree (the render/hit-test seam)
// - assets / audio / animator: load, sound and tween collaborators
// - state: visited scenes and per-object states
// - responsive: letterbox fit of the reference frame, kept per resize
// - message_bus: TravelRequest / SceneEntered queues
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::animation::Animator;
use crate::core::assets::AssetLoader;
use crate::core::audio::SoundManager;
use crate::core::config::GameConfig;
use crate::core::display::DisplayTree;
use crate::core::game_state::GameState;
use crate::core::input::InputEvent;
use crate::core::layout::{Responsive, Viewport};
use crate::core::message_bus::MessageBus;

//=== GameContext =========================================================

/// Shared context passed explicitly to every scene operation.
///
/// Owned by the logic thread; nothing in here is shared across threads.
pub struct GameContext {
    pub display: DisplayTree,
    pub assets: AssetLoader,
    pub audio: SoundManager,
    pub animator: Box<dyn Animator>,

    /// Visited scenes and object states. Lives for the whole session.
    pub state: GameState,

    pub message_bus: MessageBus,
    pub config: GameConfig,

    /// Fit of the reference frame into the current viewport.
    pub responsive: Responsive,

    /// Input batches for the current frame.
    ///
    /// Filled by the orchestrator from platform events and consumed by
    /// the input system during the update phase.
    pub(crate) frame_events: Vec<Vec<InputEvent>>,
}

impl GameContext {
    /// Creates a context whose viewport matches the configured window.
    pub fn new(
        config: GameConfig,
        assets: AssetLoader,
        audio: SoundManager,
        animator: Box<dyn Animator>,
    ) -> Self {
        let viewport = Viewport::new(config.window.width as f32, config.window.height as f32);

        Self {
            display: DisplayTree::new(viewport),
            assets,
            audio,
            animator,
            state: GameState::new(),
            message_bus: MessageBus::new(),
            config,
            responsive: Responsive::fit(viewport),
            frame_events: Vec::new(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.display.viewport()
    }

    /// Resizes the display and recomputes the responsive fit.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.display.set_viewport(viewport);
        self.responsive.update(viewport);
    }

    pub fn is_mobile(&self) -> bool {
        self.config.mobile
    }
}

//=========================================================================
// Test Support
//=========================================================================

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use super::*;
    use crate::core::animation::TweenEngine;
    use crate::core::assets::StaticAssetSource;
    use crate::core::audio::SilentAudio;

    /// Context backed by in-process collaborators at 1920×1080.
    pub(crate) fn context_with(source: StaticAssetSource, config: GameConfig) -> GameContext {
        GameContext::new(
            config,
            AssetLoader::new(Arc::new(source)),
            SoundManager::new(Box::new(SilentAudio::new())),
            Box::new(TweenEngine::new()),
        )
    }

    pub(crate) fn context(source: StaticAssetSource) -> GameContext {
        let mut config = GameConfig::default();
        config.window.width = 1920;
        config.window.height = 1080;
        config.music = None;
        context_with(source, config)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
