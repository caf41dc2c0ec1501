//=========================================================================
// Animation System
//=========================================================================
//
// Tweening behind the `Animator` trait.
//
// Architecture:
//   Scene / Interaction / UI ── animate(Tween) ──→ Box<dyn Animator>
//                                                       │
//   GameSystems::update ── update(dt, &mut DisplayTree) ┘ → completed ids
//
//=========================================================================

//=== Module Declarations =================================================

mod easing;
mod tween;
mod tween_engine;

//=== Public API ==========================================================

pub use easing::Easing;
pub use tween::{Repeat, Tween, TweenEnd, TweenId, TweenProperty};
pub use tween_engine::TweenEngine;

//=== External Dependencies ===============================================

use std::time::Duration;

//=== Internal Dependencies ===============================================

use crate::core::display::{DisplayTree, NodeId};

//=== Animator Trait ======================================================

/// Drives property tweens on display nodes.
pub trait Animator: Send {
    /// Starts a tween, replacing any running tween on the same target
    /// and property.
    fn animate(&mut self, tween: Tween) -> TweenId;

    /// Stops a tween where it is. Returns `false` if it was not running.
    fn cancel(&mut self, id: TweenId) -> bool;

    fn cancel_target(&mut self, target: NodeId);

    fn is_running(&self, id: TweenId) -> bool;

    /// Advances all tweens and returns those that finished this tick.
    fn update(&mut self, dt: Duration, tree: &mut DisplayTree) -> Vec<TweenId>;
}
