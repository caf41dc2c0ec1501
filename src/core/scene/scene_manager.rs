//=========================================================================
// Scene Manager
//=========================================================================
//
// Owns scene instances and drives transitions between them.
//
// Scenes are created on first visit and cached in a HashMap by id, so a
// revisit reuses the same instance. At most one transition runs at a time.
//
// Transition phases:
//   Idle ─load_scene()→ Exiting(old) ─tween done→ destroy(old), load(new)
//                                                         │
//   Idle ←── activate, mark visited, SceneEntered ←── Entering(new)
//
// Un-animated kinds finish inside `load_scene`; animated ones finish in
// later `update()` ticks once their tween is no longer running.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, error, warn};

//=== Internal Dependencies ===============================================

use super::{BehaviorRegistry, Scene, SceneEntered, SceneError, TravelRequest};
use crate::core::animation::{Easing, Tween, TweenId, TweenProperty};
use crate::core::catalog::{SceneCatalog, TransitionKind};
use crate::core::display::NodeId;
use crate::core::globals::GameContext;
use crate::core::input::PointerEvent;
use crate::core::interaction::Interaction;

//=== Constants ===========================================================

const FADE_DURATION: f32 = 0.8;
const SLIDE_DURATION: f32 = 1.0;

//=== LoadOutcome =========================================================

/// Result of a [`SceneManager::load_scene`] request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Transition started; it completes in later updates.
    Started,
    /// Transition had no animation and is already complete.
    Completed,
    /// Ignored: another transition is in progress.
    AlreadyTransitioning,
    /// Ignored: the target is the active scene.
    AlreadyActive,
}

//=== Phase ===============================================================

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Idle,
    Exiting {
        to: String,
        kind: TransitionKind,
        tween: Option<TweenId>,
    },
    Entering {
        to: String,
        tween: Option<TweenId>,
    },
}

//=== SceneManager ========================================================

pub struct SceneManager {
    catalog: SceneCatalog,
    registry: BehaviorRegistry,
    instances: HashMap<String, Scene>,
    current: Option<String>,
    phase: Phase,
    next_instance_id: u64,
}

impl SceneManager {
    //--- Construction -----------------------------------------------------

    pub fn new(catalog: SceneCatalog, registry: BehaviorRegistry) -> Self {
        Self {
            catalog,
            registry,
            instances: HashMap::new(),
            current: None,
            phase: Phase::Idle,
            next_instance_id: 1,
        }
    }

    //--- Switching --------------------------------------------------------

    /// Switches to `target` with the given transition.
    ///
    /// Requests are ignored while a transition is in progress or when
    /// `target` is already active. Unknown ids leave everything untouched.
    pub fn load_scene(
        &mut self,
        target: &str,
        kind: TransitionKind,
        ctx: &mut GameContext,
    ) -> Result<LoadOutcome, SceneError> {
        if self.is_transitioning() {
            debug!("Ignoring switch to `{}`: transition in progress", target);
            return Ok(LoadOutcome::AlreadyTransitioning);
        }
        if self.current.as_deref() == Some(target) {
            debug!("Ignoring switch to `{}`: already active", target);
            return Ok(LoadOutcome::AlreadyActive);
        }
        if !self.catalog.contains(target) {
            error!("Scene `{}` not found", target);
            return Err(SceneError::UnknownScene(target.to_string()));
        }

        debug!(
            "Switching {} → {} ({})",
            self.current.as_deref().unwrap_or("<none>"),
            target,
            kind
        );

        let leaving = self
            .current
            .as_ref()
            .and_then(|id| self.instances.get_mut(id));

        match leaving {
            Some(scene) => {
                scene.begin_exit();
                let tween = start_exit(scene.container(), &kind, ctx);
                self.phase = Phase::Exiting {
                    to: target.to_string(),
                    kind,
                    tween,
                };
                if tween.is_none() {
                    self.finish_exit(ctx);
                }
            }
            None => self.begin_entry(target.to_string(), kind, ctx),
        }

        Ok(if self.is_transitioning() {
            LoadOutcome::Started
        } else {
            LoadOutcome::Completed
        })
    }

    /// Fire-and-forget [`load_scene`](Self::load_scene).
    pub fn travel_to_scene(&mut self, target: &str, kind: TransitionKind, ctx: &mut GameContext) {
        if let Err(e) = self.load_scene(target, kind, ctx) {
            warn!("Travel to `{}` failed: {}", target, e);
        }
    }

    /// Applies every queued [`TravelRequest`] in order.
    pub fn process_travel_requests(&mut self, ctx: &mut GameContext) {
        for request in ctx.message_bus.drain::<TravelRequest>() {
            self.travel_to_scene(&request.scene_id, request.transition, ctx);
        }
    }

    //--- Update Loop ------------------------------------------------------

    /// Advances the running transition and updates the displayed scene.
    pub fn update(&mut self, ctx: &mut GameContext) {
        let finished = match &self.phase {
            Phase::Idle => false,
            Phase::Exiting { tween, .. } | Phase::Entering { tween, .. } => !is_pending(*tween, ctx),
        };
        if finished {
            match self.phase {
                Phase::Exiting { .. } => self.finish_exit(ctx),
                Phase::Entering { .. } => self.finish_entry(ctx),
                Phase::Idle => {}
            }
        }

        if let Some(scene) = self.displayed_mut() {
            scene.update(ctx);
        }
    }

    //--- Input & Resize ---------------------------------------------------

    /// Routes a pointer event to the displayed scene. Input is dropped
    /// while a scene is exiting.
    pub fn handle_pointer(&mut self, event: PointerEvent, ctx: &mut GameContext) -> Option<Interaction> {
        let target = match &self.phase {
            Phase::Idle => self.current.as_ref()?,
            Phase::Entering { to, .. } => to,
            Phase::Exiting { .. } => return None,
        };
        self.instances.get_mut(target)?.handle_pointer(event, ctx)
    }

    pub fn handle_resize(&mut self, ctx: &mut GameContext) {
        if let Some(scene) = self.displayed_mut() {
            scene.handle_resize(ctx);
        }
    }

    //--- Queries ----------------------------------------------------------

    /// Id of the last scene whose entry completed.
    pub fn current_scene_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn current_scene(&self) -> Option<&Scene> {
        self.current.as_ref().and_then(|id| self.instances.get(id))
    }

    pub fn scene(&self, id: &str) -> Option<&Scene> {
        self.instances.get(id)
    }

    pub fn is_transitioning(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn catalog(&self) -> &SceneCatalog {
        &self.catalog
    }

    /// Number of cached scene instances.
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    //--- Internal Helpers -------------------------------------------------

    fn displayed_mut(&mut self) -> Option<&mut Scene> {
        let id = match &self.phase {
            Phase::Entering { to, .. } => to,
            Phase::Idle | Phase::Exiting { .. } => self.current.as_ref()?,
        };
        self.instances.get_mut(id)
    }

    fn finish_exit(&mut self, ctx: &mut GameContext) {
        let Phase::Exiting { to, kind, .. } = std::mem::replace(&mut self.phase, Phase::Idle) else {
            return;
        };

        if let Some(scene) = self.current.as_ref().and_then(|id| self.instances.get_mut(id)) {
            scene.destroy(ctx);
        }
        self.begin_entry(to, kind, ctx);
    }

    fn begin_entry(&mut self, to: String, kind: TransitionKind, ctx: &mut GameContext) {
        if !self.instances.contains_key(&to) {
            let Some(descriptor) = self.catalog.get(&to) else {
                error!("Scene `{}` disappeared from the catalog", to);
                return;
            };
            let instance_id = self.next_instance_id;
            self.next_instance_id += 1;

            debug!("Creating scene `{}` (instance {})", to, instance_id);
            let scene = Scene::new(instance_id, descriptor, self.registry.create(&to), ctx);
            self.instances.insert(to.clone(), scene);
        }

        let Some(scene) = self.instances.get_mut(&to) else {
            return;
        };
        scene.load(ctx);
        let tween = start_entry(scene.container(), &kind, ctx);

        self.phase = Phase::Entering { to, tween };
        if tween.is_none() {
            self.finish_entry(ctx);
        }
    }

    fn finish_entry(&mut self, ctx: &mut GameContext) {
        let Phase::Entering { to, .. } = std::mem::replace(&mut self.phase, Phase::Idle) else {
            return;
        };

        if let Some(scene) = self.instances.get_mut(&to) {
            scene.activate();
        }
        ctx.state.mark_visited(&to);
        debug!("Scene `{}` active", to);

        ctx.message_bus.push(SceneEntered { scene_id: to.clone() });
        self.current = Some(to);
    }
}

//=== Transition Tweens ===================================================

fn is_pending(tween: Option<TweenId>, ctx: &GameContext) -> bool {
    tween.is_some_and(|id| ctx.animator.is_running(id))
}

fn start_exit(container: NodeId, kind: &TransitionKind, ctx: &mut GameContext) -> Option<TweenId> {
    let tween = match kind {
        TransitionKind::Fade => Tween::to(container, TweenProperty::Alpha, 0.0, FADE_DURATION),
        TransitionKind::Slide => {
            let width = ctx.viewport().width;
            Tween::to(container, TweenProperty::X, -width, SLIDE_DURATION)
        }
        TransitionKind::None | TransitionKind::Unknown(_) => return None,
    };
    Some(ctx.animator.animate(tween.ease(Easing::Power2InOut)))
}

fn start_entry(container: NodeId, kind: &TransitionKind, ctx: &mut GameContext) -> Option<TweenId> {
    let width = ctx.viewport().width;
    let node = ctx.display.node_mut(container)?;

    let tween = match kind {
        TransitionKind::Fade => {
            node.alpha = 0.0;
            Tween::to(container, TweenProperty::Alpha, 1.0, FADE_DURATION)
        }
        TransitionKind::Slide => {
            node.x = width;
            Tween::to(container, TweenProperty::X, 0.0, SLIDE_DURATION)
        }
        TransitionKind::None | TransitionKind::Unknown(_) => return None,
    };
    Some(ctx.animator.animate(tween.ease(Easing::Power2InOut)))
}

//=========================================================================
// Unit Tests
//=========================================================================
