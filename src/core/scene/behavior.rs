//=========================================================================
// Scene Behaviours
//=========================================================================
//
// Per-scene deviations from the default lifecycle, chosen by scene id.
//
// Architecture:
//   BehaviorRegistry: HashMap<id, factory>
//        └─ create(id) → Box<dyn SceneBehavior>  (DefaultBehavior if absent)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::debug;

//=== Internal Dependencies ===============================================

use super::intro::IntroBehavior;
use super::TravelRequest;
use crate::core::catalog::SceneDescriptor;
use crate::core::display::NodeId;
use crate::core::globals::GameContext;
use crate::core::interaction::{Interaction, InteractiveObject};

//=== SceneView ===========================================================

/// Read-only view of a scene handed to behaviour hooks.
#[derive(Clone, Copy)]
pub struct SceneView<'a> {
    pub descriptor: &'a SceneDescriptor,
    pub container: NodeId,
    pub objects: &'a [InteractiveObject],
}

impl SceneView<'_> {
    pub fn id(&self) -> &str {
        &self.descriptor.id
    }
}

//=== SceneBehavior Trait =================================================

/// Hooks a scene calls around its default lifecycle.
///
/// Every hook has a default; `on_interact` applies the travel rule.
pub trait SceneBehavior: Send {
    /// After background, objects and ambient are in place.
    fn on_loaded(&mut self, _scene: SceneView<'_>, _ctx: &mut GameContext) {}

    /// After the default resize layout.
    fn on_resize(&mut self, _scene: SceneView<'_>, _ctx: &mut GameContext) {}

    /// After an object was clicked and its state change applied.
    fn on_interact(&mut self, scene: SceneView<'_>, interaction: &Interaction, ctx: &mut GameContext) {
        request_travel(scene, interaction, ctx);
    }

    /// Before the scene tears down its visuals.
    fn on_destroy(&mut self, _scene: SceneView<'_>, _ctx: &mut GameContext) {}
}

/// Queues a [`TravelRequest`] when the clicked object has `travelTo` and
/// the scene is not the intro scene.
///
/// Returns `true` if a request was queued.
pub fn request_travel(scene: SceneView<'_>, interaction: &Interaction, ctx: &mut GameContext) -> bool {
    let Some(target) = &interaction.descriptor.travel_to else {
        return false;
    };
    if scene.id() == ctx.config.intro_scene {
        return false;
    }

    debug!("Travel requested: {} → {}", scene.id(), target);
    ctx.message_bus.push(TravelRequest {
        scene_id: target.clone(),
        transition: interaction.descriptor.transition_or_default(),
    });
    true
}

//=== DefaultBehavior =====================================================

/// The plain lifecycle with the travel rule.
#[derive(Debug, Default)]
pub struct DefaultBehavior;

impl SceneBehavior for DefaultBehavior {}

//=== BehaviorRegistry ====================================================

pub type BehaviorFactory = fn() -> Box<dyn SceneBehavior>;

/// Maps scene ids to behaviour factories.
pub struct BehaviorRegistry {
    factories: HashMap<String, BehaviorFactory>,
}

impl BehaviorRegistry {
    /// An empty registry: every scene gets [`DefaultBehavior`].
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registry with the intro behaviour bound to `intro_id`.
    pub fn with_intro(intro_id: &str) -> Self {
        let mut registry = Self::new();
        registry.register(intro_id, || Box::new(IntroBehavior::new()));
        registry
    }

    pub fn register(&mut self, scene_id: &str, factory: BehaviorFactory) {
        self.factories.insert(scene_id.to_string(), factory);
    }

    pub fn is_registered(&self, scene_id: &str) -> bool {
        self.factories.contains_key(scene_id)
    }

    pub fn create(&self, scene_id: &str) -> Box<dyn SceneBehavior> {
        match self.factories.get(scene_id) {
            Some(factory) => factory(),
            None => Box::new(DefaultBehavior),
        }
    }
}

impl Default for BehaviorRegistry {
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
    use crate::core::assets::StaticAssetSource;
    use crate::core::catalog::TransitionKind;
    use crate::core::globals::test_support::context;

    fn scene(id: &str) -> SceneDescriptor {
        serde_json::from_str(&format!(r#"{{"id":"{id}"}}"#)).unwrap()
    }

    fn interaction(json: &str) -> Interaction {
        Interaction {
            descriptor: serde_json::from_str(json).unwrap(),
            previous_state: "default".to_string(),
        }
    }

    fn view<'a>(descriptor: &'a SceneDescriptor, ctx: &mut GameContext) -> SceneView<'a> {
        SceneView {
            descriptor,
            container: ctx.display.create_container(),
            objects: &[],
        }
    }

    #[test]
    fn travel_uses_descriptor_transition() {
        let mut ctx = context(StaticAssetSource::new());
        let lobby = scene("lobby");
        let view = view(&lobby, &mut ctx);

        let clicked = interaction(r#"{"id":"door","image":"d.png","travelTo":"spa","transition":"slide"}"#);
        DefaultBehavior.on_interact(view, &clicked, &mut ctx);

        let requests = ctx.message_bus.drain::<TravelRequest>();
        assert_eq!(
            requests,
            vec![TravelRequest {
                scene_id: "spa".to_string(),
                transition: TransitionKind::Slide
            }]
        );
    }

    #[test]
    fn missing_transition_defaults_to_fade() {
        let mut ctx = context(StaticAssetSource::new());
        let lobby = scene("lobby");
        let view = view(&lobby, &mut ctx);

        request_travel(view, &interaction(r#"{"id":"d","image":"d.png","travelTo":"room"}"#), &mut ctx);
        assert_eq!(ctx.message_bus.read::<TravelRequest>()[0].transition, TransitionKind::Fade);
    }

    #[test]
    fn intro_scene_never_travels() {
        let mut ctx = context(StaticAssetSource::new());
        let intro = scene("intro");
        let view = view(&intro, &mut ctx);

        let queued = request_travel(view, &interaction(r#"{"id":"cocoon","image":"c.png","travelTo":"exterior"}"#), &mut ctx);
        assert!(!queued);
        assert!(!ctx.message_bus.has_messages::<TravelRequest>());
    }

    #[test]
    fn objects_without_travel_do_nothing() {
        let mut ctx = context(StaticAssetSource::new());
        let spa = scene("spa");
        let view = view(&spa, &mut ctx);

        assert!(!request_travel(view, &interaction(r#"{"id":"towel","image":"t.png"}"#), &mut ctx));
    }

    #[test]
    fn registry_falls_back_to_default() {
        let registry = BehaviorRegistry::with_intro("intro");
        assert!(registry.is_registered("intro"));
        assert!(!registry.is_registered("lobby"));
        let _behavior = registry.create("lobby");
    }
}
