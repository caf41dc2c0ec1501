//=========================================================================
// Scene
//=========================================================================
//
// One scene instance built from a descriptor.
//
// Lifecycle:
//   Unloaded ─load()→ Loading ─activate()→ Active ─begin_exit()→ Exiting
//       ↑                                                          │
//       └──────────────────────── destroy() ───────────────────────┘
//
// Instances are cached by the scene manager and reloaded on revisit.
// Nothing in `load()` fails: missing textures become placeholders.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;
use std::time::Duration;

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use super::behavior::{SceneBehavior, SceneView};
use crate::core::catalog::{ObjectDescriptor, SceneDescriptor};
use crate::core::display::{NodeId, NodeKind};
use crate::core::globals::GameContext;
use crate::core::input::PointerEvent;
use crate::core::interaction::{Interaction, InteractionSystem, InteractiveObject};
use crate::core::layout::{self, Viewport, MOBILE_OBJECT_SCALE};

//=== Constants ===========================================================

const BACKGROUND_PLACEHOLDER_COLOR: u32 = 0x222222;
const EMPTY_BACKGROUND_COLOR: u32 = 0x000000;
const OBJECT_PLACEHOLDER_SIZE: f32 = 100.0;
const OBJECT_PLACEHOLDER_COLOR: u32 = 0x888888;
const AMBIENT_FADE_OUT: Duration = Duration::from_secs(1);

//=== SceneStatus =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SceneStatus {
    #[default]
    Unloaded,
    Loading,
    Active,
    Exiting,
}

//=== Background ==========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Background {
    /// Cover-fitted sprite, centred.
    Sprite(NodeId),
    /// Viewport-sized flat fill.
    Fill(NodeId),
}

//=== Scene ===============================================================

pub struct Scene {
    instance_id: u64,
    descriptor: Arc<SceneDescriptor>,
    container: NodeId,
    background: Option<Background>,
    objects: Vec<InteractiveObject>,
    interaction: InteractionSystem,
    status: SceneStatus,
    behavior: Box<dyn SceneBehavior>,
}

impl Scene {
    /// Creates an unloaded scene with its (detached) container.
    pub fn new(
        instance_id: u64,
        descriptor: Arc<SceneDescriptor>,
        behavior: Box<dyn SceneBehavior>,
        ctx: &mut GameContext,
    ) -> Self {
        Self {
            instance_id,
            descriptor,
            container: ctx.display.create_container(),
            background: None,
            objects: Vec::new(),
            interaction: InteractionSystem::new(),
            status: SceneStatus::Unloaded,
            behavior,
        }
    }

    //=====================================================================
    // Lifecycle
    //=====================================================================

    /// Builds the scene's visuals, starts its ambient and attaches the
    /// container to the display root.
    pub fn load(&mut self, ctx: &mut GameContext) {
        debug!("Loading scene `{}` (instance {})", self.id(), self.instance_id);
        self.status = SceneStatus::Loading;

        if let Some(node) = ctx.display.node_mut(self.container) {
            node.alpha = 1.0;
            node.x = 0.0;
            node.y = 0.0;
            node.visible = true;
        }
        ctx.display.release_children(self.container);
        self.objects.clear();

        self.background = Some(self.create_background(ctx));

        let descriptor = Arc::clone(&self.descriptor);
        for object in &descriptor.interactive_objects {
            let object = Self::create_object(object, ctx);
            ctx.display.add_child(self.container, object.node);
            self.objects.push(object);
        }

        if let Some(ambient) = &descriptor.ambient_sound {
            ctx.audio.play_ambient(&descriptor.id, &ambient.src, Some(ambient.volume_or_default()));
        }

        ctx.display.attach_to_root(self.container);

        let (behavior, view) = self.parts();
        behavior.on_loaded(view, ctx);
    }

    /// Entry transition finished.
    pub fn activate(&mut self) {
        self.status = SceneStatus::Active;
    }

    /// Exit transition started; input is no longer routed here.
    pub fn begin_exit(&mut self) {
        self.status = SceneStatus::Exiting;
    }

    /// Fades out the ambient, detaches the container and releases every
    /// child visual. The container itself is kept for the next load.
    pub fn destroy(&mut self, ctx: &mut GameContext) {
        debug!("Destroying scene `{}`", self.id());

        let (behavior, view) = self.parts();
        behavior.on_destroy(view, ctx);

        if self.descriptor.ambient_sound.is_some() {
            ctx.audio.fade_out_ambient(&self.descriptor.id, AMBIENT_FADE_OUT);
        }

        ctx.display.detach_from_root(self.container);
        ctx.display.release_children(self.container);
        self.objects.clear();
        self.background = None;
        self.interaction.reset(ctx);
        self.status = SceneStatus::Unloaded;
    }

    //=====================================================================
    // Per-Tick Operations
    //=====================================================================

    /// Re-lays out background and objects for the current viewport.
    pub fn handle_resize(&mut self, ctx: &mut GameContext) {
        let viewport = ctx.viewport();

        match self.background {
            Some(Background::Sprite(node)) => {
                if let Some(node) = ctx.display.node_mut(node) {
                    let (width, height) = node.intrinsic_size();
                    node.set_scale(layout::cover_scale(viewport, width, height));
                    (node.x, node.y) = viewport.center();
                }
            }
            Some(Background::Fill(node)) => {
                if let Some(node) = ctx.display.node_mut(node) {
                    if let NodeKind::Fill { width, height, .. } = &mut node.kind {
                        *width = viewport.width;
                        *height = viewport.height;
                    }
                }
            }
            None => {}
        }

        for object in &self.objects {
            let (x, y) = Self::object_position(&object.descriptor, viewport);
            if let Some(node) = ctx.display.node_mut(object.node) {
                node.x = x;
                node.y = y;
            }
        }

        let (behavior, view) = self.parts();
        behavior.on_resize(view, ctx);
    }

    /// Routes a pointer event to the objects and, on a click, to the
    /// scene behaviour.
    pub fn handle_pointer(&mut self, event: PointerEvent, ctx: &mut GameContext) -> Option<Interaction> {
        let interaction = self.interaction.handle_pointer(event, &self.objects, ctx)?;
        trace!("Scene `{}`: clicked `{}`", self.id(), interaction.object_id());

        let (behavior, view) = self.parts();
        behavior.on_interact(view, &interaction, ctx);
        Some(interaction)
    }

    /// Applies texture swaps queued by state changes.
    pub fn update(&mut self, ctx: &mut GameContext) {
        if self.interaction.has_pending_swaps() {
            self.interaction.apply_pending_swaps(&mut self.objects, ctx);
        }
    }

    //=====================================================================
    // Queries
    //=====================================================================

    pub fn id(&self) -> &str {
        &self.descriptor.id
    }

    pub fn instance_id(&self) -> u64 {
        self.instance_id
    }

    pub fn descriptor(&self) -> &SceneDescriptor {
        &self.descriptor
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn status(&self) -> SceneStatus {
        self.status
    }

    pub fn objects(&self) -> &[InteractiveObject] {
        &self.objects
    }

    pub fn background(&self) -> Option<NodeId> {
        match self.background {
            Some(Background::Sprite(node) | Background::Fill(node)) => Some(node),
            None => None,
        }
    }

    //=====================================================================
    // Internal Helpers
    //=====================================================================

    fn parts(&mut self) -> (&mut Box<dyn SceneBehavior>, SceneView<'_>) {
        let view = SceneView {
            descriptor: self.descriptor.as_ref(),
            container: self.container,
            objects: &self.objects,
        };
        (&mut self.behavior, view)
    }

    fn create_background(&self, ctx: &mut GameContext) -> Background {
        let viewport = ctx.viewport();

        let Some(reference) = &self.descriptor.background else {
            let fill = ctx
                .display
                .create_fill(viewport.width, viewport.height, EMPTY_BACKGROUND_COLOR);
            ctx.display.add_child(self.container, fill);
            return Background::Fill(fill);
        };

        let texture = ctx.assets.load(reference).unwrap_or_else(|| {
            ctx.display
                .generate_texture(viewport.width, viewport.height, BACKGROUND_PLACEHOLDER_COLOR)
        });

        let sprite = ctx.display.create_sprite(&texture);
        if let Some(node) = ctx.display.node_mut(sprite) {
            node.set_scale(layout::cover_scale(viewport, texture.width(), texture.height()));
            node.set_anchor(0.5);
            (node.x, node.y) = viewport.center();
        }
        ctx.display.add_child(self.container, sprite);
        Background::Sprite(sprite)
    }

    fn create_object(descriptor: &ObjectDescriptor, ctx: &mut GameContext) -> InteractiveObject {
        let normal_texture = ctx.assets.load(&descriptor.image).unwrap_or_else(|| {
            ctx.display.generate_texture(
                OBJECT_PLACEHOLDER_SIZE,
                OBJECT_PLACEHOLDER_SIZE,
                OBJECT_PLACEHOLDER_COLOR,
            )
        });
        let hover_texture = descriptor
            .hover_image
            .as_deref()
            .and_then(|reference| ctx.assets.load(reference))
            .unwrap_or_else(|| normal_texture.clone());

        let base_scale = match descriptor.scale {
            Some(scale) if ctx.is_mobile() => scale * MOBILE_OBJECT_SCALE,
            Some(scale) => scale,
            None => 1.0,
        };

        let node = ctx.display.create_sprite(&normal_texture);
        let (x, y) = Self::object_position(descriptor, ctx.viewport());
        if let Some(sprite) = ctx.display.node_mut(node) {
            sprite.x = x;
            sprite.y = y;
            sprite.set_anchor(0.5);
            sprite.set_scale(base_scale);
            sprite.cursor = Some(descriptor.cursor_or_default().to_string());
        }

        InteractiveObject {
            descriptor: descriptor.clone(),
            node,
            normal_texture,
            hover_texture,
            base_scale,
        }
    }

    fn object_position(descriptor: &ObjectDescriptor, viewport: Viewport) -> (f32, f32) {
        let (x, y) = descriptor.position();
        if descriptor.position_relative {
            layout::relative_to_viewport(viewport, x, y)
        } else {
            layout::absolute_to_viewport(viewport, x, y)
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assets::StaticAssetSource;
    use crate::core::config::GameConfig;
    use crate::core::globals::test_support::{context, context_with};
    use crate::core::scene::{BehaviorRegistry, DefaultBehavior, TravelRequest};
    use approx::assert_relative_eq;

    fn descriptor(json: &str) -> Arc<SceneDescriptor> {
        Arc::new(serde_json::from_str(json).unwrap())
    }

    fn scene(json: &str, ctx: &mut GameContext) -> Scene {
        Scene::new(1, descriptor(json), Box::new(DefaultBehavior), ctx)
    }

    #[test]
    fn missing_background_becomes_viewport_placeholder() {
        let mut ctx = context(StaticAssetSource::new());
        let mut lobby = scene(r#"{"id":"lobby","background":"/assets/lobby.jpg"}"#, &mut ctx);
        lobby.load(&mut ctx);

        let node = ctx.display.node(lobby.background().unwrap()).unwrap();
        let texture = node.texture().unwrap();
        assert!(texture.is_placeholder());
        assert_eq!((texture.width(), texture.height()), (1920.0, 1080.0));
        assert_relative_eq!(node.scale_x, 1.0);
        assert_eq!(lobby.status(), SceneStatus::Loading);
        assert!(ctx.display.is_on_root(lobby.container()));
    }

    #[test]
    fn background_is_cover_fitted_and_centred() {
        let source = StaticAssetSource::new().with_texture("/bg.jpg", 960.0, 1080.0);
        let mut ctx = context(source);
        let mut room = scene(r#"{"id":"room","background":"/bg.jpg"}"#, &mut ctx);
        room.load(&mut ctx);

        let node = ctx.display.node(room.background().unwrap()).unwrap();
        assert_relative_eq!(node.scale_x, 2.0);
        assert_eq!((node.x, node.y), (960.0, 540.0));
        assert_eq!(node.anchor, (0.5, 0.5));
    }

    #[test]
    fn no_background_uses_black_fill() {
        let mut ctx = context(StaticAssetSource::new());
        let mut void = scene(r#"{"id":"void"}"#, &mut ctx);
        void.load(&mut ctx);

        let node = ctx.display.node(void.background().unwrap()).unwrap();
        assert_eq!(
            node.kind,
            NodeKind::Fill { width: 1920.0, height: 1080.0, color: 0x000000 }
        );

        ctx.set_viewport(Viewport::new(800.0, 600.0));
        void.handle_resize(&mut ctx);
        let node = ctx.display.node(void.background().unwrap()).unwrap();
        assert_eq!(node.intrinsic_size(), (800.0, 600.0));
    }

    #[test]
    fn objects_fall_back_independently() {
        let source = StaticAssetSource::new().with_texture("/a.png", 40.0, 40.0);
        let mut ctx = context(source);
        let mut spa = scene(
            r#"{"id":"spa","interactiveObjects":[
                {"id":"a","image":"/a.png","hoverImage":"/a_hover.png"},
                {"id":"b","image":"/b.png","scale":0.5}
            ]}"#,
            &mut ctx,
        );
        spa.load(&mut ctx);

        let [a, b] = spa.objects() else {
            panic!("expected two objects");
        };
        assert_eq!(a.normal_texture.key(), "/a.png");
        assert_eq!(a.hover_texture, a.normal_texture);
        assert!(b.normal_texture.is_placeholder());
        assert_eq!((b.normal_texture.width(), b.normal_texture.height()), (100.0, 100.0));
        assert_relative_eq!(b.base_scale, 0.5);
        assert_eq!(ctx.display.node(a.node).unwrap().cursor.as_deref(), Some("pointer"));
    }

    #[test]
    fn mobile_shrinks_authored_scale() {
        let mut config = GameConfig::default();
        config.mobile = true;
        config.music = None;
        let mut ctx = context_with(StaticAssetSource::new(), config);
        let mut spa = scene(
            r#"{"id":"spa","interactiveObjects":[{"id":"a","image":"a.png","scale":0.5},{"id":"b","image":"b.png"}]}"#,
            &mut ctx,
        );
        spa.load(&mut ctx);

        assert_relative_eq!(spa.objects()[0].base_scale, 0.4);
        assert_relative_eq!(spa.objects()[1].base_scale, 1.0);
    }

    #[test]
    fn relative_object_recentres_on_resize() {
        let mut ctx = context(StaticAssetSource::new());
        let mut lobby = scene(
            r#"{"id":"lobby","interactiveObjects":[{"id":"desk","image":"d.png","x":0.5,"y":0.5,"positionRelative":true}]}"#,
            &mut ctx,
        );
        lobby.load(&mut ctx);
        let desk = lobby.objects()[0].node;
        assert_eq!((ctx.display.node(desk).unwrap().x, ctx.display.node(desk).unwrap().y), (960.0, 540.0));

        ctx.set_viewport(Viewport::new(1280.0, 720.0));
        lobby.handle_resize(&mut ctx);

        let node = ctx.display.node(desk).unwrap();
        assert_eq!((node.x, node.y), (640.0, 360.0));
    }

    #[test]
    fn absolute_object_follows_reference_scale() {
        let mut ctx = context(StaticAssetSource::new());
        let mut room = scene(
            r#"{"id":"room","interactiveObjects":[{"id":"bed","image":"b.png","x":400,"y":200}]}"#,
            &mut ctx,
        );
        room.load(&mut ctx);

        ctx.set_viewport(Viewport::new(960.0, 540.0));
        room.handle_resize(&mut ctx);

        let node = ctx.display.node(room.objects()[0].node).unwrap();
        assert_relative_eq!(node.x, 200.0);
        assert_relative_eq!(node.y, 100.0);
    }

    #[test]
    fn ambient_starts_on_load_and_fades_on_destroy() {
        let mut ctx = context(StaticAssetSource::new());
        let mut spa = scene(r#"{"id":"spa","ambientSound":{"src":"/assets/water.mp3"}}"#, &mut ctx);

        spa.load(&mut ctx);
        assert!(ctx.audio.is_ambient_playing("spa"));
        assert_relative_eq!(ctx.audio.backend().volume("ambient:spa").unwrap(), 0.5);

        spa.destroy(&mut ctx);
        assert!(ctx.audio.is_fading_out("spa"));
        assert!(!ctx.display.is_on_root(spa.container()));
        assert!(spa.objects().is_empty());
        assert_eq!(spa.status(), SceneStatus::Unloaded);
        assert_eq!(ctx.display.node(spa.container()).unwrap().children().len(), 0);
    }

    #[test]
    fn click_travels_through_behaviour() {
        let mut ctx = context(StaticAssetSource::new());
        let mut exterior = scene(
            r#"{"id":"exterior","interactiveObjects":[{"id":"entrance","image":"e.png","x":100,"y":100,"travelTo":"lobby"}]}"#,
            &mut ctx,
        );
        exterior.load(&mut ctx);

        let interaction = exterior.handle_pointer(PointerEvent::Pressed { x: 100.0, y: 100.0 }, &mut ctx);
        assert_eq!(interaction.unwrap().object_id(), "entrance");
        assert_eq!(ctx.message_bus.read::<TravelRequest>()[0].scene_id, "lobby");
    }

    #[test]
    fn intro_adds_fading_title_and_floating_hero() {
        let source = StaticAssetSource::new().with_texture("/cocoon.png", 200.0, 300.0);
        let mut ctx = context(source);
        let registry = BehaviorRegistry::with_intro("intro");
        let mut intro = Scene::new(
            1,
            descriptor(r#"{"id":"intro","interactiveObjects":[{"id":"cocoon","image":"/cocoon.png","x":0.5,"y":0.5,"positionRelative":true}]}"#),
            registry.create("intro"),
            &mut ctx,
        );
        intro.load(&mut ctx);

        let children = ctx.display.node(intro.container()).unwrap().children().to_vec();
        let title = *children.last().unwrap();
        let node = ctx.display.node(title).unwrap();
        assert_eq!(node.text(), Some("the Cocoon"));
        assert_relative_eq!(node.alpha, 0.0);
        assert_relative_eq!(node.x, 940.0);
        assert_relative_eq!(node.y, 540.0 + 150.0 + 50.0 - 120.0);

        for _ in 0..25 {
            ctx.animator.update(Duration::from_millis(100), &mut ctx.display);
        }
        assert_relative_eq!(ctx.display.node(title).unwrap().alpha, 1.0);
        let hero_y = ctx.display.node(intro.objects()[0].node).unwrap().y;
        assert!(hero_y < 540.0 && hero_y >= 530.0);
    }

    #[test]
    fn intro_cocoon_does_not_travel() {
        let mut ctx = context(StaticAssetSource::new());
        let registry = BehaviorRegistry::with_intro("intro");
        let mut intro = Scene::new(
            1,
            descriptor(r#"{"id":"intro","interactiveObjects":[{"id":"cocoon","image":"c.png","x":50,"y":50,"travelTo":"exterior"}]}"#),
            registry.create("intro"),
            &mut ctx,
        );
        intro.load(&mut ctx);

        assert!(intro.handle_pointer(PointerEvent::Touched { x: 50.0, y: 50.0 }, &mut ctx).is_some());
        assert!(!ctx.message_bus.has_messages::<TravelRequest>());
    }

    #[test]
    fn reload_rebuilds_visuals_in_same_container() {
        let mut ctx = context(StaticAssetSource::new());
        let mut lobby = scene(r#"{"id":"lobby","interactiveObjects":[{"id":"a","image":"a.png"}]}"#, &mut ctx);
        lobby.load(&mut ctx);
        let container = lobby.container();
        lobby.destroy(&mut ctx);

        lobby.load(&mut ctx);
        assert_eq!(lobby.container(), container);
        assert_eq!(ctx.display.node(container).unwrap().children().len(), 2);
        assert_relative_eq!(ctx.display.node(container).unwrap().alpha, 1.0);
    }
}
