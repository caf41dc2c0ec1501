//=========================================================================
// Game Systems
//=========================================================================
//
// Container for the systems with logic: input, scenes and overlays.
// Systems operate on GameContext data.
//
// Per-tick pipeline:
//   1. input:   frame batches → PointerEvents
//   2. routing: orientation notice blocks → sound toggle → scene manager
//   3. tweens:  animator.update(dt)
//   4. scenes:  transition phases, then queued TravelRequests
//   5. audio:   fade-out stops
//   6. overlays: loading screen fade; toggle/notice back on top
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::GameContext;
use crate::core::catalog::SceneCatalog;
use crate::core::input::{InputSystem, PointerEvent};
use crate::core::layout::Viewport;
use crate::core::scene::{BehaviorRegistry, LoadOutcome, SceneEntered, SceneError, SceneManager};
use crate::core::ui::{LoadingScreen, OrientationNotice, SoundToggle};

//=== GameSystems =========================================================

/// Container for the logic systems driven by the orchestrator.
pub struct GameSystems {
    pub input: InputSystem,
    pub scene_manager: SceneManager,
    pub sound_toggle: SoundToggle,
    pub loading_screen: LoadingScreen,
    pub orientation_notice: OrientationNotice,
}

impl GameSystems {
    /// Builds the systems and puts the loading screen up.
    pub fn new(catalog: SceneCatalog, ctx: &mut GameContext) -> Self {
        let registry = BehaviorRegistry::with_intro(&ctx.config.intro_scene);
        Self::with_registry(catalog, registry, ctx)
    }

    pub fn with_registry(catalog: SceneCatalog, registry: BehaviorRegistry, ctx: &mut GameContext) -> Self {
        let loading_screen = LoadingScreen::new(ctx);
        let sound_toggle = SoundToggle::new(ctx);
        let orientation_notice = OrientationNotice::new(ctx);

        Self {
            input: InputSystem::new(),
            scene_manager: SceneManager::new(catalog, registry),
            sound_toggle,
            loading_screen,
            orientation_notice,
        }
    }

    //--- Startup ----------------------------------------------------------

    /// Preloads the catalog's assets, starts the music and enters the
    /// intro scene.
    ///
    /// Only an intro id missing from the catalog fails; asset and audio
    /// problems are logged and skipped.
    pub fn start(&mut self, ctx: &mut GameContext) -> Result<LoadOutcome, SceneError> {
        let manifest = self.scene_manager.catalog().asset_manifest();
        let timeout = ctx.config.asset_timeout();

        let loading_screen = &mut self.loading_screen;
        let display = &mut ctx.display;
        let report = ctx
            .assets
            .preload(&manifest.images, timeout, |done, total| {
                loading_screen.set_progress(done, total, display);
            });
        if !report.failed.is_empty() {
            warn!("{} of {} images failed to preload", report.failed.len(), manifest.images.len());
        }

        // Sounds load lazily; registering them only creates channels
        for sound in &manifest.sounds {
            if let Err(e) = ctx.audio.load_sound(sound, sound, false) {
                warn!("Could not register sound `{}`: {}", sound, e);
            }
        }

        if let Some(music) = ctx.config.music.clone() {
            if let Err(e) = ctx.audio.play_background_music(&music.src, Some(music.volume)) {
                warn!("Background music unavailable: {}", e);
            }
        }

        self.loading_screen.hide(ctx);

        let intro = ctx.config.intro_scene.clone();
        let transition = ctx.config.default_transition.clone();
        info!("Starting tour at `{}`", intro);
        let outcome = self.scene_manager.load_scene(&intro, transition, ctx);
        if let Err(e) = &outcome {
            self.loading_screen.show_error(&e.to_string(), ctx);
        }
        self.bring_overlays_to_front(ctx);
        outcome
    }

    //--- Update Loop ------------------------------------------------------

    /// Applies a new viewport to every system.
    pub fn resize(&mut self, viewport: Viewport, ctx: &mut GameContext) {
        if viewport == ctx.viewport() {
            return;
        }
        debug!("Viewport resized to {}x{}", viewport.width, viewport.height);
        ctx.set_viewport(viewport);

        self.scene_manager.handle_resize(ctx);
        self.sound_toggle.update_position(ctx);
        self.loading_screen.handle_resize(ctx);
        self.orientation_notice.update(ctx);
    }

    /// Runs one tick of `dt`.
    pub fn update(&mut self, ctx: &mut GameContext, dt: Duration) {
        // 1. Input
        let frame_events = std::mem::take(&mut ctx.frame_events);
        let pointer_events = self.input.process_frame(&frame_events).to_vec();

        // 2. Routing
        for event in pointer_events {
            self.route_pointer(event, ctx);
        }

        // 3. Tweens
        ctx.animator.update(dt, &mut ctx.display);

        // 4. Scenes
        self.scene_manager.update(ctx);
        self.scene_manager.process_travel_requests(ctx);

        // 5. Audio
        ctx.audio.update(dt);

        // 6. Overlays
        self.loading_screen.update(ctx);
        let entered = ctx.message_bus.drain::<SceneEntered>();
        if !entered.is_empty() {
            for scene in &entered {
                debug!("Entered scene `{}`", scene.scene_id);
            }
            self.bring_overlays_to_front(ctx);
        }
    }

    fn route_pointer(&mut self, event: PointerEvent, ctx: &mut GameContext) {
        if event.is_activation() {
            ctx.audio.retry_pending_music();
        }
        if self.orientation_notice.is_shown() {
            return;
        }
        if self.sound_toggle.handle_pointer(event, ctx) {
            return;
        }
        self.scene_manager.handle_pointer(event, ctx);
    }

    fn bring_overlays_to_front(&self, ctx: &mut GameContext) {
        self.sound_toggle.bring_to_front(ctx);
        self.orientation_notice.bring_to_front(ctx);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::core::animation::TweenEngine;
    use crate::core::assets::{AssetLoader, StaticAssetSource};
    use crate::core::audio::{SilentAudio, SoundManager};
    use crate::core::catalog::TransitionKind;
    use crate::core::config::{GameConfig, MusicConfig};
    use crate::core::globals::test_support::{context, context_with};
    use crate::core::input::{InputEvent, MouseButton};
    use crate::core::layout::Responsive;

    const CATALOG: &str = r#"{"scenes":[
        {"id":"intro","background":"/bg/intro.jpg","interactiveObjects":[
            {"id":"cocoon","image":"/cocoon.png","x":0.5,"y":0.5,"positionRelative":true,"travelTo":"exterior"}]},
        {"id":"exterior","background":"/bg/exterior.jpg","interactiveObjects":[
            {"id":"entrance","image":"/door.png","x":960,"y":540,"travelTo":"lobby","transition":"none"}]},
        {"id":"lobby","interactiveObjects":[]}
    ]}"#;

    fn source() -> StaticAssetSource {
        StaticAssetSource::new()
            .with_texture("/bg/intro.jpg", 1920.0, 1080.0)
            .with_texture("/bg/exterior.jpg", 1920.0, 1080.0)
            .with_texture("/cocoon.png", 200.0, 200.0)
            .with_texture("/door.png", 100.0, 200.0)
    }

    fn started(mut ctx: GameContext) -> (GameSystems, GameContext) {
        ctx.config.default_transition = TransitionKind::None;
        let catalog = SceneCatalog::from_json_str(CATALOG).unwrap();
        let mut systems = GameSystems::new(catalog, &mut ctx);
        systems.start(&mut ctx).unwrap();
        (systems, ctx)
    }

    fn click(systems: &mut GameSystems, ctx: &mut GameContext, x: f32, y: f32) {
        ctx.frame_events.push(vec![
            InputEvent::PointerMoved { x, y },
            InputEvent::PointerDown { button: MouseButton::Left, x, y },
            InputEvent::PointerUp { button: MouseButton::Left, x, y },
        ]);
        systems.update(ctx, Duration::from_millis(16));
    }

    #[test]
    fn start_preloads_and_enters_intro() {
        let (systems, ctx) = started(context(source()));

        assert_eq!(systems.scene_manager.current_scene_id(), Some("intro"));
        assert_eq!(systems.loading_screen.percent(), 100);
        assert!(ctx.assets.has("/bg/exterior.jpg"));
        assert_eq!(ctx.display.root_children().last(), Some(&systems.sound_toggle.container()));
    }

    #[test]
    fn unknown_intro_is_reported_on_loading_screen() {
        let mut ctx = context(source());
        ctx.config.intro_scene = "atrium".to_string();
        let catalog = SceneCatalog::from_json_str(CATALOG).unwrap();
        let mut systems = GameSystems::new(catalog, &mut ctx);

        let err = systems.start(&mut ctx).unwrap_err();
        assert_eq!(err, SceneError::UnknownScene("atrium".to_string()));
        assert!(systems.loading_screen.has_failed());
    }

    #[test]
    fn click_travels_between_scenes() {
        let (mut systems, mut ctx) = started(context(source()));

        // Intro never travels
        click(&mut systems, &mut ctx, 960.0, 540.0);
        assert_eq!(systems.scene_manager.current_scene_id(), Some("intro"));

        systems
            .scene_manager
            .load_scene("exterior", TransitionKind::None, &mut ctx)
            .unwrap();
        click(&mut systems, &mut ctx, 960.0, 540.0);
        assert_eq!(systems.scene_manager.current_scene_id(), Some("lobby"));
        assert!(ctx.state.has_visited("lobby"));
        assert_eq!(ctx.display.root_children().last(), Some(&systems.sound_toggle.container()));
    }

    #[test]
    fn toggle_click_does_not_reach_scene() {
        let (mut systems, mut ctx) = started(context(source()));
        click(&mut systems, &mut ctx, 30.0, 1030.0);
        assert!(ctx.audio.is_music_muted());
    }

    #[test]
    fn first_press_retries_refused_music() {
        let mut config = GameConfig::default();
        config.window.width = 1920;
        config.window.height = 1080;
        config.music = Some(MusicConfig {
            src: "/assets/theme.m4a".to_string(),
            volume: 0.6,
        });
        let ctx = GameContext::new(
            config,
            AssetLoader::new(Arc::new(source())),
            SoundManager::new(Box::new(SilentAudio::new().with_playback_refused())),
            Box::new(TweenEngine::new()),
        );
        let (mut systems, mut ctx) = started(ctx);
        assert!(ctx.audio.has_pending_music());

        click(&mut systems, &mut ctx, 500.0, 500.0);
        assert!(!ctx.audio.has_pending_music());
    }

    #[test]
    fn resize_updates_viewport_once() {
        let (mut systems, mut ctx) = started(context(source()));
        systems.resize(Viewport::new(960.0, 540.0), &mut ctx);
        assert_eq!(ctx.viewport(), Viewport::new(960.0, 540.0));

        let toggle = ctx.display.node(systems.sound_toggle.container()).unwrap();
        assert!((toggle.y - (540.0 - 30.0)).abs() < 1e-3);
    }

    #[test]
    fn resize_refits_reference_frame() {
        let (mut systems, mut ctx) = started(context(source()));
        assert_eq!(ctx.responsive, Responsive::fit(Viewport::new(1920.0, 1080.0)));

        // Wider than 16:9: pillarboxed, scaled by height
        systems.resize(Viewport::new(2400.0, 1080.0), &mut ctx);
        assert!((ctx.responsive.scale - 1.0).abs() < 1e-6);
        assert!((ctx.responsive.offset_x - 240.0).abs() < 1e-3);
        assert!(ctx.responsive.offset_y.abs() < 1e-3);
        assert!((ctx.responsive.scaled_width - 1920.0).abs() < 1e-3);
    }

    #[test]
    fn portrait_notice_blocks_scene_input() {
        let mut config = GameConfig::default();
        config.window.width = 1280;
        config.window.height = 720;
        config.music = None;
        config.mobile = true;
        let (mut systems, mut ctx) = started(context_with(source(), config));

        systems.resize(Viewport::new(720.0, 1280.0), &mut ctx);
        assert!(systems.orientation_notice.is_shown());

        let (x, y) = {
            let node = ctx.display.node(systems.sound_toggle.container()).unwrap();
            (node.x + 5.0, node.y + 5.0)
        };
        click(&mut systems, &mut ctx, x, y);
        assert!(!ctx.audio.is_music_muted());
    }
}
