//=========================================================================
// Cocoon Tour Engine
//
// Main entry point and coordinator for the tour.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run()──>  [Runtime]
//         │                          │
//         ├─ with_config()           ├─ loads the scene catalog
//         ├─ with_tps()              ├─ spawns the logic thread
//         ├─ with_channel_capacity() ├─ runs the platform
//         ├─ with_asset_source()     └─ blocks until exit
//         ├─ with_audio_backend()
//         └─ with_behavior()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{error, info, warn};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::animation::TweenEngine;
use crate::core::assets::{AssetLoader, AssetSource, FileAssetSource};
use crate::core::audio::{AudioBackend, RodioBackend, SilentAudio, SoundManager};
use crate::core::catalog::{CatalogError, SceneCatalog};
use crate::core::config::GameConfig;
use crate::core::globals::{GameContext, GameSystems};
use crate::core::platform_bridge::{PlatformError, PlatformEvent};
use crate::core::scene::{BehaviorFactory, BehaviorRegistry, SceneError};
use crate::core::CoreSystemsOrchestrator;
use crate::platform::Platform;

//=== EngineError =========================================================

/// Fatal errors that stop the tour.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("logic thread panicked")]
    LogicThreadPanicked,
}

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Config**: [`GameConfig::default()`]
/// - **TPS**: 60.0 (logic updates per second)
/// - **Channel capacity**: 128 events
/// - **Assets**: files below `config.asset_root`
/// - **Audio**: [`RodioBackend`] on the default output device, or
///   [`SilentAudio`] when none can be opened
///
/// # Examples
///
/// ```no_run
/// use cocoon_tour::EngineBuilder;
/// use cocoon_tour::core::config::GameConfig;
///
/// let config = GameConfig::load("cocoon.toml").unwrap_or_default();
///
/// EngineBuilder::new()
///     .with_config(config)
///     .with_tps(120.0)
///     .build()
///     .run()
///     .expect("tour failed");
/// ```
pub struct EngineBuilder {
    config: GameConfig,
    tps: f64,
    channel_capacity: usize,
    asset_source: Option<Arc<dyn AssetSource>>,
    audio: Option<Box<dyn AudioBackend>>,
    behaviors: Vec<(String, BehaviorFactory)>,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        let config = GameConfig::default();
        Self {
            tps: config.ticks_per_second,
            channel_capacity: config.channel_capacity,
            config,
            asset_source: None,
            audio: None,
            behaviors: Vec::new(),
        }
    }

    /// Uses `config`, including its tick rate and channel capacity.
    ///
    /// # Panics
    ///
    /// Panics if the config's tick rate or channel capacity is not
    /// positive.
    pub fn with_config(self, config: GameConfig) -> Self {
        let tps = config.ticks_per_second;
        let capacity = config.channel_capacity;
        Self { config, ..self }.with_tps(tps).with_channel_capacity(capacity)
    }

    /// Sets the target ticks per second for the logic thread.
    ///
    /// Default: 60.0
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets the channel capacity for platform → core communication.
    ///
    /// Default: 128
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Replaces the file-based asset source.
    pub fn with_asset_source(mut self, source: Arc<dyn AssetSource>) -> Self {
        self.asset_source = Some(source);
        self
    }

    /// Replaces the default audio backend.
    pub fn with_audio_backend(mut self, backend: Box<dyn AudioBackend>) -> Self {
        self.audio = Some(backend);
        self
    }

    /// Binds a custom behaviour to a scene id.
    pub fn with_behavior(mut self, scene_id: &str, factory: BehaviorFactory) -> Self {
        self.behaviors.push((scene_id.to_string(), factory));
        self
    }

    /// Builds the engine instance.
    pub fn build(self) -> Engine {
        info!("Building engine (TPS: {}, channel: {})", self.tps, self.channel_capacity);

        let mut registry = BehaviorRegistry::with_intro(&self.config.intro_scene);
        for (scene_id, factory) in self.behaviors {
            registry.register(&scene_id, factory);
        }
        let asset_source = self
            .asset_source
            .unwrap_or_else(|| Arc::new(FileAssetSource::new(self.config.asset_root.clone())));
        let audio = match self.audio {
            Some(audio) => audio,
            None => default_audio(&self.config),
        };

        Engine {
            config: self.config,
            tps: self.tps,
            channel_capacity: self.channel_capacity,
            asset_source,
            audio,
            registry,
        }
    }
}

fn default_audio(config: &GameConfig) -> Box<dyn AudioBackend> {
    match RodioBackend::new(config.asset_root.clone()) {
        Ok(backend) => Box::new(backend),
        Err(e) => {
            warn!("{}; continuing without sound", e);
            Box::new(SilentAudio::new())
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Tour runtime.
///
/// # Architecture
///
/// ```text
/// Engine (Main Thread)
///   ├─► CoreSystemsOrchestrator (Logic Thread @ TPS)
///   │     └─► GameSystems: input, scenes, overlays
///   │
///   └─► Platform (Event Loop)
///         └─► Window, Input Polling
///
/// Communication: bounded crossbeam channel (PlatformEvent)
/// ```
pub struct Engine {
    config: GameConfig,
    tps: f64,
    channel_capacity: usize,
    asset_source: Arc<dyn AssetSource>,
    audio: Box<dyn AudioBackend>,
    registry: BehaviorRegistry,
}

impl Engine {
    //--- Accessors --------------------------------------------------------

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    //--- Execution --------------------------------------------------------

    /// Starts the tour and blocks until the window closes.
    ///
    /// # Lifecycle
    ///
    /// 1. Loads the scene catalog (on failure the error stays on screen)
    /// 2. Creates the channel for platform → core communication
    /// 3. Spawns the logic thread (startup sequence, then fixed TPS)
    /// 4. Runs the platform event loop (blocks here)
    /// 5. On window close: platform exits → logic thread terminates
    ///
    /// # Errors
    ///
    /// Returns the first fatal error: an unreadable catalog, a failed
    /// startup, a platform failure or a panicked logic thread.
    pub fn run(self) -> Result<(), EngineError> {
        info!("Starting engine runtime (TPS: {})", self.tps);
        let tps = self.tps;
        let channel_capacity = self.channel_capacity;
        let window = self.config.window.clone();

        //--- 1. Build the game ---------------------------------------------
        let (orchestrator, catalog_error) = self.prepare();

        //--- 2. Create communication channel -----------------------------
        let (tx, rx): (Sender<PlatformEvent>, Receiver<PlatformEvent>) = bounded(channel_capacity);
        info!("Channel created (capacity: {})", channel_capacity);

        //--- 3. Spawn the core logic thread -------------------------------
        let core_handle = orchestrator.spawn_core_thread(rx, tps);
        info!("Core logic thread spawned");

        //--- 4. Launch the platform subsystem -----------------------------
        let platform = Platform::new(tx, window);
        info!("Platform initialized, entering event loop");
        let platform_result = platform.run();
        if let Err(e) = &platform_result {
            error!("Platform error: {}", e);
        }
        info!("Platform event loop exited");

        //--- 5. Cleanup: Wait for logic thread to terminate --------------
        let core_result = match core_handle.join() {
            Ok(result) => {
                info!("Core thread terminated cleanly");
                result.map_err(EngineError::from)
            }
            Err(e) => {
                error!("Core thread panicked: {:?}", e);
                Err(EngineError::LogicThreadPanicked)
            }
        };

        info!("Engine shutdown complete");
        platform_result?;
        if let Some(e) = catalog_error {
            return Err(e.into());
        }
        core_result
    }

    /// Loads the catalog and assembles context and systems.
    ///
    /// An unreadable catalog still yields an orchestrator: it skips the
    /// startup sequence and keeps the error on the loading screen. The
    /// catalog error is handed back for `run` to return at exit.
    fn prepare(self) -> (CoreSystemsOrchestrator, Option<CatalogError>) {
        let mut context = GameContext::new(
            self.config,
            AssetLoader::new(self.asset_source),
            SoundManager::new(self.audio),
            Box::new(TweenEngine::new()),
        );

        match SceneCatalog::load(&context.config.catalog) {
            Ok(catalog) => {
                info!("Scene catalog loaded: {} scenes", catalog.len());
                let systems = GameSystems::with_registry(catalog, self.registry, &mut context);
                (CoreSystemsOrchestrator::new(context, systems), None)
            }
            Err(e) => {
                error!("Error loading assets: {}", e);
                let mut systems = GameSystems::with_registry(SceneCatalog::default(), self.registry, &mut context);
                systems.loading_screen.show_error(&e.to_string(), &mut context);
                (CoreSystemsOrchestrator::halted(context, systems), Some(e))
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
