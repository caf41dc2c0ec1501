//=========================================================================
// Game Configuration
//=========================================================================
//
// Runtime settings read from `cocoon.toml`. Every field has a default so
// an empty (or missing) file yields a working setup.
//
// ```toml
// catalog = "data/scenes.json"
// asset_root = "public"
// intro_scene = "intro"
// ticks_per_second = 60.0
// asset_timeout_ms = 10000
//
// [window]
// title = "the Cocoon"
// width = 1280
// height = 720
//
// [music]
// src = "/assets/thecocoon.m4a"
// volume = 0.6
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::catalog::TransitionKind;

//=== ConfigError =========================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

//=== WindowConfig ========================================================

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "the Cocoon".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

//=== MusicConfig =========================================================

/// Background track played across every scene.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MusicConfig {
    pub src: String,
    #[serde(default = "MusicConfig::default_volume")]
    pub volume: f32,
}

impl MusicConfig {
    pub const DEFAULT_VOLUME: f32 = 0.6;

    fn default_volume() -> f32 {
        Self::DEFAULT_VOLUME
    }
}

//=== GameConfig ==========================================================

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GameConfig {
    /// Scene catalog JSON file.
    pub catalog: PathBuf,

    /// Directory that `/`-prefixed asset references resolve against.
    pub asset_root: PathBuf,

    /// Scene shown after preloading; travel from it is disabled.
    pub intro_scene: String,

    pub default_transition: TransitionKind,

    pub ticks_per_second: f64,
    pub channel_capacity: usize,

    /// Per-asset preload timeout in milliseconds.
    pub asset_timeout_ms: u64,

    /// Enables mobile layout (smaller objects, orientation notice).
    pub mobile: bool,

    pub window: WindowConfig,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub music: Option<MusicConfig>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            catalog: PathBuf::from("data/scenes.json"),
            asset_root: PathBuf::from("public"),
            intro_scene: "intro".to_string(),
            default_transition: TransitionKind::Fade,
            ticks_per_second: 60.0,
            channel_capacity: 128,
            asset_timeout_ms: 10_000,
            mobile: false,
            window: WindowConfig::default(),
            music: Some(MusicConfig {
                src: "/assets/thecocoon.m4a".to_string(),
                volume: MusicConfig::DEFAULT_VOLUME,
            }),
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn asset_timeout(&self) -> Duration {
        Duration::from_millis(self.asset_timeout_ms)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
