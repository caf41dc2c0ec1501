//=========================================================================
// Scene Descriptors
//=========================================================================
//
// Serde model of the scene catalog (camelCase JSON).
//
// ```text
// { "scenes": [
//     { "id": "lobby",
//       "background": "/assets/lobby.jpg",
//       "ambientSound": { "src": "/assets/lobby.mp3", "volume": 0.4 },
//       "interactiveObjects": [ { "id": "door", "image": "...", ... } ] }
// ] }
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

//=== Defaults ============================================================

/// Ambient volume used when a scene does not declare one.
pub const DEFAULT_AMBIENT_VOLUME: f32 = 0.5;

/// Hover scale factor used when an object does not declare one.
pub const DEFAULT_HOVER_SCALE: f32 = 1.05;

/// Cursor shown over an object that does not declare one.
pub const DEFAULT_CURSOR: &str = "pointer";

/// Object state assumed before any interaction.
pub const DEFAULT_STATE: &str = "default";

//=== CatalogFile =========================================================

/// Top-level document of `scenes.json`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub(super) struct CatalogFile {
    pub scenes: Vec<SceneDescriptor>,
}

//=== SceneDescriptor =====================================================

/// Static description of one scene. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDescriptor {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ambient_sound: Option<AmbientSound>,

    #[serde(default)]
    pub interactive_objects: Vec<ObjectDescriptor>,
}

/// Looping sound played while a scene is active.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AmbientSound {
    pub src: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f32>,
}

impl AmbientSound {
    pub fn volume_or_default(&self) -> f32 {
        self.volume.unwrap_or(DEFAULT_AMBIENT_VOLUME)
    }
}

//=== ObjectDescriptor ====================================================

/// A clickable hotspot inside a scene.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectDescriptor {
    pub id: String,
    pub image: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hover_image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,

    /// `x`/`y` are fractions of the viewport instead of reference pixels.
    #[serde(default)]
    pub position_relative: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,

    #[serde(default)]
    pub hover_animation: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hover_scale: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub click_sound: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hover_sound: Option<String>,

    /// Current state (or `"default"`) → next state.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub state_change: BTreeMap<String, StateTarget>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_to: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<TransitionKind>,
}

impl ObjectDescriptor {
    /// Authored position with defaults applied: `(0.5, 0.5)` for relative
    /// objects, `(0, 0)` otherwise.
    pub fn position(&self) -> (f32, f32) {
        let fallback = if self.position_relative { 0.5 } else { 0.0 };
        (self.x.unwrap_or(fallback), self.y.unwrap_or(fallback))
    }

    pub fn hover_scale_or_default(&self) -> f32 {
        self.hover_scale.unwrap_or(DEFAULT_HOVER_SCALE)
    }

    pub fn cursor_or_default(&self) -> &str {
        self.cursor.as_deref().unwrap_or(DEFAULT_CURSOR)
    }

    pub fn transition_or_default(&self) -> TransitionKind {
        self.transition.clone().unwrap_or_default()
    }

    /// Entry for `current`, falling back to the `"default"` entry.
    pub fn resolve_state_change(&self, current: &str) -> Option<&StateTarget> {
        self.state_change
            .get(current)
            .or_else(|| self.state_change.get(DEFAULT_STATE))
    }
}

//=== StateTarget =========================================================

/// Right-hand side of a `stateChange` entry.
///
/// Accepts a bare state name (`"open"`) or `{ "state": "open", "image": "…" }`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum StateTarget {
    Name(String),
    Detailed {
        state: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        image: Option<String>,
    },
}

impl StateTarget {
    pub fn state(&self) -> &str {
        match self {
            Self::Name(state) | Self::Detailed { state, .. } => state,
        }
    }

    /// Texture to swap in when entering this state.
    pub fn image(&self) -> Option<&str> {
        match self {
            Self::Name(_) => None,
            Self::Detailed { image, .. } => image.as_deref(),
        }
    }
}

//=== TransitionKind ======================================================

/// Visual switch between two scenes.
///
/// Unrecognised names are kept verbatim and behave like `None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum TransitionKind {
    #[default]
    Fade,
    Slide,
    None,
    Unknown(String),
}

impl TransitionKind {
    /// Returns `true` for kinds that animate.
    pub fn is_animated(&self) -> bool {
        matches!(self, Self::Fade | Self::Slide)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Fade => "fade",
            Self::Slide => "slide",
            Self::None => "none",
            Self::Unknown(name) => name,
        }
    }
}

impl From<String> for TransitionKind {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl From<&str> for TransitionKind {
    fn from(name: &str) -> Self {
        match name {
            "fade" => Self::Fade,
            "slide" => Self::Slide,
            "none" => Self::None,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl From<TransitionKind> for String {
    fn from(kind: TransitionKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn object(json: &str) -> ObjectDescriptor {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn minimal_object_gets_defaults() {
        let obj = object(r#"{ "id": "door", "image": "door.png" }"#);
        assert_eq!(obj.position(), (0.0, 0.0));
        assert_eq!(obj.hover_scale_or_default(), DEFAULT_HOVER_SCALE);
        assert_eq!(obj.cursor_or_default(), "pointer");
        assert_eq!(obj.transition_or_default(), TransitionKind::Fade);
        assert!(!obj.hover_animation);
        assert!(obj.state_change.is_empty());
    }

    #[test]
    fn relative_object_defaults_to_centre() {
        let obj = object(r#"{ "id": "c", "image": "c.png", "positionRelative": true, "y": 0.3 }"#);
        assert_eq!(obj.position(), (0.5, 0.3));
    }

    #[test]
    fn state_targets_accept_both_shapes() {
        let obj = object(
            r#"{
                "id": "door",
                "image": "door.png",
                "stateChange": {
                    "default": { "state": "open", "image": "door_open.png" },
                    "open": "closed"
                }
            }"#,
        );

        let first = obj.resolve_state_change("default").unwrap();
        assert_eq!(first.state(), "open");
        assert_eq!(first.image(), Some("door_open.png"));

        let second = obj.resolve_state_change("open").unwrap();
        assert_eq!(second.state(), "closed");
        assert_eq!(second.image(), None);

        // Unknown current state falls back to "default"
        assert_eq!(obj.resolve_state_change("ajar").map(|t| t.state()), Some("open"));
    }

    #[test]
    fn missing_entry_and_default_resolves_to_none() {
        let obj = object(r#"{ "id": "lamp", "image": "l.png", "stateChange": { "on": "off" } }"#);
        assert!(obj.resolve_state_change("default").is_none());
    }

    #[test]
    fn transition_kinds_parse_with_unknown_fallback() {
        let fade: TransitionKind = serde_json::from_str(r#""fade""#).unwrap();
        let slide: TransitionKind = serde_json::from_str(r#""slide""#).unwrap();
        let zoom: TransitionKind = serde_json::from_str(r#""zoom""#).unwrap();

        assert_eq!(fade, TransitionKind::Fade);
        assert_eq!(slide, TransitionKind::Slide);
        assert_eq!(zoom, TransitionKind::Unknown("zoom".into()));
        assert!(!zoom.is_animated());
        assert_eq!(serde_json::to_string(&zoom).unwrap(), r#""zoom""#);
    }

    #[test]
    fn ambient_volume_defaults_to_half() {
        let ambient: AmbientSound = serde_json::from_str(r#"{ "src": "wind.mp3" }"#).unwrap();
        assert_eq!(ambient.volume_or_default(), 0.5);
    }
}
