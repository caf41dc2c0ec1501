//=========================================================================
// Scene Catalog
//=========================================================================
//
// Read-only store of scene descriptors, loaded once at startup.
//
// Architecture:
//   scenes.json → CatalogFile → validate() → SceneCatalog
//                                               ├─ scenes: Vec<Arc<SceneDescriptor>>
//                                               └─ index:  HashMap<id, position>
//
// Validation rejects duplicate ids and warns about `travelTo` targets
// that are not in the catalog.
//
//=========================================================================

//=== Module Declarations =================================================

mod descriptor;

//=== Public API ==========================================================

pub use descriptor::{
    AmbientSound, ObjectDescriptor, SceneDescriptor, StateTarget, TransitionKind,
    DEFAULT_AMBIENT_VOLUME, DEFAULT_CURSOR, DEFAULT_HOVER_SCALE, DEFAULT_STATE,
};

//=== External Dependencies ===============================================

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, warn};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use descriptor::CatalogFile;

//=== CatalogError ========================================================

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read scene catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scene catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate scene id `{0}`")]
    DuplicateScene(String),
}

//=== AssetManifest =======================================================

/// Every asset reference used by a catalog, deduplicated in first-use order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetManifest {
    pub images: Vec<String>,
    pub sounds: Vec<String>,
}

impl AssetManifest {
    fn add_image(&mut self, seen: &mut HashSet<String>, reference: &str) {
        if seen.insert(reference.to_string()) {
            self.images.push(reference.to_string());
        }
    }

    fn add_sound(&mut self, seen: &mut HashSet<String>, reference: &str) {
        if seen.insert(reference.to_string()) {
            self.sounds.push(reference.to_string());
        }
    }
}

//=== SceneCatalog ========================================================

/// Scene descriptors indexed by id, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct SceneCatalog {
    scenes: Vec<Arc<SceneDescriptor>>,
    index: HashMap<String, usize>,
}

impl SceneCatalog {
    //--- Construction -----------------------------------------------------

    /// Parses and validates a catalog document.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::from_descriptors(file.scenes)
    }

    /// Reads and parses a catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let catalog = Self::from_json_str(&json)?;
        debug!("Loaded {} scenes from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Builds a catalog from already-parsed descriptors.
    pub fn from_descriptors(scenes: Vec<SceneDescriptor>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(scenes.len());
        for (position, scene) in scenes.iter().enumerate() {
            if index.insert(scene.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateScene(scene.id.clone()));
            }
        }

        let catalog = Self {
            scenes: scenes.into_iter().map(Arc::new).collect(),
            index,
        };
        catalog.warn_dangling_travel();
        Ok(catalog)
    }

    fn warn_dangling_travel(&self) {
        for scene in &self.scenes {
            for object in &scene.interactive_objects {
                if let Some(target) = &object.travel_to {
                    if !self.contains(target) {
                        warn!(
                            "Object `{}` in scene `{}` travels to unknown scene `{}`",
                            object.id, scene.id, target
                        );
                    }
                }
            }
        }
    }

    //--- Query API --------------------------------------------------------

    pub fn get(&self, id: &str) -> Option<Arc<SceneDescriptor>> {
        self.index.get(id).map(|&i| Arc::clone(&self.scenes[i]))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Scene ids in declaration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.scenes.iter().map(|s| s.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// All image and sound references, for preloading.
    pub fn asset_manifest(&self) -> AssetManifest {
        let mut manifest = AssetManifest::default();
        let mut seen = HashSet::new();

        for scene in &self.scenes {
            if let Some(background) = &scene.background {
                manifest.add_image(&mut seen, background);
            }
            if let Some(ambient) = &scene.ambient_sound {
                manifest.add_sound(&mut seen, &ambient.src);
            }
            for object in &scene.interactive_objects {
                manifest.add_image(&mut seen, &object.image);
                if let Some(hover) = &object.hover_image {
                    manifest.add_image(&mut seen, hover);
                }
                for image in object.state_change.values().filter_map(StateTarget::image) {
                    manifest.add_image(&mut seen, image);
                }
                for sound in [&object.click_sound, &object.hover_sound].into_iter().flatten() {
                    manifest.add_sound(&mut seen, sound);
                }
            }
        }

        manifest
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{
        "scenes": [
            {
                "id": "intro",
                "background": "/assets/intro.jpg",
                "interactiveObjects": [
                    { "id": "cocoon", "image": "/assets/cocoon.png", "positionRelative": true,
                      "hoverAnimation": true, "travelTo": "exterior" }
                ]
            },
            {
                "id": "exterior",
                "background": "/assets/exterior.jpg",
                "ambientSound": { "src": "/assets/birds.mp3", "volume": 0.4 },
                "interactiveObjects": [
                    { "id": "entrance", "image": "/assets/door.png", "hoverImage": "/assets/door_hover.png",
                      "clickSound": "/assets/click.mp3", "travelTo": "lobby", "transition": "slide",
                      "stateChange": { "default": { "state": "open", "image": "/assets/door_open.png" } } },
                    { "id": "sign", "image": "/assets/door.png", "clickSound": "/assets/click.mp3" }
                ]
            },
            { "id": "lobby" }
        ]
    }"#;

    #[test]
    fn parses_scenes_in_order() {
        let catalog = SceneCatalog::from_json_str(CATALOG).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.ids().collect::<Vec<_>>(), vec!["intro", "exterior", "lobby"]);
        assert!(catalog.contains("lobby"));
        assert!(catalog.get("spa").is_none());

        let exterior = catalog.get("exterior").unwrap();
        assert_eq!(exterior.interactive_objects.len(), 2);
        assert_eq!(exterior.interactive_objects[0].transition, Some(TransitionKind::Slide));
        assert_eq!(exterior.ambient_sound.as_ref().map(|a| a.volume_or_default()), Some(0.4));
    }

    #[test]
    fn get_shares_descriptor() {
        let catalog = SceneCatalog::from_json_str(CATALOG).unwrap();
        let a = catalog.get("intro").unwrap();
        let b = catalog.get("intro").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let json = r#"{ "scenes": [ { "id": "spa" }, { "id": "spa" } ] }"#;
        match SceneCatalog::from_json_str(json) {
            Err(CatalogError::DuplicateScene(id)) => assert_eq!(id, "spa"),
            other => panic!("expected DuplicateScene, got {:?}", other),
        }
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            SceneCatalog::from_json_str("{ \"scenes\": 3 }"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            SceneCatalog::load("/nonexistent/scenes.json"),
            Err(CatalogError::Io { .. })
        ));
    }

    #[test]
    fn manifest_is_deduplicated() {
        let catalog = SceneCatalog::from_json_str(CATALOG).unwrap();
        let manifest = catalog.asset_manifest();

        assert_eq!(
            manifest.images,
            vec![
                "/assets/intro.jpg",
                "/assets/cocoon.png",
                "/assets/exterior.jpg",
                "/assets/door.png",
                "/assets/door_hover.png",
                "/assets/door_open.png",
            ]
        );
        assert_eq!(manifest.sounds, vec!["/assets/birds.mp3", "/assets/click.mp3"]);
    }
}
