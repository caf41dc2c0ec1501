//=========================================================================
// Asset Sources
//=========================================================================
//
// Where textures come from. The loader only sees the `AssetSource`
// trait; the shipped sources read image headers from disk or serve a
// fixed table (tests, headless runs).
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use log::trace;

//=== Internal Dependencies ===============================================

use super::AssetError;
use crate::core::display::Texture;

//=== AssetSource =========================================================

/// Resolves an asset reference into a decoded texture.
///
/// Called from preload worker threads, hence `Send + Sync`.
pub trait AssetSource: Send + Sync {
    fn fetch(&self, reference: &str) -> Result<Texture, AssetError>;
}

//=== FileAssetSource =====================================================

/// Reads images below a root directory.
///
/// References starting with `/` are relative to the root, mirroring how
/// the catalog addresses its public assets.
#[derive(Debug, Clone)]
pub struct FileAssetSource {
    root: PathBuf,
}

impl FileAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path for a reference.
    pub fn resolve(&self, reference: &str) -> PathBuf {
        self.root.join(reference.trim_start_matches('/'))
    }
}

impl AssetSource for FileAssetSource {
    fn fetch(&self, reference: &str) -> Result<Texture, AssetError> {
        let path = self.resolve(reference);
        if !path.is_file() {
            return Err(AssetError::NotFound(reference.to_string()));
        }

        let (width, height) =
            image::image_dimensions(&path).map_err(|e| AssetError::Decode {
                reference: reference.to_string(),
                message: e.to_string(),
            })?;

        trace!("Decoded {} ({}x{})", path.display(), width, height);
        Ok(Texture::new(reference, width as f32, height as f32))
    }
}

//=== StaticAssetSource ===================================================

/// In-memory table of textures, with optional artificial latency.
#[derive(Debug, Clone, Default)]
pub struct StaticAssetSource {
    textures: HashMap<String, (f32, f32)>,
    delays: HashMap<String, Duration>,
}

impl StaticAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_texture(mut self, reference: &str, width: f32, height: f32) -> Self {
        self.textures.insert(reference.to_string(), (width, height));
        self
    }

    /// Makes fetching `reference` block for `delay` first.
    pub fn with_delay(mut self, reference: &str, delay: Duration) -> Self {
        self.delays.insert(reference.to_string(), delay);
        self
    }
}

impl AssetSource for StaticAssetSource {
    fn fetch(&self, reference: &str) -> Result<Texture, AssetError> {
        if let Some(delay) = self.delays.get(reference) {
            thread::sleep(*delay);
        }
        self.textures
            .get(reference)
            .map(|&(w, h)| Texture::new(reference, w, h))
            .ok_or_else(|| AssetError::NotFound(reference.to_string()))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
