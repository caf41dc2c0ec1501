//=========================================================================
// Asset System
//=========================================================================
//
// Texture loading behind a swappable source.
//
// Components:
// - `source`: AssetSource trait + file/static implementations
// - `asset_loader`: cache and timed preloading
//
//=========================================================================

//=== Module Declarations =================================================

mod asset_loader;
mod source;

//=== Public API ==========================================================

pub use asset_loader::{AssetLoader, PreloadReport};
pub use source::{AssetSource, FileAssetSource, StaticAssetSource};

//=== External Dependencies ===============================================

use std::time::Duration;

use thiserror::Error;

//=== AssetError ==========================================================

#[derive(Debug, Clone, Error)]
pub enum AssetError {
    #[error("asset `{0}` not found")]
    NotFound(String),

    #[error("failed to decode `{reference}`: {message}")]
    Decode { reference: String, message: String },

    #[error("timed out loading `{reference}` after {timeout:?}")]
    Timeout { reference: String, timeout: Duration },

    #[error("loader thread for `{0}` exited without a result")]
    WorkerLost(String),
}
