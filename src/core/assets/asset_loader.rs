//=========================================================================
// Asset Loader
//=========================================================================
//
// Load-by-reference, cache-by-reference texture store.
//
// Architecture:
//   load(ref)    → cache hit? → clone
//                → source.fetch(ref) → cache
//
//   preload(refs) → for each ref:
//                     worker thread ── fetch ──→ bounded(1) channel
//                     recv_timeout(timeout) → cache | skip
//                     progress(done, total)
//
// A timed-out worker is left to finish on its own; its late result is
// discarded when it hits the dropped receiver.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, RecvTimeoutError};
use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::{AssetError, AssetSource};
use crate::core::display::Texture;

//=== PreloadReport =======================================================

/// Outcome of a preload pass.
#[derive(Debug, Default)]
pub struct PreloadReport {
    pub loaded: usize,
    pub failed: Vec<AssetError>,
}

//=== AssetLoader =========================================================

pub struct AssetLoader {
    source: Arc<dyn AssetSource>,
    cache: HashMap<String, Texture>,
}

impl AssetLoader {
    pub fn new(source: Arc<dyn AssetSource>) -> Self {
        Self {
            source,
            cache: HashMap::new(),
        }
    }

    //--- Loading ----------------------------------------------------------

    /// Returns the texture for `reference`, fetching it on first use.
    ///
    /// Failures are logged and yield `None`; callers fall back to a
    /// placeholder.
    pub fn load(&mut self, reference: &str) -> Option<Texture> {
        match self.try_load(reference) {
            Ok(texture) => Some(texture),
            Err(e) => {
                warn!("Failed to load asset: {}", e);
                None
            }
        }
    }

    /// Like [`load`](Self::load) but reports the failure.
    pub fn try_load(&mut self, reference: &str) -> Result<Texture, AssetError> {
        if let Some(texture) = self.cache.get(reference) {
            return Ok(texture.clone());
        }
        let texture = self.source.fetch(reference)?;
        self.cache.insert(reference.to_string(), texture.clone());
        Ok(texture)
    }

    /// Fetches every reference on a worker thread, one at a time.
    ///
    /// Each asset gets `timeout` to arrive; slow or failing assets are
    /// logged and skipped. `progress` is called after every asset with
    /// `(done, total)`; an empty list reports `(0, 0)` once.
    pub fn preload<F>(&mut self, references: &[String], timeout: Duration, mut progress: F) -> PreloadReport
    where
        F: FnMut(usize, usize),
    {
        let total = references.len();
        let mut report = PreloadReport::default();
        info!("Preloading {} assets (timeout {:?} each)", total, timeout);

        if total == 0 {
            progress(0, 0);
            return report;
        }

        for (done, reference) in references.iter().enumerate() {
            match self.preload_one(reference, timeout) {
                Ok(()) => report.loaded += 1,
                Err(e) => {
                    warn!("Skipping asset: {}", e);
                    report.failed.push(e);
                }
            }
            progress(done + 1, total);
        }

        debug!("Preload finished: {} loaded, {} failed", report.loaded, report.failed.len());
        report
    }

    fn preload_one(&mut self, reference: &str, timeout: Duration) -> Result<(), AssetError> {
        if self.cache.contains_key(reference) {
            return Ok(());
        }

        let (tx, rx) = bounded(1);
        let source = Arc::clone(&self.source);
        let owned = reference.to_string();

        thread::spawn(move || {
            let result = source.fetch(&owned);
            // Receiver is gone after a timeout
            let _ = tx.send(result);
        });

        match rx.recv_timeout(timeout) {
            Ok(Ok(texture)) => {
                self.cache.insert(reference.to_string(), texture);
                Ok(())
            }
            Ok(Err(e)) => Err(e),
            Err(RecvTimeoutError::Timeout) => Err(AssetError::Timeout {
                reference: reference.to_string(),
                timeout,
            }),
            Err(RecvTimeoutError::Disconnected) => Err(AssetError::WorkerLost(reference.to_string())),
        }
    }

    //--- Query API --------------------------------------------------------

    pub fn has(&self, reference: &str) -> bool {
        self.cache.contains_key(reference)
    }

    /// Cached texture, without fetching.
    pub fn get(&self, reference: &str) -> Option<&Texture> {
        self.cache.get(reference)
    }

    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
