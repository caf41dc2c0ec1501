//=========================================================================
// Audio System
//=========================================================================
//
// Architecture:
//   SoundManager (effects, ambient, music, fades)
//        ↓
//   Box<dyn AudioBackend>  (RodioBackend, or SilentAudio without a device)
//
// Audio failures are logged and swallowed; nothing here is fatal.
//
//=========================================================================

//=== Module Declarations =================================================

mod backend;
mod rodio_backend;
mod sound_manager;

//=== Public API ==========================================================

pub use backend::{AudioBackend, SilentAudio};
pub use rodio_backend::RodioBackend;
pub use sound_manager::SoundManager;

//=== External Dependencies ===============================================

use thiserror::Error;

//=== AudioError ==========================================================

#[derive(Debug, Clone, Error)]
pub enum AudioError {
    #[error("unknown sound `{0}`")]
    UnknownSound(String),

    #[error("audio backend error: {0}")]
    Backend(String),

    #[error("no audio output: {0}")]
    Device(String),

    #[error("failed to decode `{src}`: {message}")]
    Decode { src: String, message: String },
}
