//=========================================================================
// Audio Backend
//=========================================================================
//
// Seam between the sound manager and whatever plays samples.
//
// Channels are addressed by string key. A backend may refuse playback
// (for example under an autoplay policy); the manager decides what to do
// about it.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::time::Duration;

use log::trace;

//=== Internal Dependencies ===============================================

use super::AudioError;

//=== AudioBackend ========================================================

pub trait AudioBackend: Send {
    /// Prepares a channel for `src`. Reloading a key replaces it.
    fn load(&mut self, key: &str, src: &str, looping: bool) -> Result<(), AudioError>;

    fn is_loaded(&self, key: &str) -> bool;

    fn play(&mut self, key: &str) -> Result<(), AudioError>;

    fn stop(&mut self, key: &str);

    /// Ramps the channel volume from `from` to `to` over `duration`.
    fn fade(&mut self, key: &str, from: f32, to: f32, duration: Duration);

    fn set_volume(&mut self, key: &str, volume: f32);

    fn volume(&self, key: &str) -> Option<f32>;

    fn is_playing(&self, key: &str) -> bool;

    fn set_master_volume(&mut self, volume: f32);

    /// Advances time-based work such as fades.
    fn update(&mut self, _dt: Duration) {}
}

//=== SilentAudio =========================================================

#[derive(Debug, Clone)]
struct Channel {
    src: String,
    looping: bool,
    volume: f32,
    playing: bool,
    plays: usize,
}

/// Backend that tracks channel state without producing sound.
///
/// Used when no audio device is wanted and by tests. Playback can be
/// refused to mimic a blocked autoplay.
#[derive(Debug)]
pub struct SilentAudio {
    channels: HashMap<String, Channel>,
    master_volume: f32,
    refuse_playback: bool,
}

impl SilentAudio {
    pub fn new() -> Self {
        Self {
            channels: HashMap::new(),
            master_volume: 1.0,
            refuse_playback: false,
        }
    }

    /// Every `play` call fails until [`allow_playback`](Self::allow_playback).
    pub fn with_playback_refused(mut self) -> Self {
        self.refuse_playback = true;
        self
    }

    pub fn allow_playback(&mut self) {
        self.refuse_playback = false;
    }

    /// Number of successful `play` calls on a channel.
    pub fn play_count(&self, key: &str) -> usize {
        self.channels.get(key).map_or(0, |c| c.plays)
    }

    pub fn source(&self, key: &str) -> Option<&str> {
        self.channels.get(key).map(|c| c.src.as_str())
    }

    pub fn is_looping(&self, key: &str) -> bool {
        self.channels.get(key).is_some_and(|c| c.looping)
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }
}

impl Default for SilentAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioBackend for SilentAudio {
    fn load(&mut self, key: &str, src: &str, looping: bool) -> Result<(), AudioError> {
        self.channels.insert(
            key.to_string(),
            Channel {
                src: src.to_string(),
                looping,
                volume: 1.0,
                playing: false,
                plays: 0,
            },
        );
        Ok(())
    }

    fn is_loaded(&self, key: &str) -> bool {
        self.channels.contains_key(key)
    }

    fn play(&mut self, key: &str) -> Result<(), AudioError> {
        if self.refuse_playback {
            return Err(AudioError::Backend(format!("playback of `{key}` refused")));
        }
        let channel = self
            .channels
            .get_mut(key)
            .ok_or_else(|| AudioError::UnknownSound(key.to_string()))?;
        // One-shots end immediately; loops keep running until stopped
        channel.playing = channel.looping;
        channel.plays += 1;
        trace!("play {} (volume {:.2})", key, channel.volume);
        Ok(())
    }

    fn stop(&mut self, key: &str) {
        if let Some(channel) = self.channels.get_mut(key) {
            channel.playing = false;
        }
    }

    fn fade(&mut self, key: &str, _from: f32, to: f32, _duration: Duration) {
        if let Some(channel) = self.channels.get_mut(key) {
            channel.volume = to;
        }
    }

    fn set_volume(&mut self, key: &str, volume: f32) {
        if let Some(channel) = self.channels.get_mut(key) {
            channel.volume = volume;
        }
    }

    fn volume(&self, key: &str) -> Option<f32> {
        self.channels.get(key).map(|c| c.volume)
    }

    fn is_playing(&self, key: &str) -> bool {
        self.channels.get(key).is_some_and(|c| c.playing)
    }

    fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = volume;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
