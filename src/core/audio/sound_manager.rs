//=========================================================================
// Sound Manager
//=========================================================================
//
// Effects, per-scene ambient loops and the background track on top of
// an AudioBackend.
//
// Channel keys:
//   effects  → the sound key itself
//   ambient  → "ambient:<scene key>"
//   music    → "music"
//
// Fade-outs stop their channel once the fade duration has elapsed;
// elapsed time comes from `update(dt)` on the logic thread.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::time::Duration;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::backend::AudioBackend;
use super::AudioError;
use crate::core::catalog::DEFAULT_AMBIENT_VOLUME;
use crate::core::config::MusicConfig;

//=== Constants ===========================================================

const MUSIC_CHANNEL: &str = "music";

fn ambient_channel(key: &str) -> String {
    format!("ambient:{key}")
}

//=== Internal State ======================================================

#[derive(Debug)]
struct PendingStop {
    channel: String,
    remaining: Duration,
}

#[derive(Debug)]
struct BackgroundMusic {
    base_volume: f32,
    muted: bool,
    pending_start: bool,
}

impl BackgroundMusic {
    fn channel_volume(&self, master: f32) -> f32 {
        if self.muted {
            0.0
        } else {
            self.base_volume * master
        }
    }
}

//=== SoundManager ========================================================

pub struct SoundManager {
    backend: Box<dyn AudioBackend>,
    effect_volumes: HashMap<String, f32>,
    ambient_volumes: HashMap<String, f32>,
    current_ambient: Option<String>,
    pending_stops: Vec<PendingStop>,
    music: Option<BackgroundMusic>,
    music_muted: bool,
    master_volume: f32,
}

impl SoundManager {
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        Self {
            backend,
            effect_volumes: HashMap::new(),
            ambient_volumes: HashMap::new(),
            current_ambient: None,
            pending_stops: Vec::new(),
            music: None,
            music_muted: false,
            master_volume: 1.0,
        }
    }

    //=====================================================================
    // Effects
    //=====================================================================

    /// Registers a sound under `key`.
    pub fn load_sound(&mut self, key: &str, src: &str, looping: bool) -> Result<(), AudioError> {
        self.backend.load(key, src, looping)?;
        self.effect_volumes.insert(key.to_string(), 1.0);
        Ok(())
    }

    /// Plays a sound, loading it on demand with `key` as its source.
    ///
    /// `volume` overrides the sound's base volume; either way it is
    /// scaled by the master volume.
    pub fn play_sound(&mut self, key: &str, volume: Option<f32>) {
        if !self.backend.is_loaded(key) {
            if let Err(e) = self.load_sound(key, key, false) {
                warn!("Could not load sound `{}`: {}", key, e);
                return;
            }
        }

        let base = self.effect_volumes.get(key).copied().unwrap_or(1.0);
        let volume = volume.unwrap_or(base) * self.master_volume;
        self.backend.set_volume(key, volume);

        if let Err(e) = self.backend.play(key) {
            warn!("Could not play sound `{}`: {}", key, e);
        }
    }

    //=====================================================================
    // Ambient
    //=====================================================================

    /// Starts the looping ambient for a scene.
    ///
    /// Only one ambient plays at a time: the previous one is stopped at
    /// once, even if it is still fading out.
    pub fn play_ambient(&mut self, key: &str, src: &str, volume: Option<f32>) {
        if let Some(previous) = self.current_ambient.take() {
            if previous != key {
                self.stop_ambient(&previous);
            }
        }

        let channel = ambient_channel(key);
        if !self.backend.is_loaded(&channel) {
            if let Err(e) = self.backend.load(&channel, src, true) {
                warn!("Could not load ambient `{}` ({}): {}", key, src, e);
                return;
            }
        }
        self.cancel_pending_stop(&channel);

        let volume = volume.unwrap_or(DEFAULT_AMBIENT_VOLUME);
        self.ambient_volumes.insert(key.to_string(), volume);
        self.backend.set_volume(&channel, volume * self.master_volume);

        if !self.backend.is_playing(&channel) {
            if let Err(e) = self.backend.play(&channel) {
                warn!("Could not play ambient `{}`: {}", key, e);
            }
        }

        debug!("Ambient `{}` playing at {:.2}", key, volume);
        self.current_ambient = Some(key.to_string());
    }

    pub fn stop_ambient(&mut self, key: &str) {
        let channel = ambient_channel(key);
        self.backend.stop(&channel);
        self.cancel_pending_stop(&channel);
        if self.current_ambient.as_deref() == Some(key) {
            self.current_ambient = None;
        }
    }

    /// Restarts an ambient from silence up to its base volume.
    pub fn fade_in_ambient(&mut self, key: &str, duration: Duration) {
        let channel = ambient_channel(key);
        if !self.backend.is_loaded(&channel) {
            return;
        }
        self.cancel_pending_stop(&channel);

        let target = self.ambient_volumes.get(key).copied().unwrap_or(DEFAULT_AMBIENT_VOLUME)
            * self.master_volume;
        self.backend.set_volume(&channel, 0.0);
        if let Err(e) = self.backend.play(&channel) {
            warn!("Could not play ambient `{}`: {}", key, e);
            return;
        }
        self.backend.fade(&channel, 0.0, target, duration);
    }

    /// Fades an ambient to silence and stops it once `duration` elapsed.
    pub fn fade_out_ambient(&mut self, key: &str, duration: Duration) {
        let channel = ambient_channel(key);
        if !self.backend.is_loaded(&channel) {
            return;
        }

        if duration.is_zero() {
            self.stop_ambient(key);
            return;
        }

        let from = self.backend.volume(&channel).unwrap_or(0.0);
        self.backend.fade(&channel, from, 0.0, duration);

        self.cancel_pending_stop(&channel);
        self.pending_stops.push(PendingStop {
            channel,
            remaining: duration,
        });
    }

    /// Returns `true` while an ambient is fading towards its stop.
    pub fn is_fading_out(&self, key: &str) -> bool {
        let channel = ambient_channel(key);
        self.pending_stops.iter().any(|p| p.channel == channel)
    }

    pub fn is_ambient_playing(&self, key: &str) -> bool {
        self.backend.is_playing(&ambient_channel(key))
    }

    pub fn current_ambient(&self) -> Option<&str> {
        self.current_ambient.as_deref()
    }

    fn cancel_pending_stop(&mut self, channel: &str) {
        self.pending_stops.retain(|p| p.channel != channel);
    }

    //=====================================================================
    // Background Music
    //=====================================================================

    /// Starts the background track, replacing any previous one.
    ///
    /// A refused start leaves the track pending; it is retried by
    /// [`retry_pending_music`](Self::retry_pending_music) on the first
    /// user press.
    pub fn play_background_music(&mut self, src: &str, volume: Option<f32>) -> Result<(), AudioError> {
        self.stop_background_music();

        self.backend.load(MUSIC_CHANNEL, src, true)?;
        let base_volume = volume.unwrap_or(MusicConfig::DEFAULT_VOLUME);
        let mut music = BackgroundMusic {
            base_volume,
            muted: self.music_muted,
            pending_start: false,
        };
        self.backend.set_volume(MUSIC_CHANNEL, music.channel_volume(self.master_volume));

        match self.backend.play(MUSIC_CHANNEL) {
            Ok(()) => info!("Background music started: {}", src),
            Err(e) => {
                warn!("Background music refused ({}); retrying on first interaction", e);
                music.pending_start = true;
            }
        }

        self.music = Some(music);
        Ok(())
    }

    /// Attempts the deferred music start once.
    pub fn retry_pending_music(&mut self) {
        let Some(music) = self.music.as_mut() else {
            return;
        };
        if !music.pending_start {
            return;
        }
        music.pending_start = false;

        match self.backend.play(MUSIC_CHANNEL) {
            Ok(()) => info!("Background music started after user interaction"),
            Err(e) => warn!("Background music still refused: {}", e),
        }
    }

    pub fn has_pending_music(&self) -> bool {
        self.music.as_ref().is_some_and(|m| m.pending_start)
    }

    pub fn stop_background_music(&mut self) {
        if self.music.take().is_some() {
            self.backend.stop(MUSIC_CHANNEL);
        }
    }

    /// Sets the track volume (before master scaling) without changing its
    /// base volume.
    pub fn set_background_music_volume(&mut self, volume: f32) {
        if let Some(music) = &self.music {
            if !music.muted {
                self.backend.set_volume(MUSIC_CHANNEL, volume * self.master_volume);
            }
        }
    }

    pub fn is_music_playing(&self) -> bool {
        self.music.is_some() && self.backend.is_playing(MUSIC_CHANNEL)
    }

    /// Current channel volume of the background track.
    pub fn music_channel_volume(&self) -> Option<f32> {
        self.music.as_ref().and(self.backend.volume(MUSIC_CHANNEL))
    }

    //--- Mute -------------------------------------------------------------

    pub fn set_music_muted(&mut self, muted: bool) {
        self.music_muted = muted;
        if let Some(music) = self.music.as_mut() {
            music.muted = muted;
            let volume = music.channel_volume(self.master_volume);
            self.backend.set_volume(MUSIC_CHANNEL, volume);
        }
        debug!("Background music {}", if muted { "muted" } else { "unmuted" });
    }

    /// Flips the mute flag and returns the new state.
    pub fn toggle_music_mute(&mut self) -> bool {
        let muted = !self.music_muted;
        self.set_music_muted(muted);
        muted
    }

    pub fn is_music_muted(&self) -> bool {
        self.music_muted
    }

    //=====================================================================
    // Master Volume & Update
    //=====================================================================

    /// Clamps to `[0, 1]` and re-applies the background track volume.
    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = volume.clamp(0.0, 1.0);
        self.backend.set_master_volume(self.master_volume);
        if let Some(music) = &self.music {
            let volume = music.channel_volume(self.master_volume);
            self.backend.set_volume(MUSIC_CHANNEL, volume);
        }
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    /// Advances backend fades and pending fade-out stops.
    pub fn update(&mut self, dt: Duration) {
        self.backend.update(dt);
        if self.pending_stops.is_empty() {
            return;
        }

        let mut finished = Vec::new();
        self.pending_stops.retain_mut(|pending| {
            pending.remaining = pending.remaining.saturating_sub(dt);
            if pending.remaining.is_zero() {
                finished.push(pending.channel.clone());
                false
            } else {
                true
            }
        });

        for channel in finished {
            self.backend.stop(&channel);
            if let Some(key) = channel.strip_prefix("ambient:") {
                debug!("Ambient `{}` faded out", key);
                if self.current_ambient.as_deref() == Some(key) {
                    self.current_ambient = None;
                }
            }
        }
    }

    //--- Backend Access ---------------------------------------------------

    pub fn backend(&self) -> &dyn AudioBackend {
        self.backend.as_ref()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
