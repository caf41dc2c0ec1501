//=========================================================================
// Rodio Backend
//=========================================================================
//
// Plays channels through the default output device.
//
// Architecture:
//   audio-output thread          logic thread
//   ┌──────────────────┐        ┌────────────────────────────┐
//   │ OutputStream     │ handle │ RodioBackend               │
//   │ (kept alive)     │ ─────> │  channels: key → Channel   │
//   │ waits for close  │        │   └─ Sink (one per key)    │
//   └──────────────────┘        │  fades: stepped in update  │
//                               └────────────────────────────┘
//
// The output stream is not Send, so it lives on its own thread and only
// the handle crosses over. Dropping the backend releases that thread.
//
// Volumes arrive already scaled by the master volume.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, Sender};
use log::{debug, info, trace};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

//=== Internal Dependencies ===============================================

use super::backend::AudioBackend;
use super::AudioError;

//=== Fade ================================================================

/// Linear volume ramp advanced by `step`.
#[derive(Debug, Clone, Copy)]
struct Fade {
    from: f32,
    to: f32,
    duration: Duration,
    elapsed: Duration,
}

impl Fade {
    fn new(from: f32, to: f32, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
        }
    }

    /// Advances by `dt` and returns the volume at the new position.
    fn step(&mut self, dt: Duration) -> f32 {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        if self.duration.is_zero() {
            return self.to;
        }
        let t = self.elapsed.as_secs_f32() / self.duration.as_secs_f32();
        self.from + (self.to - self.from) * t
    }

    fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

//=== Channel =============================================================

struct Channel {
    path: PathBuf,
    looping: bool,
    volume: f32,
    sink: Option<Sink>,
    fade: Option<Fade>,
}

impl Channel {
    fn is_playing(&self) -> bool {
        self.sink.as_ref().is_some_and(|s| !s.empty() && !s.is_paused())
    }

    fn apply_volume(&self) {
        if let Some(sink) = &self.sink {
            sink.set_volume(self.volume);
        }
    }
}

//=== RodioBackend ========================================================

pub struct RodioBackend {
    root: PathBuf,
    stream_handle: OutputStreamHandle,
    channels: HashMap<String, Channel>,
    master_volume: f32,
    /// Dropping this ends the audio-output thread.
    _shutdown: Sender<()>,
}

impl RodioBackend {
    /// Opens the default output device. Sources resolve below `root`.
    ///
    /// # Errors
    ///
    /// Returns [`AudioError::Device`] when no output device can be opened.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, AudioError> {
        let (stream_handle, shutdown) = open_output()?;
        info!("Rodio audio backend initialized");
        Ok(Self {
            root: root.into(),
            stream_handle,
            channels: HashMap::new(),
            master_volume: 1.0,
            _shutdown: shutdown,
        })
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    /// Filesystem path for a sound reference.
    pub fn resolve(&self, src: &str) -> PathBuf {
        resolve_source(&self.root, src)
    }

    fn start(&self, channel: &Channel) -> Result<Sink, AudioError> {
        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| AudioError::Backend(format!("failed to create sink: {e}")))?;
        let source = decode(&channel.path)?;

        if channel.looping {
            sink.append(source.repeat_infinite());
        } else {
            sink.append(source);
        }
        sink.set_volume(channel.volume);
        Ok(sink)
    }
}

impl AudioBackend for RodioBackend {
    fn load(&mut self, key: &str, src: &str, looping: bool) -> Result<(), AudioError> {
        let path = self.resolve(src);
        if !path.is_file() {
            return Err(AudioError::Decode {
                src: src.to_string(),
                message: format!("{} not found", path.display()),
            });
        }

        if let Some(old) = self.channels.remove(key) {
            if let Some(sink) = old.sink {
                sink.stop();
            }
        }
        trace!("Loaded channel {} from {}", key, path.display());
        self.channels.insert(
            key.to_string(),
            Channel {
                path,
                looping,
                volume: 1.0,
                sink: None,
                fade: None,
            },
        );
        Ok(())
    }

    fn is_loaded(&self, key: &str) -> bool {
        self.channels.contains_key(key)
    }

    /// Restarts the channel from the beginning on a fresh sink.
    fn play(&mut self, key: &str) -> Result<(), AudioError> {
        let channel = self
            .channels
            .get(key)
            .ok_or_else(|| AudioError::UnknownSound(key.to_string()))?;
        let sink = self.start(channel)?;

        if let Some(channel) = self.channels.get_mut(key) {
            if let Some(previous) = channel.sink.replace(sink) {
                previous.stop();
            }
        }
        Ok(())
    }

    fn stop(&mut self, key: &str) {
        if let Some(channel) = self.channels.get_mut(key) {
            channel.fade = None;
            if let Some(sink) = channel.sink.take() {
                sink.stop();
            }
        }
    }

    fn fade(&mut self, key: &str, from: f32, to: f32, duration: Duration) {
        if let Some(channel) = self.channels.get_mut(key) {
            channel.volume = from;
            channel.apply_volume();
            channel.fade = Some(Fade::new(from, to, duration));
        }
    }

    fn set_volume(&mut self, key: &str, volume: f32) {
        if let Some(channel) = self.channels.get_mut(key) {
            channel.fade = None;
            channel.volume = volume;
            channel.apply_volume();
        }
    }

    fn volume(&self, key: &str) -> Option<f32> {
        self.channels.get(key).map(|c| c.volume)
    }

    fn is_playing(&self, key: &str) -> bool {
        self.channels.get(key).is_some_and(Channel::is_playing)
    }

    fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = volume;
    }

    /// Steps running fades and drops finished one-shot sinks.
    fn update(&mut self, dt: Duration) {
        for channel in self.channels.values_mut() {
            if let Some(fade) = channel.fade.as_mut() {
                channel.volume = fade.step(dt);
                if fade.is_done() {
                    channel.fade = None;
                }
                channel.apply_volume();
            }
            if channel.sink.as_ref().is_some_and(Sink::empty) {
                channel.sink = None;
            }
        }
    }
}

//=== Helpers =============================================================

fn resolve_source(root: &Path, src: &str) -> PathBuf {
    root.join(src.trim_start_matches('/'))
}

fn decode(path: &Path) -> Result<Decoder<BufReader<File>>, AudioError> {
    let src = path.display().to_string();
    let file = File::open(path).map_err(|e| AudioError::Decode {
        src: src.clone(),
        message: e.to_string(),
    })?;
    Decoder::new(BufReader::new(file)).map_err(|e| AudioError::Decode {
        src,
        message: e.to_string(),
    })
}

/// Spawns the thread that owns the output stream and returns its handle.
fn open_output() -> Result<(OutputStreamHandle, Sender<()>), AudioError> {
    let (ready_tx, ready_rx) = bounded::<Result<OutputStreamHandle, String>>(1);
    let (shutdown_tx, shutdown_rx) = bounded::<()>(0);

    thread::Builder::new()
        .name("audio-output".to_string())
        .spawn(move || match OutputStream::try_default() {
            Ok((stream, handle)) => {
                if ready_tx.send(Ok(handle)).is_err() {
                    return;
                }
                // Returns once the backend drops its sender
                let _ = shutdown_rx.recv();
                drop(stream);
                debug!("Audio output closed");
            }
            Err(e) => {
                let _ = ready_tx.send(Err(e.to_string()));
            }
        })
        .map_err(|e| AudioError::Device(e.to_string()))?;

    match ready_rx.recv() {
        Ok(Ok(handle)) => Ok((handle, shutdown_tx)),
        Ok(Err(message)) => Err(AudioError::Device(message)),
        Err(_) => Err(AudioError::Device("audio output thread exited".to_string())),
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
