//! Audio-related small types and handles.

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Identifies one started list.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PlaybackId(pub u64);

impl fmt::Display for PlaybackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug)]
pub(super) enum AudioCmd {
    /// Replace the current list with `tracks` and start at the first one.
    Start { id: PlaybackId, tracks: Vec<PathBuf> },
    /// Stop playback immediately.
    Stop,
    /// Stop and leave the audio thread.
    Quit,
}

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("no audio output device: {0}")]
    NoDevice(String),
    #[error("audio thread is not running")]
    Disconnected,
    #[error("nothing to play")]
    EmptyList,
}

/// Playback state shared between the caller and the audio thread.
///
/// The caller owns `id`: it is set on start and never rewritten by the
/// thread, which only reports the end of the list it was asked to play.
#[derive(Debug, Clone, Default)]
pub struct PlaybackInfo {
    /// The most recently started list.
    pub id: Option<PlaybackId>,
    /// Whether that list is still playing.
    pub playing: bool,
}

impl PlaybackInfo {
    pub fn begin(&mut self, id: PlaybackId) {
        self.id = Some(id);
        self.playing = true;
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    /// Mark list `id` as played out; ignored once a newer list has started.
    pub fn finish(&mut self, id: PlaybackId) {
        if self.id == Some(id) {
            self.playing = false;
        }
    }

    pub fn is_playing(&self, id: PlaybackId) -> bool {
        self.playing && self.id == Some(id)
    }
}

pub(super) type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
