use std::path::PathBuf;

use super::types::{AudioError, PlaybackId};

/// Something that can play one ordered list of files at a time.
///
/// `start` is fire-and-forget: it returns as soon as the list is queued.
pub trait AudioBackend {
    /// Stop whatever is playing. Safe to call when idle.
    fn stop_all(&mut self);
    /// Start playing `tracks` in order, replacing any current list.
    fn start(&mut self, tracks: Vec<PathBuf>) -> Result<PlaybackId, AudioError>;
    /// Whether the list started as `id` is still playing.
    fn is_playing(&self, id: PlaybackId) -> bool;
}
