//! Fakes for the hardware and audio seams.

use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::audio::{AudioBackend, AudioError, PlaybackId};
use crate::gpio::{GpioError, Switch};
use crate::scanner::{ScanError, TagScanner};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioCall {
    StopAll,
    Start(Vec<PathBuf>),
}

/// Records every call; lists keep "playing" until `finish_all`.
#[derive(Debug, Default)]
pub struct RecordingAudio {
    pub calls: Vec<AudioCall>,
    pub fail_start: bool,
    playing: HashSet<PlaybackId>,
    next_id: u64,
}

impl RecordingAudio {
    pub fn started(&self) -> Vec<&Vec<PathBuf>> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                AudioCall::Start(t) => Some(t),
                AudioCall::StopAll => None,
            })
            .collect()
    }

    pub fn last_started(&self) -> Option<&Vec<PathBuf>> {
        self.started().last().copied()
    }

    /// Pretend every list played out.
    pub fn finish_all(&mut self) {
        self.playing.clear();
    }
}

impl AudioBackend for RecordingAudio {
    fn stop_all(&mut self) {
        self.calls.push(AudioCall::StopAll);
        self.playing.clear();
    }

    fn start(&mut self, tracks: Vec<PathBuf>) -> Result<PlaybackId, AudioError> {
        self.calls.push(AudioCall::Start(tracks));
        if self.fail_start {
            return Err(AudioError::Disconnected);
        }
        self.next_id += 1;
        let id = PlaybackId(self.next_id);
        self.playing.insert(id);
        Ok(id)
    }

    fn is_playing(&self, id: PlaybackId) -> bool {
        self.playing.contains(&id)
    }
}

/// Replays a fixed script of poll results, then reports the input closed.
#[derive(Default)]
pub struct ScriptedScanner {
    script: VecDeque<Result<Option<String>, ScanError>>,
}

impl ScriptedScanner {
    pub fn new(script: impl IntoIterator<Item = Result<Option<String>, ScanError>>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    pub fn tags(polls: &[Option<&str>]) -> Self {
        Self::new(polls.iter().map(|p| Ok(p.map(str::to_string))))
    }
}

impl TagScanner for ScriptedScanner {
    fn poll(&mut self, _timeout: Duration) -> Result<Option<String>, ScanError> {
        self.script.pop_front().unwrap_or(Err(ScanError::Closed))
    }
}

/// A switch the test can flip while something else holds it.
#[derive(Clone, Default)]
pub struct SharedSwitch(pub Arc<AtomicBool>);

impl SharedSwitch {
    pub fn new(on: bool) -> Self {
        Self(Arc::new(AtomicBool::new(on)))
    }

    pub fn set(&self, on: bool) {
        self.0.store(on, Ordering::SeqCst);
    }
}

impl Switch for SharedSwitch {
    fn is_on(&self) -> Result<bool, GpioError> {
        Ok(self.0.load(Ordering::SeqCst))
    }
}
