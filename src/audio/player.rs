use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use super::backend::AudioBackend;
use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, AudioError, PlaybackHandle, PlaybackId, PlaybackInfo};

/// In-process player: one audio thread fed over a command channel.
pub struct RodioPlayer {
    tx: Sender<AudioCmd>,
    playback: PlaybackHandle,
    next_id: u64,
    join: Option<JoinHandle<()>>,
}

impl RodioPlayer {
    /// Open the default output device and start the audio thread.
    pub fn new() -> Result<Self, AudioError> {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (ready_tx, ready_rx) = mpsc::sync_channel(1);
        let playback: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));

        let join = spawn_audio_thread(rx, playback.clone(), ready_tx);
        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                tx,
                playback,
                next_id: 1,
                join: Some(join),
            }),
            Ok(Err(e)) => {
                let _ = join.join();
                Err(e)
            }
            Err(_) => Err(AudioError::Disconnected),
        }
    }
}

impl AudioBackend for RodioPlayer {
    fn stop_all(&mut self) {
        if let Ok(mut info) = self.playback.lock() {
            info.stop();
        }
        let _ = self.tx.send(AudioCmd::Stop);
    }

    fn start(&mut self, tracks: Vec<PathBuf>) -> Result<PlaybackId, AudioError> {
        if tracks.is_empty() {
            return Err(AudioError::EmptyList);
        }
        let id = PlaybackId(self.next_id);
        self.next_id += 1;

        // Publish before the thread picks it up so `is_playing` holds from now on.
        if let Ok(mut info) = self.playback.lock() {
            info.begin(id);
        }
        if self.tx.send(AudioCmd::Start { id, tracks }).is_err() {
            if let Ok(mut info) = self.playback.lock() {
                info.finish(id);
            }
            return Err(AudioError::Disconnected);
        }
        Ok(id)
    }

    fn is_playing(&self, id: PlaybackId) -> bool {
        self.playback
            .lock()
            .map(|info| info.is_playing(id))
            .unwrap_or(false)
    }
}

impl Drop for RodioPlayer {
    fn drop(&mut self) {
        let _ = self.tx.send(AudioCmd::Quit);
        if let Some(h) = self.join.take() {
            let _ = h.join();
        }
    }
}
