use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, SyncSender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, info, warn};

use crate::library::describe;

use super::sink::create_sink;
use super::types::{AudioCmd, AudioError, PlaybackHandle, PlaybackId};

const TICK: Duration = Duration::from_millis(200);

/// The list the audio thread is working through.
struct ActiveList {
    id: PlaybackId,
    tracks: Vec<PathBuf>,
    /// Index of the next track to open.
    next: usize,
    sink: Option<Sink>,
}

impl ActiveList {
    fn new(id: PlaybackId, tracks: Vec<PathBuf>) -> Self {
        Self {
            id,
            tracks,
            next: 0,
            sink: None,
        }
    }

    fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
    }

    /// Start the next track that opens. Returns `false` once the list is
    /// exhausted.
    fn advance(&mut self, stream: &OutputStream) -> bool {
        self.stop();
        while self.next < self.tracks.len() {
            let path = &self.tracks[self.next];
            self.next += 1;

            match create_sink(stream, path) {
                Ok(sink) => {
                    sink.play();
                    self.sink = Some(sink);
                    info!(list = %self.id, track = %describe(path), "now playing");
                    return true;
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unplayable track");
                }
            }
        }
        false
    }

    fn is_idle(&self) -> bool {
        self.sink.as_ref().is_none_or(|s| s.empty())
    }
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    playback_info: PlaybackHandle,
    ready: SyncSender<Result<(), AudioError>>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(s) => s,
            Err(e) => {
                let _ = ready.send(Err(AudioError::NoDevice(e.to_string())));
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped.
        stream.log_on_drop(false);
        let _ = ready.send(Ok(()));

        let mut current: Option<ActiveList> = None;

        loop {
            match rx.recv_timeout(TICK) {
                Ok(AudioCmd::Start { id, tracks }) => {
                    if let Some(mut old) = current.take() {
                        old.stop();
                    }
                    debug!(list = %id, tracks = tracks.len(), "starting list");
                    let mut list = ActiveList::new(id, tracks);
                    if list.advance(&stream) {
                        current = Some(list);
                    } else {
                        warn!(list = %id, "no track in the list could be played");
                        finish(&playback_info, id);
                    }
                }
                Ok(AudioCmd::Stop) => {
                    if let Some(mut old) = current.take() {
                        old.stop();
                    }
                }
                Ok(AudioCmd::Quit) => {
                    if let Some(mut old) = current.take() {
                        old.stop();
                    }
                    break;
                }
                Err(RecvTimeoutError::Timeout) => {
                    // Periodic check for auto-advance.
                    let Some(list) = current.as_mut() else {
                        continue;
                    };
                    if list.is_idle() && !list.advance(&stream) {
                        debug!(list = %list.id, "list played out");
                        finish(&playback_info, list.id);
                        current = None;
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}

fn finish(playback_info: &PlaybackHandle, id: PlaybackId) {
    if let Ok(mut info) = playback_info.lock() {
        info.finish(id);
    }
}
