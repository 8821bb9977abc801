use std::mem;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::audio::AudioBackend;
use crate::config::PlaybackSettings;
use crate::dispatch::{Dispatcher, PlayRequest};
use crate::scanner::ScanEvent;
use crate::session::{ModeSelector, PlaybackSession};

/// Single owner of the session and the dispatcher. Everything that touches
/// either runs on the controller's thread.
pub struct Controller<B> {
    selector: ModeSelector,
    dispatcher: Dispatcher<B>,
    session: PlaybackSession,
    tick: Duration,
    wait_for_end: bool,
}

impl<B: AudioBackend> Controller<B> {
    pub fn new(selector: ModeSelector, dispatcher: Dispatcher<B>, playback: &PlaybackSettings) -> Self {
        Self {
            selector,
            dispatcher,
            session: PlaybackSession::default(),
            tick: playback.tick(),
            wait_for_end: playback.wait_for_end,
        }
    }

    #[cfg(test)]
    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    #[cfg(test)]
    pub fn dispatcher(&self) -> &Dispatcher<B> {
        &self.dispatcher
    }

    #[cfg(test)]
    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher<B> {
        &mut self.dispatcher
    }

    /// React to one scanner event. Returns whether a list was started.
    pub fn handle_event(&mut self, event: ScanEvent, now: Instant) -> bool {
        match event {
            ScanEvent::Tag(id) => self.handle_tag(&id, now),
            ScanEvent::Gated => {
                info!("scanning disabled, stopping playback");
                self.dispatcher.stop();
                if !self.session.is_empty() {
                    debug!("session reset");
                }
                self.session.reset();
                false
            }
        }
    }

    fn handle_tag(&mut self, id: &str, now: Instant) -> bool {
        if self.wait_for_end && self.dispatcher.is_playing_requested() {
            info!(tag = %id, "list still playing, scan ignored");
            return false;
        }

        let session = mem::take(&mut self.session);
        let (selection, session) = self.selector.select_mode(Some(id), session, now);
        self.session = session;
        let Some(selection) = selection else {
            return false;
        };

        if selection.mapped {
            info!(tag = %selection.tag, folder = %selection.folder.display(), shuffle = selection.shuffle, "tag scanned");
        } else {
            info!(tag = %selection.tag, folder = %selection.folder.display(), shuffle = selection.shuffle, "unknown tag, playing all songs");
        }
        self.dispatcher.play(&PlayRequest::from(&selection))
    }

    /// Notice the end of the active list.
    pub fn tick(&mut self) {
        self.dispatcher.poll_finished();
    }

    /// Serve scanner events until the scanner goes away.
    pub fn run(&mut self, rx: &Receiver<ScanEvent>) {
        loop {
            match rx.recv_timeout(self.tick) {
                Ok(event) => {
                    self.handle_event(event, Instant::now());
                }
                Err(RecvTimeoutError::Timeout) => self.tick(),
                Err(RecvTimeoutError::Disconnected) => {
                    info!("scanner closed, shutting down");
                    self.dispatcher.stop();
                    break;
                }
            }
        }
    }
}
