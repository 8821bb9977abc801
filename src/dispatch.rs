//! Playback dispatcher: turn a folder and a shuffle flag into a started list.

use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use tracing::{error, info, warn};

use crate::audio::{AudioBackend, PlaybackId};
use crate::config::{LibrarySettings, TrackOrder};
use crate::library::{LibraryError, Track, list_audio_files, order_tracks};
use crate::session::Selection;

/// What to play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayRequest {
    pub folder: PathBuf,
    pub shuffle: bool,
    pub order: TrackOrder,
    /// Overrides `library.recursive` for this request.
    pub recursive: Option<bool>,
}

impl From<&Selection> for PlayRequest {
    fn from(sel: &Selection) -> Self {
        Self {
            folder: sel.folder.clone(),
            shuffle: sel.shuffle,
            order: sel.order,
            recursive: None,
        }
    }
}

/// Called when a list plays out on its own; may name the next thing to play.
pub type OnExhausted = Box<dyn FnMut() -> Option<PlayRequest>>;

/// The end-of-list fallback that plays everything under `folder`, shuffled.
pub fn shuffle_all(folder: PathBuf, order: TrackOrder) -> OnExhausted {
    Box::new(move || {
        Some(PlayRequest {
            folder: folder.clone(),
            shuffle: true,
            order,
            recursive: Some(true),
        })
    })
}

struct Active {
    id: PlaybackId,
    folder: PathBuf,
    /// Started by the end-of-list callback rather than by a scan.
    fallback: bool,
}

/// Owns the audio backend and the single active list.
pub struct Dispatcher<B> {
    backend: B,
    library: LibrarySettings,
    rng: Box<dyn RngCore>,
    active: Option<Active>,
    on_exhausted: Option<OnExhausted>,
}

impl<B: AudioBackend> Dispatcher<B> {
    pub fn new(backend: B, library: LibrarySettings) -> Self {
        Self {
            backend,
            library,
            rng: Box::new(StdRng::from_entropy()),
            active: None,
            on_exhausted: None,
        }
    }

    pub fn with_rng(mut self, rng: impl RngCore + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn with_on_exhausted(mut self, callback: OnExhausted) -> Self {
        self.on_exhausted = Some(callback);
        self
    }

    #[cfg(test)]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[cfg(test)]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Whether a list started by a scan is still playing. Fallback lists
    /// and lists that already played out do not count.
    pub fn is_playing_requested(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|a| !a.fallback && self.backend.is_playing(a.id))
    }

    /// List, order and (optionally) shuffle the tracks `req` names.
    pub fn build_track_list(&mut self, req: &PlayRequest) -> Result<Vec<Track>, LibraryError> {
        let library = match req.recursive {
            Some(recursive) => LibrarySettings {
                recursive,
                ..self.library.clone()
            },
            None => self.library.clone(),
        };

        let mut tracks = list_audio_files(&req.folder, &library)?;
        order_tracks(&mut tracks, req.order);
        if req.shuffle {
            tracks.shuffle(&mut self.rng);
        }
        Ok(tracks)
    }

    /// Stop the current list, then start the one `req` names.
    ///
    /// Returns whether playback started. An empty or unreadable folder leaves
    /// the player idle.
    pub fn play(&mut self, req: &PlayRequest) -> bool {
        self.start(req, false)
    }

    fn start(&mut self, req: &PlayRequest, fallback: bool) -> bool {
        self.backend.stop_all();
        self.active = None;

        let folder = req.folder.display();
        let tracks = match self.build_track_list(req) {
            Ok(t) => t,
            Err(err) => {
                warn!(folder = %folder, error = %err, "cannot list folder, staying idle");
                return false;
            }
        };
        if tracks.is_empty() {
            info!(folder = %folder, "no audio files in folder, staying idle");
            return false;
        }

        let count = tracks.len();
        let paths = tracks.into_iter().map(|t| t.path).collect();
        match self.backend.start(paths) {
            Ok(id) => {
                info!(folder = %folder, tracks = count, shuffle = req.shuffle, list = %id, "playback started");
                self.active = Some(Active {
                    id,
                    folder: req.folder.clone(),
                    fallback,
                });
                true
            }
            Err(err) => {
                error!(folder = %folder, error = %err, "failed to start playback");
                false
            }
        }
    }

    /// Stop playback without firing the end-of-list callback.
    pub fn stop(&mut self) {
        self.backend.stop_all();
        self.active = None;
    }

    /// Notice a list that played out on its own and run the end-of-list
    /// callback. Returns whether the active list ended on this call.
    pub fn poll_finished(&mut self) -> bool {
        let Some(active) = &self.active else {
            return false;
        };
        if self.backend.is_playing(active.id) {
            return false;
        }

        info!(folder = %active.folder.display(), list = %active.id, "list finished");
        self.active = None;
        if let Some(next) = self.on_exhausted.as_mut().and_then(|cb| cb()) {
            self.start(&next, true);
        }
        true
    }
}
