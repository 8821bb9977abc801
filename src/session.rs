//! Tag debounce and playback-mode selection.
//!
//! The selector is a pure function over an explicit [`PlaybackSession`]
//! value: the caller owns the session and threads it through every scan.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::config::{Settings, TagMapping, TrackOrder};

/// What the selector remembers between scans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackSession {
    /// Identifier of the previous accepted scan.
    pub last_id: Option<String>,
    /// Position in the ordered/shuffled cycle: 1 = ordered, 2 = shuffled.
    pub count: u32,
    /// When `last_id` was scanned.
    pub timestamp: Option<Instant>,
}

impl PlaybackSession {
    pub fn is_empty(&self) -> bool {
        self.last_id.is_none()
    }

    /// Forget the previous scan.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// The selector's decision for one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub tag: String,
    pub folder: PathBuf,
    pub shuffle: bool,
    pub order: TrackOrder,
    /// `false` when the tag had no entry and the all-songs folder was chosen.
    pub mapped: bool,
}

pub struct ModeSelector {
    tags: TagMapping,
    audio_folder: PathBuf,
    all_songs_folder: PathBuf,
    default_order: TrackOrder,
    rescan_window: Option<Duration>,
}

impl ModeSelector {
    pub fn new(settings: &Settings) -> Self {
        let g = &settings.global_config;
        Self {
            tags: settings.tags.clone(),
            audio_folder: g.audio_folder.clone(),
            all_songs_folder: g.all_songs_folder(),
            default_order: g.playback.track_order,
            rescan_window: g.playback.rescan_window(),
        }
    }

    pub fn rescan_window(&self) -> Option<Duration> {
        self.rescan_window
    }

    /// Decide what `scanned` should play and return the updated session.
    ///
    /// An empty identifier means "no tag present" and leaves the session
    /// untouched. A repeat of `last_id` within the rescan window continues the
    /// cycle; anything else starts it over at 1.
    pub fn select_mode(
        &self,
        scanned: Option<&str>,
        session: PlaybackSession,
        now: Instant,
    ) -> (Option<Selection>, PlaybackSession) {
        let Some(id) = scanned.map(str::trim).filter(|s| !s.is_empty()) else {
            return (None, session);
        };

        let continuation =
            session.last_id.as_deref() == Some(id) && self.within_window(session.timestamp, now);
        let count = if continuation { session.count % 2 + 1 } else { 1 };
        let shuffle = count == 2;

        let (folder, order, mapped) = match self.tags.get(id) {
            Some(entry) => (
                self.audio_folder.join(&entry.folder),
                entry.order.unwrap_or(self.default_order),
                true,
            ),
            None => (self.all_songs_folder.clone(), self.default_order, false),
        };

        let selection = Selection {
            tag: id.to_string(),
            folder,
            shuffle,
            order,
            mapped,
        };
        let session = PlaybackSession {
            last_id: Some(id.to_string()),
            count,
            timestamp: Some(now),
        };
        (Some(selection), session)
    }

    fn within_window(&self, last: Option<Instant>, now: Instant) -> bool {
        match (self.rescan_window, last) {
            (None, _) => true,
            (Some(window), Some(ts)) => now.saturating_duration_since(ts) <= window,
            (Some(_), None) => false,
        }
    }
}
