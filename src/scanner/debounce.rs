use std::time::{Duration, Instant};

use super::normalize_tag_text;

/// Turns raw poll results into scan events.
///
/// A tag resting on the reader shows up on every poll; only the moment it
/// appears (or is swapped for another) counts. Edges within `cooldown` of
/// the last accepted one are held back until the cooldown expires.
#[derive(Debug)]
pub struct ScanDebounce {
    cooldown: Duration,
    present: Option<String>,
    last_accept: Option<Instant>,
}

impl ScanDebounce {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            present: None,
            last_accept: None,
        }
    }

    pub fn observe(&mut self, polled: Option<&str>, now: Instant) -> Option<String> {
        let Some(id) = polled.and_then(normalize_tag_text) else {
            self.present = None;
            return None;
        };
        if self.present.as_deref() == Some(id.as_str()) {
            return None;
        }

        // A suppressed edge stays pending: the held tag fires once the
        // cooldown runs out.
        if let Some(t) = self.last_accept {
            if now.saturating_duration_since(t) < self.cooldown {
                return None;
            }
        }
        self.present = Some(id.clone());
        self.last_accept = Some(now);
        Some(id)
    }

    /// Forget the tag in range, e.g. after scanning was disabled.
    pub fn clear(&mut self) {
        self.present = None;
    }
}
