//! Audio playback: the backend seam the dispatcher drives, and the rodio
//! player that implements it.

mod backend;
mod player;
mod sink;
mod thread;
mod types;

pub use backend::AudioBackend;
pub use player::RodioPlayer;
pub use types::{AudioError, PlaybackId};
