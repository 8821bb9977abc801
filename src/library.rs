//! Filesystem side of the jukebox: find the audio files of a folder and put
//! them in play order.

mod display;
mod model;
mod order;
mod scan;

pub use display::describe;
pub use model::Track;
pub use order::order_tracks;
pub use scan::{LibraryError, list_audio_files};
