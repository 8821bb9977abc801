//! Opening a file into a ready-to-play `rodio` sink.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use rodio::decoder::DecoderError;
use rodio::{Decoder, OutputStream, Sink};

#[derive(Debug, thiserror::Error)]
pub(super) enum SinkError {
    #[error("cannot open: {0}")]
    Open(#[from] io::Error),
    #[error("cannot decode: {0}")]
    Decode(#[from] DecoderError),
}

/// Create a paused `Sink` on `stream` holding the decoded file at `path`.
pub(super) fn create_sink(stream: &OutputStream, path: &Path) -> Result<Sink, SinkError> {
    let file = File::open(path)?;
    let source = Decoder::new(BufReader::new(file))?;

    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    Ok(sink)
}
