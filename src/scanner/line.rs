use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use tracing::debug;

use super::{ScanError, TagScanner, normalize_tag_text};

/// Reads one tag identifier per line, e.g. from a reader helper writing
/// into a FIFO. Lines are read on a background thread so `poll` can honour
/// its timeout.
pub struct LineScanner {
    rx: Receiver<io::Result<String>>,
}

impl LineScanner {
    pub fn stdin() -> Self {
        Self::from_reader(BufReader::new(io::stdin()))
    }

    /// Read from `path`. A FIFO is reopened whenever its writer goes away.
    pub fn open(path: PathBuf) -> Self {
        let reopen = is_fifo(&path);
        Self::spawn(move |tx| {
            loop {
                match File::open(&path) {
                    Ok(file) => {
                        if !pump(BufReader::new(file), &tx) || !reopen {
                            return;
                        }
                        debug!(path = %path.display(), "tag input writer closed, reopening");
                    }
                    Err(e) => {
                        let _ = tx.send(Err(e));
                        return;
                    }
                }
            }
        })
    }

    pub fn from_reader<R: BufRead + Send + 'static>(reader: R) -> Self {
        Self::spawn(move |tx| {
            pump(reader, &tx);
        })
    }

    fn spawn<F>(f: F) -> Self
    where
        F: FnOnce(Sender<io::Result<String>>) + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || f(tx));
        Self { rx }
    }
}

/// Forward lines until EOF. Returns `false` once the receiver is gone or
/// the reader failed.
fn pump<R: BufRead>(mut reader: R, tx: &Sender<io::Result<String>>) -> bool {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => return true,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf).into_owned();
                if tx.send(Ok(line)).is_err() {
                    return false;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => {
                let _ = tx.send(Err(e));
                return false;
            }
        }
    }
}

#[cfg(unix)]
fn is_fifo(path: &Path) -> bool {
    use std::os::unix::fs::FileTypeExt;
    std::fs::metadata(path)
        .map(|m| m.file_type().is_fifo())
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_fifo(_path: &Path) -> bool {
    false
}

impl TagScanner for LineScanner {
    fn poll(&mut self, timeout: Duration) -> Result<Option<String>, ScanError> {
        match self.rx.recv_timeout(timeout) {
            Ok(Ok(line)) => Ok(normalize_tag_text(&line)),
            Ok(Err(e)) => Err(ScanError::Io(e)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(ScanError::Closed),
        }
    }
}
