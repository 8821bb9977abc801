use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::Track;

#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("cannot read folder {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is not a folder", path.display())]
    NotAFolder { path: PathBuf },
}

fn normalized_extensions(settings: &LibrarySettings) -> Vec<String> {
    settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

fn is_audio_file(path: &Path, exts: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// List the audio files of `folder`, in walk order (file names sorted per
/// directory). The folder itself must exist and be readable.
pub fn list_audio_files(folder: &Path, settings: &LibrarySettings) -> Result<Vec<Track>, LibraryError> {
    let unreadable = |source| LibraryError::Unreadable {
        path: folder.to_path_buf(),
        source,
    };
    let meta = std::fs::metadata(folder).map_err(unreadable)?;
    if !meta.is_dir() {
        return Err(LibraryError::NotAFolder {
            path: folder.to_path_buf(),
        });
    }
    std::fs::read_dir(folder).map_err(unreadable)?;

    let exts = normalized_extensions(settings);
    let mut walker = WalkDir::new(folder)
        .follow_links(settings.follow_links)
        .sort_by_file_name();

    // Non-recursive = only the folder's direct children.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let mut tracks = Vec::new();
    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
    {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                debug!(folder = %folder.display(), error = %err, "skipping unreadable entry");
                continue;
            }
        };
        let path = entry.path();
        if path.is_file() && is_audio_file(path, &exts) {
            tracks.push(Track::new(path));
        }
    }
    Ok(tracks)
}
