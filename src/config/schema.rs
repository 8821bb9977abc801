use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use super::tags::TagMapping;

/// Top-level settings loaded from `config.json`.
///
/// File format: JSON, `{ "global_config": { .. }, "tags": { .. } }`
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/tagbox/config.json` or `~/.config/tagbox/config.json`
///
/// Precedence for `global_config` (highest wins):
/// 1) Environment variables (prefix `TAGBOX__`, `__` as nested separator)
/// 2) Config file
/// 3) Struct defaults
///
/// `tags` comes from the file only.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub global_config: GlobalConfig,
    #[serde(skip)]
    pub tags: TagMapping,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Root folder; tag folders are resolved relative to it.
    pub audio_folder: PathBuf,
    /// Folder played for unmapped tags. Defaults to `audio_folder`.
    pub all_songs_folder: Option<PathBuf>,
    /// Mirror log output into `log_file`.
    pub enable_logging: bool,
    pub log_file: PathBuf,
    /// Root of the sysfs GPIO tree.
    pub gpio_root: PathBuf,
    pub library: LibrarySettings,
    pub playback: PlaybackSettings,
    pub scanner: ScannerSettings,
    pub bluetooth: BluetoothSettings,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            audio_folder: PathBuf::from("Music"),
            all_songs_folder: None,
            enable_logging: false,
            log_file: PathBuf::from("tagbox.log"),
            gpio_root: PathBuf::from("/sys/class/gpio"),
            library: LibrarySettings::default(),
            playback: PlaybackSettings::default(),
            scanner: ScannerSettings::default(),
            bluetooth: BluetoothSettings::default(),
        }
    }
}

impl GlobalConfig {
    /// The folder unmapped tags (and the shuffle-all fallback) play from.
    ///
    /// A relative `all_songs_folder` is resolved against `audio_folder`.
    pub fn all_songs_folder(&self) -> PathBuf {
        match &self.all_songs_folder {
            Some(p) => self.audio_folder.join(p),
            None => self.audio_folder.clone(),
        }
    }

    pub fn resolve_folder(&self, folder: &Path) -> PathBuf {
        self.audio_folder.join(folder)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["flac".into()],
            follow_links: true,
            include_hidden: false,
            recursive: false,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Default ordering for tags without an `order` of their own.
    pub track_order: TrackOrder,
    /// Window (milliseconds) in which a repeat scan counts as a continuation.
    /// `null` disables the timeout.
    pub rescan_window_ms: Option<u64>,
    /// What to do when a list plays out on its own.
    pub on_exhausted: ExhaustedPolicy,
    /// Block the controller until the list ends (a new scan still interrupts).
    pub wait_for_end: bool,
    /// Controller tick used to notice the end of a list (milliseconds).
    pub tick_ms: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            track_order: TrackOrder::Lexicographic,
            rescan_window_ms: Some(30_000),
            on_exhausted: ExhaustedPolicy::Stop,
            wait_for_end: false,
            tick_ms: 200,
        }
    }
}

impl PlaybackSettings {
    pub fn rescan_window(&self) -> Option<Duration> {
        self.rescan_window_ms.map(Duration::from_millis)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackOrder {
    /// Sort by file name.
    #[default]
    #[serde(alias = "name", alias = "alphabetical")]
    Lexicographic,
    /// Sort by the leading number in the file name; unnumbered files go last.
    #[serde(alias = "track_number", alias = "tracknumber", alias = "numeric")]
    TrackNumber,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExhaustedPolicy {
    /// Go idle.
    #[default]
    #[serde(alias = "none")]
    Stop,
    /// Play every song under the all-songs folder, shuffled.
    #[serde(alias = "shuffle_all", alias = "shuffleall", alias = "play-all-shuffled")]
    ShuffleAll,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScannerSettings {
    /// File or FIFO to read tag identifiers from; stdin when unset.
    pub input: Option<PathBuf>,
    /// Upper bound on a single poll (milliseconds).
    pub poll_timeout_ms: u64,
    /// Quiet period after a tag was accepted (milliseconds).
    pub cooldown_ms: u64,
    /// GPIO pin of the switch that enables scanning. Always enabled when unset.
    pub gate_pin: Option<u32>,
}

impl Default for ScannerSettings {
    fn default() -> Self {
        Self {
            input: None,
            poll_timeout_ms: 250,
            cooldown_ms: 2_000,
            gate_pin: None,
        }
    }
}

impl ScannerSettings {
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BluetoothSettings {
    /// Run the switch → adapter power watcher.
    pub enabled: bool,
    /// GPIO pin of the Bluetooth switch.
    pub switch_pin: u32,
    /// D-Bus object path of the BlueZ adapter.
    pub adapter: String,
    pub poll_interval_ms: u64,
    /// Pause after changing the power state (milliseconds).
    pub settle_ms: u64,
}

impl Default for BluetoothSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            switch_pin: 25,
            adapter: "/org/bluez/hci0".to_string(),
            poll_interval_ms: 1_000,
            settle_ms: 1_000,
        }
    }
}
