use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::Deserialize;

use super::schema::Settings;
use super::tags::TagMapping;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no config file found (pass a path or set TAGBOX_CONFIG_PATH)")]
    NotFound,
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid settings in {}: {source}", path.display())]
    Settings {
        path: PathBuf,
        #[source]
        source: ::config::ConfigError,
    },
    #[error("invalid tag mapping in {}: {source}", path.display())]
    Tags {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Deserialize)]
struct TagsDocument {
    #[serde(default)]
    tags: TagMapping,
}

/// Configuration loading helpers.
///
/// `global_config` goes through the `config` builder so environment variables
/// (prefix `TAGBOX__`) can override single keys. The `tags` table is read with
/// `serde_json` directly: identifiers are case-sensitive and must stay unique.
impl Settings {
    /// Load settings from `explicit`, or from the resolved default location.
    pub fn load(explicit: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = explicit
            .or_else(resolve_config_path)
            .ok_or(ConfigError::NotFound)?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let settings_err = |source| ConfigError::Settings {
            path: path.to_path_buf(),
            source,
        };

        let cfg = ::config::Config::builder()
            .add_source(::config::File::from_str(&text, ::config::FileFormat::Json))
            .add_source(
                ::config::Environment::with_prefix("TAGBOX")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(settings_err)?;
        let mut settings: Settings = cfg.try_deserialize().map_err(settings_err)?;

        let doc: TagsDocument = serde_json::from_str(&text).map_err(|source| ConfigError::Tags {
            path: path.to_path_buf(),
            source,
        })?;
        settings.tags = doc.tags;

        settings.validate().map_err(ConfigError::Invalid)?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        let g = &self.global_config;
        if g.library.extensions.iter().all(|e| e.trim().is_empty()) {
            return Err("global_config.library.extensions must name at least one extension".to_string());
        }
        if g.scanner.poll_timeout_ms == 0 {
            return Err("global_config.scanner.poll_timeout_ms must be >= 1".to_string());
        }
        if g.playback.tick_ms == 0 {
            return Err("global_config.playback.tick_ms must be >= 1".to_string());
        }
        if g.bluetooth.enabled && g.bluetooth.poll_interval_ms == 0 {
            return Err("global_config.bluetooth.poll_interval_ms must be >= 1".to_string());
        }
        if let Some((id, _)) = self.tags.iter().find(|(id, _)| id.trim().is_empty()) {
            return Err(format!("tag identifier {id:?} is empty"));
        }
        Ok(())
    }
}

/// Resolve the config path from `TAGBOX_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("TAGBOX_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/tagbox/config.json`
/// or `~/.config/tagbox/config.json` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("tagbox").join("config.json"))
}
