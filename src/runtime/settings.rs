use std::path::PathBuf;

use anyhow::Context;

use crate::config::{self, Settings};

/// Load the settings named on the command line, or the default ones.
///
/// Runs before logging is up, so nothing here logs.
pub fn load_settings(arg: Option<String>) -> anyhow::Result<Settings> {
    let explicit = arg.map(PathBuf::from);
    let shown = explicit
        .clone()
        .or_else(config::resolve_config_path)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<none>".to_string());
    Settings::load(explicit).with_context(|| format!("failed to load config {shown}"))
}
