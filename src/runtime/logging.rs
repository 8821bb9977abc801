use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use crate::config::GlobalConfig;

const DEFAULT_FILTER: &str = "info,tagbox=debug";

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
///
/// With `enable_logging` the output is appended to `log_file` instead of
/// going to stderr.
pub fn init(config: &GlobalConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let (stderr, file) = if config.enable_logging {
        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file)
            .with_context(|| format!("cannot open log file {}", config.log_file.display()))?;
        let layer = fmt::layer().with_ansi(false).with_writer(Mutex::new(log_file));
        (None, Some(layer))
    } else {
        (Some(fmt::layer().with_writer(std::io::stderr)), None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr)
        .with(file)
        .try_init()
        .context("cannot install log subscriber")?;
    Ok(())
}
