use std::sync::mpsc::Sender;
use std::thread::JoinHandle;

use anyhow::Context;
use tracing::{debug, info, warn};

use crate::audio::RodioPlayer;
use crate::bluetooth::{BluezAdapter, spawn_watcher};
use crate::config::{ExhaustedPolicy, Settings};
use crate::dispatch::{Dispatcher, shuffle_all};
use crate::gpio::{Switch, SysfsSwitch};
use crate::scanner::{LineScanner, ScanEvent, ScanLoop, spawn_scanner};

/// Log what was loaded and flag tag folders that do not exist.
pub fn log_settings(settings: &Settings) {
    let g = &settings.global_config;
    info!(
        audio_folder = %g.audio_folder.display(),
        all_songs = %g.all_songs_folder().display(),
        tags = settings.tags.len(),
        rescan_window_ms = ?g.playback.rescan_window_ms,
        on_exhausted = ?g.playback.on_exhausted,
        wait_for_end = g.playback.wait_for_end,
        "config loaded"
    );

    if settings.tags.is_empty() {
        warn!("no tags mapped, every scan plays the all-songs folder");
    }
    for (id, entry) in settings.tags.iter() {
        let folder = g.resolve_folder(&entry.folder);
        if folder.is_dir() {
            debug!(tag = %id, folder = %folder.display(), "tag mapped");
        } else {
            warn!(tag = %id, folder = %folder.display(), "tag folder does not exist");
        }
    }
}

/// Start the Bluetooth watcher if enabled. Failures only disable it.
pub fn start_bluetooth(settings: &Settings) -> Option<JoinHandle<()>> {
    let g = &settings.global_config;
    let bt = &g.bluetooth;
    if !bt.enabled {
        return None;
    }

    let switch = match SysfsSwitch::open(&g.gpio_root, bt.switch_pin) {
        Ok(s) => s,
        Err(err) => {
            warn!(error = %err, "Bluetooth switch unavailable, watcher disabled");
            return None;
        }
    };
    let adapter = match BluezAdapter::connect(&bt.adapter) {
        Ok(a) => a,
        Err(err) => {
            warn!(error = %err, adapter = %bt.adapter, "Bluetooth adapter unavailable, watcher disabled");
            return None;
        }
    };

    info!(pin = bt.switch_pin, adapter = %bt.adapter, "Bluetooth watcher started");
    Some(spawn_watcher(Box::new(switch), Box::new(adapter), bt))
}

/// Open the tag input and the optional scan gate, then start the scanner thread.
pub fn start_scanner(settings: &Settings, tx: Sender<ScanEvent>) -> anyhow::Result<JoinHandle<()>> {
    let g = &settings.global_config;
    let scanner = match &g.scanner.input {
        Some(path) => {
            info!(input = %path.display(), "reading tags from file");
            LineScanner::open(path.clone())
        }
        None => {
            info!("reading tags from stdin");
            LineScanner::stdin()
        }
    };

    let gate: Option<Box<dyn Switch + Send>> = match g.scanner.gate_pin {
        Some(pin) => {
            let switch = SysfsSwitch::open(&g.gpio_root, pin)
                .with_context(|| format!("cannot open scan gate on pin {pin}"))?;
            Some(Box::new(switch))
        }
        None => None,
    };

    Ok(spawn_scanner(ScanLoop::new(scanner, gate, &g.scanner), tx))
}

pub fn build_dispatcher(settings: &Settings) -> anyhow::Result<Dispatcher<RodioPlayer>> {
    let g = &settings.global_config;
    let player = RodioPlayer::new().context("cannot open audio output")?;
    let dispatcher = Dispatcher::new(player, g.library.clone());

    Ok(match g.playback.on_exhausted {
        ExhaustedPolicy::Stop => dispatcher,
        ExhaustedPolicy::ShuffleAll => {
            dispatcher.with_on_exhausted(shuffle_all(g.all_songs_folder(), g.playback.track_order))
        }
    })
}
