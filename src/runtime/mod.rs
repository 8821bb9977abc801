use std::env;
use std::sync::mpsc;

use tracing::info;

use crate::session::ModeSelector;

mod controller;
mod logging;
mod settings;
mod startup;

pub use controller::Controller;

pub fn run() -> anyhow::Result<()> {
    let settings = settings::load_settings(env::args().nth(1))?;
    logging::init(&settings.global_config)?;
    startup::log_settings(&settings);

    let _bluetooth = startup::start_bluetooth(&settings);

    let (tx, rx) = mpsc::channel();
    let _scanner = startup::start_scanner(&settings, tx)?;
    let dispatcher = startup::build_dispatcher(&settings)?;

    let selector = ModeSelector::new(&settings);
    info!(rescan_window = ?selector.rescan_window(), "waiting for tags");

    let mut controller = Controller::new(selector, dispatcher, &settings.global_config.playback);
    controller.run(&rx);
    Ok(())
}

#[cfg(test)]
mod tests;
