use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{info, warn};

use crate::config::BluetoothSettings;
use crate::gpio::Switch;

use super::{BluetoothBackend, SyncError};

/// Bring the adapter's power in line with `switch`.
///
/// Returns the new power state when it had to change. An unreadable power
/// state counts as "on".
pub fn sync_once(switch: &dyn Switch, backend: &dyn BluetoothBackend) -> Result<Option<bool>, SyncError> {
    let wanted = switch.is_on()?;
    let powered = backend.power_state().unwrap_or_else(|err| {
        warn!(error = %err, "cannot read Bluetooth power state, assuming on");
        true
    });
    if wanted == powered {
        return Ok(None);
    }

    backend.set_power_state(wanted)?;
    info!(powered = wanted, "Bluetooth power switched");
    Ok(Some(wanted))
}

/// Follow the switch forever on a background thread.
pub fn spawn_watcher(
    switch: Box<dyn Switch + Send>,
    backend: Box<dyn BluetoothBackend + Send>,
    settings: &BluetoothSettings,
) -> JoinHandle<()> {
    let interval = Duration::from_millis(settings.poll_interval_ms);
    let settle = Duration::from_millis(settings.settle_ms);

    thread::spawn(move || {
        loop {
            match sync_once(switch.as_ref(), backend.as_ref()) {
                Ok(Some(_)) => thread::sleep(settle),
                Ok(None) => {}
                Err(err) => warn!(error = %err, "Bluetooth sync failed"),
            }
            thread::sleep(interval);
        }
    })
}
