//! Bluetooth power follows a physical switch.
//!
//! Independent of playback: the watcher only looks at the switch and the
//! adapter.

mod bluez;
mod watcher;

pub use bluez::BluezAdapter;
pub use watcher::{spawn_watcher, sync_once};

use crate::gpio::GpioError;

#[derive(Debug, thiserror::Error)]
pub enum BluetoothError {
    #[error("invalid adapter path {path:?}: {source}")]
    AdapterPath {
        path: String,
        #[source]
        source: zvariant::Error,
    },
    #[error("D-Bus: {0}")]
    Dbus(#[from] zbus::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("switch: {0}")]
    Switch(#[from] GpioError),
    #[error("bluetooth: {0}")]
    Bluetooth(#[from] BluetoothError),
}

/// Power control for one adapter.
pub trait BluetoothBackend {
    fn power_state(&self) -> Result<bool, BluetoothError>;
    fn set_power_state(&self, on: bool) -> Result<(), BluetoothError>;
}
