use async_io::block_on;
use zbus::{Connection, proxy};
use zvariant::ObjectPath;

use super::{BluetoothBackend, BluetoothError};

#[proxy(
    interface = "org.bluez.Adapter1",
    default_service = "org.bluez",
    default_path = "/org/bluez/hci0"
)]
trait Adapter1 {
    #[zbus(property)]
    fn powered(&self) -> zbus::Result<bool>;

    #[zbus(property)]
    fn set_powered(&self, value: bool) -> zbus::Result<()>;
}

/// A BlueZ adapter on the system bus.
pub struct BluezAdapter {
    proxy: Adapter1Proxy<'static>,
}

impl BluezAdapter {
    /// Connect to the system bus and bind to `adapter` (e.g. `/org/bluez/hci0`).
    pub fn connect(adapter: &str) -> Result<Self, BluetoothError> {
        ObjectPath::try_from(adapter).map_err(|source| BluetoothError::AdapterPath {
            path: adapter.to_string(),
            source,
        })?;

        let path = adapter.to_string();
        block_on(async move {
            let connection = Connection::system().await?;
            let proxy = Adapter1Proxy::builder(&connection)
                .path(path)?
                .build()
                .await?;
            Ok(Self { proxy })
        })
    }
}

impl BluetoothBackend for BluezAdapter {
    fn power_state(&self) -> Result<bool, BluetoothError> {
        Ok(block_on(self.proxy.powered())?)
    }

    fn set_power_state(&self, on: bool) -> Result<(), BluetoothError> {
        Ok(block_on(self.proxy.set_powered(on))?)
    }
}
