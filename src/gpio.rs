//! Physical switches, read through the sysfs GPIO interface.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

/// How long to wait for the kernel to create a freshly exported pin.
const EXPORT_WAIT: Duration = Duration::from_millis(500);
const EXPORT_POLL: Duration = Duration::from_millis(50);

#[derive(Debug, thiserror::Error)]
pub enum GpioError {
    #[error("gpio {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("gpio {}: unexpected value {value:?}", path.display())]
    Invalid { path: PathBuf, value: String },
    #[error("gpio pin {pin} did not appear under {}", root.display())]
    Missing { pin: u32, root: PathBuf },
}

/// An on/off input.
pub trait Switch {
    fn is_on(&self) -> Result<bool, GpioError>;
}

/// A pin under `/sys/class/gpio`; "1" is on.
#[derive(Debug, Clone)]
pub struct SysfsSwitch {
    value: PathBuf,
}

impl SysfsSwitch {
    /// Open `pin`, exporting it and configuring it as an input if needed.
    pub fn open(root: &Path, pin: u32) -> Result<Self, GpioError> {
        let dir = root.join(format!("gpio{pin}"));
        let value = dir.join("value");

        if !value.exists() {
            let export = root.join("export");
            debug!(pin, "exporting gpio pin");
            fs::write(&export, pin.to_string()).map_err(|source| GpioError::Io {
                path: export,
                source,
            })?;

            let mut waited = Duration::ZERO;
            while !value.exists() {
                if waited >= EXPORT_WAIT {
                    return Err(GpioError::Missing {
                        pin,
                        root: root.to_path_buf(),
                    });
                }
                thread::sleep(EXPORT_POLL);
                waited += EXPORT_POLL;
            }
        }

        let direction = dir.join("direction");
        if direction.exists() {
            if let Err(err) = fs::write(&direction, "in") {
                warn!(pin, error = %err, "cannot set gpio direction, reading as is");
            }
        }

        Ok(Self { value })
    }
}

impl Switch for SysfsSwitch {
    fn is_on(&self) -> Result<bool, GpioError> {
        let raw = fs::read_to_string(&self.value).map_err(|source| GpioError::Io {
            path: self.value.clone(),
            source,
        })?;
        match raw.trim() {
            "1" => Ok(true),
            "0" => Ok(false),
            other => Err(GpioError::Invalid {
                path: self.value.clone(),
                value: other.to_string(),
            }),
        }
    }
}
