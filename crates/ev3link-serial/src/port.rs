use std::path::Path;
use std::time::Duration;

use serialport::SerialPort;
use tracing::info;

use crate::error::{LinkError, Result};
use crate::link::TelemetryLink;

/// Nominal line rate. RFCOMM ttys ignore it, but the port layer requires one.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Write timeout on the open port. A brick that stops draining its side of
/// the RFCOMM channel shows up as a timeout here rather than a hang.
const WRITE_TIMEOUT: Duration = Duration::from_millis(500);

/// A telemetry link backed by a real serial device.
pub type SerialLink = TelemetryLink<Box<dyn SerialPort>>;

/// Returns true once the serial device node exists.
///
/// The pairing watcher creates the node when the brick connects; until then
/// there is nothing to open and callers should keep polling.
pub fn device_present(path: impl AsRef<Path>) -> bool {
    path.as_ref().exists()
}

/// Open the serial device in raw 8N1 mode.
pub fn open_device(path: impl AsRef<Path>, baud_rate: u32) -> Result<SerialLink> {
    let path = path.as_ref();
    let port = serialport::new(path.to_string_lossy(), baud_rate)
        .data_bits(serialport::DataBits::Eight)
        .stop_bits(serialport::StopBits::One)
        .parity(serialport::Parity::None)
        .timeout(WRITE_TIMEOUT)
        .open()
        .map_err(|source| LinkError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    info!(?path, "serial link opened");
    Ok(TelemetryLink::new(port))
}
