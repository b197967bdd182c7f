//! Serial telemetry link with exact-length frame sends.
//!
//! Owns one open serial connection to the brick and writes pre-encoded
//! frames to it. A send succeeds only if the device accepts the whole frame
//! in one write; anything else is fatal to the session and reported to the
//! caller, which is expected to close the link and reconnect.

pub mod error;
pub mod link;
pub mod port;

pub use error::{LinkError, Result};
pub use link::TelemetryLink;
pub use port::{device_present, open_device, SerialLink, DEFAULT_BAUD_RATE};
