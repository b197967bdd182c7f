use std::io::Write;

use tracing::debug;

use crate::error::{LinkError, Result};

/// Writes complete frames to an owned serial connection.
///
/// Generic over any `Write` sink so the exact-length contract can be
/// exercised without hardware.
pub struct TelemetryLink<T> {
    inner: Option<T>,
}

impl<T: Write> TelemetryLink<T> {
    /// Take ownership of an open connection.
    pub fn new(inner: T) -> Self {
        Self { inner: Some(inner) }
    }

    /// Write one pre-encoded frame (blocking).
    ///
    /// One write call; a short count means the link is dead, not a retry
    /// condition. The brick never acknowledges, so an accepted count equal
    /// to the frame length is the only success signal available.
    pub fn send(&mut self, frame: &[u8]) -> Result<()> {
        let sink = self.inner.as_mut().ok_or(LinkError::Closed)?;
        let written = sink.write(frame).map_err(LinkError::Io)?;
        if written != frame.len() {
            return Err(LinkError::PartialWrite {
                written,
                expected: frame.len(),
            });
        }
        Ok(())
    }

    /// Release the underlying connection. Safe to call more than once.
    pub fn close(&mut self) {
        if self.inner.take().is_some() {
            debug!("telemetry link closed");
        }
    }

    /// Whether the link has been closed.
    pub fn is_closed(&self) -> bool {
        self.inner.is_none()
    }

    /// Borrow the underlying connection, if still open.
    pub fn get_ref(&self) -> Option<&T> {
        self.inner.as_ref()
    }
}

/// Reports only the open/closed state; the wrapped connection (e.g.
/// `Box<dyn SerialPort>`) does not implement `Debug`, so a derive would not
/// apply to the concrete link type.
impl<T> std::fmt::Debug for TelemetryLink<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryLink")
            .field("closed", &self.inner.is_none())
            .finish()
    }
}
