use std::path::PathBuf;

/// Errors that can occur on the telemetry link.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// Failed to open the serial device.
    #[error("failed to open serial device {path}: {source}")]
    Open {
        path: PathBuf,
        source: serialport::Error,
    },

    /// The device accepted fewer bytes than the frame holds.
    #[error("partial write ({written} of {expected} bytes accepted)")]
    PartialWrite { written: usize, expected: usize },

    /// An I/O error occurred on the underlying connection.
    #[error("link I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The link has already been closed.
    #[error("link closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, LinkError>;
