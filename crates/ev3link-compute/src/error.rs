use std::path::PathBuf;

/// Errors that can occur while driving the compute process.
#[derive(Debug, thiserror::Error)]
pub enum ComputeError {
    /// The compute process could not be started.
    #[error("failed to spawn compute process {program}: {source}")]
    Spawn {
        program: PathBuf,
        source: std::io::Error,
    },

    /// The compute process is no longer running.
    #[error("compute process exited")]
    ProcessExited,

    /// The response line is not a float literal.
    #[error("unparseable reading from compute process: {line:?}")]
    Parse { line: String },

    /// An I/O error occurred on the process's standard streams.
    #[error("compute process I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ComputeError>;
