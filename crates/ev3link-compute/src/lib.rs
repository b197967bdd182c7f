//! Adapter for the external angle-computation process.
//!
//! The direction finder runs as a separate binary and speaks a one-line
//! request/response protocol over its standard streams: one newline in,
//! one float-as-text line out. This crate owns the child process and
//! drives that exchange once per telemetry cycle.

pub mod error;
pub mod process;
pub mod protocol;

pub use error::{ComputeError, Result};
pub use process::ComputeProcess;
pub use protocol::exchange;
