//! EV3 mailbox-write frame encoding for named telemetry values.
//!
//! The EV3 brick receives telemetry as mailbox writes: a named slot plus a
//! little-endian IEEE-754 float payload. Every frame is prefixed with:
//! - A 2-byte little-endian length covering everything that follows
//! - A 2-byte message counter (always 1 here)
//! - A 2-byte command word (0x9E81, "write mailbox")
//!
//! No partial frames, no buffer management in user code.

pub mod codec;
pub mod error;

pub use codec::{
    decode_value, encode_value, encoded_value, NamedValue, FLOAT_PAYLOAD_LEN,
    LENGTH_PREFIX_SIZE, MAX_NAME_LEN, MESSAGE_COUNTER, PAYLOAD_KIND_FLOAT, WRITE_MAILBOX,
};
pub use error::{FrameError, Result};
