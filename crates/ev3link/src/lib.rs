//! Bridge daemon connecting an angle-computation process to an EV3 brick
//! over Bluetooth serial.
//!
//! Once per cadence interval the daemon asks the direction finder for a raw
//! reading, rescales it onto the brick's steering range, and writes it to
//! the brick's "Angle" mailbox, followed by a constant "Power" value. Any
//! fault tears the whole session down; the daemon then waits for the serial
//! device to reappear and starts over with a fresh link and a fresh
//! compute process.
//!
//! # Crate Structure
//!
//! - [`frame`]: mailbox-write frame codec
//! - [`serial`]: serial telemetry link with exact-length sends
//! - [`compute`]: compute process adapter
//! - [`session`]: scoped link + process ownership, one telemetry cycle
//! - [`supervisor`]: the connect/stream/teardown state machine
//! - [`watcher`]: handle for the external pairing watcher

pub mod session;
pub mod supervisor;
pub mod watcher;

/// Re-export frame types.
pub mod frame {
    pub use ev3link_frame::*;
}

/// Re-export serial link types.
pub mod serial {
    pub use ev3link_serial::*;
}

/// Re-export compute adapter types.
pub mod compute {
    pub use ev3link_compute::*;
}
