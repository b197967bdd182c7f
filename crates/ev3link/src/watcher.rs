//! Handle for the external pairing watcher process.
//!
//! The watcher (normally `rfcomm watch hci0`) accepts the brick's Bluetooth
//! connection and creates the serial device node. It is launched once at
//! program start and lives across link drops; the supervisor never restarts
//! it. The only observable effect it has on the rest of the daemon is the
//! device node appearing and disappearing.

use std::process::{Child, Command};

use tracing::{debug, info};

/// An owned handle to the long-lived pairing watcher.
pub struct PairingWatcher {
    child: Child,
    terminated: bool,
}

impl PairingWatcher {
    /// Launch the watcher command line, split on whitespace.
    pub fn spawn(command_line: &str) -> std::io::Result<Self> {
        let mut parts = command_line.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| std::io::Error::other("empty pairing watcher command"))?;

        let child = Command::new(program).args(parts).spawn()?;
        info!(command = command_line, pid = child.id(), "pairing watcher started");

        Ok(Self {
            child,
            terminated: false,
        })
    }

    /// Stop the watcher. Safe to call more than once.
    pub fn terminate(&mut self) {
        if self.terminated {
            return;
        }
        self.terminated = true;

        let _ = self.child.kill();
        let _ = self.child.wait();
        debug!("pairing watcher stopped");
    }
}

impl Drop for PairingWatcher {
    fn drop(&mut self) {
        self.terminate();
    }
}
