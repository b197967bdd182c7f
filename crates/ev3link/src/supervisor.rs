//! The connection supervisor: wait for the device, open the link, spawn the
//! compute process, stream until something breaks, tear down, repeat.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, info};

use ev3link_compute::ComputeProcess;
use ev3link_serial::{device_present, open_device, SerialLink, DEFAULT_BAUD_RATE};

use crate::session::{FrameSink, SessionError, StreamingSession, ValueSource};

/// Where the supervisor currently stands with the brick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// No device node; polling for it.
    Disconnected,
    /// Device node present; opening the link and starting the compute process.
    Connecting,
    /// Telemetry cycles running on the cadence.
    Streaming,
}

/// Everything the supervisor needs to run.
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    /// Serial device node created by the pairing watcher.
    pub device_path: PathBuf,
    /// Nominal baud rate for the serial device.
    pub baud_rate: u32,
    /// Path to the compute binary.
    pub compute_program: PathBuf,
    /// Arguments for the compute binary.
    pub compute_args: Vec<String>,
    /// How often to re-check for the device node while disconnected.
    pub poll_interval: Duration,
    /// Delay between telemetry cycles while streaming.
    pub cadence: Duration,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            device_path: PathBuf::from("/dev/rfcomm0"),
            baud_rate: DEFAULT_BAUD_RATE,
            compute_program: PathBuf::from("/home/pi/FFT_Iterator.bin"),
            // Three microphone ports plus the frequency band to track.
            compute_args: ["1", "2", "0", "714"].map(String::from).to_vec(),
            poll_interval: Duration::from_millis(500),
            cadence: Duration::from_secs(1),
        }
    }
}

/// Top-level state machine driving the bridge.
///
/// Single-threaded and fully synchronous: each cycle blocks in turn on the
/// compute exchange, the two link writes, and the cadence sleep. The run
/// flag is the only external signal; the ctrl-c handler clears it and every
/// wait loop checks it.
pub struct Supervisor {
    config: SupervisorConfig,
    state: LinkState,
    running: Arc<AtomicBool>,
}

impl Supervisor {
    /// Create a supervisor. `running` is shared with the interrupt handler;
    /// the supervisor only ever reads it.
    pub fn new(config: SupervisorConfig, running: Arc<AtomicBool>) -> Self {
        Self {
            config,
            state: LinkState::Disconnected,
            running,
        }
    }

    /// Current state, for diagnostics and tests.
    pub fn state(&self) -> LinkState {
        self.state
    }

    fn running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Run until the operator interrupt clears the run flag.
    ///
    /// Every fault (partial write, transport error, process death, bad
    /// reading) lands back in `Disconnected` through the same teardown
    /// path. Cheap restarts are the whole recovery strategy; there is no
    /// differentiated backoff.
    pub fn run(&mut self) {
        while self.running() {
            self.wait_for_device();
            if !self.running() {
                break;
            }

            self.state = LinkState::Connecting;
            let mut session = match self.connect() {
                Ok(session) => session,
                Err(err) => {
                    debug!(%err, "connect failed");
                    self.state = LinkState::Disconnected;
                    thread::sleep(self.config.poll_interval);
                    continue;
                }
            };

            info!("brick connection established");
            self.run_session(&mut session);
        }
    }

    /// Poll for the device node until it appears or the run flag clears.
    fn wait_for_device(&mut self) {
        self.state = LinkState::Disconnected;
        if device_present(&self.config.device_path) {
            return;
        }

        info!(path = ?self.config.device_path, "waiting for brick to connect");
        while self.running() && !device_present(&self.config.device_path) {
            thread::sleep(self.config.poll_interval);
        }
    }

    /// Open the link, then start the compute process. Either failure is
    /// reported to the caller; whatever was already acquired is released
    /// on the way out.
    fn connect(&self) -> Result<StreamingSession<SerialLink, ComputeProcess>, SessionError> {
        let link = open_device(&self.config.device_path, self.config.baud_rate)?;
        let compute =
            ComputeProcess::spawn(&self.config.compute_program, &self.config.compute_args)?;
        Ok(StreamingSession::new(link, compute))
    }

    /// Stream an acquired session until a fault or an interrupt, then tear
    /// it down and return to `Disconnected`.
    pub fn run_session<L: FrameSink, C: ValueSource>(
        &mut self,
        session: &mut StreamingSession<L, C>,
    ) {
        self.state = LinkState::Streaming;

        while self.running() {
            if let Err(err) = session.cycle() {
                debug!(%err, "streaming fault, tearing down");
                break;
            }
            thread::sleep(self.config.cadence);
        }

        session.teardown();
        self.state = LinkState::Disconnected;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_deployment() {
        let config = SupervisorConfig::default();
        assert_eq!(config.device_path, PathBuf::from("/dev/rfcomm0"));
        assert_eq!(config.compute_args, ["1", "2", "0", "714"]);
        assert_eq!(config.cadence, Duration::from_secs(1));
        assert_eq!(config.poll_interval, Duration::from_millis(500));
    }

    #[test]
    fn supervisor_starts_disconnected() {
        let supervisor = Supervisor::new(
            SupervisorConfig::default(),
            Arc::new(AtomicBool::new(true)),
        );
        assert_eq!(supervisor.state(), LinkState::Disconnected);
    }
}
