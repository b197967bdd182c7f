//! One streaming session: scoped ownership of the link and the compute
//! process, and the telemetry cycle that runs between them.

use ev3link_compute::{ComputeError, ComputeProcess};
use ev3link_frame::FrameError;
use ev3link_serial::{LinkError, TelemetryLink};

/// Mailbox receiving the rescaled direction reading.
pub const ANGLE_MAILBOX: &str = "Angle";

/// Mailbox receiving the drive power level.
pub const POWER_MAILBOX: &str = "Power";

/// Drive power sent every cycle, independent of the angle.
pub const POWER_LEVEL: f32 = 40.0;

/// Any fault that ends a streaming session.
///
/// Every variant collapses into the same teardown-and-retry transition; the
/// split exists so logs and tests can tell the categories apart.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Link-level fault (open failure, partial write, transport error).
    #[error("link fault: {0}")]
    Link(#[from] LinkError),

    /// Compute-process fault (spawn failure, exit, bad reading, stream error).
    #[error("compute fault: {0}")]
    Compute(#[from] ComputeError),

    /// Frame encoding fault.
    #[error("frame fault: {0}")]
    Frame(#[from] FrameError),
}

/// Sink half of a session: where encoded frames go.
pub trait FrameSink {
    fn send_frame(&mut self, frame: &[u8]) -> Result<(), LinkError>;
    fn close(&mut self);
}

impl<T: std::io::Write> FrameSink for TelemetryLink<T> {
    fn send_frame(&mut self, frame: &[u8]) -> Result<(), LinkError> {
        self.send(frame)
    }

    fn close(&mut self) {
        TelemetryLink::close(self);
    }
}

/// Source half of a session: where raw readings come from.
pub trait ValueSource {
    fn is_alive(&mut self) -> bool;
    fn request_value(&mut self) -> Result<f32, ComputeError>;
    fn terminate(&mut self);
}

impl ValueSource for ComputeProcess {
    fn is_alive(&mut self) -> bool {
        ComputeProcess::is_alive(self)
    }

    fn request_value(&mut self) -> Result<f32, ComputeError> {
        ComputeProcess::request_value(self)
    }

    fn terminate(&mut self) {
        ComputeProcess::terminate(self);
    }
}

/// Map a raw direction reading onto the brick's steering range.
///
/// The finder reports degrees in [-180, 180]; the brick steers on a
/// sign-inverted [-100, 100] scale. Applied exactly once per reading.
/// The divide comes last so the result rounds once: 45 maps to exactly
/// -25, and 180 to exactly -100.
pub fn rescale_angle(raw: f32) -> f32 {
    raw * -100.0 / 180.0
}

/// An acquired link + compute process pair.
///
/// Both resources are acquired together and released together: [`teardown`]
/// on the normal exit paths, the members' own `Drop` impls on everything
/// else. No global registration per reconnect.
///
/// [`teardown`]: StreamingSession::teardown
pub struct StreamingSession<L, C> {
    link: L,
    compute: C,
}

impl<L: FrameSink, C: ValueSource> StreamingSession<L, C> {
    /// Pair an open link with a running compute process.
    pub fn new(link: L, compute: C) -> Self {
        Self { link, compute }
    }

    /// Run one telemetry cycle.
    ///
    /// Liveness is checked before any I/O; a dead compute process fails the
    /// cycle without touching its streams or the link.
    pub fn cycle(&mut self) -> Result<(), SessionError> {
        if !self.compute.is_alive() {
            return Err(ComputeError::ProcessExited.into());
        }

        let raw = self.compute.request_value()?;
        let angle = rescale_angle(raw);

        let frame = ev3link_frame::encoded_value(ANGLE_MAILBOX, angle)?;
        self.link.send_frame(&frame)?;

        let frame = ev3link_frame::encoded_value(POWER_MAILBOX, POWER_LEVEL)?;
        self.link.send_frame(&frame)?;

        Ok(())
    }

    /// Close the link and terminate the compute process. Safe to call more
    /// than once; both members' release paths are idempotent.
    pub fn teardown(&mut self) {
        self.link.close();
        self.compute.terminate();
    }
}
