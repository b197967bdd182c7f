use std::io::{BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use tracing::{debug, info};

use crate::error::{ComputeError, Result};
use crate::protocol;

/// An owned handle to the running compute process.
///
/// Created on entry to a streaming session and terminated on every exit
/// from it; a fresh process is spawned for the next session rather than
/// resuming this one.
#[derive(Debug)]
pub struct ComputeProcess {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: BufReader<ChildStdout>,
    terminated: bool,
}

impl ComputeProcess {
    /// Spawn the compute binary with piped standard streams.
    pub fn spawn(program: impl AsRef<Path>, args: &[String]) -> Result<Self> {
        let program = program.as_ref();
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|source| ComputeError::Spawn {
                program: program.to_path_buf(),
                source,
            })?;

        match (child.stdin.take(), child.stdout.take()) {
            (Some(stdin), Some(stdout)) => {
                info!(program = %program.display(), pid = child.id(), "compute process started");
                Ok(Self {
                    child,
                    stdin: Some(stdin),
                    stdout: BufReader::new(stdout),
                    terminated: false,
                })
            }
            _ => {
                let _ = child.kill();
                let _ = child.wait();
                Err(ComputeError::Spawn {
                    program: program.to_path_buf(),
                    source: std::io::Error::other("standard streams not attached"),
                })
            }
        }
    }

    /// Request the next raw reading.
    ///
    /// Checks liveness before touching the streams: a dead process fails
    /// fast with [`ComputeError::ProcessExited`] and no I/O is attempted.
    pub fn request_value(&mut self) -> Result<f32> {
        if !self.is_alive() {
            return Err(ComputeError::ProcessExited);
        }
        let stdin = self.stdin.as_mut().ok_or(ComputeError::ProcessExited)?;
        protocol::exchange(stdin, &mut self.stdout)
    }

    /// Whether the process is still running. Reaps the exit status if it
    /// has finished.
    pub fn is_alive(&mut self) -> bool {
        if self.terminated {
            return false;
        }
        matches!(self.child.try_wait(), Ok(None))
    }

    /// Process id, for diagnostics.
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// Stop the process. Safe to call more than once.
    ///
    /// The direction finder treats a `q` on stdin as a quit request, so one
    /// is offered before the kill; either way the handle is reaped here.
    pub fn terminate(&mut self) {
        if self.terminated {
            return;
        }
        self.terminated = true;

        if let Some(mut stdin) = self.stdin.take() {
            let _ = stdin.write_all(b"q\n");
            let _ = stdin.flush();
        }
        let _ = self.child.kill();
        let _ = self.child.wait();
        debug!(pid = self.child.id(), "compute process terminated");
    }
}

impl Drop for ComputeProcess {
    fn drop(&mut self) {
        self.terminate();
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    fn spawn_sh(script: &str) -> ComputeProcess {
        ComputeProcess::spawn("sh", &["-c".to_string(), script.to_string()])
            .expect("sh should spawn")
    }

    fn wait_until_dead(process: &mut ComputeProcess) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while process.is_alive() {
            assert!(Instant::now() < deadline, "process should have exited");
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    #[test]
    fn request_value_reads_one_reading_per_cycle() {
        let mut process = spawn_sh("while read line; do echo 45.0; done");

        assert_eq!(process.request_value().unwrap(), 45.0);
        assert_eq!(process.request_value().unwrap(), 45.0);

        process.terminate();
    }

    #[test]
    fn garbage_reading_is_parse_error() {
        let mut process = spawn_sh("read line; echo not-a-number");

        let err = process.request_value().unwrap_err();
        assert!(matches!(err, ComputeError::Parse { .. }));

        process.terminate();
    }

    #[test]
    fn exited_process_fails_fast() {
        let mut process = spawn_sh("exit 0");
        wait_until_dead(&mut process);

        let err = process.request_value().unwrap_err();
        assert!(matches!(err, ComputeError::ProcessExited));
    }

    #[test]
    fn eof_mid_cycle_is_process_exited() {
        let mut process = spawn_sh("read line");

        let err = process.request_value().unwrap_err();
        assert!(matches!(err, ComputeError::ProcessExited));
    }

    #[test]
    fn terminate_is_idempotent() {
        let mut process = spawn_sh("read line");

        process.terminate();
        process.terminate();

        assert!(!process.is_alive());
    }

    #[test]
    fn spawn_failure_is_reported() {
        let err = ComputeProcess::spawn("/nonexistent/compute-binary", &[]).unwrap_err();
        assert!(matches!(err, ComputeError::Spawn { .. }));
    }
}
