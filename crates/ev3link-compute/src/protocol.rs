use std::io::{BufRead, Write};

use crate::error::{ComputeError, Result};

/// Drive one request/response exchange with the compute process.
///
/// A single newline on `input` asks the process for its next reading; the
/// response is exactly one line holding a float literal. EOF on `output`
/// means the process went away mid-cycle.
pub fn exchange<W: Write, R: BufRead>(input: &mut W, output: &mut R) -> Result<f32> {
    input.write_all(b"\n")?;
    input.flush()?;

    let mut line = String::new();
    let read = output.read_line(&mut line)?;
    if read == 0 {
        return Err(ComputeError::ProcessExited);
    }

    let reading = line.trim();
    reading.parse::<f32>().map_err(|_| ComputeError::Parse {
        line: reading.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn exchange_sends_newline_and_parses_reading() {
        let mut input = Vec::new();
        let mut output = Cursor::new(&b"45.0\n"[..]);

        let reading = exchange(&mut input, &mut output).unwrap();

        assert_eq!(input, b"\n");
        assert_eq!(reading, 45.0);
    }

    #[test]
    fn exchange_trims_line_endings() {
        let mut input = Vec::new();
        let mut output = Cursor::new(&b"  -12.5\r\n"[..]);

        let reading = exchange(&mut input, &mut output).unwrap();
        assert_eq!(reading, -12.5);
    }

    #[test]
    fn exchange_reads_one_line_per_call() {
        let mut input = Vec::new();
        let mut output = Cursor::new(&b"1.0\n2.0\n"[..]);

        assert_eq!(exchange(&mut input, &mut output).unwrap(), 1.0);
        assert_eq!(exchange(&mut input, &mut output).unwrap(), 2.0);
        assert_eq!(input, b"\n\n");
    }

    #[test]
    fn garbage_line_is_parse_error() {
        let mut input = Vec::new();
        let mut output = Cursor::new(&b"not-a-number\n"[..]);

        let err = exchange(&mut input, &mut output).unwrap_err();
        match err {
            ComputeError::Parse { line } => assert_eq!(line, "not-a-number"),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn eof_is_process_exited() {
        let mut input = Vec::new();
        let mut output = Cursor::new(&b""[..]);

        let err = exchange(&mut input, &mut output).unwrap_err();
        assert!(matches!(err, ComputeError::ProcessExited));
    }

    #[test]
    fn write_fault_is_io_error() {
        struct BrokenPipe;

        impl Write for BrokenPipe {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut output = Cursor::new(&b"45.0\n"[..]);
        let err = exchange(&mut BrokenPipe, &mut output).unwrap_err();
        assert!(matches!(err, ComputeError::Io(_)));
    }
}
