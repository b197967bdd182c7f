/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The mailbox name does not fit the 1-byte declared-length field.
    #[error("mailbox name too long ({len} bytes, max {max})")]
    NameTooLong { len: usize, max: usize },

    /// The frame carries a command word other than "write mailbox".
    #[error("unknown command word 0x{command:04X} (expected 0x9E81)")]
    UnknownCommand { command: u16 },

    /// An interior length field disagrees with the bytes actually present.
    #[error("frame length mismatch (declared {declared}, actual {actual})")]
    LengthMismatch { declared: usize, actual: usize },

    /// The payload kind tag is not the float tag.
    #[error("unknown payload kind {kind} (expected 0 = float)")]
    UnknownPayloadKind { kind: u8 },
}

pub type Result<T> = std::result::Result<T, FrameError>;
