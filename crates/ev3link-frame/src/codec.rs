use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Length prefix: 2 bytes, little-endian, counts everything after itself.
pub const LENGTH_PREFIX_SIZE: usize = 2;

/// Message counter written into every frame. The brick does not sequence
/// mailbox writes, so a constant is sufficient.
pub const MESSAGE_COUNTER: u16 = 1;

/// Command word for "write mailbox" (0x81 0x9E on the wire).
pub const WRITE_MAILBOX: u16 = 0x9E81;

/// Payload kind tag for a 32-bit float.
pub const PAYLOAD_KIND_FLOAT: u8 = 0;

/// Declared payload byte count for a float value.
pub const FLOAT_PAYLOAD_LEN: u16 = 4;

/// Body bytes independent of the name: counter (2) + command (2) +
/// name length (1) + payload kind (1) + payload length (2) + value (4).
const BODY_OVERHEAD: usize = 12;

/// Maximum mailbox name length. The 1-byte length field declares
/// `name.len() + 1`, so 254 is the largest encodable name.
pub const MAX_NAME_LEN: usize = 254;

/// One named telemetry datum destined for a brick mailbox.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedValue {
    /// The mailbox name (printable ASCII, no embedded null).
    pub name: String,
    /// The float payload.
    pub value: f32,
}

impl NamedValue {
    /// Create a new named value.
    pub fn new(name: impl Into<String>, value: f32) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// The total wire size of this value once encoded (prefix + body).
    pub fn wire_size(&self) -> usize {
        LENGTH_PREFIX_SIZE + BODY_OVERHEAD + self.name.len()
    }
}

/// Encode one mailbox write into the wire format.
///
/// Wire format (all multi-byte fields little-endian):
/// ```text
/// ┌──────────┬─────────┬─────────┬──────────┬───────────┬──────┬──────────┬───────────┐
/// │ Length   │ Counter │ Command │ NameLen  │ Name      │ Kind │ PayLen   │ Value     │
/// │ (2B LE)  │ (2B LE) │ 0x9E81  │ (1B)     │ (N bytes) │ 0x00 │ (2B LE)  │ (4B f32)  │
/// │          │ = 1     │ (2B LE) │ = N + 1  │           │      │ = 4      │           │
/// └──────────┴─────────┴─────────┴──────────┴───────────┴──────┴──────────┴───────────┘
/// ```
///
/// The declared name length reserves one byte for a terminator that is never
/// written; the brick consumes the name without it. Callers are responsible
/// for keeping `name` printable ASCII with no embedded null.
pub fn encode_value(name: &str, value: f32, dst: &mut BytesMut) -> Result<()> {
    if name.len() > MAX_NAME_LEN {
        return Err(FrameError::NameTooLong {
            len: name.len(),
            max: MAX_NAME_LEN,
        });
    }

    let body_len = BODY_OVERHEAD + name.len();
    dst.reserve(LENGTH_PREFIX_SIZE + body_len);
    dst.put_u16_le(body_len as u16);
    dst.put_u16_le(MESSAGE_COUNTER);
    dst.put_u16_le(WRITE_MAILBOX);
    dst.put_u8((name.len() + 1) as u8);
    dst.put_slice(name.as_bytes());
    dst.put_u8(PAYLOAD_KIND_FLOAT);
    dst.put_u16_le(FLOAT_PAYLOAD_LEN);
    dst.put_f32_le(value);
    Ok(())
}

/// Encode one mailbox write into a freshly allocated buffer.
pub fn encoded_value(name: &str, value: f32) -> Result<Bytes> {
    let mut buf = BytesMut::new();
    encode_value(name, value, &mut buf)?;
    Ok(buf.freeze())
}

/// Decode a mailbox write from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, consumes the frame bytes from the buffer.
pub fn decode_value(src: &mut BytesMut) -> Result<Option<NamedValue>> {
    if src.len() < LENGTH_PREFIX_SIZE {
        return Ok(None); // Need more data
    }

    let body_len = u16::from_le_bytes(src[0..2].try_into().unwrap()) as usize;
    if src.len() < LENGTH_PREFIX_SIZE + body_len {
        return Ok(None); // Need more data
    }

    if body_len < BODY_OVERHEAD {
        return Err(FrameError::LengthMismatch {
            declared: body_len,
            actual: BODY_OVERHEAD,
        });
    }

    let command = u16::from_le_bytes(src[4..6].try_into().unwrap());
    if command != WRITE_MAILBOX {
        return Err(FrameError::UnknownCommand { command });
    }

    // Declared name length includes the phantom terminator byte.
    let declared_name_len = src[6] as usize;
    let name_len = declared_name_len.saturating_sub(1);
    if declared_name_len == 0 || BODY_OVERHEAD + name_len != body_len {
        return Err(FrameError::LengthMismatch {
            declared: body_len,
            actual: BODY_OVERHEAD + name_len,
        });
    }

    let kind = src[7 + name_len];
    if kind != PAYLOAD_KIND_FLOAT {
        return Err(FrameError::UnknownPayloadKind { kind });
    }

    let payload_len =
        u16::from_le_bytes(src[8 + name_len..10 + name_len].try_into().unwrap());
    if payload_len != FLOAT_PAYLOAD_LEN {
        return Err(FrameError::LengthMismatch {
            declared: payload_len as usize,
            actual: FLOAT_PAYLOAD_LEN as usize,
        });
    }

    let name = String::from_utf8_lossy(&src[7..7 + name_len]).into_owned();
    let value = f32::from_le_bytes(
        src[10 + name_len..14 + name_len].try_into().unwrap(),
    );

    src.advance(LENGTH_PREFIX_SIZE + body_len);

    Ok(Some(NamedValue { name, value }))
}
