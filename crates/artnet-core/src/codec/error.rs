use thiserror::Error;

use super::opcode::OpCode;

/// Why a datagram produced no packet.
///
/// None of these are faults: Art-Net shares its port with whatever else is on
/// the wire, so callers usually log and move on.
///
/// # Examples
/// ```
/// use artnet_core::{DecodeError, decode};
///
/// let err = decode(b"hello").unwrap_err();
/// assert!(matches!(err, DecodeError::NotArtNet));
/// assert!(!err.is_art_net());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("not an Art-Net packet")]
    NotArtNet,
    #[error("unknown op-code 0x{opcode:04x}")]
    UnknownOpCode { opcode: u16 },
    #[error("{op} payload too short: need {needed} bytes, got {actual}")]
    TooShort {
        op: OpCode,
        needed: usize,
        actual: usize,
    },
}

impl DecodeError {
    /// True when the marker matched and only the body was unusable.
    pub fn is_art_net(&self) -> bool {
        !matches!(self, DecodeError::NotArtNet)
    }
}

/// Arguments rejected before anything is packed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("payload too large: {len} bytes, at most {max} allowed")]
    PayloadTooLarge { len: usize, max: usize },
    #[error("{field} out of range: {value} (max {max})")]
    OutOfRange {
        field: &'static str,
        value: u16,
        max: u16,
    },
    #[error("{field} must be ASCII")]
    NonAscii { field: &'static str },
}
