use std::net::Ipv4Addr;
use std::ops::Range;

use super::error::DecodeError;
use super::opcode::OpCode;
use super::records::MacAddress;

/// Bounds-checked access to one datagram body.
///
/// Every read returns `TooShort` instead of indexing past the end, so parsers
/// never touch raw offsets directly.
pub struct ArtNetReader<'a> {
    payload: &'a [u8],
    op: OpCode,
}

impl<'a> ArtNetReader<'a> {
    pub fn new(payload: &'a [u8], op: OpCode) -> Self {
        Self { payload, op }
    }

    fn too_short(&self, needed: usize) -> DecodeError {
        DecodeError::TooShort {
            op: self.op,
            needed,
            actual: self.payload.len(),
        }
    }

    pub fn require_len(&self, needed: usize) -> Result<(), DecodeError> {
        if self.payload.len() < needed {
            return Err(self.too_short(needed));
        }
        Ok(())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, DecodeError> {
        self.payload
            .get(offset)
            .copied()
            .ok_or_else(|| self.too_short(offset + 1))
    }

    pub fn read_u16_le(&self, range: Range<usize>) -> Result<u16, DecodeError> {
        let [lo, hi] = self.read_array::<2>(range.start)?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    pub fn read_u16_be(&self, range: Range<usize>) -> Result<u16, DecodeError> {
        let [hi, lo] = self.read_array::<2>(range.start)?;
        Ok(u16::from_be_bytes([hi, lo]))
    }

    pub fn read_slice(&self, range: Range<usize>) -> Result<&'a [u8], DecodeError> {
        self.payload
            .get(range.clone())
            .ok_or_else(|| self.too_short(range.end))
    }

    pub fn read_array<const N: usize>(&self, offset: usize) -> Result<[u8; N], DecodeError> {
        let bytes = self.read_slice(offset..offset + N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Everything from `offset` to the end of the datagram.
    pub fn read_tail(&self, offset: usize) -> Result<&'a [u8], DecodeError> {
        self.payload
            .get(offset..)
            .ok_or_else(|| self.too_short(offset))
    }

    pub fn read_ipv4(&self, range: Range<usize>) -> Result<Ipv4Addr, DecodeError> {
        Ok(Ipv4Addr::from(self.read_array::<4>(range.start)?))
    }

    pub fn read_mac(&self, offset: usize) -> Result<MacAddress, DecodeError> {
        Ok(MacAddress(self.read_array::<6>(offset)?))
    }

    /// Bit `i` of the byte at `offset` lands in slot `i`.
    pub fn read_flags(&self, offset: usize) -> Result<[bool; 8], DecodeError> {
        let byte = self.read_u8(offset)?;
        Ok(std::array::from_fn(|bit| (byte >> bit) & 1 == 1))
    }

    /// Fixed-width, NUL-padded text field.
    pub fn read_ascii_string(&self, range: Range<usize>) -> Result<String, DecodeError> {
        let bytes = self.read_slice(range)?;
        Ok(String::from_utf8_lossy(trim_trailing_nul(bytes)).into_owned())
    }

    pub fn read_ascii_tail(&self, offset: usize) -> Result<String, DecodeError> {
        let bytes = self.read_tail(offset)?;
        Ok(String::from_utf8_lossy(trim_trailing_nul(bytes)).into_owned())
    }
}

pub(crate) fn trim_trailing_nul(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|&b| b != 0)
        .map_or(0, |last| last + 1);
    &bytes[..end]
}
