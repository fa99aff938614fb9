use std::net::Ipv4Addr;

use bytes::BufMut;

use super::layout;
use super::opcode::OpCode;

/// Appends fields in wire order behind a pre-written Art-Net header.
pub struct PacketWriter {
    buf: Vec<u8>,
}

impl PacketWriter {
    /// Starts a packet with marker, op-code and protocol version.
    pub fn new(op: OpCode, body_len: usize) -> Self {
        let mut buf = Vec::with_capacity(layout::HEADER_LEN + body_len);
        buf.put_slice(layout::ARTNET_ID);
        buf.put_u16_le(op.as_u16());
        buf.put_u16(layout::PROTOCOL_VERSION);
        Self { buf }
    }

    pub fn u8(&mut self, value: u8) -> &mut Self {
        self.buf.put_u8(value);
        self
    }

    pub fn u16_le(&mut self, value: u16) -> &mut Self {
        self.buf.put_u16_le(value);
        self
    }

    pub fn u16_be(&mut self, value: u16) -> &mut Self {
        self.buf.put_u16(value);
        self
    }

    pub fn zeros(&mut self, count: usize) -> &mut Self {
        self.buf.put_bytes(0, count);
        self
    }

    pub fn bytes(&mut self, value: &[u8]) -> &mut Self {
        self.buf.put_slice(value);
        self
    }

    pub fn ipv4(&mut self, value: Ipv4Addr) -> &mut Self {
        self.buf.put_slice(&value.octets());
        self
    }

    /// Writes at most `width - 1` bytes of `text` and NUL-pads to `width`.
    ///
    /// Callers validate that `text` is ASCII.
    pub fn padded_ascii(&mut self, text: &str, width: usize) -> &mut Self {
        let bytes = text.as_bytes();
        let used = bytes.len().min(width.saturating_sub(1));
        self.buf.put_slice(&bytes[..used]);
        self.buf.put_bytes(0, width - used);
        self
    }

    pub fn finish(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buf)
    }
}
