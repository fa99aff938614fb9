//! Art-Net v14 wire codec.
//!
//! The codec follows a layered structure:
//! - `layout`: byte offsets, minimum lengths and protocol constants (source of truth)
//! - `reader` / `writer`: bounds-checked byte access and endianness conventions
//! - `parser` / `encoder`: domain-level decoding and packing (no direct byte indexing)
//! - `records`: one typed struct per op-code, wrapped in `Packet`
//! - `error`: explicit, actionable errors
//!
//! The codec is pure: it never performs I/O and works on whatever byte
//! buffers it is handed.

pub mod encoder;
pub mod error;
pub mod layout;
pub mod opcode;
pub mod parser;
pub mod port_address;
pub mod reader;
pub mod records;
pub mod writer;

pub use encoder::{
    AddressRequest, IpProgRequest, encode_address, encode_command, encode_dmx, encode_ip_prog,
    encode_nzs, encode_poll, encode_sync, encode_trigger,
};
pub use error::{DecodeError, EncodeError};
pub use opcode::OpCode;
pub use parser::{decode, decode_body, parse_header};
pub use port_address::PortAddress;
pub use records::{
    ArtAddress, ArtCommand, ArtDmx, ArtIpProg, ArtIpProgReply, ArtNzs, ArtPoll, ArtPollReply,
    ArtSync, ArtTrigger, MacAddress, Packet, TriggerKey,
};
