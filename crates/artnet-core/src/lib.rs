//! Art-Net v14 client library: wire codec, op-code dispatch and a UDP session.
//!
//! The crate is split in three layers. `codec` turns byte buffers into typed
//! records and back (layout/reader/parser on the way in, writer/encoder on
//! the way out) without doing any I/O. `dispatch` routes decoded packets to
//! per-op-code handlers. `session` owns the socket, the receive loop and the
//! senders used to control nodes.
//!
//! Invariants:
//! - Every emitted packet starts with `Art-Net\0`, a little-endian op-code
//!   and protocol version 14 in big-endian order.
//! - Decoding never reads past the end of a datagram; short payloads yield
//!   `DecodeError::TooShort` instead.
//! - Encoding validates all arguments before any byte is sent.
//!
//! Version française (résumé):
//! Cette crate fournit un client Art-Net v14 : codec (layout/reader/parser,
//! writer/encoder) sans E/S, répartition par op-code, et session UDP.
//! Les erreurs de décodage sont explicites ; aucune lecture hors limites.
//!
//! # Examples
//! ```
//! use artnet_core::{OpCode, Packet, decode, encode_dmx};
//!
//! let bytes = encode_dmx(0x0001, 7, &[255, 0, 128])?;
//! let Packet::Dmx(dmx) = decode(&bytes)? else {
//!     unreachable!("encoded an ArtDmx");
//! };
//! assert_eq!(dmx.universe, 1);
//! assert_eq!(dmx.data, vec![255, 0, 128]);
//! assert_eq!(OpCode::Dmx.as_u16(), 0x5000);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod codec;
mod dispatch;
mod session;

pub use codec::layout::{ARTNET_PORT, DMX_MAX_SLOTS, PROTOCOL_VERSION, UNIVERSE_MAX};
pub use codec::{
    AddressRequest, ArtAddress, ArtCommand, ArtDmx, ArtIpProg, ArtIpProgReply, ArtNzs, ArtPoll,
    ArtPollReply, ArtSync, ArtTrigger, DecodeError, EncodeError, IpProgRequest, MacAddress,
    OpCode, Packet, PortAddress, TriggerKey, decode, decode_body, encode_address, encode_command,
    encode_dmx, encode_ip_prog, encode_nzs, encode_poll, encode_sync, encode_trigger,
    parse_header,
};
pub use dispatch::{Dispatch, Dispatcher, Handler};
pub use session::{
    DEFAULT_FPS, DEFAULT_LISTEN_TIMEOUT_SECS, DEFAULT_RECV_BUFFER_SIZE, MIN_RECV_BUFFER_SIZE,
    Session, SessionConfig, SessionError, Transport, UdpTransport,
};
