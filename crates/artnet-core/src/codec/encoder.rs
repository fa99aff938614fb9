//! Outbound packet construction.
//!
//! Every encoder validates its arguments before allocating, so an `Err` means
//! nothing was packed. Multi-byte fields are little-endian except the
//! protocol version and the DMX/NZS length, which are big-endian.

use std::net::Ipv4Addr;

use super::error::EncodeError;
use super::layout;
use super::opcode::OpCode;
use super::port_address::PortAddress;
use super::writer::PacketWriter;

/// ArtIpProg intents.
///
/// Unset addresses go out as `0.0.0.0` and an unset port as 0. When `dhcp`
/// is requested the node ignores every other programming intent.
///
/// # Examples
/// ```
/// use std::net::Ipv4Addr;
/// use artnet_core::IpProgRequest;
///
/// let request = IpProgRequest {
///     prog_ip: Some(Ipv4Addr::new(2, 0, 0, 10)),
///     ..IpProgRequest::default()
/// };
/// assert_eq!(request.command_byte(), 0b1000_0100);
/// assert_eq!(IpProgRequest::default().command_byte(), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IpProgRequest {
    pub dhcp: bool,
    pub prog_ip: Option<Ipv4Addr>,
    pub prog_subnet: Option<Ipv4Addr>,
    pub prog_gateway: Option<Ipv4Addr>,
    pub prog_port: Option<u16>,
    /// Return IP, subnet mask and gateway to factory defaults.
    pub reset: bool,
}

impl IpProgRequest {
    pub fn command_byte(&self) -> u8 {
        use layout::ip_prog::*;

        let mut command = 0u8;
        if self.dhcp {
            command |= CMD_ENABLE_DHCP;
        } else {
            if self.prog_gateway.is_some() {
                command |= CMD_PROGRAM_GATEWAY;
            }
            if self.reset {
                command |= CMD_RESET_DEFAULTS;
            }
            if self.prog_ip.is_some() {
                command |= CMD_PROGRAM_IP;
            }
            if self.prog_subnet.is_some() {
                command |= CMD_PROGRAM_SUBNET;
            }
            if self.prog_port.is_some() {
                command |= CMD_PROGRAM_PORT;
            }
        }
        if command != 0 {
            command |= CMD_ENABLE_PROGRAMMING;
        }
        command
    }
}

/// ArtAddress request: one Port-Address plus optional node names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressRequest {
    pub net: u8,
    pub sub: u8,
    pub universe: u8,
    pub short_name: String,
    pub long_name: String,
}

impl AddressRequest {
    pub fn new(net: u8, sub: u8, universe: u8) -> Self {
        Self {
            net,
            sub,
            universe,
            ..Self::default()
        }
    }

    pub fn port_address(&self) -> Result<PortAddress, EncodeError> {
        PortAddress::new(self.net, self.sub, self.universe)
    }
}

pub fn encode_poll() -> Vec<u8> {
    use layout::poll::*;

    PacketWriter::new(OpCode::Poll, MIN_LEN - layout::HEADER_LEN)
        .u8(0) // flags
        .u8(0) // diag priority
        .u16_le(0) // target top
        .u16_le(0) // target bottom
        .u16_le(layout::ESTA_MANUFACTURER)
        .u16_le(layout::OEM_UNKNOWN)
        .finish()
}

/// ArtDmx for one 15-bit universe.
///
/// # Examples
/// ```
/// use artnet_core::{EncodeError, encode_dmx};
///
/// let packet = encode_dmx(1, 0, &[0u8; 512]).unwrap();
/// assert_eq!(&packet[16..18], &[0x02, 0x00]);
/// assert!(matches!(
///     encode_dmx(1, 0, &[0u8; 513]),
///     Err(EncodeError::PayloadTooLarge { .. })
/// ));
/// ```
pub fn encode_dmx(universe: u16, sequence: u8, data: &[u8]) -> Result<Vec<u8>, EncodeError> {
    encode_dmx_frame(OpCode::Dmx, universe, sequence, 0, data)
}

/// ArtNzs: DMX with a non-zero start code.
pub fn encode_nzs(
    universe: u16,
    sequence: u8,
    start_code: u8,
    data: &[u8],
) -> Result<Vec<u8>, EncodeError> {
    encode_dmx_frame(OpCode::Nzs, universe, sequence, start_code, data)
}

fn encode_dmx_frame(
    op: OpCode,
    universe: u16,
    sequence: u8,
    physical_or_start_code: u8,
    data: &[u8],
) -> Result<Vec<u8>, EncodeError> {
    if data.len() > layout::DMX_MAX_SLOTS {
        return Err(EncodeError::PayloadTooLarge {
            len: data.len(),
            max: layout::DMX_MAX_SLOTS,
        });
    }
    let universe = PortAddress::try_from(universe)?;

    Ok(PacketWriter::new(op, 6 + data.len())
        .u8(sequence)
        .u8(physical_or_start_code)
        .u16_le(universe.as_u16())
        .u16_be(data.len() as u16)
        .bytes(data)
        .finish())
}

/// ArtTrigger; `data` is appended verbatim.
pub fn encode_trigger(key: u8, sub_key: u8, data: &[u8]) -> Vec<u8> {
    PacketWriter::new(OpCode::Trigger, 6 + data.len())
        .zeros(layout::trigger::FILLER_RANGE.len())
        .u16_le(layout::OEM_UNKNOWN)
        .u8(key)
        .u8(sub_key)
        .bytes(data)
        .finish()
}

pub fn encode_sync() -> Vec<u8> {
    PacketWriter::new(OpCode::Sync, 2).zeros(2).finish()
}

pub fn encode_ip_prog(request: &IpProgRequest) -> Vec<u8> {
    let unset = Ipv4Addr::UNSPECIFIED;

    PacketWriter::new(OpCode::IpProg, 22)
        .zeros(2) // filler 1, 2
        .u8(request.command_byte())
        .zeros(1) // filler 4
        .ipv4(request.prog_ip.unwrap_or(unset))
        .ipv4(request.prog_subnet.unwrap_or(unset))
        .u16_le(request.prog_port.unwrap_or(0))
        .ipv4(request.prog_gateway.unwrap_or(unset))
        .zeros(layout::ip_prog::SPARE_LEN)
        .finish()
}

/// ArtAddress programming one input and one output port.
///
/// SubSwitch and the first SwIn/SwOut carry bit 7 so the node applies them;
/// NetSwitch is sent as the bare value.
pub fn encode_address(request: &AddressRequest) -> Result<Vec<u8>, EncodeError> {
    use layout::address::*;

    let port_address = request.port_address()?;
    let short_name = require_ascii("short_name", &request.short_name)?;
    let long_name = require_ascii("long_name", &request.long_name)?;
    let switch = PROGRAM_BIT | port_address.universe();

    Ok(PacketWriter::new(OpCode::Address, MIN_LEN - layout::HEADER_LEN)
        .u8(port_address.net())
        .u8(0) // bind index
        .padded_ascii(short_name, SHORT_NAME_LEN)
        .padded_ascii(long_name, LONG_NAME_LEN)
        .bytes(&[switch, 0, 0, 0])
        .bytes(&[switch, 0, 0, 0])
        .u8(PROGRAM_BIT | port_address.subnet())
        .u8(0) // acn priority
        .u8(0) // command
        .finish())
}

/// ArtCommand carrying `text`, NUL-terminated; the length counts the NUL.
pub fn encode_command(esta_man: u16, text: &str) -> Result<Vec<u8>, EncodeError> {
    use layout::command::*;

    let text = require_ascii("text", text)?;
    if text.len() >= MAX_DATA_LEN {
        return Err(EncodeError::PayloadTooLarge {
            len: text.len(),
            max: MAX_DATA_LEN - 1,
        });
    }
    let len = text.len() + 1;

    Ok(PacketWriter::new(OpCode::Command, 4 + len)
        .u16_le(esta_man)
        .u16_le(len as u16)
        .bytes(text.as_bytes())
        .u8(0)
        .finish())
}

fn require_ascii<'a>(field: &'static str, text: &'a str) -> Result<&'a str, EncodeError> {
    if !text.is_ascii() {
        return Err(EncodeError::NonAscii { field });
    }
    Ok(text)
}
