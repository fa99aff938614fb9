//! Decoded packet records, one struct per op-code.
//!
//! Field names follow the Art-Net field tables; multi-byte values are already
//! converted to host integers and addresses to `Ipv4Addr`/`MacAddress`.

use std::fmt;
use std::net::Ipv4Addr;

use serde::{Serialize, Serializer};

use super::layout;
use super::opcode::OpCode;
use super::port_address::PortAddress;

/// Hardware address as carried in ArtPollReply.
///
/// # Examples
/// ```
/// use artnet_core::MacAddress;
///
/// let mac = MacAddress([0x00, 0x1a, 0x2b, 0x3c, 0x4d, 0xff]);
/// assert_eq!(mac.to_string(), "00:1a:2b:3c:4d:ff");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MacAddress(pub [u8; 6]);

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl Serialize for MacAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// ArtTrigger key classes; anything above `Show` is undefined by the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TriggerKey {
    Ascii,
    Macro,
    Soft,
    Show,
    Undefined(u8),
}

impl From<u8> for TriggerKey {
    fn from(value: u8) -> Self {
        match value {
            0 => TriggerKey::Ascii,
            1 => TriggerKey::Macro,
            2 => TriggerKey::Soft,
            3 => TriggerKey::Show,
            other => TriggerKey::Undefined(other),
        }
    }
}

impl From<TriggerKey> for u8 {
    fn from(key: TriggerKey) -> Self {
        match key {
            TriggerKey::Ascii => 0,
            TriggerKey::Macro => 1,
            TriggerKey::Soft => 2,
            TriggerKey::Show => 3,
            TriggerKey::Undefined(value) => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtPoll {
    pub protocol_version: u16,
    /// Flag bits, bit 0 first.
    pub flags: [bool; 8],
    pub diag_priority: u8,
    /// Target Port-Address pair in wire order: the word at 16..18, then 14..16.
    pub target_port: [u16; 2],
    pub esta_man: u16,
    pub oem: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtPollReply {
    pub ip_address: Ipv4Addr,
    pub port_number: u16,
    pub vers_info: u16,
    pub net_switch: u8,
    pub sub_switch: u8,
    pub oem: u16,
    pub ubea_version: u8,
    pub status1: u8,
    pub esta_man: u16,
    pub short_name: String,
    pub long_name: String,
    pub node_report: String,
    pub num_ports: u16,
    pub port_types: [u8; 4],
    pub good_input: [u8; 4],
    pub good_output: [u8; 4],
    pub sw_in: [u8; 4],
    pub sw_out: [u8; 4],
    pub sw_video: u8,
    pub sw_macro: u8,
    pub sw_remote: u8,
    pub spare: [u8; 3],
    pub style: u8,
    pub mac: MacAddress,
    pub bind_ip: Ipv4Addr,
    pub bind_index: u8,
    pub status2: u8,
    pub filler: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtDmx {
    pub protocol_version: u16,
    pub sequence: u8,
    pub physical: u8,
    pub universe: u16,
    pub length: u16,
    pub data: Vec<u8>,
}

impl ArtDmx {
    /// Whether the embedded length agrees with the bytes actually received.
    pub fn length_matches(&self) -> bool {
        self.length as usize == self.data.len()
    }

    pub fn port_address(&self) -> PortAddress {
        PortAddress::from_raw(self.universe)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtNzs {
    pub protocol_version: u16,
    pub sequence: u8,
    pub start_code: u8,
    pub universe: u16,
    pub length: u16,
    pub data: Vec<u8>,
}

impl ArtNzs {
    pub fn length_matches(&self) -> bool {
        self.length as usize == self.data.len()
    }

    pub fn port_address(&self) -> PortAddress {
        PortAddress::from_raw(self.universe)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtSync {
    pub protocol_version: u16,
    pub aux1: u8,
    pub aux2: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtTrigger {
    pub protocol_version: u16,
    pub oem: u16,
    pub key: u8,
    pub sub_key: u8,
    pub data: Vec<u8>,
}

impl ArtTrigger {
    pub fn trigger_key(&self) -> TriggerKey {
        TriggerKey::from(self.key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtIpProg {
    pub protocol_version: u16,
    pub command: u8,
    pub prog_ip: Ipv4Addr,
    pub prog_subnet: Ipv4Addr,
    pub prog_port: u16,
    pub prog_gateway: Ipv4Addr,
    pub spare: Vec<u8>,
}

impl ArtIpProg {
    /// A zero command byte only asks the node to report its settings.
    pub fn is_enquiry(&self) -> bool {
        self.command == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtIpProgReply {
    pub protocol_version: u16,
    pub prog_ip: Ipv4Addr,
    pub prog_subnet: Ipv4Addr,
    pub prog_port: u16,
    pub status: u8,
    pub prog_gateway: Ipv4Addr,
}

impl ArtIpProgReply {
    pub fn dhcp_enabled(&self) -> bool {
        self.status & layout::ip_prog_reply::STATUS_DHCP_ENABLED != 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtAddress {
    pub protocol_version: u16,
    pub net_switch: u8,
    pub bind_index: u8,
    pub short_name: String,
    pub long_name: String,
    pub sw_in: [u8; 4],
    pub sw_out: [u8; 4],
    pub sub_switch: u8,
    pub acn_priority: u8,
    pub command: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtCommand {
    pub protocol_version: u16,
    pub esta_man: u16,
    pub length: u16,
    pub text: String,
}

/// Any decoded datagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op_code")]
pub enum Packet {
    #[serde(rename = "ArtPoll")]
    Poll(ArtPoll),
    #[serde(rename = "ArtPollReply")]
    PollReply(ArtPollReply),
    #[serde(rename = "ArtCommand")]
    Command(ArtCommand),
    #[serde(rename = "ArtTrigger")]
    Trigger(ArtTrigger),
    #[serde(rename = "ArtDmx")]
    Dmx(ArtDmx),
    #[serde(rename = "ArtNzs")]
    Nzs(ArtNzs),
    #[serde(rename = "ArtSync")]
    Sync(ArtSync),
    #[serde(rename = "ArtIpProg")]
    IpProg(ArtIpProg),
    #[serde(rename = "ArtIpProgReply")]
    IpProgReply(ArtIpProgReply),
    #[serde(rename = "ArtAddress")]
    Address(ArtAddress),
}

impl Packet {
    pub fn op_code(&self) -> OpCode {
        match self {
            Packet::Poll(_) => OpCode::Poll,
            Packet::PollReply(_) => OpCode::PollReply,
            Packet::Command(_) => OpCode::Command,
            Packet::Trigger(_) => OpCode::Trigger,
            Packet::Dmx(_) => OpCode::Dmx,
            Packet::Nzs(_) => OpCode::Nzs,
            Packet::Sync(_) => OpCode::Sync,
            Packet::IpProg(_) => OpCode::IpProg,
            Packet::IpProgReply(_) => OpCode::IpProgReply,
            Packet::Address(_) => OpCode::Address,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_key_conversions() {
        assert_eq!(TriggerKey::from(2), TriggerKey::Soft);
        assert_eq!(TriggerKey::from(200), TriggerKey::Undefined(200));
        assert_eq!(u8::from(TriggerKey::Show), 3);
        assert_eq!(u8::from(TriggerKey::Undefined(9)), 9);
    }

    #[test]
    fn dmx_length_mismatch_is_flagged() {
        let dmx = ArtDmx {
            protocol_version: 14,
            sequence: 0,
            physical: 0,
            universe: 0,
            length: 4,
            data: vec![1, 2],
        };
        assert!(!dmx.length_matches());
    }

    #[test]
    fn ip_prog_reply_dhcp_bit() {
        let reply = ArtIpProgReply {
            protocol_version: 14,
            prog_ip: Ipv4Addr::UNSPECIFIED,
            prog_subnet: Ipv4Addr::UNSPECIFIED,
            prog_port: 0,
            status: 0b0100_0000,
            prog_gateway: Ipv4Addr::UNSPECIFIED,
        };
        assert!(reply.dhcp_enabled());
    }

    #[test]
    fn packet_serializes_with_op_code_tag() {
        let packet = Packet::Sync(ArtSync {
            protocol_version: 14,
            aux1: 0,
            aux2: 0,
        });
        let value = serde_json::to_value(&packet).expect("packet json");
        assert_eq!(value["op_code"], "ArtSync");
        assert_eq!(value["protocol_version"], 14);
        assert_eq!(packet.op_code(), OpCode::Sync);
    }

    #[test]
    fn addresses_serialize_as_strings() {
        let mac = MacAddress([0xde, 0xad, 0xbe, 0xef, 0x00, 0x01]);
        let value = serde_json::to_value(mac).expect("mac json");
        assert_eq!(value, "de:ad:be:ef:00:01");
    }
}
