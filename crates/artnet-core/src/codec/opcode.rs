use std::fmt;

use serde::Serialize;

/// Packet kinds understood by this crate, keyed by their wire op-code.
///
/// # Examples
/// ```
/// use artnet_core::OpCode;
///
/// assert_eq!(OpCode::from_u16(0x5000), Some(OpCode::Dmx));
/// assert_eq!(OpCode::Dmx.as_u16(), 0x5000);
/// assert_eq!(OpCode::from_u16(0x1234), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[repr(u16)]
pub enum OpCode {
    #[serde(rename = "ArtPoll")]
    Poll = 0x2000,
    #[serde(rename = "ArtPollReply")]
    PollReply = 0x2100,
    #[serde(rename = "ArtCommand")]
    Command = 0x2400,
    #[serde(rename = "ArtTrigger")]
    Trigger = 0x9900,
    #[serde(rename = "ArtDmx")]
    Dmx = 0x5000,
    #[serde(rename = "ArtNzs")]
    Nzs = 0x5100,
    #[serde(rename = "ArtSync")]
    Sync = 0x5200,
    #[serde(rename = "ArtIpProg")]
    IpProg = 0xf800,
    #[serde(rename = "ArtIpProgReply")]
    IpProgReply = 0xf900,
    #[serde(rename = "ArtAddress")]
    Address = 0x6000,
}

impl OpCode {
    /// Every op-code that has a decoder, in registry order.
    pub const ALL: [OpCode; 10] = [
        OpCode::Poll,
        OpCode::PollReply,
        OpCode::Trigger,
        OpCode::Dmx,
        OpCode::Nzs,
        OpCode::Sync,
        OpCode::IpProg,
        OpCode::IpProgReply,
        OpCode::Address,
        OpCode::Command,
    ];

    pub fn from_u16(value: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_u16() == value)
    }

    pub fn as_u16(self) -> u16 {
        self as u16
    }

    pub fn name(self) -> &'static str {
        match self {
            OpCode::Poll => "ArtPoll",
            OpCode::PollReply => "ArtPollReply",
            OpCode::Command => "ArtCommand",
            OpCode::Trigger => "ArtTrigger",
            OpCode::Dmx => "ArtDmx",
            OpCode::Nzs => "ArtNzs",
            OpCode::Sync => "ArtSync",
            OpCode::IpProg => "ArtIpProg",
            OpCode::IpProgReply => "ArtIpProgReply",
            OpCode::Address => "ArtAddress",
        }
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u16> for OpCode {
    type Error = u16;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::from_u16(value).ok_or(value)
    }
}

impl From<OpCode> for u16 {
    fn from(op: OpCode) -> Self {
        op.as_u16()
    }
}
