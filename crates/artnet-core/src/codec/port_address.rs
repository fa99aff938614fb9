use std::fmt;

use serde::Serialize;

use super::error::EncodeError;
use super::layout::UNIVERSE_MAX;

pub const NET_MAX: u8 = 0x7f;
pub const SUBNET_MAX: u8 = 0x0f;
pub const UNIVERSE_IN_SUBNET_MAX: u8 = 0x0f;

/// 15-bit Port-Address: Net in bits 14-8, Sub-Net in 7-4, Universe in 3-0.
///
/// # Examples
/// ```
/// use artnet_core::PortAddress;
///
/// let addr = PortAddress::new(127, 15, 15).unwrap();
/// assert_eq!(addr.as_u16(), 32767);
/// assert!(PortAddress::new(128, 0, 0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
#[serde(transparent)]
pub struct PortAddress(u16);

impl PortAddress {
    pub fn new(net: u8, subnet: u8, universe: u8) -> Result<Self, EncodeError> {
        check_range("net", net, NET_MAX)?;
        check_range("sub", subnet, SUBNET_MAX)?;
        check_range("universe", universe, UNIVERSE_IN_SUBNET_MAX)?;
        Ok(Self::compose(net, subnet, universe))
    }

    /// Composes without validation, silently masking each part.
    pub fn compose(net: u8, subnet: u8, universe: u8) -> Self {
        let net = u16::from(net & NET_MAX);
        let subnet = u16::from(subnet & SUBNET_MAX);
        let universe = u16::from(universe & UNIVERSE_IN_SUBNET_MAX);
        Self(net << 8 | subnet << 4 | universe)
    }

    /// Bit 15 is reserved and dropped.
    pub fn from_raw(value: u16) -> Self {
        Self(value & UNIVERSE_MAX)
    }

    pub fn as_u16(self) -> u16 {
        self.0
    }

    pub fn net(self) -> u8 {
        (self.0 >> 8) as u8 & NET_MAX
    }

    pub fn subnet(self) -> u8 {
        (self.0 >> 4) as u8 & SUBNET_MAX
    }

    pub fn universe(self) -> u8 {
        self.0 as u8 & UNIVERSE_IN_SUBNET_MAX
    }
}

impl TryFrom<u16> for PortAddress {
    type Error = EncodeError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        if value > UNIVERSE_MAX {
            return Err(EncodeError::OutOfRange {
                field: "universe",
                value,
                max: UNIVERSE_MAX,
            });
        }
        Ok(Self(value))
    }
}

impl From<PortAddress> for u16 {
    fn from(addr: PortAddress) -> Self {
        addr.0
    }
}

impl fmt::Display for PortAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.net(), self.subnet(), self.universe())
    }
}

fn check_range(field: &'static str, value: u8, max: u8) -> Result<(), EncodeError> {
    if value > max {
        return Err(EncodeError::OutOfRange {
            field,
            value: value.into(),
            max: max.into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::PortAddress;
    use crate::codec::error::EncodeError;

    #[test]
    fn parts_round_trip() {
        let addr = PortAddress::new(0x12, 0x3, 0x4).unwrap();
        assert_eq!(addr.as_u16(), 0x1234);
        assert_eq!(addr.net(), 0x12);
        assert_eq!(addr.subnet(), 0x3);
        assert_eq!(addr.universe(), 0x4);
        assert_eq!(addr.to_string(), "18:3:4");
    }

    #[test]
    fn new_rejects_each_part() {
        assert!(matches!(
            PortAddress::new(128, 0, 0),
            Err(EncodeError::OutOfRange { field: "net", .. })
        ));
        assert!(matches!(
            PortAddress::new(0, 16, 0),
            Err(EncodeError::OutOfRange { field: "sub", .. })
        ));
        assert!(matches!(
            PortAddress::new(0, 0, 16),
            Err(EncodeError::OutOfRange { field: "universe", .. })
        ));
    }

    #[test]
    fn compose_masks_parts() {
        assert_eq!(PortAddress::compose(0xff, 0xff, 0xff).as_u16(), 0x7fff);
        assert_eq!(PortAddress::compose(1, 0x10, 0x11).as_u16(), 0x0101);
    }

    #[test]
    fn try_from_raw_value() {
        assert_eq!(PortAddress::try_from(0x7fff).unwrap().as_u16(), 0x7fff);
        assert!(PortAddress::try_from(0x8000).is_err());
        assert_eq!(PortAddress::from_raw(0xffff).as_u16(), 0x7fff);
    }
}
