use std::ops::Range;

pub const ARTNET_ID: &[u8; 8] = b"Art-Net\0";
pub const PROTOCOL_VERSION: u16 = 14;
pub const ARTNET_PORT: u16 = 6454;

/// OEM code "OemUnknown".
pub const OEM_UNKNOWN: u16 = 0x00ff;
pub const ESTA_MANUFACTURER: u16 = 0x0000;

pub const ID_RANGE: Range<usize> = 0..8;
pub const OP_CODE_RANGE: Range<usize> = 8..10;
pub const VERSION_RANGE: Range<usize> = 10..12;
pub const HEADER_LEN: usize = 12;
/// Marker plus op-code: the least a datagram needs to be classified.
pub const MIN_HEADER_LEN: usize = OP_CODE_RANGE.end;

pub const DMX_MAX_SLOTS: usize = 512;
pub const UNIVERSE_MAX: u16 = 0x7fff;

pub mod poll {
    use std::ops::Range;

    pub const FLAGS_OFFSET: usize = 12;
    pub const DIAG_PRIORITY_OFFSET: usize = 13;
    pub const TARGET_TOP_RANGE: Range<usize> = 14..16;
    pub const TARGET_BOTTOM_RANGE: Range<usize> = 16..18;
    pub const ESTA_MAN_RANGE: Range<usize> = 18..20;
    pub const OEM_RANGE: Range<usize> = 20..22;
    pub const MIN_LEN: usize = 22;
}

pub mod poll_reply {
    use std::ops::Range;

    pub const IP_RANGE: Range<usize> = 10..14;
    pub const PORT_RANGE: Range<usize> = 14..16;
    pub const VERS_INFO_RANGE: Range<usize> = 16..18;
    pub const NET_SWITCH_OFFSET: usize = 18;
    pub const SUB_SWITCH_OFFSET: usize = 19;
    pub const OEM_RANGE: Range<usize> = 20..22;
    pub const UBEA_VERSION_OFFSET: usize = 22;
    pub const STATUS1_OFFSET: usize = 23;
    pub const ESTA_MAN_RANGE: Range<usize> = 24..26;
    pub const SHORT_NAME_RANGE: Range<usize> = 26..44;
    pub const LONG_NAME_RANGE: Range<usize> = 44..108;
    pub const NODE_REPORT_RANGE: Range<usize> = 108..172;
    pub const NUM_PORTS_RANGE: Range<usize> = 172..174;
    pub const PORT_TYPES_OFFSET: usize = 174;
    pub const GOOD_INPUT_OFFSET: usize = 178;
    pub const GOOD_OUTPUT_OFFSET: usize = 182;
    pub const SW_IN_OFFSET: usize = 186;
    pub const SW_OUT_OFFSET: usize = 190;
    pub const SW_VIDEO_OFFSET: usize = 194;
    pub const SW_MACRO_OFFSET: usize = 195;
    pub const SW_REMOTE_OFFSET: usize = 196;
    pub const SPARE_OFFSET: usize = 197;
    pub const STYLE_OFFSET: usize = 200;
    pub const MAC_OFFSET: usize = 201;
    pub const BIND_IP_RANGE: Range<usize> = 207..211;
    pub const BIND_INDEX_OFFSET: usize = 211;
    pub const STATUS2_OFFSET: usize = 212;
    pub const FILLER_RANGE: Range<usize> = 213..239;
    pub const MIN_LEN: usize = 239;
}

/// Shared by ArtDmx and ArtNzs; offset 13 is Physical for one, StartCode for the other.
pub mod dmx {
    use std::ops::Range;

    pub const SEQUENCE_OFFSET: usize = 12;
    pub const PHYSICAL_OFFSET: usize = 13;
    pub const START_CODE_OFFSET: usize = 13;
    pub const UNIVERSE_RANGE: Range<usize> = 14..16;
    pub const LENGTH_RANGE: Range<usize> = 16..18;
    pub const DATA_OFFSET: usize = 18;
    pub const MIN_LEN: usize = DATA_OFFSET;
}

pub mod sync {
    pub const AUX1_OFFSET: usize = 12;
    pub const AUX2_OFFSET: usize = 13;
    pub const MIN_LEN: usize = 14;
}

pub mod trigger {
    use std::ops::Range;

    pub const FILLER_RANGE: Range<usize> = 12..14;
    pub const OEM_RANGE: Range<usize> = 14..16;
    pub const KEY_OFFSET: usize = 16;
    pub const SUB_KEY_OFFSET: usize = 17;
    pub const DATA_OFFSET: usize = 18;
    pub const MIN_LEN: usize = DATA_OFFSET;
}

pub mod ip_prog {
    use std::ops::Range;

    pub const COMMAND_OFFSET: usize = 14;
    pub const PROG_IP_RANGE: Range<usize> = 16..20;
    pub const PROG_SUBNET_RANGE: Range<usize> = 20..24;
    pub const PROG_PORT_RANGE: Range<usize> = 24..26;
    pub const PROG_GATEWAY_RANGE: Range<usize> = 26..30;
    pub const SPARE_OFFSET: usize = 30;
    pub const SPARE_LEN: usize = 4;
    pub const MIN_LEN: usize = SPARE_OFFSET;

    pub const CMD_ENABLE_PROGRAMMING: u8 = 1 << 7;
    pub const CMD_ENABLE_DHCP: u8 = 1 << 6;
    pub const CMD_PROGRAM_GATEWAY: u8 = 1 << 4;
    pub const CMD_RESET_DEFAULTS: u8 = 1 << 3;
    pub const CMD_PROGRAM_IP: u8 = 1 << 2;
    pub const CMD_PROGRAM_SUBNET: u8 = 1 << 1;
    pub const CMD_PROGRAM_PORT: u8 = 1 << 0;
}

pub mod ip_prog_reply {
    use std::ops::Range;

    pub const PROG_IP_RANGE: Range<usize> = 16..20;
    pub const PROG_SUBNET_RANGE: Range<usize> = 20..24;
    pub const PROG_PORT_RANGE: Range<usize> = 24..26;
    pub const STATUS_OFFSET: usize = 26;
    pub const PROG_GATEWAY_RANGE: Range<usize> = 28..32;
    pub const MIN_LEN: usize = 34;

    pub const STATUS_DHCP_ENABLED: u8 = 1 << 6;
}

pub mod address {
    use std::ops::Range;

    pub const NET_SWITCH_OFFSET: usize = 12;
    pub const BIND_INDEX_OFFSET: usize = 13;
    pub const SHORT_NAME_RANGE: Range<usize> = 14..32;
    pub const LONG_NAME_RANGE: Range<usize> = 32..96;
    pub const SW_IN_OFFSET: usize = 96;
    pub const SW_OUT_OFFSET: usize = 100;
    pub const SUB_SWITCH_OFFSET: usize = 104;
    pub const ACN_PRIORITY_OFFSET: usize = 105;
    pub const COMMAND_OFFSET: usize = 106;
    pub const MIN_LEN: usize = 107;

    pub const SHORT_NAME_LEN: usize = 18;
    pub const LONG_NAME_LEN: usize = 64;
    /// Switch values are ignored by the node unless this bit is set.
    pub const PROGRAM_BIT: u8 = 1 << 7;
}

pub mod command {
    use std::ops::Range;

    pub const ESTA_MAN_RANGE: Range<usize> = 12..14;
    pub const LENGTH_RANGE: Range<usize> = 14..16;
    pub const DATA_OFFSET: usize = 16;
    pub const MIN_LEN: usize = DATA_OFFSET;
    pub const MAX_DATA_LEN: usize = 512;
}
