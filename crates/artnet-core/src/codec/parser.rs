use super::error::DecodeError;
use super::layout;
use super::opcode::OpCode;
use super::reader::ArtNetReader;
use super::records::{
    ArtAddress, ArtCommand, ArtDmx, ArtIpProg, ArtIpProgReply, ArtNzs, ArtPoll, ArtPollReply,
    ArtSync, ArtTrigger, Packet,
};

/// Classifies a datagram by its header without decoding the body.
///
/// Fails with `NotArtNet` for anything shorter than marker plus op-code or
/// without the marker, and `UnknownOpCode` for op-codes with no decoder.
pub fn parse_header(payload: &[u8]) -> Result<OpCode, DecodeError> {
    if payload.len() < layout::MIN_HEADER_LEN {
        return Err(DecodeError::NotArtNet);
    }
    if &payload[layout::ID_RANGE] != layout::ARTNET_ID {
        return Err(DecodeError::NotArtNet);
    }
    let opcode = u16::from_le_bytes([
        payload[layout::OP_CODE_RANGE.start],
        payload[layout::OP_CODE_RANGE.start + 1],
    ]);
    OpCode::from_u16(opcode).ok_or(DecodeError::UnknownOpCode { opcode })
}

/// Decodes one datagram into a typed packet.
///
/// # Examples
/// ```
/// use artnet_core::{Packet, decode, encode_sync};
///
/// let packet = decode(&encode_sync()).unwrap();
/// assert!(matches!(packet, Packet::Sync(_)));
/// ```
pub fn decode(payload: &[u8]) -> Result<Packet, DecodeError> {
    let op = parse_header(payload)?;
    decode_body(op, payload)
}

/// Decodes a datagram whose header has already been classified as `op`.
pub fn decode_body(op: OpCode, payload: &[u8]) -> Result<Packet, DecodeError> {
    let reader = ArtNetReader::new(payload, op);
    let packet = match op {
        OpCode::Poll => Packet::Poll(parse_poll(&reader)?),
        OpCode::PollReply => Packet::PollReply(parse_poll_reply(&reader)?),
        OpCode::Command => Packet::Command(parse_command(&reader)?),
        OpCode::Trigger => Packet::Trigger(parse_trigger(&reader)?),
        OpCode::Dmx => Packet::Dmx(parse_dmx(&reader)?),
        OpCode::Nzs => Packet::Nzs(parse_nzs(&reader)?),
        OpCode::Sync => Packet::Sync(parse_sync(&reader)?),
        OpCode::IpProg => Packet::IpProg(parse_ip_prog(&reader)?),
        OpCode::IpProgReply => Packet::IpProgReply(parse_ip_prog_reply(&reader)?),
        OpCode::Address => Packet::Address(parse_address(&reader)?),
    };
    Ok(packet)
}

fn read_version(reader: &ArtNetReader<'_>) -> Result<u16, DecodeError> {
    reader.read_u16_be(layout::VERSION_RANGE)
}

fn parse_poll(reader: &ArtNetReader<'_>) -> Result<ArtPoll, DecodeError> {
    use layout::poll::*;
    reader.require_len(MIN_LEN)?;

    Ok(ArtPoll {
        protocol_version: read_version(reader)?,
        flags: reader.read_flags(FLAGS_OFFSET)?,
        diag_priority: reader.read_u8(DIAG_PRIORITY_OFFSET)?,
        target_port: [
            reader.read_u16_le(TARGET_BOTTOM_RANGE)?,
            reader.read_u16_le(TARGET_TOP_RANGE)?,
        ],
        esta_man: reader.read_u16_le(ESTA_MAN_RANGE)?,
        oem: reader.read_u16_le(OEM_RANGE)?,
    })
}

fn parse_poll_reply(reader: &ArtNetReader<'_>) -> Result<ArtPollReply, DecodeError> {
    use layout::poll_reply::*;
    reader.require_len(MIN_LEN)?;

    let filler = super::reader::trim_trailing_nul(reader.read_slice(FILLER_RANGE)?).to_vec();
    Ok(ArtPollReply {
        ip_address: reader.read_ipv4(IP_RANGE)?,
        port_number: reader.read_u16_le(PORT_RANGE)?,
        vers_info: reader.read_u16_le(VERS_INFO_RANGE)?,
        net_switch: reader.read_u8(NET_SWITCH_OFFSET)?,
        sub_switch: reader.read_u8(SUB_SWITCH_OFFSET)?,
        oem: reader.read_u16_le(OEM_RANGE)?,
        ubea_version: reader.read_u8(UBEA_VERSION_OFFSET)?,
        status1: reader.read_u8(STATUS1_OFFSET)?,
        esta_man: reader.read_u16_le(ESTA_MAN_RANGE)?,
        short_name: reader.read_ascii_string(SHORT_NAME_RANGE)?,
        long_name: reader.read_ascii_string(LONG_NAME_RANGE)?,
        node_report: reader.read_ascii_string(NODE_REPORT_RANGE)?,
        num_ports: reader.read_u16_le(NUM_PORTS_RANGE)?,
        port_types: reader.read_array(PORT_TYPES_OFFSET)?,
        good_input: reader.read_array(GOOD_INPUT_OFFSET)?,
        good_output: reader.read_array(GOOD_OUTPUT_OFFSET)?,
        sw_in: reader.read_array(SW_IN_OFFSET)?,
        sw_out: reader.read_array(SW_OUT_OFFSET)?,
        sw_video: reader.read_u8(SW_VIDEO_OFFSET)?,
        sw_macro: reader.read_u8(SW_MACRO_OFFSET)?,
        sw_remote: reader.read_u8(SW_REMOTE_OFFSET)?,
        spare: reader.read_array(SPARE_OFFSET)?,
        style: reader.read_u8(STYLE_OFFSET)?,
        mac: reader.read_mac(MAC_OFFSET)?,
        bind_ip: reader.read_ipv4(BIND_IP_RANGE)?,
        bind_index: reader.read_u8(BIND_INDEX_OFFSET)?,
        status2: reader.read_u8(STATUS2_OFFSET)?,
        filler,
    })
}

fn parse_dmx(reader: &ArtNetReader<'_>) -> Result<ArtDmx, DecodeError> {
    use layout::dmx::*;
    reader.require_len(MIN_LEN)?;

    Ok(ArtDmx {
        protocol_version: read_version(reader)?,
        sequence: reader.read_u8(SEQUENCE_OFFSET)?,
        physical: reader.read_u8(PHYSICAL_OFFSET)?,
        universe: reader.read_u16_le(UNIVERSE_RANGE)?,
        length: reader.read_u16_be(LENGTH_RANGE)?,
        data: reader.read_tail(DATA_OFFSET)?.to_vec(),
    })
}

fn parse_nzs(reader: &ArtNetReader<'_>) -> Result<ArtNzs, DecodeError> {
    use layout::dmx::*;
    reader.require_len(MIN_LEN)?;

    Ok(ArtNzs {
        protocol_version: read_version(reader)?,
        sequence: reader.read_u8(SEQUENCE_OFFSET)?,
        start_code: reader.read_u8(START_CODE_OFFSET)?,
        universe: reader.read_u16_le(UNIVERSE_RANGE)?,
        length: reader.read_u16_be(LENGTH_RANGE)?,
        data: reader.read_tail(DATA_OFFSET)?.to_vec(),
    })
}

fn parse_sync(reader: &ArtNetReader<'_>) -> Result<ArtSync, DecodeError> {
    use layout::sync::*;
    reader.require_len(MIN_LEN)?;

    Ok(ArtSync {
        protocol_version: read_version(reader)?,
        aux1: reader.read_u8(AUX1_OFFSET)?,
        aux2: reader.read_u8(AUX2_OFFSET)?,
    })
}

fn parse_trigger(reader: &ArtNetReader<'_>) -> Result<ArtTrigger, DecodeError> {
    use layout::trigger::*;
    reader.require_len(MIN_LEN)?;

    Ok(ArtTrigger {
        protocol_version: read_version(reader)?,
        oem: reader.read_u16_le(OEM_RANGE)?,
        key: reader.read_u8(KEY_OFFSET)?,
        sub_key: reader.read_u8(SUB_KEY_OFFSET)?,
        data: reader.read_tail(DATA_OFFSET)?.to_vec(),
    })
}

fn parse_ip_prog(reader: &ArtNetReader<'_>) -> Result<ArtIpProg, DecodeError> {
    use layout::ip_prog::*;
    reader.require_len(MIN_LEN)?;

    Ok(ArtIpProg {
        protocol_version: read_version(reader)?,
        command: reader.read_u8(COMMAND_OFFSET)?,
        prog_ip: reader.read_ipv4(PROG_IP_RANGE)?,
        prog_subnet: reader.read_ipv4(PROG_SUBNET_RANGE)?,
        prog_port: reader.read_u16_le(PROG_PORT_RANGE)?,
        prog_gateway: reader.read_ipv4(PROG_GATEWAY_RANGE)?,
        spare: reader.read_tail(SPARE_OFFSET)?.to_vec(),
    })
}

fn parse_ip_prog_reply(reader: &ArtNetReader<'_>) -> Result<ArtIpProgReply, DecodeError> {
    use layout::ip_prog_reply::*;
    reader.require_len(MIN_LEN)?;

    Ok(ArtIpProgReply {
        protocol_version: read_version(reader)?,
        prog_ip: reader.read_ipv4(PROG_IP_RANGE)?,
        prog_subnet: reader.read_ipv4(PROG_SUBNET_RANGE)?,
        prog_port: reader.read_u16_le(PROG_PORT_RANGE)?,
        status: reader.read_u8(STATUS_OFFSET)?,
        prog_gateway: reader.read_ipv4(PROG_GATEWAY_RANGE)?,
    })
}

fn parse_address(reader: &ArtNetReader<'_>) -> Result<ArtAddress, DecodeError> {
    use layout::address::*;
    reader.require_len(MIN_LEN)?;

    Ok(ArtAddress {
        protocol_version: read_version(reader)?,
        net_switch: reader.read_u8(NET_SWITCH_OFFSET)?,
        bind_index: reader.read_u8(BIND_INDEX_OFFSET)?,
        short_name: reader.read_ascii_string(SHORT_NAME_RANGE)?,
        long_name: reader.read_ascii_string(LONG_NAME_RANGE)?,
        sw_in: reader.read_array(SW_IN_OFFSET)?,
        sw_out: reader.read_array(SW_OUT_OFFSET)?,
        sub_switch: reader.read_u8(SUB_SWITCH_OFFSET)?,
        acn_priority: reader.read_u8(ACN_PRIORITY_OFFSET)?,
        command: reader.read_u8(COMMAND_OFFSET)?,
    })
}

fn parse_command(reader: &ArtNetReader<'_>) -> Result<ArtCommand, DecodeError> {
    use layout::command::*;
    reader.require_len(MIN_LEN)?;

    Ok(ArtCommand {
        protocol_version: read_version(reader)?,
        esta_man: reader.read_u16_le(ESTA_MAN_RANGE)?,
        length: reader.read_u16_le(LENGTH_RANGE)?,
        text: reader.read_ascii_tail(DATA_OFFSET)?,
    })
}
