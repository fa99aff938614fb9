use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use artnet_core::{
    Dispatch, EncodeError, OpCode, Packet, PortAddress, Session, SessionConfig, SessionError,
    Transport, decode, encode_dmx, encode_sync,
};

/// Replays queued datagrams, then times out; records everything sent.
#[derive(Debug, Default)]
struct ScriptedTransport {
    inbound: RefCell<VecDeque<(Vec<u8>, SocketAddr)>>,
    sent: RefCell<Vec<(Vec<u8>, SocketAddr)>>,
    timeouts: RefCell<Vec<Option<Duration>>>,
}

impl ScriptedTransport {
    fn with_inbound(datagrams: Vec<Vec<u8>>) -> Self {
        let transport = Self::default();
        transport
            .inbound
            .borrow_mut()
            .extend(datagrams.into_iter().map(|d| (d, node())));
        transport
    }
}

impl Transport for ScriptedTransport {
    fn send_to(&self, buf: &[u8], dest: SocketAddr) -> io::Result<usize> {
        self.sent.borrow_mut().push((buf.to_vec(), dest));
        Ok(buf.len())
    }

    fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        let Some((datagram, from)) = self.inbound.borrow_mut().pop_front() else {
            return Err(io::Error::from(io::ErrorKind::WouldBlock));
        };
        let len = datagram.len().min(buf.len());
        buf[..len].copy_from_slice(&datagram[..len]);
        Ok((len, from))
    }

    fn set_read_timeout(&self, timeout: Option<Duration>) -> io::Result<()> {
        self.timeouts.borrow_mut().push(timeout);
        Ok(())
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        Ok("127.0.0.1:6454".parse().unwrap())
    }
}

fn node() -> SocketAddr {
    "10.0.0.20:6454".parse().unwrap()
}

fn target() -> SocketAddr {
    "10.0.0.255:6454".parse().unwrap()
}

fn session(transport: ScriptedTransport) -> Session<ScriptedTransport> {
    Session::with_transport(transport, SessionConfig::with_target(target())).unwrap()
}

fn poll_reply(short_name: &str) -> Vec<u8> {
    let mut bytes = vec![0u8; 239];
    bytes[..8].copy_from_slice(b"Art-Net\0");
    bytes[8..10].copy_from_slice(&0x2100u16.to_le_bytes());
    bytes[10..14].copy_from_slice(&[10, 0, 0, 20]);
    bytes[14..16].copy_from_slice(&6454u16.to_le_bytes());
    bytes[26..26 + short_name.len()].copy_from_slice(short_name.as_bytes());
    bytes
}

#[test]
fn poll_reply_handler_runs_once_then_listen_times_out() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut session = session(ScriptedTransport::with_inbound(vec![poll_reply("Node A")]));
    let sink = Arc::clone(&seen);
    session.subscribe(OpCode::PollReply, move |op, from, packet| {
        let Packet::PollReply(reply) = packet else {
            panic!("expected ArtPollReply");
        };
        sink.lock()
            .unwrap()
            .push((op, from, reply.short_name.clone(), reply.ip_address));
    });

    session.send_poll().unwrap();
    session.listen(Some(Duration::from_millis(50))).unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, OpCode::PollReply);
    assert_eq!(seen[0].1, node());
    assert_eq!(seen[0].2, "Node A");
    assert_eq!(seen[0].3.octets(), [10, 0, 0, 20]);

    let sent = session.transport().sent.borrow();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].1, target());
    assert_eq!(parse_op(&sent[0].0), OpCode::Poll);
    assert_eq!(
        *session.transport().timeouts.borrow(),
        vec![Some(Duration::from_millis(50))]
    );
}

#[test]
fn dmx_without_subscriber_is_unhandled() {
    let mut session = session(ScriptedTransport::with_inbound(vec![
        encode_dmx(1, 0, &[1, 2, 3]).unwrap(),
    ]));
    session.subscribe(OpCode::PollReply, |_, _, _| panic!("wrong handler"));
    assert_eq!(session.receive().unwrap(), Dispatch::Unhandled(OpCode::Dmx));
}

#[test]
fn subscribe_all_sees_sync_and_noise_is_skipped() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut session = session(ScriptedTransport::with_inbound(vec![
        b"not art-net at all".to_vec(),
        encode_sync(),
        poll_reply("Node B")[..100].to_vec(),
    ]));
    let counter = Arc::clone(&calls);
    session.subscribe_all(move |op, _, packet| {
        assert_eq!(op, OpCode::Sync);
        assert_eq!(packet.op_code(), OpCode::Sync);
        counter.fetch_add(1, Ordering::SeqCst);
    });

    session.listen(Some(Duration::from_secs(1))).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn unsubscribed_handler_stops_receiving() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut session = session(ScriptedTransport::with_inbound(vec![encode_sync()]));
    let counter = Arc::clone(&calls);
    session.subscribe(OpCode::Sync, move |_, _, _| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    assert!(session.unsubscribe(OpCode::Sync));

    assert_eq!(session.receive().unwrap(), Dispatch::Unhandled(OpCode::Sync));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn oversized_dmx_sends_nothing() {
    let session = session(ScriptedTransport::default());
    let err = session.send_dmx(1, 0, &[0u8; 513]).unwrap_err();
    assert!(matches!(
        err,
        SessionError::Encode(EncodeError::PayloadTooLarge { len: 513, max: 512 })
    ));
    assert!(session.transport().sent.borrow().is_empty());
}

#[test]
fn out_of_range_universe_sends_nothing() {
    let session = session(ScriptedTransport::default());
    assert!(session.configure_universe(0x80, 0, 0).is_err());
    assert!(session.configure_universe(0, 16, 0).is_err());
    assert!(session.send_dmx(0x8000, 0, &[]).is_err());
    assert!(session.transport().sent.borrow().is_empty());
}

#[test]
fn configure_universe_returns_port_address() {
    let session = session(ScriptedTransport::default());
    let port_address = session.configure_universe(1, 2, 3).unwrap();
    assert_eq!(port_address, PortAddress::compose(1, 2, 3));
    assert_eq!(port_address.as_u16(), 0x0123);

    let sent = session.transport().sent.borrow();
    let Packet::Address(address) = decode(&sent[0].0).unwrap() else {
        panic!("expected ArtAddress");
    };
    assert_eq!(address.net_switch, 1);
    assert_eq!(address.sub_switch & 0x0f, 2);
}

#[test]
fn streaming_keeps_target_and_sequence() {
    let session = session(ScriptedTransport::default());
    for sequence in 1..=3u8 {
        session.send_dmx(7, sequence, &[sequence; 4]).unwrap();
    }
    session.send_sync().unwrap();

    let sent = session.transport().sent.borrow();
    let sequences: Vec<u8> = sent
        .iter()
        .filter_map(|(bytes, _)| match decode(bytes).unwrap() {
            Packet::Dmx(dmx) => Some(dmx.sequence),
            _ => None,
        })
        .collect();
    assert_eq!(sequences, vec![1, 2, 3]);
    assert!(sent.iter().all(|(_, dest)| *dest == target()));
    assert_eq!(parse_op(&sent[3].0), OpCode::Sync);
}

#[test]
fn zero_timeout_is_rejected_before_io() {
    let mut session = session(ScriptedTransport::default());
    assert!(matches!(
        session.listen(Some(Duration::ZERO)),
        Err(SessionError::InvalidTimeout { .. })
    ));
    assert!(session.transport().timeouts.borrow().is_empty());
}

#[test]
fn transport_errors_other_than_timeout_propagate() {
    struct Broken;

    impl Transport for Broken {
        fn send_to(&self, _: &[u8], _: SocketAddr) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::PermissionDenied))
        }
        fn recv_from(&self, _: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
            Err(io::Error::from(io::ErrorKind::ConnectionReset))
        }
        fn set_read_timeout(&self, _: Option<Duration>) -> io::Result<()> {
            Ok(())
        }
        fn local_addr(&self) -> io::Result<SocketAddr> {
            Ok("127.0.0.1:0".parse().unwrap())
        }
    }

    let mut session = Session::with_transport(Broken, SessionConfig::default()).unwrap();
    assert!(matches!(session.send_poll(), Err(SessionError::Io(_))));
    let err = session.listen(None).unwrap_err();
    assert!(!err.is_timeout());
}

fn parse_op(bytes: &[u8]) -> OpCode {
    artnet_core::parse_header(bytes).unwrap()
}

#[test]
fn undersized_receive_buffer_is_rejected_at_construction() {
    let config = SessionConfig {
        recv_buffer_size: 0,
        ..SessionConfig::with_target(target())
    };
    let err = Session::with_transport(ScriptedTransport::default(), config).unwrap_err();
    assert!(matches!(
        err,
        SessionError::InvalidBufferSize { size: 0, min: 530 }
    ));
}

#[test]
fn open_rejects_undersized_buffer_before_binding() {
    let config = SessionConfig {
        bind: "127.0.0.1:0".parse().unwrap(),
        recv_buffer_size: 12,
        ..SessionConfig::default()
    };
    assert!(matches!(
        Session::open(config),
        Err(SessionError::InvalidBufferSize { size: 12, .. })
    ));
}
