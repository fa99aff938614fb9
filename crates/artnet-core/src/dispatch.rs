//! Op-code to handler routing.
//!
//! At most one handler is registered per op-code and the last registration
//! wins. Datagrams that are not Art-Net, carry an unknown op-code, fail their
//! minimum-length check or have no subscriber are dropped without error.

use std::collections::HashMap;
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::codec::{DecodeError, OpCode, Packet, decode_body, parse_header};

/// Callback invoked with the op-code, the sender and the decoded packet.
pub type Handler = Arc<dyn Fn(OpCode, SocketAddr, &Packet) + Send + Sync>;

/// What happened to one inbound datagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// The registered handler ran once.
    Delivered(OpCode),
    /// Recognized op-code, but nobody subscribed to it.
    Unhandled(OpCode),
    /// Not decodable; see the error for why.
    Rejected(DecodeError),
}

#[derive(Default, Clone)]
pub struct Dispatcher {
    handlers: HashMap<OpCode, Handler>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `op`, replacing any earlier one.
    pub fn subscribe<F>(&mut self, op: OpCode, handler: F)
    where
        F: Fn(OpCode, SocketAddr, &Packet) + Send + Sync + 'static,
    {
        self.handlers.insert(op, Arc::new(handler));
    }

    /// Registers one shared handler under every decodable op-code.
    pub fn subscribe_all<F>(&mut self, handler: F)
    where
        F: Fn(OpCode, SocketAddr, &Packet) + Send + Sync + 'static,
    {
        let handler: Handler = Arc::new(handler);
        for op in OpCode::ALL {
            self.handlers.insert(op, Arc::clone(&handler));
        }
    }

    /// Returns whether a handler was registered.
    pub fn unsubscribe(&mut self, op: OpCode) -> bool {
        self.handlers.remove(&op).is_some()
    }

    pub fn is_subscribed(&self, op: OpCode) -> bool {
        self.handlers.contains_key(&op)
    }

    /// Decodes `datagram` and hands it to the matching handler.
    ///
    /// The body is only decoded when someone is subscribed. Handler panics
    /// propagate to the caller.
    pub fn dispatch(&self, datagram: &[u8], from: SocketAddr) -> Dispatch {
        let op = match parse_header(datagram) {
            Ok(op) => op,
            Err(err) => {
                debug!(%from, len = datagram.len(), %err, "dropping datagram");
                return Dispatch::Rejected(err);
            }
        };

        let Some(handler) = self.handlers.get(&op) else {
            trace!(%from, %op, "no subscriber");
            return Dispatch::Unhandled(op);
        };

        match decode_body(op, datagram) {
            Ok(packet) => {
                trace!(%from, %op, len = datagram.len(), "delivering");
                handler(op, from, &packet);
                Dispatch::Delivered(op)
            }
            Err(err) => {
                debug!(%from, %op, %err, "dropping datagram");
                Dispatch::Rejected(err)
            }
        }
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut subscribed: Vec<_> = self.handlers.keys().copied().collect();
        subscribed.sort();
        f.debug_struct("Dispatcher")
            .field("subscribed", &subscribed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::{Dispatch, Dispatcher};
    use crate::codec::{DecodeError, OpCode, Packet, encode_dmx, encode_poll, encode_sync};

    fn peer() -> SocketAddr {
        "10.0.0.7:6454".parse().unwrap()
    }

    #[test]
    fn last_subscription_wins() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let mut dispatcher = Dispatcher::new();

        let counter = Arc::clone(&first);
        dispatcher.subscribe(OpCode::Sync, move |_, _, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let counter = Arc::clone(&second);
        dispatcher.subscribe(OpCode::Sync, move |_, _, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(
            dispatcher.dispatch(&encode_sync(), peer()),
            Dispatch::Delivered(OpCode::Sync)
        );
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribed_code_is_unhandled() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.subscribe(OpCode::Poll, |_, _, _| panic!("wrong handler"));

        let packet = encode_dmx(1, 0, &[0; 4]).unwrap();
        assert_eq!(
            dispatcher.dispatch(&packet, peer()),
            Dispatch::Unhandled(OpCode::Dmx)
        );
    }

    #[test]
    fn unsubscribe_is_noop_when_absent() {
        let mut dispatcher = Dispatcher::new();
        assert!(!dispatcher.unsubscribe(OpCode::Address));
        dispatcher.subscribe(OpCode::Address, |_, _, _| {});
        assert!(dispatcher.unsubscribe(OpCode::Address));
        assert!(!dispatcher.is_subscribed(OpCode::Address));
    }

    #[test]
    fn subscribe_all_receives_op_code_and_sender() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = Dispatcher::new();
        let sink = Arc::clone(&seen);
        dispatcher.subscribe_all(move |op, from, packet: &Packet| {
            sink.lock().unwrap().push((op, from, packet.op_code()));
        });
        for op in OpCode::ALL {
            assert!(dispatcher.is_subscribed(op));
        }

        dispatcher.dispatch(&encode_sync(), peer());
        dispatcher.dispatch(&encode_poll(), peer());

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                (OpCode::Sync, peer(), OpCode::Sync),
                (OpCode::Poll, peer(), OpCode::Poll),
            ]
        );
    }

    #[test]
    fn noise_is_rejected_without_calling_handlers() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.subscribe_all(|_, _, _| panic!("handler must not run"));

        assert_eq!(
            dispatcher.dispatch(b"", peer()),
            Dispatch::Rejected(DecodeError::NotArtNet)
        );
        let truncated = &encode_poll()[..15];
        assert!(matches!(
            dispatcher.dispatch(truncated, peer()),
            Dispatch::Rejected(DecodeError::TooShort { op: OpCode::Poll, .. })
        ));
    }

    #[test]
    fn debug_lists_subscriptions() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.subscribe(OpCode::Dmx, |_, _, _| {});
        assert!(format!("{dispatcher:?}").contains("Dmx"));
    }
}
