//! Session facade: one transport, one dispatcher, blocking receive loop.
//!
//! A session is bound at construction (`Session::open`) and releases its
//! socket when dropped. Receiving is synchronous; to listen while sending,
//! run `listen` on another thread. Every sender encodes before touching the
//! transport, so argument errors never produce partial I/O.

mod config;
mod error;
mod transport;

use std::net::SocketAddr;
use std::time::Duration;

use tracing::{debug, info, trace};

pub use config::{
    DEFAULT_FPS, DEFAULT_LISTEN_TIMEOUT_SECS, DEFAULT_RECV_BUFFER_SIZE, MIN_RECV_BUFFER_SIZE,
    SessionConfig,
};
pub use error::SessionError;
pub use transport::{Transport, UdpTransport};

use crate::codec::{
    AddressRequest, IpProgRequest, OpCode, Packet, PortAddress, encode_address, encode_command,
    encode_dmx, encode_ip_prog, encode_nzs, encode_poll, encode_sync, encode_trigger,
};
use crate::dispatch::{Dispatch, Dispatcher};

pub struct Session<T: Transport = UdpTransport> {
    transport: T,
    config: SessionConfig,
    dispatcher: Dispatcher,
    recv_buf: Vec<u8>,
}

impl Session<UdpTransport> {
    /// Validates `config`, then binds a UDP socket to `config.bind`.
    ///
    /// # Examples
    /// ```no_run
    /// use artnet_core::{OpCode, Session, SessionConfig};
    ///
    /// let mut session = Session::open(SessionConfig::default())?;
    /// session.subscribe(OpCode::PollReply, |_, from, packet| {
    ///     println!("{from}: {packet:?}");
    /// });
    /// session.send_poll()?;
    /// session.listen(Some(std::time::Duration::from_secs(3)))?;
    /// # Ok::<(), artnet_core::SessionError>(())
    /// ```
    pub fn open(config: SessionConfig) -> Result<Self, SessionError> {
        config.recv_buffer_len()?;
        let transport = UdpTransport::bind(config.bind, config.broadcast)?;
        info!(
            bind = %transport.local_addr()?,
            target = %config.target,
            broadcast = config.broadcast,
            "Art-Net session bound"
        );
        Self::with_transport(transport, config)
    }
}

impl<T: Transport> Session<T> {
    pub fn with_transport(transport: T, config: SessionConfig) -> Result<Self, SessionError> {
        let recv_buf = vec![0u8; config.recv_buffer_len()?];
        Ok(Self {
            transport,
            config,
            dispatcher: Dispatcher::new(),
            recv_buf,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn local_addr(&self) -> Result<SocketAddr, SessionError> {
        Ok(self.transport.local_addr()?)
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn subscribe<F>(&mut self, op: OpCode, handler: F)
    where
        F: Fn(OpCode, SocketAddr, &Packet) + Send + Sync + 'static,
    {
        self.dispatcher.subscribe(op, handler);
    }

    pub fn subscribe_all<F>(&mut self, handler: F)
    where
        F: Fn(OpCode, SocketAddr, &Packet) + Send + Sync + 'static,
    {
        self.dispatcher.subscribe_all(handler);
    }

    pub fn unsubscribe(&mut self, op: OpCode) -> bool {
        self.dispatcher.unsubscribe(op)
    }

    /// Blocks for one datagram and dispatches it.
    ///
    /// Datagrams longer than the receive buffer (at least
    /// [`MIN_RECV_BUFFER_SIZE`]) are truncated by the transport.
    pub fn receive(&mut self) -> Result<Dispatch, SessionError> {
        let (len, from) = self.transport.recv_from(&mut self.recv_buf)?;
        trace!(%from, len, "datagram received");
        Ok(self.dispatcher.dispatch(&self.recv_buf[..len], from))
    }

    /// Receives until no datagram arrives for `timeout`; `None` never returns
    /// unless the transport fails.
    ///
    /// The timeout is per read, so steady traffic keeps the loop running.
    pub fn listen(&mut self, timeout: Option<Duration>) -> Result<(), SessionError> {
        if timeout.is_some_and(|t| t.is_zero()) {
            return Err(SessionError::InvalidTimeout { secs: 0.0 });
        }
        self.transport.set_read_timeout(timeout)?;
        debug!(?timeout, "listening");

        loop {
            match self.receive() {
                Ok(_) => {}
                Err(err) if err.is_timeout() => {
                    debug!("listen timed out");
                    return Ok(());
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// `listen` with the timeout from the session config.
    pub fn listen_configured(&mut self) -> Result<(), SessionError> {
        let timeout = self.config.listen_timeout()?;
        self.listen(timeout)
    }

    fn send(&self, op: OpCode, packet: &[u8]) -> Result<(), SessionError> {
        let sent = self.transport.send_to(packet, self.config.target)?;
        trace!(%op, target = %self.config.target, len = sent, "datagram sent");
        Ok(())
    }

    pub fn send_poll(&self) -> Result<(), SessionError> {
        self.send(OpCode::Poll, &encode_poll())
    }

    pub fn send_dmx(&self, universe: u16, sequence: u8, data: &[u8]) -> Result<(), SessionError> {
        let packet = encode_dmx(universe, sequence, data)?;
        self.send(OpCode::Dmx, &packet)
    }

    pub fn send_nzs(
        &self,
        universe: u16,
        sequence: u8,
        start_code: u8,
        data: &[u8],
    ) -> Result<(), SessionError> {
        let packet = encode_nzs(universe, sequence, start_code, data)?;
        self.send(OpCode::Nzs, &packet)
    }

    pub fn send_trigger(&self, key: u8, sub_key: u8, data: &[u8]) -> Result<(), SessionError> {
        self.send(OpCode::Trigger, &encode_trigger(key, sub_key, data))
    }

    pub fn send_sync(&self) -> Result<(), SessionError> {
        self.send(OpCode::Sync, &encode_sync())
    }

    pub fn send_command(&self, esta_man: u16, text: &str) -> Result<(), SessionError> {
        let packet = encode_command(esta_man, text)?;
        self.send(OpCode::Command, &packet)
    }

    /// Sends ArtIpProg; an empty request is an enquiry.
    pub fn configure_ip(&self, request: &IpProgRequest) -> Result<(), SessionError> {
        self.send(OpCode::IpProg, &encode_ip_prog(request))
    }

    /// Programs a node's Net/Sub-Net/Universe and returns the resulting
    /// Port-Address.
    pub fn configure_universe(
        &self,
        net: u8,
        sub: u8,
        universe: u8,
    ) -> Result<PortAddress, SessionError> {
        self.configure_address(&AddressRequest::new(net, sub, universe))
    }

    pub fn configure_address(&self, request: &AddressRequest) -> Result<PortAddress, SessionError> {
        let packet = encode_address(request)?;
        self.send(OpCode::Address, &packet)?;
        Ok(request.port_address()?)
    }
}

impl<T: Transport + std::fmt::Debug> std::fmt::Debug for Session<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("transport", &self.transport)
            .field("config", &self.config)
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}
