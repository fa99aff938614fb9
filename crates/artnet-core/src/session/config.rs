use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::SessionError;
use crate::codec::layout::{self, ARTNET_PORT};

/// Receive buffer size; comfortably above the largest ArtDmx (530 bytes).
pub const DEFAULT_RECV_BUFFER_SIZE: usize = 1024;
/// A full ArtDmx must fit, or frames would arrive truncated.
pub const MIN_RECV_BUFFER_SIZE: usize = layout::dmx::DATA_OFFSET + layout::DMX_MAX_SLOTS;
pub const DEFAULT_LISTEN_TIMEOUT_SECS: f64 = 3.0;
/// Frame rate used when streaming DMX.
pub const DEFAULT_FPS: f64 = 40.0;

/// Session-scoped socket settings.
///
/// # Examples
/// ```
/// use artnet_core::SessionConfig;
///
/// let config: SessionConfig = serde_json::from_str(r#"{"target": "10.0.0.255:6454"}"#).unwrap();
/// assert_eq!(config.target.to_string(), "10.0.0.255:6454");
/// assert!(config.broadcast);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Where senders transmit to; broadcast by default.
    pub target: SocketAddr,
    /// Local address the transport binds to.
    pub bind: SocketAddr,
    pub broadcast: bool,
    pub recv_buffer_size: usize,
    /// Idle time after which `listen` returns; `None` listens forever.
    pub listen_timeout_secs: Option<f64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            target: SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::BROADCAST, ARTNET_PORT)),
            bind: SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, ARTNET_PORT)),
            broadcast: true,
            recv_buffer_size: DEFAULT_RECV_BUFFER_SIZE,
            listen_timeout_secs: Some(DEFAULT_LISTEN_TIMEOUT_SECS),
        }
    }
}

impl SessionConfig {
    /// Default settings aimed at `target`.
    pub fn with_target(target: SocketAddr) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    /// Rejects buffers too small to hold a full ArtDmx.
    pub fn recv_buffer_len(&self) -> Result<usize, SessionError> {
        if self.recv_buffer_size < MIN_RECV_BUFFER_SIZE {
            return Err(SessionError::InvalidBufferSize {
                size: self.recv_buffer_size,
                min: MIN_RECV_BUFFER_SIZE,
            });
        }
        Ok(self.recv_buffer_size)
    }

    /// Rejects negative, non-finite and zero timeouts.
    pub fn listen_timeout(&self) -> Result<Option<Duration>, SessionError> {
        let Some(secs) = self.listen_timeout_secs else {
            return Ok(None);
        };
        match Duration::try_from_secs_f64(secs) {
            Ok(timeout) if !timeout.is_zero() => Ok(Some(timeout)),
            _ => Err(SessionError::InvalidTimeout { secs }),
        }
    }
}
