use thiserror::Error;

use crate::codec::EncodeError;

/// Errors surfaced by [`Session`](super::Session).
///
/// Undecodable datagrams are not errors; they show up as
/// [`Dispatch::Rejected`](crate::Dispatch::Rejected) instead.
///
/// # Examples
/// ```
/// use artnet_core::{EncodeError, SessionError};
///
/// let err = SessionError::from(EncodeError::PayloadTooLarge { len: 513, max: 512 });
/// assert!(err.to_string().contains("payload too large"));
/// ```
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),
    #[error("invalid listen timeout: {secs}s")]
    InvalidTimeout { secs: f64 },
    #[error("receive buffer of {size} bytes is too small, need at least {min}")]
    InvalidBufferSize { size: usize, min: usize },
}

impl SessionError {
    /// True for the read-timeout signal that ends `listen`.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            SessionError::Io(err) if matches!(
                err.kind(),
                std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
            )
        )
    }
}
