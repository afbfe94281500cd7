//! Relay error types.

use thiserror::Error;

use crate::codec::ViewportError;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("failed to bind {service} after {attempts} attempts (ports {first}-{last}): {reason}")]
    Bind {
        service: &'static str,
        attempts: u16,
        first: u16,
        last: u16,
        reason: String,
    },

    #[error("websocket handshake failed: {0}")]
    Handshake(String),

    #[error("websocket error: {0}")]
    Socket(#[from] tungstenite::Error),

    #[error("observer channel is closed")]
    Closed,

    #[error("malformed request body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("malformed request body: {0}")]
    Shape(&'static str),

    #[error(transparent)]
    Viewport(#[from] ViewportError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
