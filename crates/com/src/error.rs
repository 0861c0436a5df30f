use std::fmt;

/// Transport-level failures. These end a connection; they are never decode errors.
#[derive(Debug)]
pub enum ComError {
    Io(std::io::Error),
    WebSocket(tokio_websockets::Error),
    InvalidUri(String),
    ConnectionClosed,
    MessageTooLarge(usize),
    Worker(String),
}

impl fmt::Display for ComError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComError::Io(err) => write!(f, "io error: {err}"),
            ComError::WebSocket(err) => write!(f, "websocket error: {err}"),
            ComError::InvalidUri(msg) => write!(f, "invalid uri: {msg}"),
            ComError::ConnectionClosed => write!(f, "connection closed"),
            ComError::MessageTooLarge(len) => write!(f, "message too large: {len} bytes"),
            ComError::Worker(msg) => write!(f, "worker error: {msg}"),
        }
    }
}

impl std::error::Error for ComError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ComError::Io(err) => Some(err),
            ComError::WebSocket(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ComError {
    fn from(err: std::io::Error) -> Self {
        ComError::Io(err)
    }
}

impl From<tokio_websockets::Error> for ComError {
    fn from(err: tokio_websockets::Error) -> Self {
        ComError::WebSocket(err)
    }
}

impl From<http::uri::InvalidUri> for ComError {
    fn from(err: http::uri::InvalidUri) -> Self {
        ComError::InvalidUri(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ComError {
    fn from(err: tokio::task::JoinError) -> Self {
        ComError::Worker(err.to_string())
    }
}
