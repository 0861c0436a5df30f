use {
    com::{ComError, WsConnector},
    std::{error::Error, io},
};

#[test]
fn test_from_io_error() {
    let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "pipe broken");
    let com_err: ComError = io_err.into();
    match com_err {
        ComError::Io(_) => {} // Expected
        _ => panic!("Expected ComError::Io variant"),
    }
}

#[test]
fn test_from_websocket_error() {
    let com_err: ComError = tokio_websockets::Error::AlreadyClosed.into();
    assert!(matches!(com_err, ComError::WebSocket(_)));
    assert!(com_err.to_string().contains("websocket error"));
    assert!(com_err.source().is_some());
}

#[test]
fn test_invalid_uri() {
    let err = WsConnector::new("ws://exa mple:80").unwrap_err();
    assert!(matches!(err, ComError::InvalidUri(_)));
    assert!(err.to_string().starts_with("invalid uri"));
}

#[test]
fn test_display_io() {
    let err = ComError::Io(io::Error::new(io::ErrorKind::ConnectionReset, "reset"));
    let display = format!("{}", err);
    assert!(display.contains("io error"));
    assert!(display.contains("reset"));
    assert!(err.source().is_some());
}

#[test]
fn test_display_connection_closed() {
    let err = ComError::ConnectionClosed;
    assert_eq!(err.to_string(), "connection closed");
    assert!(err.source().is_none());
}

#[test]
fn test_display_message_too_large() {
    let err = ComError::MessageTooLarge(100_000_000);
    let display = format!("{}", err);
    assert!(display.contains("message too large"));
    assert!(display.contains("100000000"));
}

#[tokio::test]
async fn test_from_join_error() {
    let join_err = tokio::spawn(async { panic!("decode worker") }).await.unwrap_err();
    let com_err: ComError = join_err.into();
    assert!(matches!(com_err, ComError::Worker(_)));
    assert!(com_err.to_string().starts_with("worker error"));
}
