use {crate::ComError, std::future::Future};

/// An established connection delivering whole binary messages.
pub trait Transport: Send + 'static {
    /// Wait for the next binary message. `Ok(None)` means the peer closed the connection.
    ///
    /// Must be cancel safe: dropping the future must not lose a message that was already
    /// returned.
    fn recv(&mut self) -> impl Future<Output = Result<Option<Vec<u8>>, ComError>> + Send;

    /// Close the connection. Called at most once, after which the transport is dropped.
    fn close(&mut self) -> impl Future<Output = Result<(), ComError>> + Send;
}

/// Performs the handshake that yields a [`Transport`].
pub trait Connector: Send + 'static {
    type Transport: Transport;

    fn connect(&mut self) -> impl Future<Output = Result<Self::Transport, ComError>> + Send;
}
