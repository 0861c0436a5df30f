use {
    crate::{ComError, Connector, DemuxConfig, Transport},
    futures_util::{SinkExt, StreamExt},
    tokio::net::TcpStream,
    tokio_websockets::{ClientBuilder, Limits, MaybeTlsStream, WebSocketStream},
};

/// Opens WebSocket connections to the frame producer.
#[derive(Clone, Debug)]
pub struct WsConnector {
    uri: http::Uri,
    max_message_size: usize,
}

impl WsConnector {
    /// Accepts `ws://host:port[/path]` or a bare `host:port`.
    pub fn new(uri: &str) -> Result<Self, ComError> {
        let uri = if uri.contains("://") {
            uri.to_string()
        } else {
            format!("ws://{}", uri)
        };
        Ok(Self {
            uri: uri.parse()?,
            max_message_size: crate::MAX_MESSAGE_SIZE,
        })
    }

    pub fn from_config(config: &DemuxConfig) -> Result<Self, ComError> {
        Ok(Self::new(config.uri())?.with_max_message_size(config.max_message_size()))
    }

    pub fn with_max_message_size(mut self, max_message_size: usize) -> Self {
        self.max_message_size = max_message_size;
        self
    }

    pub fn uri(&self) -> &http::Uri {
        &self.uri
    }
}

impl Connector for WsConnector {
    type Transport = WsTransport;

    async fn connect(&mut self) -> Result<WsTransport, ComError> {
        let limits = Limits::default().max_payload_len(Some(self.max_message_size));
        let (stream, _response) = ClientBuilder::from_uri(self.uri.clone())
            .limits(limits)
            .connect()
            .await?;
        log::info!("connected to {}", self.uri);
        Ok(WsTransport { stream })
    }
}

/// A client WebSocket connection yielding binary messages.
pub struct WsTransport {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl Transport for WsTransport {
    /// Skips text and control messages. A message over the size limit fails the connection
    /// with [`ComError::MessageTooLarge`].
    async fn recv(&mut self) -> Result<Option<Vec<u8>>, ComError> {
        loop {
            match self.stream.next().await {
                Some(Ok(msg)) => {
                    if !msg.is_binary() {
                        continue;
                    }
                    return Ok(Some(msg.into_payload().to_vec()));
                }
                Some(Err(tokio_websockets::Error::PayloadTooLong { len, .. })) => {
                    return Err(ComError::MessageTooLarge(len));
                }
                Some(Err(e)) => return Err(ComError::from(e)),
                None => return Ok(None),
            }
        }
    }

    async fn close(&mut self) -> Result<(), ComError> {
        self.stream.close().await?;
        Ok(())
    }
}
