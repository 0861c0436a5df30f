use codec::Dimensions;

/// Default producer endpoint.
pub const DEFAULT_URI: &str = "ws://127.0.0.1:8001";

/// Largest message accepted from the producer.
pub const MAX_MESSAGE_SIZE: usize = 64 * 1024 * 1024; // 64 MB

/// Configuration for a [`Demux`](crate::Demux) connection.
#[derive(Clone, Debug)]
pub struct DemuxConfig {
    uri: String,
    expected: Option<Dimensions>,
    max_message_size: usize,
    decode_on_worker: bool,
}

impl Default for DemuxConfig {
    fn default() -> Self {
        Self {
            uri: DEFAULT_URI.to_string(),
            expected: Some(Dimensions::default()),
            max_message_size: MAX_MESSAGE_SIZE,
            decode_on_worker: false,
        }
    }
}

impl DemuxConfig {
    /// Set the producer URI, `ws://host:port[/path]` or bare `host:port`.
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = uri.into();
        self
    }

    /// Set the image dimensions frames are checked against, `None` to skip the check.
    pub fn with_expected(mut self, expected: Option<Dimensions>) -> Self {
        self.expected = expected;
        self
    }

    /// Set the largest binary message accepted. A larger one ends the connection.
    pub fn with_max_message_size(mut self, max_message_size: usize) -> Self {
        self.max_message_size = max_message_size;
        self
    }

    /// Decode on the blocking thread pool instead of the dispatch task.
    pub fn with_decode_on_worker(mut self, decode_on_worker: bool) -> Self {
        self.decode_on_worker = decode_on_worker;
        self
    }

    // Getters
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn expected(&self) -> Option<Dimensions> {
        self.expected
    }

    pub fn max_message_size(&self) -> usize {
        self.max_message_size
    }

    pub fn decode_on_worker(&self) -> bool {
        self.decode_on_worker
    }
}
