use {
    crate::{DecodeError, Dimensions, FrameKind, WireFrame},
    serde::{Deserialize, Serialize},
};

/// Capture information the producer sends ahead of each image.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameMetadata {
    /// ISO 8601 capture time, as formatted by the producer.
    pub timestamp: String,
    /// Array shape, outermost axis first (`[height, width]` for a 2D image).
    pub shape: Vec<usize>,
    /// Sample type name, e.g. `uint16`.
    pub dtype: String,
}

impl FrameMetadata {
    /// Image dimensions implied by a two-axis `shape`.
    pub fn dimensions(&self) -> Option<Dimensions> {
        match self.shape.as_slice() {
            &[height, width] => Some(Dimensions::new(width, height)),
            _ => None,
        }
    }
}

impl WireFrame for FrameMetadata {
    const KIND: FrameKind = FrameKind::Metadata;

    fn encode_payload(&self, buf: &mut Vec<u8>) {
        // strings and integers always serialize
        if let Err(error) = serde_json::to_writer(&mut *buf, self) {
            unreachable!("frame metadata failed to serialize: {error}");
        }
    }

    fn decode_payload(payload: &[u8]) -> Result<Self, DecodeError> {
        let text = std::str::from_utf8(payload).map_err(|error| DecodeError::MalformedPayload {
            kind: FrameKind::Metadata,
            reason: format!("invalid UTF-8: {error}"),
        })?;
        serde_json::from_str(text).map_err(|error| DecodeError::MalformedPayload {
            kind: FrameKind::Metadata,
            reason: format!("invalid JSON: {error}"),
        })
    }
}
