use {
    crate::{
        DecodeError, Dimensions, FrameKind, FrameMetadata, Histogram, ImageFrame,
        kind::split_header,
    },
    std::fmt,
};

/// A payload type with its own tag on the wire.
pub trait WireFrame: Sized {
    const KIND: FrameKind;

    /// Append the payload, without the tag, to `buf`.
    fn encode_payload(&self, buf: &mut Vec<u8>);

    /// Decode the payload that follows the tag.
    fn decode_payload(payload: &[u8]) -> Result<Self, DecodeError>;

    /// Complete message: tag followed by payload.
    fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::from(Self::KIND.header());
        self.encode_payload(&mut buf);
        buf
    }
}

/// One decoded message.
#[derive(Clone, Debug, PartialEq)]
pub enum DecodedFrame {
    Image(ImageFrame),
    Metadata(FrameMetadata),
    Histogram(Histogram),
}

impl DecodedFrame {
    pub fn kind(&self) -> FrameKind {
        match self {
            DecodedFrame::Image(_) => FrameKind::Image,
            DecodedFrame::Metadata(_) => FrameKind::Metadata,
            DecodedFrame::Histogram(_) => FrameKind::Histogram,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            DecodedFrame::Image(frame) => frame.to_bytes(),
            DecodedFrame::Metadata(meta) => meta.to_bytes(),
            DecodedFrame::Histogram(histogram) => histogram.to_bytes(),
        }
    }
}

impl From<ImageFrame> for DecodedFrame {
    fn from(frame: ImageFrame) -> Self {
        DecodedFrame::Image(frame)
    }
}

impl From<FrameMetadata> for DecodedFrame {
    fn from(meta: FrameMetadata) -> Self {
        DecodedFrame::Metadata(meta)
    }
}

impl From<Histogram> for DecodedFrame {
    fn from(histogram: Histogram) -> Self {
        DecodedFrame::Histogram(histogram)
    }
}

type PayloadDecoder = fn(&[u8]) -> Result<DecodedFrame, DecodeError>;

fn decode_as<T>(payload: &[u8]) -> Result<DecodedFrame, DecodeError>
where
    T: WireFrame + Into<DecodedFrame>,
{
    T::decode_payload(payload).map(Into::into)
}

// one entry per frame kind, keyed by wire tag
const DECODE_TABLE: [(u32, PayloadDecoder); 3] = [
    (ImageFrame::KIND.tag(), decode_as::<ImageFrame>),
    (FrameMetadata::KIND.tag(), decode_as::<FrameMetadata>),
    (Histogram::KIND.tag(), decode_as::<Histogram>),
];

/// Classify `buffer` by its tag and decode the payload.
pub fn decode(buffer: &[u8]) -> Result<DecodedFrame, DecodeError> {
    let (tag, payload) =
        split_header(buffer).ok_or(DecodeError::TruncatedHeader(buffer.len()))?;
    let (_, decode_payload) = DECODE_TABLE
        .iter()
        .find(|(entry, _)| *entry == tag)
        .ok_or(DecodeError::UnknownFrameKind(tag))?;
    decode_payload(payload)
}

/// A condition worth reporting that did not stop the frame from decoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodeWarning {
    /// An image carried a different number of samples than the expected dimensions.
    SampleCountMismatch { expected: Dimensions, actual: usize },
}

impl fmt::Display for DecodeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeWarning::SampleCountMismatch { expected, actual } => write!(
                f,
                "image has {actual} samples, expected {} for {expected}",
                expected.sample_count()
            ),
        }
    }
}

/// A decoded frame and any warning raised while checking it.
#[derive(Clone, Debug, PartialEq)]
pub struct Decoded {
    pub frame: DecodedFrame,
    pub warning: Option<DecodeWarning>,
}

/// [`decode`] plus checks against what the consumer expects.
#[derive(Clone, Copy, Debug, Default)]
pub struct Decoder {
    expected: Option<Dimensions>,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check image sample counts against `dims`.
    pub fn with_expected(mut self, dims: Dimensions) -> Self {
        self.expected = Some(dims);
        self
    }

    pub fn expected(&self) -> Option<Dimensions> {
        self.expected
    }

    /// Decode `buffer`. Images are returned whole even when their sample count is off.
    pub fn decode(&self, buffer: &[u8]) -> Result<Decoded, DecodeError> {
        let frame = decode(buffer)?;
        let warning = match (&frame, self.expected) {
            (DecodedFrame::Image(image), Some(expected)) if !image.matches(expected) => {
                Some(DecodeWarning::SampleCountMismatch {
                    expected,
                    actual: image.len(),
                })
            }
            _ => None,
        };
        Ok(Decoded { frame, warning })
    }
}
