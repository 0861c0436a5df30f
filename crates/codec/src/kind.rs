use std::fmt;

/// Size of the tag that prefixes every message.
pub const HEADER_SIZE: usize = 4;

/// Tag of a raw grayscale image message.
pub const IMAGE_FRAME: u32 = 0xF8A3_F8A3;

/// Tag of a JSON frame metadata message.
pub const FRAME_INFO: u32 = 0x325A_329A;

/// Tag of a histogram message.
pub const HISTOGRAM: u32 = 0x348D_A5F8;

/// The payload kinds carried on the stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrameKind {
    Image,
    Metadata,
    Histogram,
}

impl FrameKind {
    pub const ALL: [FrameKind; 3] = [FrameKind::Image, FrameKind::Metadata, FrameKind::Histogram];

    /// Wire tag for this kind.
    pub const fn tag(self) -> u32 {
        match self {
            FrameKind::Image => IMAGE_FRAME,
            FrameKind::Metadata => FRAME_INFO,
            FrameKind::Histogram => HISTOGRAM,
        }
    }

    pub fn from_tag(tag: u32) -> Option<FrameKind> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    pub const fn header(self) -> [u8; HEADER_SIZE] {
        self.tag().to_le_bytes()
    }
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameKind::Image => write!(f, "image"),
            FrameKind::Metadata => write!(f, "metadata"),
            FrameKind::Histogram => write!(f, "histogram"),
        }
    }
}

/// Split a message into its tag and payload, or `None` if it is shorter than the header.
pub(crate) fn split_header(buffer: &[u8]) -> Option<(u32, &[u8])> {
    let (header, payload) = buffer.split_first_chunk::<HEADER_SIZE>()?;
    Some((u32::from_le_bytes(*header), payload))
}
