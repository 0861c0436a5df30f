use {crate::FrameKind, std::fmt};

#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// The message is shorter than the 4-byte tag; holds the message length.
    TruncatedHeader(usize),
    /// The tag names no known frame kind; holds the tag as read.
    UnknownFrameKind(u32),
    /// The payload is shorter than the kind requires.
    Truncated {
        kind: FrameKind,
        expected: usize,
        actual: usize,
    },
    /// The payload has a usable length but does not decode.
    MalformedPayload { kind: FrameKind, reason: String },
}

impl DecodeError {
    /// Frame kind the failed message was tagged with, when the tag was recognized.
    pub fn kind(&self) -> Option<FrameKind> {
        match self {
            DecodeError::TruncatedHeader(_) | DecodeError::UnknownFrameKind(_) => None,
            DecodeError::Truncated { kind, .. } | DecodeError::MalformedPayload { kind, .. } => {
                Some(*kind)
            }
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::TruncatedHeader(len) => {
                write!(f, "truncated header: {len} of 4 bytes")
            }
            DecodeError::UnknownFrameKind(tag) => write!(f, "unknown frame kind: {tag:#010x}"),
            DecodeError::Truncated {
                kind,
                expected,
                actual,
            } => write!(
                f,
                "truncated {kind} payload: expected {expected} bytes, got {actual}"
            ),
            DecodeError::MalformedPayload { kind, reason } => {
                write!(f, "malformed {kind} payload: {reason}")
            }
        }
    }
}

impl std::error::Error for DecodeError {}
