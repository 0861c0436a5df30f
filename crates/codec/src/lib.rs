//! Wire codec for the camera frame stream.
//!
//! Every message starts with a 4-byte little-endian tag naming the payload kind:
//! a raw 16-bit grayscale image, JSON frame metadata, or a 1024-bin histogram.
//! [`decode`] classifies a message and returns the typed frame, and never panics
//! on malformed input.

mod error;
mod frame;
mod histogram;
mod image;
mod kind;
mod metadata;

pub use error::DecodeError;
pub use frame::{DecodeWarning, Decoded, DecodedFrame, Decoder, WireFrame, decode};
pub use histogram::{HISTOGRAM_BINS, HISTOGRAM_PAYLOAD_SIZE, Histogram};
pub use image::{Dimensions, ImageFrame, SampleStats};
pub use kind::{FRAME_INFO, FrameKind, HEADER_SIZE, HISTOGRAM, IMAGE_FRAME};
pub use metadata::FrameMetadata;
