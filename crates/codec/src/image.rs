use {
    crate::{DecodeError, FrameKind, WireFrame},
    std::fmt,
};

const SAMPLE_SIZE: usize = 2;

/// Width and height of an image in samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    pub width: usize,
    pub height: usize,
}

impl Dimensions {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn sample_count(&self) -> usize {
        self.width.saturating_mul(self.height)
    }
}

impl Default for Dimensions {
    /// The deployed sensor readout.
    fn default() -> Self {
        Self::new(1920, 1080)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Row-major 16-bit grayscale samples, exactly as received.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImageFrame {
    samples: Vec<u16>,
}

impl ImageFrame {
    pub fn new(samples: Vec<u16>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[u16] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<u16> {
        self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Whether the sample count is what `dims` calls for.
    pub fn matches(&self, dims: Dimensions) -> bool {
        self.samples.len() == dims.sample_count()
    }

    /// Rows of `width` samples. A short final row is yielded as is.
    pub fn rows(&self, width: usize) -> impl Iterator<Item = &[u16]> {
        self.samples.chunks(width.max(1))
    }

    /// Minimum, maximum and mean sample, or `None` for an empty frame.
    pub fn stats(&self) -> Option<SampleStats> {
        let first = *self.samples.first()?;
        let (min, max, sum) = self
            .samples
            .iter()
            .fold((first, first, 0u64), |(min, max, sum), &s| {
                (min.min(s), max.max(s), sum + s as u64)
            });
        Some(SampleStats {
            min,
            max,
            mean: sum as f64 / self.samples.len() as f64,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleStats {
    pub min: u16,
    pub max: u16,
    pub mean: f64,
}

impl WireFrame for ImageFrame {
    const KIND: FrameKind = FrameKind::Image;

    fn encode_payload(&self, buf: &mut Vec<u8>) {
        buf.reserve(self.samples.len() * SAMPLE_SIZE);
        for sample in &self.samples {
            buf.extend_from_slice(&sample.to_le_bytes());
        }
    }

    fn decode_payload(payload: &[u8]) -> Result<Self, DecodeError> {
        if payload.len() % SAMPLE_SIZE != 0 {
            return Err(DecodeError::MalformedPayload {
                kind: FrameKind::Image,
                reason: format!("{} payload bytes is not a whole number of samples", payload.len()),
            });
        }
        let samples = payload
            .chunks_exact(SAMPLE_SIZE)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        Ok(Self { samples })
    }
}
