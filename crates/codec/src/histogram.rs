use crate::{DecodeError, FrameKind, WireFrame};

/// Number of bins in a histogram message.
pub const HISTOGRAM_BINS: usize = 1024;

/// Payload size of a histogram message: bins then counts, 4 bytes each.
pub const HISTOGRAM_PAYLOAD_SIZE: usize = 2 * HISTOGRAM_BINS * 4;

/// Intensity histogram computed by the producer.
///
/// `bins` and `hist` are parallel and always [`HISTOGRAM_BINS`] long.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Histogram {
    bins: Vec<u32>,
    hist: Vec<u32>,
}

impl Histogram {
    /// Build a histogram from parallel bin and count vectors.
    ///
    /// Returns `None` unless both have exactly [`HISTOGRAM_BINS`] entries.
    pub fn new(bins: Vec<u32>, hist: Vec<u32>) -> Option<Self> {
        (bins.len() == HISTOGRAM_BINS && hist.len() == HISTOGRAM_BINS)
            .then_some(Self { bins, hist })
    }

    /// Bin positions (the producer sends bin centers).
    pub fn bins(&self) -> &[u32] {
        &self.bins
    }

    /// Sample count per bin.
    pub fn hist(&self) -> &[u32] {
        &self.hist
    }

    pub fn into_parts(self) -> (Vec<u32>, Vec<u32>) {
        (self.bins, self.hist)
    }

    pub fn total(&self) -> u64 {
        self.hist.iter().map(|&count| count as u64).sum()
    }

    /// Bin position and count of the fullest bin, the lowest one on ties.
    pub fn peak(&self) -> (u32, u32) {
        let mut peak = (self.bins[0], self.hist[0]);
        for (&bin, &count) in self.bins.iter().zip(&self.hist) {
            if count > peak.1 {
                peak = (bin, count);
            }
        }
        peak
    }
}

fn read_u32s(bytes: &[u8]) -> Vec<u32> {
    bytes
        .chunks_exact(4)
        .map(|word| u32::from_le_bytes([word[0], word[1], word[2], word[3]]))
        .collect()
}

impl WireFrame for Histogram {
    const KIND: FrameKind = FrameKind::Histogram;

    fn encode_payload(&self, buf: &mut Vec<u8>) {
        buf.reserve(HISTOGRAM_PAYLOAD_SIZE);
        for value in self.bins.iter().chain(&self.hist) {
            buf.extend_from_slice(&value.to_le_bytes());
        }
    }

    fn decode_payload(payload: &[u8]) -> Result<Self, DecodeError> {
        if payload.len() < HISTOGRAM_PAYLOAD_SIZE {
            return Err(DecodeError::Truncated {
                kind: FrameKind::Histogram,
                expected: HISTOGRAM_PAYLOAD_SIZE,
                actual: payload.len(),
            });
        }
        // anything past the counts is ignored
        let (bins, hist) = payload[..HISTOGRAM_PAYLOAD_SIZE].split_at(HISTOGRAM_PAYLOAD_SIZE / 2);
        Ok(Self {
            bins: read_u32s(bins),
            hist: read_u32s(hist),
        })
    }
}
