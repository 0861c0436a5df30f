use codec::{FrameMetadata, Histogram, ImageFrame};

/// One-line description of an image frame.
pub fn image_summary(image: &ImageFrame) -> String {
    match image.stats() {
        Some(stats) => format!(
            "image: {} samples, min {}, max {}, mean {:.1}",
            image.len(),
            stats.min,
            stats.max,
            stats.mean
        ),
        None => "image: empty".to_string(),
    }
}

pub fn histogram_summary(histogram: &Histogram) -> String {
    let (bin, count) = histogram.peak();
    format!(
        "histogram: {} counted, peak {} at bin {}",
        histogram.total(),
        count,
        bin
    )
}

pub fn metadata_summary(meta: &FrameMetadata) -> String {
    match meta.dimensions() {
        Some(dims) => format!("frame {} ({}, {})", meta.timestamp, dims, meta.dtype),
        None => format!("frame {} (shape {:?}, {})", meta.timestamp, meta.shape, meta.dtype),
    }
}
