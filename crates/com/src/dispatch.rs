use {
    crate::{DecodeObserver, LogObserver, Sink},
    codec::{
        DecodeError, Decoded, DecodedFrame, Decoder, FrameKind, FrameMetadata, Histogram,
        ImageFrame,
    },
};

/// The sink registered for each frame kind. Kinds without a sink are decoded and discarded.
#[derive(Default)]
pub struct Sinks {
    image: Option<Box<dyn Sink<ImageFrame>>>,
    metadata: Option<Box<dyn Sink<FrameMetadata>>>,
    histogram: Option<Box<dyn Sink<Histogram>>>,
}

impl Sinks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, sink: impl Sink<ImageFrame> + 'static) -> Self {
        self.image = Some(Box::new(sink));
        self
    }

    pub fn with_metadata(mut self, sink: impl Sink<FrameMetadata> + 'static) -> Self {
        self.metadata = Some(Box::new(sink));
        self
    }

    pub fn with_histogram(mut self, sink: impl Sink<Histogram> + 'static) -> Self {
        self.histogram = Some(Box::new(sink));
        self
    }

    fn deliver(&mut self, frame: DecodedFrame) {
        match frame {
            DecodedFrame::Image(image) => {
                if let Some(sink) = self.image.as_mut() {
                    sink.update(image);
                }
            }
            DecodedFrame::Metadata(meta) => {
                if let Some(sink) = self.metadata.as_mut() {
                    sink.update(meta);
                }
            }
            DecodedFrame::Histogram(histogram) => {
                if let Some(sink) = self.histogram.as_mut() {
                    sink.update(histogram);
                }
            }
        }
    }
}

/// Message counters for one connection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub images: u64,
    pub metadata: u64,
    pub histograms: u64,
    pub warnings: u64,
    pub dropped: u64,
}

impl DispatchStats {
    pub fn delivered(&self) -> u64 {
        self.images + self.metadata + self.histograms
    }

    fn count(&mut self, kind: FrameKind) {
        match kind {
            FrameKind::Image => self.images += 1,
            FrameKind::Metadata => self.metadata += 1,
            FrameKind::Histogram => self.histograms += 1,
        }
    }
}

/// Decodes messages and routes each frame to the sink for its kind.
///
/// Decode failures go to the observer and drop only the failing message.
pub struct Dispatcher {
    decoder: Decoder,
    sinks: Sinks,
    observer: Box<dyn DecodeObserver>,
    stats: DispatchStats,
}

impl Dispatcher {
    pub fn new(decoder: Decoder, sinks: Sinks) -> Self {
        Self {
            decoder,
            sinks,
            observer: Box::new(LogObserver),
            stats: DispatchStats::default(),
        }
    }

    pub fn with_observer(mut self, observer: impl DecodeObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub(crate) fn map_sinks(mut self, f: impl FnOnce(Sinks) -> Sinks) -> Self {
        self.sinks = f(std::mem::take(&mut self.sinks));
        self
    }

    pub fn decoder(&self) -> Decoder {
        self.decoder
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    /// Decode `message` and deliver it. Returns the kind delivered, or `None` if dropped.
    pub fn dispatch(&mut self, message: &[u8]) -> Option<FrameKind> {
        let decoded = self.decoder.decode(message);
        self.deliver(decoded)
    }

    /// Deliver the outcome of a decode performed elsewhere.
    pub fn deliver(&mut self, decoded: Result<Decoded, DecodeError>) -> Option<FrameKind> {
        match decoded {
            Ok(Decoded { frame, warning }) => {
                if let Some(warning) = warning {
                    self.stats.warnings += 1;
                    self.observer.on_decode_warning(warning);
                }
                let kind = frame.kind();
                self.stats.count(kind);
                self.sinks.deliver(frame);
                Some(kind)
            }
            Err(error) => {
                self.stats.dropped += 1;
                self.observer.on_decode_error(error);
                None
            }
        }
    }
}
