use {
    codec::{DecodeError, DecodeWarning},
    std::sync::Arc,
    tokio::sync::watch,
};

/// Receives every decoded value of one frame kind, in arrival order.
///
/// Each call hands over a whole new value; the previous one is never touched again by the
/// demultiplexer.
pub trait Sink<T>: Send {
    fn update(&mut self, value: T);
}

impl<T, F: FnMut(T) + Send> Sink<T> for F {
    fn update(&mut self, value: T) {
        self(value)
    }
}

/// Diagnostic hook for messages that did not decode cleanly.
pub trait DecodeObserver: Send {
    /// The message was dropped.
    fn on_decode_error(&mut self, error: DecodeError);

    /// The message was decoded and delivered, but something looked off.
    fn on_decode_warning(&mut self, warning: DecodeWarning) {
        log::warn!("{}", warning);
    }
}

/// Reports decode problems through the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogObserver;

impl DecodeObserver for LogObserver {
    fn on_decode_error(&mut self, error: DecodeError) {
        log::warn!("dropping message: {}", error);
    }
}

/// Create a single-value hand-off between the demultiplexer and one consumer.
///
/// The writer replaces the whole value on every update; the reader sees the most recent one
/// and can wait for the next change. Values the reader never looked at are simply superseded.
pub fn latest_slot<T>() -> (SlotWriter<T>, SlotReader<T>) {
    let (tx, rx) = watch::channel(None);
    (SlotWriter { tx }, SlotReader { rx })
}

pub struct SlotWriter<T> {
    tx: watch::Sender<Option<Arc<T>>>,
}

impl<T: Send + Sync> Sink<T> for SlotWriter<T> {
    fn update(&mut self, value: T) {
        self.tx.send_replace(Some(Arc::new(value)));
    }
}

pub struct SlotReader<T> {
    rx: watch::Receiver<Option<Arc<T>>>,
}

impl<T> Clone for SlotReader<T> {
    fn clone(&self) -> Self {
        Self {
            rx: self.rx.clone(),
        }
    }
}

impl<T> SlotReader<T> {
    /// Most recent value, if any has arrived.
    pub fn latest(&self) -> Option<Arc<T>> {
        self.rx.borrow().clone()
    }

    /// Whether a value arrived since this reader last looked.
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Wait for a value newer than the last one seen and return it.
    ///
    /// Returns `None` once the writer is gone and nothing new is pending.
    pub async fn changed(&mut self) -> Option<Arc<T>> {
        self.rx.changed().await.ok()?;
        self.rx.borrow_and_update().clone()
    }
}
