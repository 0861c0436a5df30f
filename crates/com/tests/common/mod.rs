#![allow(dead_code)]

use {
    codec::{FrameMetadata, HISTOGRAM_BINS, Histogram, ImageFrame, WireFrame},
    com::{ComError, Connector, Transport},
    futures_util::{SinkExt, StreamExt},
    std::{
        net::SocketAddr,
        sync::{
            Arc, Mutex,
            atomic::{AtomicBool, Ordering},
        },
    },
    tokio::{
        net::TcpListener,
        sync::{RwLock, mpsc},
        task::JoinHandle,
    },
    tokio_websockets::{Message, ServerBuilder, WebSocketStream},
};

// --- messages ---

pub fn image_message(samples: &[u16]) -> Vec<u8> {
    ImageFrame::new(samples.to_vec()).to_bytes()
}

pub fn metadata_message(timestamp: &str) -> Vec<u8> {
    FrameMetadata {
        timestamp: timestamp.to_string(),
        shape: vec![1, 2],
        dtype: "uint16".to_string(),
    }
    .to_bytes()
}

pub fn histogram_message(peak_count: u32) -> Vec<u8> {
    let bins = (0..HISTOGRAM_BINS as u32).map(|i| i * 4 + 2).collect();
    let mut hist = vec![0; HISTOGRAM_BINS];
    hist[0] = peak_count;
    Histogram::new(bins, hist).unwrap().to_bytes()
}

// --- recording sinks ---

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Image(Vec<u16>),
    Metadata(String),
    Histogram(u32),
}

#[derive(Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<Event>>>,
}

impl Recorder {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn image_sink(&self) -> impl FnMut(ImageFrame) + Send + 'static {
        let events = self.events.clone();
        move |image: ImageFrame| events.lock().unwrap().push(Event::Image(image.into_samples()))
    }

    pub fn metadata_sink(&self) -> impl FnMut(FrameMetadata) + Send + 'static {
        let events = self.events.clone();
        move |meta: FrameMetadata| events.lock().unwrap().push(Event::Metadata(meta.timestamp))
    }

    pub fn histogram_sink(&self) -> impl FnMut(Histogram) + Send + 'static {
        let events = self.events.clone();
        move |histogram: Histogram| {
            events
                .lock()
                .unwrap()
                .push(Event::Histogram(histogram.hist()[0]))
        }
    }
}

// --- in-memory transport ---

pub struct ChannelTransport {
    rx: mpsc::UnboundedReceiver<Result<Vec<u8>, ComError>>,
    closed: Arc<AtomicBool>,
}

impl Transport for ChannelTransport {
    async fn recv(&mut self) -> Result<Option<Vec<u8>>, ComError> {
        match self.rx.recv().await {
            Some(Ok(message)) => Ok(Some(message)),
            Some(Err(error)) => Err(error),
            None => Ok(None),
        }
    }

    async fn close(&mut self) -> Result<(), ComError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Hands out one in-memory transport; a second connect fails like a refused handshake.
pub struct ChannelConnector {
    transport: Option<ChannelTransport>,
}

pub struct ChannelPeer {
    pub tx: mpsc::UnboundedSender<Result<Vec<u8>, ComError>>,
    pub closed: Arc<AtomicBool>,
}

impl ChannelPeer {
    pub fn send(&self, message: Vec<u8>) {
        let _ = self.tx.send(Ok(message));
    }

    pub fn fail(&self, error: ComError) {
        let _ = self.tx.send(Err(error));
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

pub fn channel_connector() -> (ChannelConnector, ChannelPeer) {
    let (tx, rx) = mpsc::unbounded_channel();
    let closed = Arc::new(AtomicBool::new(false));
    let transport = ChannelTransport {
        rx,
        closed: closed.clone(),
    };
    (
        ChannelConnector {
            transport: Some(transport),
        },
        ChannelPeer { tx, closed },
    )
}

impl Connector for ChannelConnector {
    type Transport = ChannelTransport;

    async fn connect(&mut self) -> Result<ChannelTransport, ComError> {
        self.transport.take().ok_or(ComError::ConnectionClosed)
    }
}

pub struct RefusingConnector;

impl Connector for RefusingConnector {
    type Transport = ChannelTransport;

    async fn connect(&mut self) -> Result<ChannelTransport, ComError> {
        Err(ComError::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "refused",
        )))
    }
}

pub struct StalledConnector;

impl Connector for StalledConnector {
    type Transport = ChannelTransport;

    async fn connect(&mut self) -> Result<ChannelTransport, ComError> {
        std::future::pending().await
    }
}

// --- WebSocket producer ---

type WsSink = futures_util::stream::SplitSink<WebSocketStream<tokio::net::TcpStream>, Message>;

/// Accepts viewers and broadcasts raw binary messages to them.
pub struct TestProducer {
    clients: Arc<RwLock<Vec<WsSink>>>,
    accept_task: JoinHandle<()>,
    local_addr: SocketAddr,
}

impl TestProducer {
    pub async fn bind() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let local_addr = listener.local_addr().unwrap();
        let clients: Arc<RwLock<Vec<WsSink>>> = Arc::new(RwLock::new(Vec::new()));
        let accepted = clients.clone();

        let accept_task = tokio::spawn(async move {
            while let Ok((tcp_stream, _)) = listener.accept().await {
                let Ok((_request, ws_stream)) = ServerBuilder::new().accept(tcp_stream).await else {
                    continue;
                };
                let (write_half, mut read_half) = ws_stream.split();
                accepted.write().await.push(write_half);
                // drain so close frames from the viewer are answered
                tokio::spawn(async move { while let Some(Ok(_)) = read_half.next().await {} });
            }
        });

        Self {
            clients,
            accept_task,
            local_addr,
        }
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub async fn client_count(&self) -> usize {
        self.clients.read().await.len()
    }

    pub async fn send(&self, message: Message) {
        for client in self.clients.write().await.iter_mut() {
            let _ = client.send(message.clone()).await;
        }
    }

    pub async fn send_binary(&self, bytes: Vec<u8>) {
        self.send(Message::binary(bytes)).await;
    }

    /// Close every viewer connection from the producer side.
    pub async fn close_all(&self) {
        for mut client in self.clients.write().await.drain(..) {
            let _ = client.close().await;
        }
    }
}

impl Drop for TestProducer {
    fn drop(&mut self) {
        self.accept_task.abort();
    }
}
