use {
    crate::{
        ComError, ConnectionState, Connector, DecodeObserver, DemuxConfig, DispatchStats,
        Dispatcher, Sink, Sinks, Transport,
        state::StateTracker,
    },
    codec::{Decoder, FrameMetadata, Histogram, ImageFrame},
    tokio::{
        sync::{oneshot, watch},
        task::{JoinHandle, spawn_blocking},
    },
};

/// Drives one connection: handshake, then every inbound message through the decoder to the
/// registered sinks, in arrival order.
///
/// The connector owns the transport settings. `Demux` reads only the decode settings
/// (`expected`, `decode_on_worker`) from its config, so build the connector from the same
/// config with [`WsConnector::from_config`](crate::WsConnector::from_config).
pub struct Demux<C> {
    connector: C,
    config: DemuxConfig,
    dispatcher: Dispatcher,
}

impl<C: Connector> Demux<C> {
    pub fn new(connector: C, config: DemuxConfig) -> Self {
        let decoder = match config.expected() {
            Some(dims) => Decoder::new().with_expected(dims),
            None => Decoder::new(),
        };
        Self {
            connector,
            config,
            dispatcher: Dispatcher::new(decoder, Sinks::new()),
        }
    }

    /// Register all sinks at once, replacing any registered before.
    pub fn with_sinks(self, sinks: Sinks) -> Self {
        self.map_sinks(|_| sinks)
    }

    pub fn with_image_sink(self, sink: impl Sink<ImageFrame> + 'static) -> Self {
        self.map_sinks(|sinks| sinks.with_image(sink))
    }

    pub fn with_metadata_sink(self, sink: impl Sink<FrameMetadata> + 'static) -> Self {
        self.map_sinks(|sinks| sinks.with_metadata(sink))
    }

    pub fn with_histogram_sink(self, sink: impl Sink<Histogram> + 'static) -> Self {
        self.map_sinks(|sinks| sinks.with_histogram(sink))
    }

    pub fn with_observer(mut self, observer: impl DecodeObserver + 'static) -> Self {
        self.dispatcher = self.dispatcher.with_observer(observer);
        self
    }

    pub fn config(&self) -> &DemuxConfig {
        &self.config
    }

    /// Start the connection on the current tokio runtime.
    pub fn spawn(self) -> DemuxHandle {
        let (tracker, state) = StateTracker::new();
        let (stop_tx, stop_rx) = oneshot::channel();
        let (stats_tx, stats) = watch::channel(DispatchStats::default());
        let join = tokio::spawn(run(self, tracker, stats_tx, stop_rx));
        DemuxHandle {
            stop: Some(stop_tx),
            state,
            stats,
            join,
        }
    }

    fn map_sinks(mut self, f: impl FnOnce(Sinks) -> Sinks) -> Self {
        self.dispatcher = self.dispatcher.map_sinks(f);
        self
    }
}

/// Control over a running [`Demux`]. Dropping the handle stops the connection.
pub struct DemuxHandle {
    stop: Option<oneshot::Sender<()>>,
    state: watch::Receiver<ConnectionState>,
    stats: watch::Receiver<DispatchStats>,
    join: JoinHandle<Result<DispatchStats, ComError>>,
}

impl DemuxHandle {
    /// Connection state updates.
    pub fn state(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }

    pub fn current_state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Counters as of the last message handled.
    pub fn stats(&self) -> DispatchStats {
        *self.stats.borrow()
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Resolves once the connection has ended, whether stopped, refused or closed by the peer.
    pub async fn closed(&self) {
        let mut state = self.state.clone();
        // the state sender lives exactly as long as the connection task
        while state.changed().await.is_ok() {}
    }

    /// Stop the connection and wait for it to close.
    ///
    /// Once this returns no sink is invoked again. Returns the final counters, or the
    /// transport error that ended the connection first.
    pub async fn stop(mut self) -> Result<DispatchStats, ComError> {
        if let Some(stop) = self.stop.take() {
            // the task may already have ended on its own
            let _ = stop.send(());
        }
        self.join().await
    }

    /// Wait for the connection to end without asking it to.
    pub async fn wait(mut self) -> Result<DispatchStats, ComError> {
        self.join().await
    }

    async fn join(&mut self) -> Result<DispatchStats, ComError> {
        (&mut self.join).await?
    }
}

fn advance(tracker: &StateTracker, next: ConnectionState) {
    if let Err(error) = tracker.advance(next) {
        log::error!("{}", error);
    }
}

async fn run<C: Connector>(
    demux: Demux<C>,
    tracker: StateTracker,
    stats: watch::Sender<DispatchStats>,
    mut stop: oneshot::Receiver<()>,
) -> Result<DispatchStats, ComError> {
    let Demux {
        mut connector,
        config,
        mut dispatcher,
    } = demux;

    advance(&tracker, ConnectionState::Connecting);
    let connected = tokio::select! {
        biased;
        _ = &mut stop => {
            log::info!("stopped during handshake");
            advance(&tracker, ConnectionState::Disconnected);
            return Ok(dispatcher.stats());
        }
        result = connector.connect() => result,
    };
    let mut transport = match connected {
        Ok(transport) => transport,
        Err(error) => {
            log::warn!("handshake failed: {}", error);
            advance(&tracker, ConnectionState::Disconnected);
            return Err(error);
        }
    };
    advance(&tracker, ConnectionState::Connected);

    let result = loop {
        let message = tokio::select! {
            biased;
            _ = &mut stop => break Ok(()),
            message = transport.recv() => message,
        };
        let message = match message {
            Ok(Some(message)) => message,
            Ok(None) => {
                log::info!("producer closed the connection");
                break Ok(());
            }
            Err(error) => {
                log::warn!("transport failed: {}", error);
                break Err(error);
            }
        };
        if config.decode_on_worker() {
            let decoder = dispatcher.decoder();
            let decoding = spawn_blocking(move || decoder.decode(&message));
            // a stop abandons the decode; its result is never delivered
            tokio::select! {
                biased;
                _ = &mut stop => break Ok(()),
                decoded = decoding => match decoded {
                    Ok(decoded) => {
                        dispatcher.deliver(decoded);
                    }
                    Err(error) => break Err(ComError::from(error)),
                },
            }
        } else {
            dispatcher.dispatch(&message);
        }
        stats.send_replace(dispatcher.stats());
    };

    advance(&tracker, ConnectionState::Closing);
    if let Err(error) = transport.close().await {
        log::debug!("close: {}", error);
    }
    advance(&tracker, ConnectionState::Disconnected);

    let totals = dispatcher.stats();
    log::info!(
        "connection ended: {} delivered, {} dropped, {} warnings",
        totals.delivered(),
        totals.dropped,
        totals.warnings
    );
    result.map(|()| totals)
}
