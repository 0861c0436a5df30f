use {
    base::{LogConfig, log},
    camera_viewer::{histogram_summary, image_summary, metadata_summary},
    codec::{FrameMetadata, Histogram, ImageFrame},
    com::{DEFAULT_URI, Demux, DemuxConfig, Sinks, SlotReader, WsConnector, latest_slot},
};

fn watch_slot<T: Send + Sync + 'static>(
    mut reader: SlotReader<T>,
    summary: fn(&T) -> String,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(value) = reader.changed().await {
            log::info!("{}", summary(&value));
        }
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    base::init_logger(&LogConfig::from_env())?;

    // Parse producer URI from args or use default
    let uri = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_URI.to_string());

    log::info!("Camera Viewer");
    log::info!("Connecting to: {}", uri);

    let config = DemuxConfig::default().with_uri(uri);
    let connector = WsConnector::from_config(&config)?;

    let (image_writer, images) = latest_slot::<ImageFrame>();
    let (metadata_writer, metadata) = latest_slot::<FrameMetadata>();
    let (histogram_writer, histograms) = latest_slot::<Histogram>();
    let sinks = Sinks::new()
        .with_image(image_writer)
        .with_metadata(metadata_writer)
        .with_histogram(histogram_writer);

    let handle = Demux::new(connector, config).with_sinks(sinks).spawn();

    let watchers = [
        watch_slot(images, image_summary),
        watch_slot(metadata, metadata_summary),
        watch_slot(histograms, histogram_summary),
    ];

    let mut state = handle.state();
    tokio::spawn(async move {
        while state.changed().await.is_ok() {
            let current = *state.borrow_and_update();
            log::info!("connection {}", current);
        }
    });

    tokio::select! {
        _ = tokio::signal::ctrl_c() => log::info!("Stopping..."),
        _ = handle.closed() => {}
    }

    let result = handle.stop().await;
    for watcher in watchers {
        // watchers end once the sinks are dropped with the connection
        let _ = watcher.await;
    }

    let stats = result?;
    log::info!(
        "Exiting: {} images, {} metadata, {} histograms, {} dropped",
        stats.images,
        stats.metadata,
        stats.histograms,
        stats.dropped
    );
    Ok(())
}
