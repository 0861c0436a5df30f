//! Demultiplexes the camera frame stream.
//!
//! A [`Demux`] owns one producer connection, decodes every binary message with the
//! [`codec`] crate and hands each frame to the [`Sink`] registered for its kind.
//! Malformed messages are reported to a [`DecodeObserver`] and dropped without
//! affecting the connection or any other sink.

pub mod config;
pub mod demux;
pub mod dispatch;
pub mod error;
pub mod sink;
pub mod state;
pub mod transport;
pub mod ws;

pub use config::{DEFAULT_URI, DemuxConfig, MAX_MESSAGE_SIZE};
pub use demux::{Demux, DemuxHandle};
pub use dispatch::{DispatchStats, Dispatcher, Sinks};
pub use error::ComError;
pub use sink::{DecodeObserver, LogObserver, Sink, SlotReader, SlotWriter, latest_slot};
pub use state::{ConnectionState, InvalidTransition};
pub use transport::{Connector, Transport};
pub use ws::{WsConnector, WsTransport};
