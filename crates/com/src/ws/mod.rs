mod client;

pub use client::{WsConnector, WsTransport};
