use {std::fmt, tokio::sync::watch};

/// Lifecycle of a demultiplexer connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Closing,
}

impl ConnectionState {
    /// Whether `self -> next` is one of the allowed transitions.
    pub fn can_transition_to(self, next: ConnectionState) -> bool {
        use ConnectionState::*;
        matches!(
            (self, next),
            (Disconnected, Connecting)
                | (Connecting, Connected)
                | (Connecting, Disconnected)
                | (Connected, Closing)
                | (Closing, Disconnected)
        )
    }

    pub fn transition(self, next: ConnectionState) -> Result<ConnectionState, InvalidTransition> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(InvalidTransition {
                from: self,
                to: next,
            })
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "disconnected"),
            ConnectionState::Connecting => write!(f, "connecting"),
            ConnectionState::Connected => write!(f, "connected"),
            ConnectionState::Closing => write!(f, "closing"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidTransition {
    pub from: ConnectionState,
    pub to: ConnectionState,
}

impl fmt::Display for InvalidTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid connection transition: {} -> {}", self.from, self.to)
    }
}

impl std::error::Error for InvalidTransition {}

/// Owns the current state and publishes every change to watchers.
pub(crate) struct StateTracker {
    tx: watch::Sender<ConnectionState>,
}

impl StateTracker {
    pub(crate) fn new() -> (Self, watch::Receiver<ConnectionState>) {
        let (tx, rx) = watch::channel(ConnectionState::Disconnected);
        (Self { tx }, rx)
    }

    pub(crate) fn current(&self) -> ConnectionState {
        *self.tx.borrow()
    }

    pub(crate) fn advance(&self, next: ConnectionState) -> Result<(), InvalidTransition> {
        let current = self.current();
        current.transition(next)?;
        log::debug!("connection {} -> {}", current, next);
        self.tx.send_replace(next);
        Ok(())
    }
}
