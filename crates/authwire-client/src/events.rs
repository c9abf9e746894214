//! Session event notifications.

use tokio::sync::broadcast;
use tracing::{debug, info};

/// Events the rest of the application reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Credentials were cleared. Listeners should drop any in-memory session
    /// state and return to an unauthenticated state.
    LoggedOut,
}

/// Broadcast sink for [`SessionEvent`]s.
///
/// Every subscriber receives every event sent after it subscribed. Cloning
/// shares the underlying channel.
#[derive(Debug, Clone)]
pub struct SessionEvents {
    sender: broadcast::Sender<SessionEvent>,
}

impl SessionEvents {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub(crate) fn logout(&self) {
        match self.sender.send(SessionEvent::LoggedOut) {
            Ok(listeners) => info!(listeners, "Emitted logout"),
            Err(_) => debug!("Logout emitted with no listeners"),
        }
    }
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new(16)
    }
}
