//! In-context publish/subscribe channel for session changes.
//!
//! Events carry no payload: subscribers re-read the session store when one
//! arrives. Publishing never blocks and succeeds with no subscribers.

use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

/// Default number of buffered events per subscriber.
pub const SESSION_EVENT_CAPACITY: usize = 16;

/// Signal that session state may have changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionChanged;

/// Publisher side of the session channel for one browsing context.
#[derive(Debug, Clone)]
pub struct SessionEvents {
    sender: broadcast::Sender<SessionChanged>,
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new(SESSION_EVENT_CAPACITY)
    }
}

impl SessionEvents {
    /// Create a channel buffering `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Broadcast [`SessionChanged`]; returns the number of subscribers reached.
    pub fn publish(&self) -> usize {
        self.sender.send(SessionChanged).unwrap_or(0)
    }

    /// Register a new subscriber. Dropping the subscription unsubscribes.
    pub fn subscribe(&self) -> SessionSubscription {
        SessionSubscription {
            receiver: self.sender.subscribe(),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Receiving side of [`SessionEvents`].
#[derive(Debug)]
pub struct SessionSubscription {
    receiver: broadcast::Receiver<SessionChanged>,
}

impl SessionSubscription {
    /// Wait for the next change; `None` once every publisher is gone.
    ///
    /// Missed events collapse into one, which is enough for payload-free
    /// notifications.
    pub async fn recv(&mut self) -> Option<SessionChanged> {
        match self.receiver.recv().await {
            Ok(event) => Some(event),
            Err(RecvError::Lagged(_)) => Some(SessionChanged),
            Err(RecvError::Closed) => None,
        }
    }

    /// Take a pending change without waiting.
    pub fn try_recv(&mut self) -> Option<SessionChanged> {
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Lagged(_)) => Some(SessionChanged),
            Err(TryRecvError::Empty | TryRecvError::Closed) => None,
        }
    }
}
