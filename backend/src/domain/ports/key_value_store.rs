//! Port abstraction for browser-style key-value storage and its change feed.
//!
//! Every open page is a separate *context* holding its own handle onto a
//! shared store. Writes made through one handle are announced to the other
//! handles only, mirroring the platform's cross-tab `storage` event.

use std::fmt;

use thiserror::Error;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::debug;
use uuid::Uuid;

/// Errors raised by storage adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Backing medium could not be reached or is poisoned.
    #[error("storage unavailable: {message}")]
    Unavailable { message: String },
    /// Persisted bytes could not be decoded.
    #[error("storage contents are corrupt: {message}")]
    Corrupt { message: String },
}

impl StorageError {
    /// Helper for unreachable storage.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Helper for undecodable storage contents.
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::Corrupt {
            message: message.into(),
        }
    }
}

/// Identifier of one browsing context (tab) attached to a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(Uuid);

impl ContextId {
    /// Generate a fresh context identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// Notification that another context changed the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageChange {
    key: Option<String>,
    origin: ContextId,
}

impl StorageChange {
    /// A single key was written or removed by `origin`.
    pub fn key(key: impl Into<String>, origin: ContextId) -> Self {
        Self {
            key: Some(key.into()),
            origin,
        }
    }

    /// An unknown set of keys changed; listeners must re-read everything.
    pub fn unspecified(origin: ContextId) -> Self {
        Self { key: None, origin }
    }

    /// Key that changed, when known.
    pub fn changed_key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Context that performed the write.
    pub fn origin(&self) -> ContextId {
        self.origin
    }

    /// True when this change may have touched `key`.
    pub fn affects(&self, key: &str) -> bool {
        self.key.as_deref().is_none_or(|changed| changed == key)
    }
}

/// Receiving end of a store's cross-context change feed.
///
/// Changes made by the watching context itself are filtered out. Dropping
/// the watch unsubscribes.
#[derive(Debug)]
pub struct StorageWatch {
    receiver: Option<broadcast::Receiver<StorageChange>>,
    context: Option<ContextId>,
}

impl StorageWatch {
    /// Watch `receiver`, ignoring changes made by `context`.
    pub fn new(receiver: broadcast::Receiver<StorageChange>, context: ContextId) -> Self {
        Self {
            receiver: Some(receiver),
            context: Some(context),
        }
    }

    /// A watch that never yields, for stores without other contexts.
    pub fn closed() -> Self {
        Self {
            receiver: None,
            context: None,
        }
    }

    /// Wait for the next change made by another context.
    ///
    /// Returns `None` once the feed has closed.
    pub async fn recv(&mut self) -> Option<StorageChange> {
        let own = self.context;
        let receiver = self.receiver.as_mut()?;
        loop {
            match receiver.recv().await {
                Ok(change) if Some(change.origin()) == own => continue,
                Ok(change) => return Some(change),
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "storage watch lagged; forcing a full re-read");
                    if let Some(context) = own {
                        return Some(StorageChange::unspecified(context));
                    }
                }
                Err(RecvError::Closed) => {
                    self.receiver = None;
                    return None;
                }
            }
        }
    }
}

/// Synchronous string key-value storage shared by the components of one
/// context.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`; removing an absent key succeeds.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Subscribe to changes made by other contexts.
    fn watch(&self) -> StorageWatch;
}
