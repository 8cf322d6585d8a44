//! In-memory storage shared by several browsing contexts.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::broadcast;

use crate::domain::ports::{ContextId, KeyValueStore, StorageChange, StorageError, StorageWatch};

const CHANGE_CAPACITY: usize = 64;

#[derive(Debug)]
struct Origin {
    entries: Mutex<BTreeMap<String, String>>,
    changes: broadcast::Sender<StorageChange>,
}

/// One origin's storage. Open a [`MemoryStorage`] handle per page.
#[derive(Debug, Clone)]
pub struct SharedMemoryStorage {
    origin: Arc<Origin>,
}

impl Default for SharedMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedMemoryStorage {
    /// Create an empty origin.
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Self {
            origin: Arc::new(Origin {
                entries: Mutex::new(BTreeMap::new()),
                changes,
            }),
        }
    }

    /// Attach a new browsing context.
    pub fn open_context(&self) -> MemoryStorage {
        MemoryStorage {
            origin: Arc::clone(&self.origin),
            context: ContextId::random(),
        }
    }
}

/// A single context's handle onto [`SharedMemoryStorage`].
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    origin: Arc<Origin>,
    context: ContextId,
}

impl MemoryStorage {
    /// Identifier of the context this handle writes as.
    pub fn context(&self) -> ContextId {
        self.context
    }

    fn entries(&self) -> Result<MutexGuard<'_, BTreeMap<String, String>>, StorageError> {
        self.origin
            .entries
            .lock()
            .map_err(|_| StorageError::unavailable("memory storage lock poisoned"))
    }

    fn announce(&self, key: &str) {
        // Nobody listening is fine.
        let _receivers = self
            .origin
            .changes
            .send(StorageChange::key(key, self.context))
            .ok();
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let previous = self.entries()?.insert(key.to_owned(), value.to_owned());
        if previous.as_deref() != Some(value) {
            self.announce(key);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let previous = self.entries()?.remove(key);
        if previous.is_some() {
            self.announce(key);
        }
        Ok(())
    }

    fn watch(&self) -> StorageWatch {
        StorageWatch::new(self.origin.changes.subscribe(), self.context)
    }
}
