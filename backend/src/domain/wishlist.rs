//! Persisted wishlist of product ids.

use std::sync::Arc;

use tracing::{info, warn};

use super::ports::{KeyValueStore, Notification, Notifier, StorageError};

/// Storage key of the JSON array of wished product ids.
pub const WISHLIST_KEY: &str = "mivoWishlist";

const ADDED_MESSAGE: &str = "Product added to your wishlist.";
const REMOVED_MESSAGE: &str = "Product removed from your wishlist.";

/// What [`Wishlist::toggle`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WishlistChange {
    /// The product was appended.
    Added,
    /// The product was removed.
    Removed,
}

/// Ordered, duplicate-free list of product ids.
pub struct Wishlist {
    store: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
}

impl Wishlist {
    /// Wishlist stored in `store`, announcing toggles through `notifier`.
    pub fn new(store: Arc<dyn KeyValueStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Wished ids in insertion order. An unreadable list reads as empty.
    pub fn items(&self) -> Result<Vec<String>, StorageError> {
        let Some(raw) = self.store.get(WISHLIST_KEY)? else {
            return Ok(Vec::new());
        };
        let ids: Vec<String> = serde_json::from_str(&raw).unwrap_or_else(|error| {
            warn!(%error, "ignoring unreadable wishlist");
            Vec::new()
        });
        let mut unique = Vec::with_capacity(ids.len());
        for id in ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        Ok(unique)
    }

    /// True when `product_id` is wished.
    pub fn contains(&self, product_id: &str) -> Result<bool, StorageError> {
        Ok(self.items()?.iter().any(|id| id == product_id))
    }

    /// Add `product_id` when absent, remove it when present.
    pub fn toggle(&self, product_id: &str) -> Result<WishlistChange, StorageError> {
        let mut items = self.items()?;
        let change = match items.iter().position(|id| id == product_id) {
            Some(index) => {
                items.remove(index);
                WishlistChange::Removed
            }
            None => {
                items.push(product_id.to_owned());
                WishlistChange::Added
            }
        };

        let encoded = serde_json::to_string(&items)
            .map_err(|error| StorageError::corrupt(error.to_string()))?;
        self.store.set(WISHLIST_KEY, &encoded)?;
        info!(product = product_id, ?change, "wishlist toggled");

        self.notifier.notify(match change {
            WishlistChange::Added => Notification::success(ADDED_MESSAGE),
            WishlistChange::Removed => Notification::info(REMOVED_MESSAGE),
        });
        Ok(change)
    }
}
