//! Registered accounts plus the compiled-in administrator namespace.
//!
//! Registered accounts live in one JSON object under [`REGISTERED_USERS_KEY`]
//! keyed by account id. Administrators are checked first and never touch
//! the stored object.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use super::account::{Account, AccountId};
use super::administrators::{administrator_account, is_administrator};
use super::ports::{KeyValueStore, StorageError};

/// Storage key of the serialised id → account mapping.
pub const REGISTERED_USERS_KEY: &str = "registeredUsers";

/// Errors raised by [`IdentityDirectory`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// The id is an administrator id or already registered.
    #[error("account id {id} is already taken")]
    DuplicateId { id: AccountId },
    /// Reading or writing the directory failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

type RawDirectory = BTreeMap<String, Value>;

/// Directory of known identities.
///
/// ## Invariants
/// - Administrator ids are never persisted and never listed by
///   [`IdentityDirectory::accounts`].
/// - Every stored key equals its account's id; entries breaking this are
///   ignored on read but preserved on write.
#[derive(Clone)]
pub struct IdentityDirectory {
    store: Arc<dyn KeyValueStore>,
}

impl IdentityDirectory {
    /// Wrap `store`.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// True when `id` is an administrator or a registered account.
    pub fn exists(&self, id: &AccountId) -> Result<bool, DirectoryError> {
        if is_administrator(id) {
            return Ok(true);
        }
        Ok(self.read_raw()?.contains_key(id.as_ref()))
    }

    /// Resolve `id` to an account.
    pub fn lookup(&self, id: &AccountId) -> Result<Option<Account>, DirectoryError> {
        if let Some(account) = administrator_account(id) {
            return Ok(Some(account));
        }
        let raw = self.read_raw()?;
        Ok(raw
            .get(id.as_ref())
            .and_then(|value| decode_entry(id.as_ref(), value)))
    }

    /// Insert `account` and persist the whole directory.
    ///
    /// The duplicate check and the write are separate storage operations;
    /// two contexts registering the same id at the same moment can both
    /// succeed, in which case the later write wins.
    pub fn register(&self, account: Account) -> Result<Account, DirectoryError> {
        let id = account.id().clone();
        if is_administrator(&id) {
            return Err(DirectoryError::DuplicateId { id });
        }

        let mut raw = self.read_raw()?;
        if raw.contains_key(id.as_ref()) {
            return Err(DirectoryError::DuplicateId { id });
        }

        let value = serde_json::to_value(&account)
            .map_err(|error| StorageError::corrupt(format!("encode account {id}: {error}")))?;
        raw.insert(id.to_string(), value);
        self.write_raw(&raw)?;
        Ok(account)
    }

    /// Registered accounts in id order; administrators are not included.
    pub fn accounts(&self) -> Result<Vec<Account>, DirectoryError> {
        Ok(self
            .read_raw()?
            .iter()
            .filter_map(|(key, value)| decode_entry(key, value))
            .collect())
    }

    fn read_raw(&self) -> Result<RawDirectory, DirectoryError> {
        let Some(serialised) = self.store.get(REGISTERED_USERS_KEY)? else {
            return Ok(RawDirectory::new());
        };
        // A stored `null` reads as an empty directory.
        let parsed: Option<RawDirectory> = serde_json::from_str(&serialised)
            .map_err(|error| StorageError::corrupt(format!("registered users: {error}")))?;
        Ok(parsed.unwrap_or_default())
    }

    fn write_raw(&self, raw: &RawDirectory) -> Result<(), DirectoryError> {
        let serialised = serde_json::to_string(raw)
            .map_err(|error| StorageError::corrupt(format!("registered users: {error}")))?;
        self.store.set(REGISTERED_USERS_KEY, &serialised)?;
        Ok(())
    }
}

fn decode_entry(key: &str, value: &Value) -> Option<Account> {
    match serde_json::from_value::<Account>(value.clone()) {
        Ok(account) if account.id().as_ref() == key => Some(account),
        Ok(account) => {
            warn!(key, id = %account.id(), "ignoring directory entry with mismatched id");
            None
        }
        Err(error) => {
            warn!(key, %error, "ignoring unreadable directory entry");
            None
        }
    }
}
