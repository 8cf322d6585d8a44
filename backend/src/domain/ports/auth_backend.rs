//! Driven port for the authentication backend round trip.
//!
//! The auth controller awaits this port instead of sleeping on bare timers,
//! so a real backend can replace the simulated one without touching the
//! login and signup state machines.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Account, AccountId};

/// Unexpected failures during a backend round trip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The backend could not complete the request.
    #[error("authentication backend unavailable: {message}")]
    Unavailable { message: String },
}

impl BackendError {
    /// Helper for unavailable backends.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// Errors returned when registering an account.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// The id is an administrator id or already registered.
    #[error("account id {id} is already taken")]
    DuplicateId { id: AccountId },
    /// Transient backend failure.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Port for the login and registration round trips.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Resolve `id` to an account; `Ok(None)` when it is unknown.
    async fn authenticate(&self, id: &AccountId) -> Result<Option<Account>, BackendError>;

    /// Persist a new account.
    async fn register(&self, account: Account) -> Result<Account, RegistrationError>;
}
