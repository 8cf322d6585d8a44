//! Authentication backend simulated over the local identity directory.
//!
//! Each round trip sleeps for the configured latency before consulting the
//! [`IdentityDirectory`], which is how the mock pages behave in front of a
//! real network.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tracing::debug;

use crate::domain::ports::{AuthBackend, BackendError, RegistrationError};
use crate::domain::{Account, AccountId, DirectoryError, IdentityDirectory};

/// Simulated round-trip latencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyProfile {
    /// Delay before a login resolves.
    pub login: Duration,
    /// Delay before a registration resolves.
    pub signup: Duration,
    /// Upper bound of extra random delay added to each call.
    pub jitter: Duration,
}

impl Default for LatencyProfile {
    fn default() -> Self {
        Self {
            login: Duration::from_millis(1500),
            signup: Duration::from_millis(2000),
            jitter: Duration::ZERO,
        }
    }
}

impl LatencyProfile {
    /// No delay at all.
    pub const fn instant() -> Self {
        Self {
            login: Duration::ZERO,
            signup: Duration::ZERO,
            jitter: Duration::ZERO,
        }
    }
}

/// [`AuthBackend`] answering from an [`IdentityDirectory`].
#[derive(Clone)]
pub struct SimulatedAuthBackend {
    directory: IdentityDirectory,
    latency: LatencyProfile,
}

impl SimulatedAuthBackend {
    /// Serve `directory` with `latency`.
    pub fn new(directory: IdentityDirectory, latency: LatencyProfile) -> Self {
        Self { directory, latency }
    }

    async fn round_trip(&self, base: Duration) {
        let delay = base + jitter(self.latency.jitter);
        if !delay.is_zero() {
            debug!(delay_ms = delay.as_millis(), "simulating backend latency");
            tokio::time::sleep(delay).await;
        }
    }
}

fn jitter(bound: Duration) -> Duration {
    if bound.is_zero() {
        return Duration::ZERO;
    }
    let upper = u64::try_from(bound.as_millis()).unwrap_or(u64::MAX);
    Duration::from_millis(rand::thread_rng().gen_range(0..=upper))
}

impl From<DirectoryError> for BackendError {
    fn from(error: DirectoryError) -> Self {
        Self::unavailable(error.to_string())
    }
}

impl From<DirectoryError> for RegistrationError {
    fn from(error: DirectoryError) -> Self {
        match error {
            DirectoryError::DuplicateId { id } => Self::DuplicateId { id },
            DirectoryError::Storage(storage) => {
                Self::Backend(BackendError::unavailable(storage.to_string()))
            }
        }
    }
}

#[async_trait]
impl AuthBackend for SimulatedAuthBackend {
    async fn authenticate(&self, id: &AccountId) -> Result<Option<Account>, BackendError> {
        self.round_trip(self.latency.login).await;
        Ok(self.directory.lookup(id)?)
    }

    async fn register(&self, account: Account) -> Result<Account, RegistrationError> {
        self.round_trip(self.latency.signup).await;
        Ok(self.directory.register(account)?)
    }
}
