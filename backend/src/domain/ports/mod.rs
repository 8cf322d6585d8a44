//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the session core expects to talk to the page around
//! it: browser-style storage, the authentication backend, navigation,
//! notifications and the header mount point. Each port exposes strongly
//! typed errors so adapters map their failures into predictable variants.

mod auth_backend;
mod header_mount;
mod key_value_store;
mod navigator;
mod notifier;

#[cfg(test)]
pub use auth_backend::MockAuthBackend;
pub use auth_backend::{AuthBackend, BackendError, RegistrationError};
#[cfg(test)]
pub use header_mount::MockHeaderMount;
pub use header_mount::HeaderMount;
#[cfg(test)]
pub use key_value_store::MockKeyValueStore;
pub use key_value_store::{ContextId, KeyValueStore, StorageChange, StorageError, StorageWatch};
#[cfg(test)]
pub use navigator::MockNavigator;
pub use navigator::{NavigationOffer, Navigator, Surface};
#[cfg(test)]
pub use notifier::{MockConfirmation, MockNotifier};
pub use notifier::{Confirmation, Notification, Notifier, Severity};
