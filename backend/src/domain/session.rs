//! Persisted session state for one browsing context.
//!
//! The session lives in flat storage keys rather than one serialised blob
//! so other page scripts can keep reading individual fields.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;

use super::account::{Account, Role};
use super::ports::{KeyValueStore, StorageError};

/// Logged-in flag; the only key the header watches across contexts.
pub const LOGGED_IN_KEY: &str = "isLoggedIn";
/// Authenticated account id.
pub const USER_ID_KEY: &str = "userId";
/// Authenticated display name.
pub const USER_NAME_KEY: &str = "userName";
/// Authenticated role.
pub const USER_ROLE_KEY: &str = "userRole";
/// ISO-8601 login timestamp.
pub const LOGIN_TIME_KEY: &str = "loginTime";

const LOGGED_IN_VALUE: &str = "true";
const FALLBACK_USER_NAME: &str = "Pengguna";

/// Authenticated-state record for the current context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user_id: String,
    user_name: String,
    role: Role,
    logged_in_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Start a session for `account` at `now`.
    pub fn for_account(account: &Account, now: DateTime<Utc>) -> Self {
        Self {
            user_id: account.id().to_string(),
            user_name: account.name().to_owned(),
            role: account.role(),
            logged_in_at: Some(now),
        }
    }

    /// Authenticated account id.
    pub fn user_id(&self) -> &str {
        self.user_id.as_str()
    }

    /// Display name shown in the header.
    pub fn user_name(&self) -> &str {
        self.user_name.as_str()
    }

    /// Authenticated role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Login time, absent when the stored value was missing or unreadable.
    pub fn logged_in_at(&self) -> Option<DateTime<Utc>> {
        self.logged_in_at
    }
}

/// Key-value wrapper reading and writing the session fields.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    /// Wrap `store`.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Read the current session; `None` unless the flag is exactly `"true"`.
    pub fn load(&self) -> Result<Option<Session>, StorageError> {
        if self.store.get(LOGGED_IN_KEY)?.as_deref() != Some(LOGGED_IN_VALUE) {
            return Ok(None);
        }

        let user_id = self.store.get(USER_ID_KEY)?.unwrap_or_default();
        let user_name = self
            .store
            .get(USER_NAME_KEY)?
            .unwrap_or_else(|| FALLBACK_USER_NAME.to_owned());
        let role = self
            .store
            .get(USER_ROLE_KEY)?
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(Role::Pengguna);
        let logged_in_at = self.store.get(LOGIN_TIME_KEY)?.and_then(|raw| {
            DateTime::parse_from_rfc3339(&raw)
                .map(|parsed| parsed.with_timezone(&Utc))
                .inspect_err(|error| debug!(%error, "ignoring unreadable login time"))
                .ok()
        });

        Ok(Some(Session {
            user_id,
            user_name,
            role,
            logged_in_at,
        }))
    }

    /// Persist every session field.
    ///
    /// The logged-in flag is written last so a context reacting to it
    /// always finds the other fields in place.
    pub fn save(&self, session: &Session) -> Result<(), StorageError> {
        self.store.set(USER_ID_KEY, session.user_id())?;
        self.store.set(USER_NAME_KEY, session.user_name())?;
        self.store.set(USER_ROLE_KEY, session.role().as_str())?;
        match session.logged_in_at() {
            Some(at) => self.store.set(
                LOGIN_TIME_KEY,
                &at.to_rfc3339_opts(SecondsFormat::Millis, true),
            )?,
            None => self.store.remove(LOGIN_TIME_KEY)?,
        }
        self.store.set(LOGGED_IN_KEY, LOGGED_IN_VALUE)
    }

    /// Remove every session field. Clearing an absent session succeeds.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(LOGGED_IN_KEY)?;
        for key in [USER_ID_KEY, USER_NAME_KEY, USER_ROLE_KEY, LOGIN_TIME_KEY] {
            self.store.remove(key)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::AccountId;
    use crate::domain::administrators::administrator_account;
    use crate::outbound::storage::SharedMemoryStorage;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> Arc<dyn KeyValueStore> {
        Arc::new(SharedMemoryStorage::new().open_context())
    }

    fn login_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0)
            .single()
            .expect("valid timestamp")
    }

    fn admin_session() -> Session {
        let id = AccountId::new("admin07").expect("valid id");
        let account = administrator_account(&id).expect("administrator");
        Session::for_account(&account, login_time())
    }

    #[rstest]
    fn load_without_flag_is_absent(store: Arc<dyn KeyValueStore>) {
        store.set(USER_NAME_KEY, "Ghost").expect("set");
        let sessions = SessionStore::new(store);
        assert_eq!(sessions.load().expect("load"), None);
    }

    #[rstest]
    #[case("TRUE")]
    #[case("1")]
    #[case("true ")]
    fn only_exact_true_counts_as_logged_in(store: Arc<dyn KeyValueStore>, #[case] flag: &str) {
        store.set(LOGGED_IN_KEY, flag).expect("set");
        assert_eq!(SessionStore::new(store).load().expect("load"), None);
    }

    #[rstest]
    fn save_then_load_returns_the_session(store: Arc<dyn KeyValueStore>) {
        let sessions = SessionStore::new(Arc::clone(&store));
        let session = admin_session();
        sessions.save(&session).expect("save");

        assert_eq!(sessions.load().expect("load"), Some(session));
        assert_eq!(
            store.get(LOGIN_TIME_KEY).expect("get").as_deref(),
            Some("2025-06-01T09:30:00.000Z")
        );
    }

    #[rstest]
    fn tolerant_reads_fill_missing_fields(store: Arc<dyn KeyValueStore>) {
        store.set(LOGGED_IN_KEY, "true").expect("set");
        store.set(USER_ROLE_KEY, "user").expect("set");
        store.set(LOGIN_TIME_KEY, "yesterday").expect("set");

        let session = SessionStore::new(store)
            .load()
            .expect("load")
            .expect("session present");
        assert_eq!(session.user_id(), "");
        assert_eq!(session.user_name(), "Pengguna");
        assert_eq!(session.role(), Role::Pengguna);
        assert!(session.logged_in_at().is_none());
    }

    #[rstest]
    fn clear_removes_every_field(store: Arc<dyn KeyValueStore>) {
        let sessions = SessionStore::new(Arc::clone(&store));
        sessions.save(&admin_session()).expect("save");
        sessions.clear().expect("clear");

        for key in [
            LOGGED_IN_KEY,
            USER_ID_KEY,
            USER_NAME_KEY,
            USER_ROLE_KEY,
            LOGIN_TIME_KEY,
        ] {
            assert_eq!(store.get(key).expect("get"), None, "{key} should be gone");
        }
    }

    #[rstest]
    fn clear_without_session_is_a_no_op(store: Arc<dyn KeyValueStore>) {
        let sessions = SessionStore::new(store);
        sessions.clear().expect("first clear");
        sessions.clear().expect("second clear");
        assert_eq!(sessions.load().expect("load"), None);
    }
}
