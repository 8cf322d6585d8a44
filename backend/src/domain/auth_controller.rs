//! Login, signup and logout flows.
//!
//! Each flow is a small state machine driven by one form submission. The
//! controller owns no page state: it reports an outcome and asks the
//! injected ports to show messages and navigate.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use mockable::Clock;
use tracing::{error, info, warn};

use super::account::{Account, AccountId, Role};
use super::identity_directory::IdentityDirectory;
use super::ports::{
    AuthBackend, Confirmation, KeyValueStore, NavigationOffer, Navigator, Notification, Notifier,
    RegistrationError, StorageError, Surface,
};
use super::session::{Session, SessionStore};
use super::session_events::SessionEvents;
use super::signup::{FieldError, FieldErrorReason, FormField, SignupForm};

const LOGIN_FAILED_MESSAGE: &str = "Something went wrong while logging in.";
const SIGNUP_FAILED_MESSAGE: &str = "Something went wrong while registering.";
const NOT_FOUND_MESSAGE: &str = "User ID not found.";
const NOT_FOUND_PROMPT: &str = "ID not found. Create a new account?";
const DUPLICATE_MESSAGE: &str = "User ID is already taken.";
const SIGNUP_SUCCESS_MESSAGE: &str = "Registration succeeded! Please log in.";

/// Delays applied before follow-up navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowTimings {
    /// Wait before leaving the login page after success.
    pub login_redirect: Duration,
    /// Wait before leaving the signup page after success.
    pub signup_redirect: Duration,
    /// Wait before offering signup for an unknown id.
    pub not_found_offer: Duration,
    /// Wait before returning to the landing page after logout.
    pub logout_redirect: Duration,
}

impl Default for FlowTimings {
    fn default() -> Self {
        Self {
            login_redirect: Duration::from_millis(1500),
            signup_redirect: Duration::from_millis(2000),
            not_found_offer: Duration::from_millis(1000),
            logout_redirect: Duration::from_millis(1000),
        }
    }
}

/// Page-facing collaborators of the controller.
#[derive(Clone)]
pub struct AuthPorts {
    /// Authentication backend round trip.
    pub backend: Arc<dyn AuthBackend>,
    /// Navigation service.
    pub navigator: Arc<dyn Navigator>,
    /// Toast surface.
    pub notifier: Arc<dyn Notifier>,
    /// Source of login and registration timestamps.
    pub clock: Arc<dyn Clock>,
}

/// Result of one login submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The id was blank; nothing was submitted.
    Rejected(FieldError),
    /// Another login is still in flight for this form.
    Busy,
    /// A session was created.
    Success(Session),
    /// The id is unknown; signup was offered.
    NotFound {
        /// Normalised id that was looked up.
        id: AccountId,
    },
    /// The backend failed; nothing changed.
    Failed,
}

/// Result of one signup submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignupOutcome {
    /// Validation failed; every failing field is listed.
    Rejected(Vec<FieldError>),
    /// Another signup is still in flight for this form.
    Busy,
    /// The account was registered. No session is created.
    Registered(Account),
    /// The id was taken between validation and registration.
    Duplicate {
        /// Id that collided.
        id: AccountId,
    },
    /// The backend failed; nothing changed.
    Failed,
}

/// Demo identities offered as quick-login buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoAccount {
    /// First administrator.
    Admin,
    /// Sample registered member.
    Pengguna,
}

impl DemoAccount {
    /// Every quick-login button in display order.
    pub const ALL: [Self; 2] = [Self::Admin, Self::Pengguna];

    /// Id submitted by the quick-login button.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::Admin => "admin01",
            Self::Pengguna => "pengguna01",
        }
    }
}

/// Mutual-exclusion latch standing in for a disabled submit button.
#[derive(Debug, Default)]
pub struct SubmitLatch {
    engaged: AtomicBool,
}

impl SubmitLatch {
    /// Engage the latch, or `None` when a submission is already running.
    pub fn try_engage(&self) -> Option<SubmitGuard<'_>> {
        self.engaged
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmitGuard { latch: self })
    }

    /// True while a submission holds the latch.
    pub fn is_engaged(&self) -> bool {
        self.engaged.load(Ordering::Acquire)
    }
}

/// Releases its [`SubmitLatch`] when dropped, on every exit path.
#[derive(Debug)]
pub struct SubmitGuard<'a> {
    latch: &'a SubmitLatch,
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.latch.engaged.store(false, Ordering::Release);
    }
}

/// Orchestrates signup, login and logout for one browsing context.
pub struct AuthController {
    store: Arc<dyn KeyValueStore>,
    sessions: SessionStore,
    directory: IdentityDirectory,
    events: SessionEvents,
    ports: AuthPorts,
    timings: FlowTimings,
    login_latch: SubmitLatch,
    signup_latch: SubmitLatch,
}

impl AuthController {
    /// Build a controller over `store`, publishing on `events`.
    pub fn new(store: Arc<dyn KeyValueStore>, events: SessionEvents, ports: AuthPorts) -> Self {
        Self {
            sessions: SessionStore::new(Arc::clone(&store)),
            directory: IdentityDirectory::new(Arc::clone(&store)),
            store,
            events,
            ports,
            timings: FlowTimings::default(),
            login_latch: SubmitLatch::default(),
            signup_latch: SubmitLatch::default(),
        }
    }

    /// Override the navigation delays.
    #[must_use]
    pub fn with_timings(mut self, timings: FlowTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Handle a login form submission.
    pub async fn login(&self, raw_id: &str) -> LoginOutcome {
        let Ok(id) = AccountId::new(raw_id) else {
            return LoginOutcome::Rejected(FieldError::new(
                FormField::LoginId,
                FieldErrorReason::Required,
            ));
        };
        let Some(_guard) = self.login_latch.try_engage() else {
            return LoginOutcome::Busy;
        };

        match self.ports.backend.authenticate(&id).await {
            Ok(Some(account)) => self.complete_login(&account),
            Ok(None) => {
                warn!(%id, "login for unknown id");
                self.notify(Notification::error(NOT_FOUND_MESSAGE));
                self.ports.navigator.offer(NavigationOffer {
                    prompt: NOT_FOUND_PROMPT.to_owned(),
                    target: Surface::Signup,
                    delay: self.timings.not_found_offer,
                });
                LoginOutcome::NotFound { id }
            }
            Err(err) => {
                error!(%id, error = %err, "login backend failed");
                self.notify(Notification::error(LOGIN_FAILED_MESSAGE));
                LoginOutcome::Failed
            }
        }
    }

    /// Log in with one of the demo identities.
    pub async fn quick_login(&self, account: DemoAccount) -> LoginOutcome {
        self.login(account.id()).await
    }

    fn complete_login(&self, account: &Account) -> LoginOutcome {
        let session = Session::for_account(account, self.ports.clock.utc());
        if let Err(err) = self.sessions.save(&session) {
            error!(id = %account.id(), error = %err, "failed to persist session");
            self.notify(Notification::error(LOGIN_FAILED_MESSAGE));
            return LoginOutcome::Failed;
        }
        self.events.publish();
        info!(id = %account.id(), role = %account.role(), "login succeeded");

        self.notify(Notification::success(format!(
            "Welcome, {}!",
            session.user_name()
        )));
        let target = match session.role() {
            Role::Admin => Surface::Admin,
            Role::Pengguna => Surface::Profile,
        };
        self.ports
            .navigator
            .navigate(target, self.timings.login_redirect);
        LoginOutcome::Success(session)
    }

    /// Handle a signup form submission.
    pub async fn signup(&self, form: &SignupForm) -> SignupOutcome {
        let Some(_guard) = self.signup_latch.try_engage() else {
            return SignupOutcome::Busy;
        };

        let request = match form.validate(|id| self.id_taken(id)) {
            Ok(request) => request,
            Err(errors) => return SignupOutcome::Rejected(errors),
        };

        let account = request.into_account(self.ports.clock.utc());
        match self.ports.backend.register(account).await {
            Ok(account) => {
                info!(id = %account.id(), role = %account.role(), "account registered");
                self.notify(Notification::success(SIGNUP_SUCCESS_MESSAGE));
                self.ports
                    .navigator
                    .navigate(Surface::Login, self.timings.signup_redirect);
                SignupOutcome::Registered(account)
            }
            Err(RegistrationError::DuplicateId { id }) => {
                warn!(%id, "id was registered while the signup was in flight");
                self.notify(Notification::error(DUPLICATE_MESSAGE));
                SignupOutcome::Duplicate { id }
            }
            Err(RegistrationError::Backend(err)) => {
                error!(error = %err, "signup backend failed");
                self.notify(Notification::error(SIGNUP_FAILED_MESSAGE));
                SignupOutcome::Failed
            }
        }
    }

    fn id_taken(&self, id: &AccountId) -> bool {
        // Registration re-checks, so an unreadable directory only defers
        // the duplicate error to the submit step.
        self.directory.exists(id).unwrap_or_else(|err| {
            warn!(%id, error = %err, "could not check id availability");
            false
        })
    }

    /// Clear the session and announce the change. Safe without a session.
    pub fn logout(&self) -> Result<(), StorageError> {
        let result = self.sessions.clear();
        self.events.publish();
        match &result {
            Ok(()) => info!("logged out"),
            Err(err) => error!(error = %err, "failed to clear session"),
        }
        result
    }

    /// The current session, if any.
    pub fn existing_session(&self) -> Option<Session> {
        self.sessions.load().unwrap_or_else(|err| {
            warn!(error = %err, "could not read session");
            None
        })
    }

    /// On the login or signup page, offer to continue to the profile when
    /// already signed in. Returns `true` when navigation was requested.
    pub fn offer_resume(&self, confirmation: &dyn Confirmation) -> bool {
        let Some(session) = self.existing_session() else {
            return false;
        };
        let prompt = format!(
            "You are already logged in as {}. Continue to your dashboard?",
            session.user_name()
        );
        if !confirmation.confirm(&prompt) {
            return false;
        }
        self.ports.navigator.navigate(Surface::Profile, Duration::ZERO);
        true
    }

    /// True while a login submission is in flight.
    pub fn login_in_flight(&self) -> bool {
        self.login_latch.is_engaged()
    }

    /// True while a signup submission is in flight.
    pub fn signup_in_flight(&self) -> bool {
        self.signup_latch.is_engaged()
    }

    /// Registered-account directory used for validation.
    pub fn directory(&self) -> &IdentityDirectory {
        &self.directory
    }

    pub(crate) fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    pub(crate) fn events(&self) -> &SessionEvents {
        &self.events
    }

    pub(crate) fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.ports.navigator
    }

    pub(crate) fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.ports.notifier
    }

    pub(crate) fn timings(&self) -> FlowTimings {
        self.timings
    }

    fn notify(&self, notification: Notification) {
        self.ports.notifier.notify(notification);
    }
}

#[cfg(test)]
mod tests;
