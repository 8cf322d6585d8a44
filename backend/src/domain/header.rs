//! Page header that mirrors the session state.
//!
//! [`HeaderSync`] renders a [`HeaderView`] into the page's mount point and
//! re-renders whenever the session may have changed: on every in-page
//! [`SessionChanged`](super::SessionChanged) and whenever another context
//! flips the logged-in flag.

use std::sync::Arc;

use tracing::{debug, error, info};

use super::account::Role;
use super::auth_controller::AuthController;
use super::ports::{
    Confirmation, HeaderMount, Notification, StorageChange, StorageWatch, Surface,
};
use super::session::{LOGGED_IN_KEY, Session, SessionStore};
use super::session_events::SessionSubscription;

const LOGOUT_PROMPT: &str = "Are you sure you want to log out?";
const LOGGED_OUT_MESSAGE: &str = "Logged out.";
const LOGOUT_FAILED_MESSAGE: &str = "Something went wrong while logging out.";

/// Interactive entries shown in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderAction {
    /// Link to the member's profile.
    Profile,
    /// Logout button.
    Logout,
    /// Link to the signup page.
    Signup,
    /// Link to the login page.
    Login,
}

impl HeaderAction {
    /// Visible label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Profile => "Profile",
            Self::Logout => "Logout",
            Self::Signup => "Sign up",
            Self::Login => "Login",
        }
    }

    /// Page the entry links to; `None` for buttons.
    #[must_use]
    pub const fn target(&self) -> Option<Surface> {
        match self {
            Self::Profile => Some(Surface::Profile),
            Self::Logout => None,
            Self::Signup => Some(Surface::Signup),
            Self::Login => Some(Surface::Login),
        }
    }
}

/// What the header shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderView {
    /// Nobody is signed in.
    Guest,
    /// A signed-in member.
    Member {
        /// Display name.
        name: String,
        /// Member role.
        role: Role,
    },
}

impl HeaderView {
    /// View for an optional session.
    ///
    /// # Examples
    /// ```
    /// use mivo_auth::domain::{HeaderAction, HeaderView};
    ///
    /// let view = HeaderView::for_session(None);
    /// assert_eq!(view, HeaderView::Guest);
    /// assert_eq!(view.actions(), &[HeaderAction::Signup, HeaderAction::Login]);
    /// ```
    pub fn for_session(session: Option<&Session>) -> Self {
        match session {
            Some(session) => Self::Member {
                name: session.user_name().to_owned(),
                role: session.role(),
            },
            None => Self::Guest,
        }
    }

    /// Entries in display order.
    #[must_use]
    pub const fn actions(&self) -> &'static [HeaderAction] {
        match self {
            Self::Guest => &[HeaderAction::Signup, HeaderAction::Login],
            Self::Member { .. } => &[HeaderAction::Profile, HeaderAction::Logout],
        }
    }

    /// Greeting line for members.
    pub fn greeting(&self) -> Option<String> {
        match self {
            Self::Guest => None,
            Self::Member { name, role } => Some(format!("{name} ({role})")),
        }
    }
}

/// What [`HeaderSync::process_next`] did with one wake-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderReaction {
    /// The header was re-rendered.
    Rendered,
    /// A storage change for an unrelated key was skipped.
    Ignored,
}

enum Wake {
    Session,
    SessionClosed,
    Storage(StorageChange),
    StorageClosed,
}

/// Keeps one context's header in step with the session.
///
/// The sync holds subscriptions, never the controller, so the session feed
/// closes when the context is torn down and [`HeaderSync::run`] returns.
pub struct HeaderSync {
    sessions: SessionStore,
    mount: Option<Arc<dyn HeaderMount>>,
    session_events: Option<SessionSubscription>,
    storage_changes: Option<StorageWatch>,
}

impl HeaderSync {
    /// Subscribe to `controller`'s context and render once.
    pub fn new(controller: &AuthController, mount: Option<Arc<dyn HeaderMount>>) -> Self {
        let sync = Self {
            sessions: SessionStore::new(Arc::clone(controller.store())),
            mount,
            session_events: Some(controller.events().subscribe()),
            storage_changes: Some(controller.store().watch()),
        };
        sync.render();
        sync
    }

    /// The view for the current session.
    pub fn view(&self) -> HeaderView {
        let session = self.sessions.load().unwrap_or_else(|err| {
            error!(error = %err, "could not read session for the header");
            None
        });
        HeaderView::for_session(session.as_ref())
    }

    /// Render into the mount point. Without a mount point this is a no-op.
    pub fn render(&self) {
        let Some(mount) = &self.mount else {
            return;
        };
        let view = self.view();
        debug!(?view, "rendering header");
        mount.mount(&view);
    }

    /// Wait for the next wake-up and react to it.
    ///
    /// Returns `None` once the context's session feed has closed. A closed
    /// storage feed only stops cross-context updates.
    pub async fn process_next(&mut self) -> Option<HeaderReaction> {
        loop {
            let events = self.session_events.as_mut()?;
            let wake = match &mut self.storage_changes {
                None => next_session(events).await,
                Some(changes) => tokio::select! {
                    wake = next_session(events) => wake,
                    wake = next_storage(changes) => wake,
                },
            };

            match wake {
                Wake::Session => {
                    self.render();
                    return Some(HeaderReaction::Rendered);
                }
                Wake::Storage(change) if change.affects(LOGGED_IN_KEY) => {
                    self.render();
                    return Some(HeaderReaction::Rendered);
                }
                Wake::Storage(change) => {
                    debug!(key = ?change.changed_key(), "header ignoring storage change");
                    return Some(HeaderReaction::Ignored);
                }
                Wake::SessionClosed => self.session_events = None,
                Wake::StorageClosed => self.storage_changes = None,
            }
        }
    }

    /// React to wake-ups until the context is torn down.
    pub async fn run(mut self) {
        while self.process_next().await.is_some() {}
        debug!("header sync stopped");
    }

    /// Logout button handler. Returns `true` when the user was logged out.
    pub fn logout(&self, controller: &AuthController, confirmation: &dyn Confirmation) -> bool {
        if !confirmation.confirm(LOGOUT_PROMPT) {
            debug!("logout declined");
            return false;
        }

        if controller.logout().is_err() {
            controller
                .notifier()
                .notify(Notification::error(LOGOUT_FAILED_MESSAGE));
            self.render();
            return false;
        }

        info!("logged out from the header");
        controller
            .notifier()
            .notify(Notification::success(LOGGED_OUT_MESSAGE));
        self.render();
        controller
            .navigator()
            .navigate(Surface::Landing, controller.timings().logout_redirect);
        true
    }
}

async fn next_session(events: &mut SessionSubscription) -> Wake {
    match events.recv().await {
        Some(_) => Wake::Session,
        None => Wake::SessionClosed,
    }
}

async fn next_storage(changes: &mut StorageWatch) -> Wake {
    match changes.recv().await {
        Some(change) => Wake::Storage(change),
        None => Wake::StorageClosed,
    }
}

#[cfg(test)]
mod tests;
