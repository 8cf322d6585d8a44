//! Driven port for page navigation requests.

use std::fmt;
use std::time::Duration;

/// Named page surfaces the controllers can route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    /// Administrator dashboard.
    Admin,
    /// Member profile.
    Profile,
    /// Login form.
    Login,
    /// Signup form.
    Signup,
    /// Landing page.
    Landing,
}

impl Surface {
    /// Page path served for the surface.
    #[must_use]
    pub const fn page(&self) -> &'static str {
        match self {
            Self::Admin => "admin.html",
            Self::Profile => "profil.html",
            Self::Login => "login.html",
            Self::Signup => "signup.html",
            Self::Landing => "index.html",
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.page())
    }
}

/// A secondary navigation the user may accept or dismiss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationOffer {
    /// Question shown to the user.
    pub prompt: String,
    /// Surface opened when the user accepts.
    pub target: Surface,
    /// Delay before the offer is shown.
    pub delay: Duration,
}

/// Routing service owned by the page shell.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    /// Navigate to `target` once `delay` has elapsed.
    fn navigate(&self, target: Surface, delay: Duration);

    /// Offer an optional navigation to the user.
    fn offer(&self, offer: NavigationOffer);
}
