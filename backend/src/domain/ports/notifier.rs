//! Driven ports for transient user-facing messages and confirmations.

use std::fmt;

/// Visual severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Neutral information.
    Info,
    /// Completed action.
    Success,
    /// Failed action.
    Error,
}

impl Severity {
    /// Stable lower-case label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transient message rendered by the notification surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Message text.
    pub message: String,
    /// Severity used for styling.
    pub severity: Severity,
}

impl Notification {
    /// Informational message.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Info,
        }
    }

    /// Success message.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Success,
        }
    }

    /// Error message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
        }
    }
}

/// Toast surface.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    /// Show `notification`; dismissal timing belongs to the surface.
    fn notify(&self, notification: Notification);
}

/// Yes/no prompt answered by the user.
#[cfg_attr(test, mockall::automock)]
pub trait Confirmation: Send + Sync {
    /// Ask `prompt`; `true` when the user accepts.
    fn confirm(&self, prompt: &str) -> bool;
}
