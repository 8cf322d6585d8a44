//! Page-shell adapters that report through `tracing`.
//!
//! The command-line driver has no page to paint, so toasts, navigations
//! and header renders become structured log events.

use std::time::Duration;

use tracing::info;

use crate::domain::HeaderView;
use crate::domain::ports::{
    Confirmation, HeaderMount, NavigationOffer, Navigator, Notification, Notifier, Surface,
};

/// [`Notifier`] logging each toast.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        info!(
            severity = %notification.severity,
            message = %notification.message,
            "toast"
        );
    }
}

/// [`Navigator`] logging navigation requests without performing them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn navigate(&self, target: Surface, delay: Duration) {
        info!(page = target.page(), delay_ms = delay.as_millis(), "navigate");
    }

    fn offer(&self, offer: NavigationOffer) {
        info!(
            prompt = %offer.prompt,
            page = offer.target.page(),
            delay_ms = offer.delay.as_millis(),
            "navigation offered"
        );
    }
}

/// [`HeaderMount`] logging each render.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHeaderMount;

impl HeaderMount for TracingHeaderMount {
    fn mount(&self, view: &HeaderView) {
        let actions: Vec<_> = view.actions().iter().map(|action| action.label()).collect();
        info!(greeting = ?view.greeting(), ?actions, "header rendered");
    }
}

/// [`Confirmation`] answering every prompt with a fixed choice.
#[derive(Debug, Clone, Copy)]
pub struct FixedConfirmation {
    answer: bool,
}

impl FixedConfirmation {
    /// Answer every prompt with `answer`.
    pub const fn new(answer: bool) -> Self {
        Self { answer }
    }
}

impl Confirmation for FixedConfirmation {
    fn confirm(&self, prompt: &str) -> bool {
        info!(prompt, answer = self.answer, "confirmation");
        self.answer
    }
}
