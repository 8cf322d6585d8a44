//! Driven port for the header's mount point in the page.

use crate::domain::HeaderView;

/// Surface that displays the rendered header.
#[cfg_attr(test, mockall::automock)]
pub trait HeaderMount: Send + Sync {
    /// Replace the header contents with `view`.
    fn mount(&self, view: &HeaderView);
}
