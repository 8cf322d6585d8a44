//! MIVO account session core.
//!
//! Signup, login and logout flows over browser-style key-value storage, a
//! header that follows the session across contexts, and the products page
//! wishlist.

pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
