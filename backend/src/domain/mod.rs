//! Session core domain: accounts, sessions and the flows that change them.
//!
//! Purpose: Model the signed-in state of one browsing context and the
//! signup, login and logout flows that mutate it. Every side effect goes
//! through a port in [`ports`], so the same flows drive the command-line
//! tool and the tests.
//!
//! Public surface:
//! - AccountId, Account, Role: registered and administrator identities.
//! - SessionStore, Session: the persisted signed-in state.
//! - IdentityDirectory: registered accounts plus the administrator range.
//! - SessionEvents: in-context `SessionChanged` broadcast.
//! - AuthController: signup, login and logout state machines.
//! - HeaderSync, HeaderView: header rendering that follows the session.
//! - Catalogue, Wishlist: products page state.

pub mod account;
pub mod administrators;
pub mod auth_controller;
pub mod catalogue;
pub mod header;
pub mod identity_directory;
pub mod password_strength;
pub mod ports;
pub mod session;
pub mod session_events;
pub mod signup;
pub mod wishlist;

pub use self::account::{
    ACCOUNT_ID_MIN, Account, AccountId, AccountProfile, AccountValidationError, Role,
};
pub use self::administrators::{
    ADMINISTRATOR_COUNT, administrator_account, administrator_ids, is_administrator,
};
pub use self::auth_controller::{
    AuthController, AuthPorts, DemoAccount, FlowTimings, LoginOutcome, SignupOutcome,
    SubmitGuard, SubmitLatch,
};
pub use self::catalogue::{Catalogue, Product, ProductCategory, ProductFilter, UnknownFilter};
pub use self::header::{HeaderAction, HeaderReaction, HeaderSync, HeaderView};
pub use self::identity_directory::{DirectoryError, IdentityDirectory, REGISTERED_USERS_KEY};
pub use self::password_strength::PasswordStrength;
pub use self::session::{
    LOGGED_IN_KEY, LOGIN_TIME_KEY, Session, SessionStore, USER_ID_KEY, USER_NAME_KEY,
    USER_ROLE_KEY,
};
pub use self::session_events::{
    SESSION_EVENT_CAPACITY, SessionChanged, SessionEvents, SessionSubscription,
};
pub use self::signup::{
    FieldError, FieldErrorReason, FormField, PASSWORD_MIN, SignupForm, SignupRequest,
    is_valid_email,
};
pub use self::wishlist::{WISHLIST_KEY, Wishlist, WishlistChange};
