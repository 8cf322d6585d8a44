//! Account data model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum allowed length for a newly registered account id.
pub const ACCOUNT_ID_MIN: usize = 3;

/// Validation errors returned when constructing account values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountValidationError {
    /// Id was missing or blank once trimmed.
    #[error("account id must not be empty")]
    EmptyId,
    /// Role string does not name a known role.
    #[error("unknown role: {value}")]
    UnknownRole { value: String },
}

/// Case-insensitive account identifier.
///
/// ## Invariants
/// - The value is trimmed and lower-cased on construction.
/// - The value is never empty.
///
/// # Examples
/// ```
/// use mivo_auth::domain::AccountId;
///
/// let id = AccountId::new("  PENGGUNA01 ").expect("valid id");
/// assert_eq!(id.as_ref(), "pengguna01");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    /// Normalise and validate a raw id typed into a form.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(AccountValidationError::EmptyId);
        }
        Ok(Self(normalised))
    }

    /// Number of characters in the id.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<AccountId> for String {
    fn from(value: AccountId) -> Self {
        value.0
    }
}

impl TryFrom<String> for AccountId {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Role selected at signup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Administrator surface access.
    Admin,
    /// Regular site member.
    Pengguna,
}

impl Role {
    /// Stored string form of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Pengguna => "Pengguna",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AccountValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Admin" => Ok(Self::Admin),
            "Pengguna" => Ok(Self::Pengguna),
            other => Err(AccountValidationError::UnknownRole {
                value: other.to_owned(),
            }),
        }
    }
}

/// Contact details captured alongside a registration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccountProfile {
    /// Full name shown in the header.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Optional phone number, empty when not supplied.
    pub phone: String,
    /// Whether the user opted into the newsletter.
    pub newsletter: bool,
}

/// Registered (or synthesised administrator) account.
///
/// ## Invariants
/// - `id` is normalised (see [`AccountId`]).
/// - Serialised in camelCase; `joinDate` is absent for synthesised
///   administrator accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    id: AccountId,
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    phone: String,
    role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    join_date: Option<DateTime<Utc>>,
    #[serde(default)]
    newsletter: bool,
}

impl Account {
    /// Build an account for a new registration.
    pub fn registered(
        id: AccountId,
        role: Role,
        profile: AccountProfile,
        joined_at: DateTime<Utc>,
    ) -> Self {
        let AccountProfile {
            name,
            email,
            phone,
            newsletter,
        } = profile;
        Self {
            id,
            name,
            email,
            phone,
            role,
            join_date: Some(joined_at),
            newsletter,
        }
    }

    pub(crate) fn synthesised(id: AccountId, name: String, role: Role) -> Self {
        Self {
            id,
            name,
            email: String::new(),
            phone: String::new(),
            role,
            join_date: None,
            newsletter: false,
        }
    }

    /// Account identifier.
    pub fn id(&self) -> &AccountId {
        &self.id
    }

    /// Full name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Contact email.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Phone number, possibly empty.
    pub fn phone(&self) -> &str {
        self.phone.as_str()
    }

    /// Account role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Registration timestamp; `None` for administrator identities.
    pub fn join_date(&self) -> Option<DateTime<Utc>> {
        self.join_date
    }

    /// Newsletter opt-in flag.
    pub fn newsletter(&self) -> bool {
        self.newsletter
    }
}
