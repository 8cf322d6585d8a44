//! Signup form validation.
//!
//! Validation runs every check and reports all failing fields together so
//! the form can annotate each problem at once.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use zeroize::Zeroizing;

use super::account::{ACCOUNT_ID_MIN, Account, AccountId, AccountProfile, Role};

/// Minimum password length accepted at signup.
pub const PASSWORD_MIN: usize = 6;

/// Form fields that can carry an error annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormField {
    /// Login id input.
    LoginId,
    /// Signup id input.
    SignupId,
    /// Full name input.
    FullName,
    /// Email input.
    Email,
    /// Role selector.
    Role,
    /// Password input.
    Password,
    /// Password confirmation input.
    ConfirmPassword,
    /// Terms checkbox.
    AgreeTerms,
}

impl FormField {
    /// Element id of the input in the page.
    #[must_use]
    pub const fn element_id(&self) -> &'static str {
        match self {
            Self::LoginId => "loginId",
            Self::SignupId => "signupId",
            Self::FullName => "signupName",
            Self::Email => "signupEmail",
            Self::Role => "signupRole",
            Self::Password => "signupPassword",
            Self::ConfirmPassword => "confirmPassword",
            Self::AgreeTerms => "agreeTerms",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_id())
    }
}

/// Normalised reasons a field can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldErrorReason {
    /// Required value missing.
    Required,
    /// Id shorter than [`ACCOUNT_ID_MIN`].
    IdTooShort,
    /// Id already registered or reserved.
    IdTaken,
    /// Email does not look like `local@domain.tld`.
    EmailInvalid,
    /// Role missing or not a known role.
    RoleMissing,
    /// Password shorter than [`PASSWORD_MIN`].
    PasswordTooShort,
    /// Confirmation differs from the password.
    PasswordMismatch,
    /// Terms were not accepted.
    TermsNotAccepted,
}

impl FieldErrorReason {
    /// Machine-readable rejection code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::IdTooShort => "id_too_short",
            Self::IdTaken => "id_taken",
            Self::EmailInvalid => "email_invalid",
            Self::RoleMissing => "role_missing",
            Self::PasswordTooShort => "password_too_short",
            Self::PasswordMismatch => "password_mismatch",
            Self::TermsNotAccepted => "terms_not_accepted",
        }
    }
}

/// A single field annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field the error belongs to.
    pub field: FormField,
    /// Why the field was rejected.
    pub reason: FieldErrorReason,
}

impl FieldError {
    /// Pair `field` with `reason`.
    pub const fn new(field: FormField, reason: FieldErrorReason) -> Self {
        Self { field, reason }
    }

    /// Human-readable message shown under the field.
    pub fn message(&self) -> String {
        match (self.field, self.reason) {
            (FormField::LoginId | FormField::SignupId, FieldErrorReason::Required) => {
                "User ID is required.".to_owned()
            }
            (FormField::FullName, FieldErrorReason::Required) => "Full name is required.".to_owned(),
            (FormField::Email, FieldErrorReason::Required) => "Email is required.".to_owned(),
            (FormField::Password, FieldErrorReason::Required) => "Password is required.".to_owned(),
            (_, FieldErrorReason::Required) => "This field is required.".to_owned(),
            (_, FieldErrorReason::IdTooShort) => {
                format!("User ID must be at least {ACCOUNT_ID_MIN} characters.")
            }
            (_, FieldErrorReason::IdTaken) => "User ID is already taken.".to_owned(),
            (_, FieldErrorReason::EmailInvalid) => "Email format is invalid.".to_owned(),
            (_, FieldErrorReason::RoleMissing) => "Choose your role.".to_owned(),
            (_, FieldErrorReason::PasswordTooShort) => {
                format!("Password must be at least {PASSWORD_MIN} characters.")
            }
            (_, FieldErrorReason::PasswordMismatch) => "Passwords do not match.".to_owned(),
            (_, FieldErrorReason::TermsNotAccepted) => {
                "You must accept the terms and conditions.".to_owned()
            }
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message())
    }
}

/// Raw signup form values as typed by the user.
#[derive(Clone, Default)]
pub struct SignupForm {
    /// Desired id.
    pub user_id: String,
    /// Full name.
    pub full_name: String,
    /// Email address.
    pub email: String,
    /// Phone number (optional).
    pub phone: String,
    /// Selected role; empty when nothing was chosen.
    pub role: String,
    /// Password.
    pub password: Zeroizing<String>,
    /// Password confirmation.
    pub confirm_password: Zeroizing<String>,
    /// Terms checkbox.
    pub agree_terms: bool,
    /// Newsletter checkbox.
    pub newsletter: bool,
}

impl fmt::Debug for SignupForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupForm")
            .field("user_id", &self.user_id)
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("role", &self.role)
            .field("agree_terms", &self.agree_terms)
            .field("newsletter", &self.newsletter)
            .finish_non_exhaustive()
    }
}

/// A signup that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupRequest {
    id: AccountId,
    role: Role,
    profile: AccountProfile,
}

impl SignupRequest {
    /// Validated id.
    pub fn id(&self) -> &AccountId {
        &self.id
    }

    /// Validated role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Build the account to register, joined at `now`.
    pub fn into_account(self, now: DateTime<Utc>) -> Account {
        Account::registered(self.id, self.role, self.profile, now)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// True when `email` has a `local@domain.tld` shape.
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

impl SignupForm {
    /// Validate every field, collecting all failures.
    ///
    /// `is_taken` answers whether a normalised id is already in use.
    pub fn validate(
        &self,
        is_taken: impl Fn(&AccountId) -> bool,
    ) -> Result<SignupRequest, Vec<FieldError>> {
        let mut errors = Vec::new();

        let id = match AccountId::new(&self.user_id) {
            Err(_) => {
                errors.push(FieldError::new(FormField::SignupId, FieldErrorReason::Required));
                None
            }
            Ok(id) if id.char_len() < ACCOUNT_ID_MIN => {
                errors.push(FieldError::new(
                    FormField::SignupId,
                    FieldErrorReason::IdTooShort,
                ));
                None
            }
            Ok(id) if is_taken(&id) => {
                errors.push(FieldError::new(FormField::SignupId, FieldErrorReason::IdTaken));
                None
            }
            Ok(id) => Some(id),
        };

        let full_name = self.full_name.trim();
        if full_name.is_empty() {
            errors.push(FieldError::new(FormField::FullName, FieldErrorReason::Required));
        }

        let email = self.email.trim();
        if email.is_empty() {
            errors.push(FieldError::new(FormField::Email, FieldErrorReason::Required));
        } else if !is_valid_email(email) {
            errors.push(FieldError::new(FormField::Email, FieldErrorReason::EmailInvalid));
        }

        let role = self.role.parse::<Role>().ok();
        if role.is_none() {
            errors.push(FieldError::new(FormField::Role, FieldErrorReason::RoleMissing));
        }

        if self.password.is_empty() {
            errors.push(FieldError::new(FormField::Password, FieldErrorReason::Required));
        } else if self.password.chars().count() < PASSWORD_MIN {
            errors.push(FieldError::new(
                FormField::Password,
                FieldErrorReason::PasswordTooShort,
            ));
        }

        if *self.password != *self.confirm_password {
            errors.push(FieldError::new(
                FormField::ConfirmPassword,
                FieldErrorReason::PasswordMismatch,
            ));
        }

        if !self.agree_terms {
            errors.push(FieldError::new(
                FormField::AgreeTerms,
                FieldErrorReason::TermsNotAccepted,
            ));
        }

        match (id, role) {
            (Some(id), Some(role)) if errors.is_empty() => Ok(SignupRequest {
                id,
                role,
                profile: AccountProfile {
                    name: full_name.to_owned(),
                    email: email.to_owned(),
                    phone: self.phone.trim().to_owned(),
                    newsletter: self.newsletter,
                },
            }),
            _ => Err(errors),
        }
    }
}
