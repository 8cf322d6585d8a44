//! Password strength meter shown while typing a signup password.

/// Strength bucket for a password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PasswordStrength {
    /// No criteria met.
    VeryWeak,
    /// One criterion met.
    Weak,
    /// Two criteria met.
    Fair,
    /// Three criteria met.
    Strong,
    /// Every criterion met.
    VeryStrong,
}

impl PasswordStrength {
    /// Score `password` against length, mixed case, digit and symbol checks.
    ///
    /// # Examples
    /// ```
    /// use mivo_auth::domain::PasswordStrength;
    ///
    /// assert_eq!(PasswordStrength::evaluate("Abcdef1!"), PasswordStrength::VeryStrong);
    /// assert_eq!(PasswordStrength::evaluate("abc"), PasswordStrength::VeryWeak);
    /// ```
    pub fn evaluate(password: &str) -> Self {
        let checks = [
            password.chars().count() >= 8,
            password.chars().any(|c| c.is_ascii_lowercase())
                && password.chars().any(|c| c.is_ascii_uppercase()),
            password.chars().any(|c| c.is_ascii_digit()),
            password.chars().any(|c| !c.is_ascii_alphanumeric()),
        ];
        match checks.iter().filter(|passed| **passed).count() {
            0 => Self::VeryWeak,
            1 => Self::Weak,
            2 => Self::Fair,
            3 => Self::Strong,
            _ => Self::VeryStrong,
        }
    }

    /// Number of criteria met, from 0 to 4.
    #[must_use]
    pub const fn score(&self) -> u8 {
        match self {
            Self::VeryWeak => 0,
            Self::Weak => 1,
            Self::Fair => 2,
            Self::Strong => 3,
            Self::VeryStrong => 4,
        }
    }

    /// Label shown next to the meter.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::VeryWeak => "Very weak",
            Self::Weak => "Weak",
            Self::Fair => "Fair",
            Self::Strong => "Strong",
            Self::VeryStrong => "Very strong",
        }
    }

    /// Style class for the meter fill.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self {
            Self::VeryWeak | Self::Weak => "weak",
            Self::Fair => "medium",
            Self::Strong | Self::VeryStrong => "strong",
        }
    }
}
