//! Compiled-in administrator identities.
//!
//! Administrators are recognised by pattern (`admin01` to `admin20`) and are
//! never written to the identity directory. Lookups synthesise an account on
//! the fly so the registered-users blob is never consulted for them.

use super::account::{Account, AccountId, Role};

/// Number of administrator identities.
pub const ADMINISTRATOR_COUNT: u8 = 20;

const ADMINISTRATOR_PREFIX: &str = "admin";

/// Enumerate every administrator id in ascending order.
///
/// # Examples
/// ```
/// use mivo_auth::domain::administrators::administrator_ids;
///
/// let ids: Vec<String> = administrator_ids().collect();
/// assert_eq!(ids.first().map(String::as_str), Some("admin01"));
/// assert_eq!(ids.len(), 20);
/// ```
pub fn administrator_ids() -> impl Iterator<Item = String> {
    (1..=ADMINISTRATOR_COUNT).map(|n| format!("{ADMINISTRATOR_PREFIX}{n:02}"))
}

/// Return the two-digit administrator number when `id` is an administrator.
fn administrator_number(id: &AccountId) -> Option<u8> {
    let suffix = id.as_ref().strip_prefix(ADMINISTRATOR_PREFIX)?;
    if suffix.len() != 2 || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let number: u8 = suffix.parse().ok()?;
    (1..=ADMINISTRATOR_COUNT).contains(&number).then_some(number)
}

/// True when `id` belongs to the administrator namespace.
pub fn is_administrator(id: &AccountId) -> bool {
    administrator_number(id).is_some()
}

/// Synthesise the account for an administrator id.
pub fn administrator_account(id: &AccountId) -> Option<Account> {
    let number = administrator_number(id)?;
    Some(Account::synthesised(
        id.clone(),
        format!("Administrator {number:02}"),
        Role::Admin,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn id(raw: &str) -> AccountId {
        AccountId::new(raw).expect("valid id")
    }

    #[rstest]
    fn every_generated_id_is_recognised() {
        for raw in administrator_ids() {
            assert!(is_administrator(&id(&raw)), "{raw} should be recognised");
        }
    }

    #[rstest]
    #[case("admin00")]
    #[case("admin21")]
    #[case("admin1")]
    #[case("admin001")]
    #[case("administrator")]
    #[case("xadmin01")]
    fn near_misses_are_not_administrators(#[case] raw: &str) {
        assert!(!is_administrator(&id(raw)));
        assert!(administrator_account(&id(raw)).is_none());
    }

    #[rstest]
    #[case("admin01", "Administrator 01")]
    #[case("ADMIN20", "Administrator 20")]
    fn synthesised_account_carries_number_and_role(#[case] raw: &str, #[case] name: &str) {
        let account = administrator_account(&id(raw)).expect("administrator account");
        assert_eq!(account.name(), name);
        assert_eq!(account.role(), Role::Admin);
        assert!(account.join_date().is_none());
    }
}
