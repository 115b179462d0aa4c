// 👤 User Store - Accounts and credential lookup

use crate::models::{Role, UserAccount};

/// Accounts seeded into an absent or empty user store
pub fn default_accounts() -> Vec<UserAccount> {
    vec![
        UserAccount::new("lojisfk", "1234", Role::Operator),
        UserAccount::new("yonetici", "4321", Role::Manager),
    ]
}

/// List of (username, password, role) records. Usernames are not unique;
/// the first matching record wins.
#[derive(Debug, Clone, Default)]
pub struct UserStore {
    accounts: Vec<UserAccount>,
}

impl UserStore {
    pub fn from_accounts(accounts: Vec<UserAccount>) -> Self {
        UserStore { accounts }
    }

    /// Seed the default accounts if the store is empty.
    /// Returns true when seeding happened.
    pub fn seed_defaults(&mut self) -> bool {
        if !self.accounts.is_empty() {
            return false;
        }
        self.accounts = default_accounts();
        true
    }

    /// Role of the first exact match
    pub fn authenticate(&self, username: &str, password: &str) -> Option<Role> {
        self.accounts
            .iter()
            .find(|account| account.matches(username, password))
            .map(|account| account.role)
    }

    pub fn accounts(&self) -> &[UserAccount] {
        &self.accounts
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_only_when_empty() {
        let mut store = UserStore::default();
        assert!(store.seed_defaults());
        assert_eq!(store.len(), 2);
        assert!(!store.seed_defaults());
        assert_eq!(store.len(), 2);

        let mut custom = UserStore::from_accounts(vec![UserAccount::new("ali", "pw", Role::Manager)]);
        assert!(!custom.seed_defaults());
        assert_eq!(custom.len(), 1);
    }

    #[test]
    fn test_authenticate_defaults() {
        let mut store = UserStore::default();
        store.seed_defaults();

        assert_eq!(store.authenticate("lojisfk", "1234"), Some(Role::Operator));
        assert_eq!(store.authenticate("yonetici", "4321"), Some(Role::Manager));
        assert_eq!(store.authenticate("lojisfk", "wrong"), None);
        assert_eq!(store.authenticate("Lojisfk", "1234"), None);
        assert_eq!(store.authenticate("", ""), None);
    }

    #[test]
    fn test_duplicate_usernames_first_match_wins() {
        let store = UserStore::from_accounts(vec![
            UserAccount::new("ayse", "pw", Role::Manager),
            UserAccount::new("ayse", "pw", Role::Operator),
        ]);

        assert_eq!(store.authenticate("ayse", "pw"), Some(Role::Manager));
    }
}
