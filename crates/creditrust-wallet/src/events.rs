//! Notifications pushed by a wallet provider.

use creditrust_core::WalletAccount;

/// An account-change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountChange {
    /// The wallet switched to (or re-reported) this account.
    Switched(WalletAccount),
    /// The wallet no longer exposes any account (locked, revoked, logged out).
    Cleared,
}

impl AccountChange {
    pub fn account(&self) -> Option<&WalletAccount> {
        match self {
            Self::Switched(account) => Some(account),
            Self::Cleared => None,
        }
    }
}

impl From<Option<WalletAccount>> for AccountChange {
    fn from(account: Option<WalletAccount>) -> Self {
        match account {
            Some(account) => Self::Switched(account),
            None => Self::Cleared,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use creditrust_core::AccountAddress;

    #[test]
    fn test_from_option() {
        let account = WalletAccount::new(AccountAddress::parse("0x1").unwrap(), "pk");
        assert_eq!(
            AccountChange::from(Some(account.clone())),
            AccountChange::Switched(account.clone())
        );
        assert_eq!(AccountChange::from(None), AccountChange::Cleared);
        assert_eq!(AccountChange::Switched(account.clone()).account(), Some(&account));
        assert!(AccountChange::Cleared.account().is_none());
    }
}
