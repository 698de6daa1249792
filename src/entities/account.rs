// 💳 Account Entity + Registry
//
// A BankAccount is a plain VALUE: two accounts are the same account when
// every field is equal. There is no separate identity, so removal works by
// structural equality (first match wins).

use crate::card::{format_card_number, mask_card_number};
use serde::{Deserialize, Serialize};

// ============================================================================
// BANK ACCOUNT
// ============================================================================

/// One registered card.
///
/// Only the accepted-submission path creates these, so every stored account
/// has a 16-digit card number, an "MM/YY" expiration date and a 3-digit CVV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankAccount {
    /// Display identifier (placeholder until there is a real bank integration)
    pub bank_logo: String,

    /// Canonical "XXXX XXXX XXXX XXXX"
    pub card_number: String,

    /// Canonical "MM/YY"
    pub expiration_date: String,

    pub cvv: String,

    /// User-declared balance; 0.0 at creation and never touched afterwards
    pub balance: f64,
}

impl BankAccount {
    /// Build an account from already-validated form text.
    ///
    /// The card number is regrouped once more; expiration date and CVV are
    /// stored exactly as entered.
    pub(crate) fn from_form(
        bank_logo: String,
        card_number: &str,
        expiration_date: String,
        cvv: String,
    ) -> Self {
        BankAccount {
            bank_logo,
            card_number: format_card_number(card_number),
            expiration_date,
            cvv,
            balance: 0.0,
        }
    }

    /// Card number safe for logs and masked list rows
    pub fn masked_card_number(&self) -> String {
        mask_card_number(&self.card_number)
    }

    pub fn summary(&self, mask: bool) -> AccountSummary {
        AccountSummary {
            bank_logo: self.bank_logo.clone(),
            card_number: if mask {
                self.masked_card_number()
            } else {
                self.card_number.clone()
            },
            balance: self.balance,
        }
    }
}

/// What the list view shows per row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountSummary {
    pub bank_logo: String,
    pub card_number: String,
    pub balance: f64,
}

// ============================================================================
// ACCOUNT REGISTRY
// ============================================================================

/// Ordered, in-memory list of registered accounts.
///
/// Insertion order is preserved. The only mutations are `append` (at the
/// end) and `remove` (first structurally equal element). Nothing is
/// deduplicated and nothing is persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountRegistry {
    accounts: Vec<BankAccount>,
}

impl AccountRegistry {
    /// Create new empty registry
    pub fn new() -> Self {
        AccountRegistry {
            accounts: Vec::new(),
        }
    }

    pub fn append(&mut self, account: BankAccount) {
        self.accounts.push(account);
    }

    /// Remove the first account equal to `account`.
    ///
    /// Returns `false` (and leaves the list untouched) when there is no match.
    pub fn remove(&mut self, account: &BankAccount) -> bool {
        match self.accounts.iter().position(|a| a == account) {
            Some(index) => {
                self.accounts.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn get(&self, index: usize) -> Option<&BankAccount> {
        self.accounts.get(index)
    }

    pub fn accounts(&self) -> &[BankAccount] {
        &self.accounts
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BankAccount> {
        self.accounts.iter()
    }

    /// Row models for the list view, in registry order
    pub fn summaries(&self, mask: bool) -> Vec<AccountSummary> {
        self.accounts.iter().map(|a| a.summary(mask)).collect()
    }
}

impl<'a> IntoIterator for &'a AccountRegistry {
    type Item = &'a BankAccount;
    type IntoIter = std::slice::Iter<'a, BankAccount>;

    fn into_iter(self) -> Self::IntoIter {
        self.accounts.iter()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn create_test_account(card_number: &str) -> BankAccount {
        BankAccount::from_form(
            "bankLogo".to_string(),
            card_number,
            "12/25".to_string(),
            "123".to_string(),
        )
    }

    #[test]
    fn test_account_from_form() {
        let account = create_test_account("4111111111111111");

        assert_eq!(account.bank_logo, "bankLogo");
        assert_eq!(account.card_number, "4111 1111 1111 1111");
        assert_eq!(account.expiration_date, "12/25");
        assert_eq!(account.cvv, "123");
        assert_eq!(account.balance, 0.0);
    }

    #[test]
    fn test_account_structural_equality() {
        let a = create_test_account("4111 1111 1111 1111");
        let b = create_test_account("4111 1111 1111 1111");
        assert_eq!(a, b);

        let mut c = b.clone();
        c.cvv = "999".to_string();
        assert_ne!(a, c);
    }

    #[test]
    fn test_account_summary_masking() {
        let account = create_test_account("4111 1111 1111 1234");

        let plain = account.summary(false);
        assert_eq!(plain.card_number, "4111 1111 1111 1234");
        assert_eq!(plain.balance, 0.0);

        let masked = account.summary(true);
        assert_eq!(masked.card_number, "•••• 1234");
        assert_eq!(masked.bank_logo, "bankLogo");
    }

    #[test]
    fn test_registry_starts_empty() {
        let registry = AccountRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.get(0).is_none());
    }

    #[test]
    fn test_registry_append_preserves_order() {
        let mut registry = AccountRegistry::new();
        registry.append(create_test_account("1111 1111 1111 1111"));
        registry.append(create_test_account("2222 2222 2222 2222"));
        registry.append(create_test_account("3333 3333 3333 3333"));

        let numbers: Vec<&str> = registry.iter().map(|a| a.card_number.as_str()).collect();
        assert_eq!(
            numbers,
            vec!["1111 1111 1111 1111", "2222 2222 2222 2222", "3333 3333 3333 3333"]
        );
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_registry_allows_duplicates() {
        let mut registry = AccountRegistry::new();
        let account = create_test_account("4111 1111 1111 1111");
        registry.append(account.clone());
        registry.append(account);

        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_registry_remove_first_match_only() {
        let mut registry = AccountRegistry::new();
        let dup = create_test_account("4111 1111 1111 1111");
        let other = create_test_account("5555 5555 5555 4444");
        registry.append(dup.clone());
        registry.append(other.clone());
        registry.append(dup.clone());

        assert!(registry.remove(&dup));
        assert_eq!(registry.accounts(), &[other, dup][..]);
    }

    #[test]
    fn test_registry_remove_keeps_order_of_others() {
        let mut registry = AccountRegistry::new();
        let a = create_test_account("1111 1111 1111 1111");
        let b = create_test_account("2222 2222 2222 2222");
        let c = create_test_account("3333 3333 3333 3333");
        registry.append(a.clone());
        registry.append(b.clone());
        registry.append(c.clone());

        assert!(registry.remove(&b));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.accounts(), &[a, c][..]);
    }

    #[test]
    fn test_registry_remove_missing_is_noop() {
        let mut registry = AccountRegistry::new();
        registry.append(create_test_account("1111 1111 1111 1111"));
        let before = registry.clone();

        assert!(!registry.remove(&create_test_account("9999 9999 9999 9999")));
        assert_eq!(registry, before);
    }

    #[test]
    fn test_registry_summaries() {
        let mut registry = AccountRegistry::new();
        registry.append(create_test_account("1111 1111 1111 1111"));
        registry.append(create_test_account("2222 2222 2222 2222"));

        let summaries = registry.summaries(true);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].card_number, "•••• 1111");
        assert_eq!(summaries[1].card_number, "•••• 2222");
    }

    proptest! {
        #[test]
        fn prop_remove_missing_leaves_registry_unchanged(
            numbers in prop::collection::vec("[0-8]{16}", 0..10)
        ) {
            let mut registry = AccountRegistry::new();
            for number in &numbers {
                registry.append(create_test_account(number));
            }
            let before = registry.clone();

            // '9' never appears in the generated numbers
            prop_assert!(!registry.remove(&create_test_account("9999999999999999")));
            prop_assert_eq!(registry, before);
        }

        #[test]
        fn prop_remove_present_once_shrinks_by_one(
            numbers in prop::collection::vec("[0-8]{16}", 1..10),
            pick in any::<prop::sample::Index>()
        ) {
            let target = create_test_account("9999999999999999");
            let at = pick.index(numbers.len() + 1);
            let mut expected: Vec<BankAccount> =
                numbers.iter().map(|n| create_test_account(n)).collect();
            expected.insert(at, target.clone());

            let mut registry = AccountRegistry::new();
            for account in &expected {
                registry.append(account.clone());
            }

            prop_assert!(registry.remove(&target));
            expected.remove(at);
            prop_assert_eq!(registry.len(), expected.len());
            prop_assert_eq!(registry.accounts(), &expected[..]);
        }
    }
}
