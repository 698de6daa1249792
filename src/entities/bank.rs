// 🏦 Bank Choices - the fixed list the entry form offers
//
// These are display names only. No bank integration exists, so the choice
// never changes what gets stored (the logo stays a placeholder).

use serde::{Deserialize, Serialize};

/// Shown in the selector before the user picks anything
pub const UNSELECTED_BANK_LABEL: &str = "Select bank";

/// Placeholder names standing in for real-world bank brands
pub const DEFAULT_BANKS: [&str; 3] = ["Bank A", "Bank B", "Bank C"];

/// Ordered list of selectable banks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BankChoices {
    names: Vec<String>,
}

impl BankChoices {
    pub fn new(names: Vec<String>) -> Self {
        BankChoices { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Choice after `current`, wrapping around. Nothing selected → first.
    pub fn next(&self, current: Option<&str>) -> Option<&str> {
        let len = self.names.len();
        if len == 0 {
            return None;
        }
        let i = match current.and_then(|c| self.position(c)) {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.names.get(i).map(String::as_str)
    }

    /// Choice before `current`, wrapping around. Nothing selected → last.
    pub fn previous(&self, current: Option<&str>) -> Option<&str> {
        let len = self.names.len();
        if len == 0 {
            return None;
        }
        let i = match current.and_then(|c| self.position(c)) {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.names.get(i).map(String::as_str)
    }

    /// Label for the selector: the chosen bank or the "Select bank" prompt
    pub fn label<'a>(current: Option<&'a str>) -> &'a str {
        current.unwrap_or(UNSELECTED_BANK_LABEL)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}

impl Default for BankChoices {
    fn default() -> Self {
        BankChoices {
            names: DEFAULT_BANKS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_choices() {
        let banks = BankChoices::default();
        assert_eq!(banks.names(), &["Bank A", "Bank B", "Bank C"]);
        assert_eq!(banks.len(), 3);
        assert!(banks.contains("Bank B"));
        assert!(!banks.contains("Bank D"));
    }

    #[test]
    fn test_next_wraps() {
        let banks = BankChoices::default();
        assert_eq!(banks.next(None), Some("Bank A"));
        assert_eq!(banks.next(Some("Bank A")), Some("Bank B"));
        assert_eq!(banks.next(Some("Bank C")), Some("Bank A"));
        // Unknown current behaves like nothing selected
        assert_eq!(banks.next(Some("Elsewhere")), Some("Bank A"));
    }

    #[test]
    fn test_previous_wraps() {
        let banks = BankChoices::default();
        assert_eq!(banks.previous(None), Some("Bank C"));
        assert_eq!(banks.previous(Some("Bank A")), Some("Bank C"));
        assert_eq!(banks.previous(Some("Bank C")), Some("Bank B"));
    }

    #[test]
    fn test_empty_choices() {
        let banks = BankChoices::new(Vec::new());
        assert!(banks.is_empty());
        assert_eq!(banks.next(None), None);
        assert_eq!(banks.previous(None), None);
    }

    #[test]
    fn test_label() {
        assert_eq!(BankChoices::label(None), "Select bank");
        assert_eq!(BankChoices::label(Some("Bank A")), "Bank A");
    }
}
