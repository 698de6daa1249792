// 💳 Card Field Engine - Formatting + Validation
//
// Formatting runs on every keystroke so the field always shows its canonical
// grouped form. Validation runs once, on submit.
//
// Note the two validators are not symmetric:
// - card number is re-stripped of spaces before checking
// - expiration date is checked on the formatted "MM/YY" string as-is

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

const CARD_GROUP_SEPARATOR: char = ' ';
const EXPIRATION_SEPARATOR: char = '/';
const CARD_NUMBER_DIGITS: usize = 16;
const EXPIRATION_LENGTH: usize = 5;
const CVV_DIGITS: usize = 3;
const MASK_GROUP: &str = "••••";

// ============================================================================
// FORMATTING
// ============================================================================

/// Regroup a raw card number into blocks of four.
///
/// Existing spaces are dropped, then a single space goes in front of every
/// character whose position in the stripped string is a positive multiple
/// of 4. Nothing is truncated.
///
/// Example: "41111111 1111" → "4111 1111 1111"
pub fn format_card_number(raw: &str) -> String {
    let mut formatted = String::with_capacity(raw.len() + raw.len() / 4);

    for (index, ch) in strip(raw, CARD_GROUP_SEPARATOR).enumerate() {
        if index > 0 && index % 4 == 0 {
            formatted.push(CARD_GROUP_SEPARATOR);
        }
        formatted.push(ch);
    }

    formatted
}

/// Insert the month/year slash.
///
/// Existing slashes are dropped, then a slash goes in front of every
/// character at stripped position 2, 4, 6, ...
///
/// Example: "1225" → "12/25", "122" → "12/2", "122501" → "12/25/01"
pub fn format_expiration_date(raw: &str) -> String {
    let mut formatted = String::with_capacity(raw.len() + raw.len() / 2);

    for (index, ch) in strip(raw, EXPIRATION_SEPARATOR).enumerate() {
        if index > 1 && index % 2 == 0 {
            formatted.push(EXPIRATION_SEPARATOR);
        }
        formatted.push(ch);
    }

    formatted
}

/// Mask a card number for display, keeping only the last four characters.
///
/// Example: "4111 1111 1111 1234" → "•••• 1234"
pub fn mask_card_number(value: &str) -> String {
    let stripped: Vec<char> = strip(value, CARD_GROUP_SEPARATOR).collect();
    if stripped.len() <= 4 {
        return value.to_string();
    }

    let last4: String = stripped[stripped.len() - 4..].iter().collect();
    format!("{} {}", MASK_GROUP, last4)
}

fn strip(value: &str, separator: char) -> impl Iterator<Item = char> + '_ {
    value.chars().filter(move |&c| c != separator)
}

// ============================================================================
// VALIDATION
// ============================================================================

/// 16 decimal digits once spaces are removed.
pub fn is_valid_card_number(value: &str) -> bool {
    let stripped: String = strip(value, CARD_GROUP_SEPARATOR).collect();
    stripped.chars().count() == CARD_NUMBER_DIGITS && digits_re().is_match(&stripped)
}

/// Exactly `DD/DD`. No stripping: the slash must already be there.
pub fn is_valid_expiration_date(value: &str) -> bool {
    value.chars().count() == EXPIRATION_LENGTH && expiration_re().is_match(value)
}

pub fn is_valid_cvv(value: &str) -> bool {
    value.chars().count() == CVV_DIGITS && cvv_re().is_match(value)
}

// `\d` is Unicode-aware: any decimal digit (Nd), not only 0-9
fn digits_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+$").expect("static pattern"))
}

fn expiration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{2}/\d{2}$").expect("static pattern"))
}

fn cvv_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{3}$").expect("static pattern"))
}

// ============================================================================
// VALIDITY FLAGS
// ============================================================================

/// Per-field validity computed at submit time.
///
/// Each flag is evaluated on its own; a failing card number never skips the
/// other two checks. `Default` is all-valid, which is how a fresh form starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityFlags {
    pub card_number: bool,
    pub expiration_date: bool,
    pub cvv: bool,
}

impl ValidityFlags {
    pub fn check(card_number: &str, expiration_date: &str, cvv: &str) -> Self {
        ValidityFlags {
            card_number: is_valid_card_number(card_number),
            expiration_date: is_valid_expiration_date(expiration_date),
            cvv: is_valid_cvv(cvv),
        }
    }

    pub fn all_valid(&self) -> bool {
        self.card_number && self.expiration_date && self.cvv
    }

    /// Names of the fields that failed, in form order
    pub fn invalid_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if !self.card_number {
            fields.push("card_number");
        }
        if !self.expiration_date {
            fields.push("expiration_date");
        }
        if !self.cvv {
            fields.push("cvv");
        }
        fields
    }
}

impl Default for ValidityFlags {
    fn default() -> Self {
        ValidityFlags {
            card_number: true,
            expiration_date: true,
            cvv: true,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_format_card_number_groups_by_four() {
        assert_eq!(format_card_number("4111111111111111"), "4111 1111 1111 1111");
        assert_eq!(format_card_number("41111"), "4111 1");
        assert_eq!(format_card_number("4111"), "4111");
        assert_eq!(format_card_number(""), "");
    }

    #[test]
    fn test_format_card_number_regroups_misplaced_spaces() {
        assert_eq!(format_card_number("41 11111 1"), "4111 1111");
        assert_eq!(format_card_number("    "), "");
    }

    #[test]
    fn test_format_card_number_does_not_truncate() {
        let formatted = format_card_number("12345678901234567890");
        assert_eq!(formatted, "1234 5678 9012 3456 7890");
        assert!(!is_valid_card_number(&formatted));
    }

    #[test]
    fn test_format_card_number_counts_chars_not_bytes() {
        assert_eq!(format_card_number("ééééé"), "éééé é");
    }

    #[test]
    fn test_format_expiration_date() {
        assert_eq!(format_expiration_date("1225"), "12/25");
        assert_eq!(format_expiration_date("12/25"), "12/25");
        assert_eq!(format_expiration_date("1"), "1");
        assert_eq!(format_expiration_date("12"), "12");
        assert_eq!(format_expiration_date("122"), "12/2");
        assert_eq!(format_expiration_date("122501"), "12/25/01");
        assert_eq!(format_expiration_date("1/2/2/5"), "12/25");
    }

    #[test]
    fn test_is_valid_card_number() {
        assert!(is_valid_card_number("4111 1111 1111 1111"));
        assert!(is_valid_card_number("4111111111111111"));
        assert!(!is_valid_card_number("4111111111111"));
        assert!(!is_valid_card_number("4111 1111 1111 111a"));
        assert!(!is_valid_card_number("4111-1111-1111-1111"));
        assert!(!is_valid_card_number(""));
    }

    #[test]
    fn test_is_valid_expiration_date() {
        assert!(is_valid_expiration_date("12/25"));
        assert!(!is_valid_expiration_date("1225"));
        assert!(!is_valid_expiration_date("12-25"));
        assert!(!is_valid_expiration_date("1/225"));
        assert!(!is_valid_expiration_date("ab/cd"));
        assert!(!is_valid_expiration_date("12/255"));
    }

    #[test]
    fn test_expiration_date_month_range_is_not_checked() {
        // Shape only; "99/99" is well-formed
        assert!(is_valid_expiration_date("99/99"));
    }

    #[test]
    fn test_is_valid_cvv() {
        assert!(is_valid_cvv("123"));
        assert!(!is_valid_cvv("12a"));
        assert!(!is_valid_cvv("1234"));
        assert!(!is_valid_cvv("12"));
        assert!(!is_valid_cvv(" 12"));
    }

    #[test]
    fn test_unicode_decimal_digits_are_accepted() {
        // Arabic-Indic digits count as decimal digits
        assert!(is_valid_cvv("١٢٣"));
        assert!(is_valid_expiration_date("١٢/٢٥"));
        assert!(is_valid_card_number(&"٤".repeat(16)));
        assert!(is_valid_card_number("٤١١١ ١١١١ ١١١١ ١١١١"));
    }

    #[test]
    fn test_non_digit_characters_still_rejected() {
        assert!(!is_valid_cvv("1²3"));
        assert!(!is_valid_cvv("一二三"));
        assert!(!is_valid_expiration_date("12/2x"));
    }

    #[test]
    fn test_mask_card_number() {
        assert_eq!(mask_card_number("4111 1111 1111 1234"), "•••• 1234");
        assert_eq!(mask_card_number("1234"), "1234");
        assert_eq!(mask_card_number(""), "");
    }

    #[test]
    fn test_validity_flags_are_independent() {
        let flags = ValidityFlags::check("4111", "12/25", "12a");
        assert!(!flags.card_number);
        assert!(flags.expiration_date);
        assert!(!flags.cvv);
        assert!(!flags.all_valid());
        assert_eq!(flags.invalid_fields(), vec!["card_number", "cvv"]);
    }

    #[test]
    fn test_validity_flags_default_is_valid() {
        let flags = ValidityFlags::default();
        assert!(flags.all_valid());
        assert!(flags.invalid_fields().is_empty());
    }

    proptest! {
        #[test]
        fn prop_format_card_number_idempotent(raw in "[0-9 ]{0,40}") {
            let once = format_card_number(&raw);
            prop_assert_eq!(format_card_number(&once), once);
        }

        #[test]
        fn prop_format_card_number_space_count(digits in "[0-9]{0,40}") {
            let n = digits.len();
            let expected = if n == 0 { 0 } else { (n - 1) / 4 };
            let spaces = format_card_number(&digits).matches(' ').count();
            prop_assert_eq!(spaces, expected);
        }

        #[test]
        fn prop_format_expiration_date_idempotent(raw in "[0-9/]{0,12}") {
            let once = format_expiration_date(&raw);
            prop_assert_eq!(format_expiration_date(&once), once);
        }

        #[test]
        fn prop_sixteen_formatted_digits_are_valid(digits in "[0-9]{16}") {
            prop_assert!(is_valid_card_number(&format_card_number(&digits)));
        }

        #[test]
        fn prop_formatted_four_digits_are_valid_expiration(digits in "[0-9]{4}") {
            prop_assert!(is_valid_expiration_date(&format_expiration_date(&digits)));
        }
    }
}
