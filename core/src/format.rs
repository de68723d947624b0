//! # Formatting and Validation Utilities
//!
//! - [`group_digits`] - separator every 3 digits from the right
//! - [`format_phone`] - digits-only phone display
//! - [`is_valid_email`] / [`is_valid_phone`] - form field checks

use once_cell::sync::Lazy;
use regex::Regex;

static NON_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\D").expect("static regex"));

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("static regex"));

// Ethiopian mobile numbers: 09/07 local, or +2519/+2517 international.
static PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\+251|0)[79]\d{8}$").expect("static regex"));

/// Insert `separator` every 3 characters counting from the right.
///
/// ```rust
/// use wintender_core::format::group_digits;
///
/// assert_eq!(group_digits("911223344", " "), "911 223 344");
/// assert_eq!(group_digits("1234567", ","), "1,234,567");
/// assert_eq!(group_digits("12", ","), "12");
/// ```
pub fn group_digits(digits: &str, separator: &str) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let mut out = String::with_capacity(digits.len() + separator.len() * (chars.len() / 3));
    for (i, ch) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(*ch);
    }
    out
}

/// Strip everything but digits, then group them by three from the right.
pub fn format_phone(phone: &str, separator: &str) -> String {
    let digits = NON_DIGIT.replace_all(phone, "");
    group_digits(&digits, separator)
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email.trim())
}

/// Accepts spaces and dashes between digit groups.
pub fn is_valid_phone(phone: &str) -> bool {
    let compact: String = phone.chars().filter(|c| !c.is_whitespace() && *c != '-').collect();
    PHONE.is_match(&compact)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nine_digits_group_three_three_three() {
        assert_eq!(group_digits("911223344", "-"), "911-223-344");
    }

    #[test]
    fn grouping_starts_from_the_right() {
        assert_eq!(group_digits("0911223344", " "), "0 911 223 344");
        assert_eq!(group_digits("12345", " "), "12 345");
        assert_eq!(group_digits("123", " "), "123");
        assert_eq!(group_digits("", " "), "");
    }

    #[test]
    fn format_phone_strips_formatting() {
        assert_eq!(format_phone("+251 (911) 22-33-44", " "), "251 911 223 344");
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("procurement@wintender.et"));
        assert!(is_valid_email(" a.b+c@x.io "));
        assert!(!is_valid_email("no-at-sign.et"));
        assert!(!is_valid_email("a@b"));
    }

    #[test]
    fn phone_validation() {
        assert!(is_valid_phone("0911223344"));
        assert!(is_valid_phone("+251 911-223-344"));
        assert!(is_valid_phone("0711223344"));
        assert!(!is_valid_phone("0811223344"));
        assert!(!is_valid_phone("091122334"));
    }
}
