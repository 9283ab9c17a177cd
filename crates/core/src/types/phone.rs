//! Kenyan mobile numbers in the form M-Pesa expects.
//!
//! Customers type numbers in several local shapes (`0712 345 678`,
//! `+254712345678`, `712345678`). M-Pesa STK push wants the bare
//! international form `254XXXXXXXXX`, so [`MpesaPhone`] validates the input
//! and stores the normalized value.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Accepted Safaricom/Airtel number shapes after whitespace removal.
static KENYAN_MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\+254|254|0)?[17]\d{8}$").expect("Invalid regex"));

/// Errors that can occur when parsing an [`MpesaPhone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// Nothing but whitespace was entered.
    #[error("Phone number is required")]
    Empty,
    /// The number is not a Kenyan mobile number.
    #[error("Please enter a valid Kenyan phone number")]
    Invalid,
}

/// A validated Kenyan mobile number normalized to `254XXXXXXXXX`.
///
/// ```
/// use elegance_core::MpesaPhone;
///
/// assert_eq!(MpesaPhone::parse("0712 345 678").unwrap().as_str(), "254712345678");
/// assert_eq!(MpesaPhone::parse("+254112345678").unwrap().as_str(), "254112345678");
/// assert!(MpesaPhone::parse("0812345678").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MpesaPhone(String);

impl MpesaPhone {
    /// Validate and normalize a phone number.
    ///
    /// # Errors
    ///
    /// Returns [`PhoneError::Empty`] for blank input and
    /// [`PhoneError::Invalid`] when the number does not match a Kenyan
    /// mobile prefix.
    pub fn parse(input: &str) -> Result<Self, PhoneError> {
        let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return Err(PhoneError::Empty);
        }
        if !KENYAN_MOBILE_RE.is_match(&compact) {
            return Err(PhoneError::Invalid);
        }
        Ok(Self(normalize(&compact)))
    }

    /// Returns true if `input` would be accepted by [`MpesaPhone::parse`].
    #[must_use]
    pub fn is_valid(input: &str) -> bool {
        Self::parse(input).is_ok()
    }

    /// The normalized `254XXXXXXXXX` form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the normalized string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

fn normalize(compact: &str) -> String {
    if let Some(rest) = compact.strip_prefix('0') {
        format!("254{rest}")
    } else if let Some(rest) = compact.strip_prefix('+') {
        rest.to_owned()
    } else if compact.starts_with("254") {
        compact.to_owned()
    } else {
        format!("254{compact}")
    }
}

impl fmt::Display for MpesaPhone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for MpesaPhone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn normalized(input: &str) -> String {
        MpesaPhone::parse(input).unwrap().into_inner()
    }

    #[test]
    fn test_leading_zero_becomes_country_code() {
        assert_eq!(normalized("0712345678"), "254712345678");
        assert_eq!(normalized("0112345678"), "254112345678");
    }

    #[test]
    fn test_plus_prefix_is_dropped() {
        assert_eq!(normalized("+254712345678"), "254712345678");
    }

    #[test]
    fn test_already_normalized_is_kept() {
        assert_eq!(normalized("254712345678"), "254712345678");
    }

    #[test]
    fn test_bare_subscriber_number_gets_country_code() {
        assert_eq!(normalized("712345678"), "254712345678");
    }

    #[test]
    fn test_whitespace_is_ignored() {
        assert_eq!(normalized(" 0712 345\t678 "), "254712345678");
        assert_eq!(normalized("+254 7 1234 5678"), "254712345678");
    }

    #[test]
    fn test_rejects_blank() {
        assert_eq!(MpesaPhone::parse("   "), Err(PhoneError::Empty));
    }

    #[test]
    fn test_rejects_non_mobile_prefixes() {
        assert_eq!(MpesaPhone::parse("0212345678"), Err(PhoneError::Invalid));
        assert_eq!(MpesaPhone::parse("+255712345678"), Err(PhoneError::Invalid));
    }

    #[test]
    fn test_rejects_wrong_length() {
        assert!(!MpesaPhone::is_valid("071234567"));
        assert!(!MpesaPhone::is_valid("07123456789"));
    }

    #[test]
    fn test_rejects_letters() {
        assert!(!MpesaPhone::is_valid("07123abc78"));
    }
}
