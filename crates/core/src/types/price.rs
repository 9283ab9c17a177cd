//! Type-safe price representation using decimal arithmetic.
//!
//! The store trades in Kenyan shillings and displays whole units only, so
//! formatting rounds half away from zero and groups thousands:
//!
//! ```rust
//! use elegance_core::format_price;
//! use rust_decimal::Decimal;
//!
//! assert_eq!(format_price(Decimal::from(12_500)), "KSh 12,500");
//! ```

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (shillings, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price in the store's default currency.
    #[must_use]
    pub fn kes(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::KES)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self
            .amount
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .normalize()
            .to_string();
        let (sign, digits) = whole
            .strip_prefix('-')
            .map_or(("", whole.as_str()), |rest| ("-", rest));
        write!(
            f,
            "{sign}{} {}",
            self.currency_code.symbol(),
            group_thousands(digits)
        )
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[allow(clippy::upper_case_acronyms)]
pub enum CurrencyCode {
    #[default]
    KES,
    USD,
    UGX,
    TZS,
}

impl CurrencyCode {
    /// Display symbol used in front of amounts.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::KES => "KSh",
            Self::USD => "$",
            Self::UGX => "USh",
            Self::TZS => "TSh",
        }
    }
}

/// Format an amount in the store currency, e.g. `KSh 1,500`.
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    Price::kes(amount).to_string()
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_small_amount() {
        assert_eq!(format_price(Decimal::from(500)), "KSh 500");
    }

    #[test]
    fn test_format_groups_thousands() {
        assert_eq!(format_price(Decimal::from(10_000)), "KSh 10,000");
        assert_eq!(format_price(Decimal::from(1_234_567)), "KSh 1,234,567");
    }

    #[test]
    fn test_format_rounds_to_whole_units() {
        assert_eq!(format_price(Decimal::new(149_950, 2)), "KSh 1,500");
        assert_eq!(format_price(Decimal::new(149_949, 2)), "KSh 1,499");
    }

    #[test]
    fn test_format_zero_and_negative() {
        assert_eq!(format_price(Decimal::ZERO), "KSh 0");
        assert_eq!(format_price(Decimal::from(-2_500)), "-KSh 2,500");
    }

    #[test]
    fn test_other_currency_symbol() {
        let price = Price::new(Decimal::from(20), CurrencyCode::USD);
        assert_eq!(price.to_string(), "$ 20");
    }
}
