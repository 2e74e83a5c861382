//! Money type for representing monetary values.
//!
//! Amounts are unsigned integers in the smallest unit of the currency. The
//! storefront prices in Toman, which has no minor unit, so an amount of
//! `125000` is displayed as `125,000 تومان`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Display currencies.
///
/// Amounts are never converted between currencies; the currency only decides
/// how an amount is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Iranian toman.
    #[default]
    IRT,
    /// Iranian rial.
    IRR,
    USD,
    EUR,
}

impl Currency {
    /// Get the currency code (e.g., "IRT").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::IRT => "IRT",
            Currency::IRR => "IRR",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
        }
    }

    /// Get the currency symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::IRT => "تومان",
            Currency::IRR => "ریال",
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
        }
    }

    /// Whether the symbol is written after the amount.
    pub fn symbol_after(&self) -> bool {
        matches!(self, Currency::IRT | Currency::IRR)
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::IRT | Currency::IRR => 0,
            Currency::USD | Currency::EUR => 2,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A non-negative monetary amount with its display currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in the smallest currency unit.
    pub amount: u64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from minor units.
    pub fn new(amount: u64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Format the amount with thousands separators and no symbol.
    pub fn display_amount(&self) -> String {
        let places = self.currency.decimal_places();
        if places == 0 {
            return group_thousands(self.amount);
        }
        let divisor = 10_u64.pow(places);
        format!(
            "{}.{:0width$}",
            group_thousands(self.amount / divisor),
            self.amount % divisor,
            width = places as usize
        )
    }

    /// Format as a display string (e.g., "125,000 تومان" or "$12.50").
    pub fn display(&self) -> String {
        if self.currency.symbol_after() {
            format!("{} {}", self.display_amount(), self.currency.symbol())
        } else {
            format!("{}{}", self.currency.symbol(), self.display_amount())
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Insert `,` between each group of three digits.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(125000), "125,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_toman_display() {
        assert_eq!(Money::new(125000, Currency::IRT).display(), "125,000 تومان");
        assert_eq!(Money::new(0, Currency::IRT).display(), "0 تومان");
    }

    #[test]
    fn test_decimal_currency_display() {
        assert_eq!(Money::new(123456, Currency::USD).display(), "$1,234.56");
        assert_eq!(Money::new(5, Currency::EUR).display_amount(), "0.05");
    }
}
