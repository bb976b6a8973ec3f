//! # Currency and Amount Helpers
//!
//! Every amount in the system is an integer. Cart prices are held in major
//! units (whole rupees); the payment provider is quoted in minor units
//! (paise). The conversion between the two is a single exact multiply so a
//! client-quoted total and the provider-charged total can never drift.

use serde::{Deserialize, Serialize};

/// Supported settlement currencies (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    INR,
    USD,
    EUR,
    GBP,
}

impl Currency {
    /// Returns the ISO 4217 currency code
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::INR => "INR",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
        }
    }

    /// Returns the number of decimal places for this currency
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::INR | Currency::USD | Currency::EUR | Currency::GBP => 2,
        }
    }

    /// Minor units per major unit (100 paise to the rupee)
    pub fn minor_per_major(&self) -> i64 {
        10_i64.pow(self.decimal_places())
    }

    /// Convert an integer major-unit amount to the smallest currency unit.
    /// Exact by construction; there is no rounding step to drift.
    pub fn to_minor_units(&self, major: i64) -> i64 {
        major * self.minor_per_major()
    }

    /// Display symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::INR => "₹",
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
        }
    }

    /// Parse an ISO code, case-insensitive ("inr" and "INR" both work)
    pub fn parse(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "INR" => Some(Currency::INR),
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            _ => None,
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::INR
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Format a major-unit amount for display (e.g., "₹499")
pub fn format_amount(amount: i64, currency: Currency) -> String {
    format!("{}{}", currency.symbol(), amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minor_unit_conversion() {
        assert_eq!(Currency::INR.to_minor_units(250), 25000);
        assert_eq!(Currency::INR.to_minor_units(229), 22900);
        assert_eq!(Currency::INR.to_minor_units(0), 0);
        assert_eq!(Currency::USD.to_minor_units(10), 1000);
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(Currency::parse("INR"), Some(Currency::INR));
        assert_eq!(Currency::parse("inr"), Some(Currency::INR));
        assert_eq!(Currency::parse("usd"), Some(Currency::USD));
        assert_eq!(Currency::parse("xyz"), None);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(499, Currency::INR), "₹499");
        assert_eq!(format_amount(29, Currency::INR), "₹29");
    }

    #[test]
    fn test_serde_uses_uppercase_codes() {
        let json = serde_json::to_string(&Currency::INR).unwrap();
        assert_eq!(json, "\"INR\"");
        let back: Currency = serde_json::from_str("\"INR\"").unwrap();
        assert_eq!(back, Currency::INR);
    }
}
