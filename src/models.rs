//! Core data models for the converter

use crate::currency;
use crate::error::{ParseFailure, VoiceCurrencyError};
use crate::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

//
// ================= Currency Code =================
//

/// An upper-cased, ISO-style currency code.
///
/// Not validated locally: unknown codes are only rejected by the rate service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for CurrencyCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

//
// ================= Request =================
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionRequest {
    amount: Decimal,
    from_currency: CurrencyCode,
    to_currency: CurrencyCode,
}

impl ConversionRequest {
    /// Build a request; the amount must be strictly positive.
    pub fn new(
        amount: Decimal,
        from_currency: CurrencyCode,
        to_currency: CurrencyCode,
    ) -> std::result::Result<Self, ParseFailure> {
        if amount <= Decimal::ZERO {
            return Err(ParseFailure::InvalidAmount(amount.to_string()));
        }

        Ok(Self {
            amount,
            from_currency,
            to_currency,
        })
    }

    /// Manual-entry path: both codes must come from the supported list.
    pub fn manual(amount: Decimal, from: &str, to: &str) -> Result<Self> {
        let from_currency = supported_code(from)?;
        let to_currency = supported_code(to)?;

        Ok(Self::new(amount, from_currency, to_currency)?)
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn from_currency(&self) -> &CurrencyCode {
        &self.from_currency
    }

    pub fn to_currency(&self) -> &CurrencyCode {
        &self.to_currency
    }
}

fn supported_code(code: &str) -> Result<CurrencyCode> {
    let code = CurrencyCode::new(code.trim());
    if currency::is_supported(&code) {
        Ok(code)
    } else {
        Err(VoiceCurrencyError::UnsupportedCurrency(code.to_string()))
    }
}

//
// ================= Result =================
//

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionResult {
    pub amount: Decimal,
    pub from_currency: CurrencyCode,
    pub to_currency: CurrencyCode,
    pub converted_amount: Decimal,
    pub from_symbol: &'static str,
    pub to_symbol: &'static str,
}

/// Entry in the list offered to the manual-entry path.
#[derive(Debug, Clone, Serialize)]
pub struct SupportedCurrency {
    pub code: &'static str,
    pub symbol: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_currency_code_is_uppercased() {
        assert_eq!(CurrencyCode::new("eur"), "EUR");
        assert_eq!(CurrencyCode::new("Gbp").to_string(), "GBP");
    }

    #[test]
    fn test_request_rejects_non_positive_amount() {
        let zero = ConversionRequest::new(dec!(0), CurrencyCode::new("USD"), CurrencyCode::new("EUR"));
        assert!(matches!(zero, Err(ParseFailure::InvalidAmount(_))));

        let ok = ConversionRequest::new(dec!(0.5), CurrencyCode::new("USD"), CurrencyCode::new("EUR"));
        assert!(ok.is_ok());
    }

    #[test]
    fn test_manual_entry_accepts_supported_codes_any_case() {
        let request = ConversionRequest::manual(dec!(10), "usd", " nzd ").unwrap();
        assert_eq!(request.from_currency(), &CurrencyCode::new("USD"));
        assert_eq!(request.to_currency(), &CurrencyCode::new("NZD"));
        assert_eq!(request.amount(), dec!(10));
    }

    #[test]
    fn test_manual_entry_rejects_unknown_codes() {
        let err = ConversionRequest::manual(dec!(10), "USD", "XYZ").unwrap_err();
        assert!(matches!(err, VoiceCurrencyError::UnsupportedCurrency(code) if code == "XYZ"));
    }

    #[test]
    fn test_result_serializes_amounts_as_numbers() {
        let result = ConversionResult {
            amount: dec!(100),
            from_currency: CurrencyCode::new("USD"),
            to_currency: CurrencyCode::new("EUR"),
            converted_amount: dec!(92.35),
            from_symbol: "💵",
            to_symbol: "💶",
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["converted_amount"], serde_json::json!(92.35));
        assert_eq!(json["from_currency"], "USD");
    }
}
