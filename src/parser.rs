//! Phrase Parser
//!
//! Turns free-form text ("convert 100 dollars to euros") into a
//! [`ConversionRequest`]. Patterns are tried in priority order and the first
//! match wins; nothing is guessed when none of them match.

use crate::currency::normalize;
use crate::error::ParseFailure;
use crate::models::ConversionRequest;
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

lazy_static! {
    /// Ordered recognition patterns: amount, source word, target word.
    /// Words are ASCII-only; Unicode case folding would admit K (U+212A) and ſ.
    static ref PATTERNS: Vec<Regex> = [
        r"(?i)convert\s+([0-9]+(?:\.[0-9]+)?)\s+((?-u:[a-z]+))\s+to\s+((?-u:[a-z]+))",
        r"(?i)([0-9]+(?:\.[0-9]+)?)\s+((?-u:[a-z]+))\s+to\s+((?-u:[a-z]+))",
        r"(?i)([0-9]+(?:\.[0-9]+)?)\s+((?-u:[a-z]+))\s+in\s+((?-u:[a-z]+))",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("invalid phrase pattern"))
    .collect();
}

pub struct PhraseParser;

impl PhraseParser {
    /// Parse text into a conversion request
    pub fn parse(text: &str) -> Result<ConversionRequest, ParseFailure> {
        let captures = PATTERNS
            .iter()
            .find_map(|pattern| pattern.captures(text))
            .ok_or(ParseFailure::NoRecognizablePhrase)?;

        let raw_amount = &captures[1];
        let amount = Decimal::from_str(raw_amount)
            .map_err(|_| ParseFailure::InvalidAmount(raw_amount.to_string()))?;

        let from_currency = normalize(&captures[2]);
        let to_currency = normalize(&captures[3]);

        debug!(
            %amount,
            from = %from_currency,
            to = %to_currency,
            "Parsed conversion phrase"
        );

        ConversionRequest::new(amount, from_currency, to_currency)
    }
}

/// Shorthand for [`PhraseParser::parse`]
pub fn parse(text: &str) -> Result<ConversionRequest, ParseFailure> {
    PhraseParser::parse(text)
}
