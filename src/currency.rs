//! Currency alias and symbol tables
//!
//! Both tables are static and read-only; nothing mutates them at runtime.

use crate::models::{CurrencyCode, SupportedCurrency};
use lazy_static::lazy_static;
use std::collections::HashMap;

/// Glyph shown for codes missing from the symbol table
pub const FALLBACK_SYMBOL: &str = "💰";

/// Colloquial spellings (lower-case) → canonical code
const ALIASES: &[(&str, &str)] = &[
    ("dollar", "USD"), ("dollars", "USD"), ("usd", "USD"),
    ("euro", "EUR"), ("euros", "EUR"), ("eur", "EUR"),
    ("pound", "GBP"), ("pounds", "GBP"), ("gbp", "GBP"),
    ("yen", "JPY"), ("jpy", "JPY"),
    ("canadian", "CAD"), ("cad", "CAD"),
    ("australian", "AUD"), ("aud", "AUD"),
    ("swiss", "CHF"), ("chf", "CHF"),
    ("yuan", "CNY"), ("cny", "CNY"),
    ("rupee", "INR"), ("rupees", "INR"), ("inr", "INR"),
    ("won", "KRW"), ("krw", "KRW"),
];

/// Display glyphs, in the order the manual-entry list presents them
const SYMBOLS: &[(&str, &str)] = &[
    ("USD", "💵"), ("EUR", "💶"), ("GBP", "💷"), ("JPY", "💴"),
    ("CAD", "🍁"), ("AUD", "🇦🇺"), ("CHF", "🇨🇭"), ("CNY", "🇨🇳"),
    ("INR", "🇮🇳"), ("KRW", "🇰🇷"), ("BRL", "🇧🇷"), ("MXN", "🇲🇽"),
    ("RUB", "🇷🇺"), ("ZAR", "🇿🇦"), ("SGD", "🇸🇬"), ("NZD", "🇳🇿"),
];

lazy_static! {
    static ref ALIAS_TABLE: HashMap<&'static str, &'static str> =
        ALIASES.iter().copied().collect();
    static ref SYMBOL_TABLE: HashMap<&'static str, &'static str> =
        SYMBOLS.iter().copied().collect();
}

/// Map a spoken or typed currency word to a code.
///
/// Never fails: unknown tokens come back upper-cased and are left for the
/// rate service to accept or reject.
pub fn normalize(token: &str) -> CurrencyCode {
    let lowered = token.to_lowercase();

    match ALIAS_TABLE.get(lowered.as_str()) {
        Some(code) => CurrencyCode::new(code),
        None => CurrencyCode::new(token),
    }
}

pub fn symbol_for(code: &CurrencyCode) -> &'static str {
    SYMBOL_TABLE
        .get(code.as_str())
        .copied()
        .unwrap_or(FALLBACK_SYMBOL)
}

pub fn is_supported(code: &CurrencyCode) -> bool {
    SYMBOL_TABLE.contains_key(code.as_str())
}

/// Fixed list of currencies offered by manual entry
pub fn supported_currencies() -> Vec<SupportedCurrency> {
    SYMBOLS
        .iter()
        .map(|&(code, symbol)| SupportedCurrency { code, symbol })
        .collect()
}
