//! Result narration
//!
//! Builds the sentence handed to speech synthesis and the on-screen line.

use crate::models::ConversionResult;
use crate::speech::{Utterance, VoiceSettings};

/// "100 USD equals 92.35 EUR"
pub fn narrate(result: &ConversionResult) -> String {
    format!(
        "{} {} equals {} {}",
        result.amount.normalize(),
        result.from_currency,
        result.converted_amount.normalize(),
        result.to_currency
    )
}

/// Narration wrapped with the fixed voice parameters
pub fn utterance_for(result: &ConversionResult) -> Utterance {
    Utterance {
        text: narrate(result),
        voice: VoiceSettings::default(),
    }
}

/// "💵 100 USD = 💶 92.35 EUR"
pub fn display_line(result: &ConversionResult) -> String {
    format!(
        "{} {} {} = {} {} {}",
        result.from_symbol,
        result.amount.normalize(),
        result.from_currency,
        result.to_symbol,
        result.converted_amount.normalize(),
        result.to_currency
    )
}
