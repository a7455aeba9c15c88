//! Voice Currency Converter
//!
//! Turns spoken or typed phrases into live currency conversions:
//! - Parses free-form text into an amount and two currency codes
//! - Maps colloquial currency names to ISO-style codes
//! - Fetches the converted amount from an exchange-rate service
//! - Narrates the result for speech synthesis
//!
//! PIPELINE:
//! TEXT → PARSE → NORMALIZE → CONVERT → NARRATE → SPEAK

pub mod api;
pub mod config;
pub mod currency;
pub mod error;
pub mod models;
pub mod narration;
pub mod orchestrator;
pub mod parser;
pub mod rates;
pub mod speech;
pub mod state;

pub use error::Result;

// Re-export common types
pub use models::*;
pub use orchestrator::ConversionOrchestrator;
pub use parser::{parse, PhraseParser};
