//! Classification of raw form tokens.
//!
//! A token is what the user typed into an id-or-name field. It is classified once,
//! up front, and resolution branches on the tag only.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Token {
    /// The token is entirely ASCII digits and fits an `i64`. Other Unicode
    /// decimal digits do not count.
    NumericId(i64),
    /// Anything else; treated as a candidate name.
    NameText(String),
}

impl Token {
    /// Classify a raw token after trimming surrounding whitespace.
    ///
    /// Returns `None` for blank input.
    pub fn classify(raw: &str) -> Option<Token> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        if trimmed.bytes().all(|b| b.is_ascii_digit()) {
            // Digit strings past i64::MAX cannot be ids; they fall through to names.
            if let Ok(id) = trimmed.parse::<i64>() {
                return Some(Token::NumericId(id));
            }
        }

        Some(Token::NameText(trimmed.to_string()))
    }
}
