//! Compact sequence codec.
//!
//! An ordered list of choices is stored as one character per element
//! (rock=R, paper=P, scissors=S) with no separators. The fixed width lets
//! storage append a single character per streak round and lets the engine
//! peek the Nth choice without decoding the whole sequence.

use crate::error::GameError;
use crate::models::choice::Choice;

/// Number of choices in a deck-mode deck.
pub const DECK_LEN: usize = 10;

/// Number of pre-generated computer choices in a streak session.
pub const STREAK_LEN: usize = 100;

/// Encode a sequence of choices into its fixed-width storage form.
pub fn encode(choices: &[Choice]) -> String {
    choices.iter().map(|c| c.to_char()).collect()
}

/// Decode a stored sequence back into choices.
pub fn decode(code: &str) -> Result<Vec<Choice>, GameError> {
    code.chars()
        .enumerate()
        .map(|(i, c)| {
            Choice::from_char(c).map_err(|_| {
                GameError::invalid_encoding(format!(
                    "unexpected character '{}' at position {}",
                    c, i
                ))
            })
        })
        .collect()
}

/// Peek the choice at `index` without decoding the full sequence.
///
/// A sequence is always stored at its declared capacity, so an
/// out-of-range index means the stored value is malformed.
pub fn choice_at(code: &str, index: usize) -> Result<Choice, GameError> {
    match code.as_bytes().get(index) {
        Some(&b) => Choice::from_char(b as char).map_err(|_| {
            GameError::invalid_encoding(format!(
                "unexpected character '{}' at position {}",
                b as char, index
            ))
        }),
        None => Err(GameError::invalid_encoding(format!(
            "index {} out of range for sequence of length {}",
            index,
            code.len()
        ))),
    }
}
