//! Token scanner
//!
//! A dump is a flat list of `0xNN` byte tokens separated by commas. Dumps copied out of
//! a terminal also carry line breaks, so whitespace counts as a separator too.

use crate::types::{DecoderError, Result};

/// Split dump text into byte tokens, skipping empty fields
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
}

/// Parse one `0x`-prefixed token holding one or two hex digits.
///
/// `index` is the token's position in the dump and only used for the error.
pub fn parse_byte(index: usize, token: &str) -> Result<u8> {
    let malformed = || DecoderError::MalformedToken {
        index,
        token: token.to_string(),
    };

    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .ok_or_else(malformed)?;

    // from_str_radix would also accept a leading '+'
    if digits.is_empty() || digits.len() > 2 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(malformed());
    }

    u8::from_str_radix(digits, 16).map_err(|_| malformed())
}

/// Combine a token pair into a voltage: the second token is the high byte
pub fn millivolts(low: u8, high: u8) -> u16 {
    u16::from_le_bytes([low, high])
}
