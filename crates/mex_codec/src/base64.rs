//! Base64 encoding and prefix-tolerant decoding.

use ::base64::{
    alphabet,
    engine::{general_purpose::STANDARD, DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};
use tracing::trace;

/// Engine used for decoding an already validated, unpadded prefix.
///
/// Trailing bits are allowed because the prefix may end mid-quantum.
const PREFIX_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::RequireNone),
);

/// Encode bytes with the standard alphabet, padded with `=`.
pub fn encode(data: impl AsRef<[u8]>) -> String {
    STANDARD.encode(data)
}

/// Decode a base64 string, stopping at the first byte outside the alphabet.
///
/// Padding counts as outside the alphabet, so `"TWE="` and `"TWE"` decode to the same bytes. A lone
/// trailing character carries fewer than eight bits and produces nothing.
pub fn decode(input: impl AsRef<[u8]>) -> Vec<u8> {
    let input = input.as_ref();

    let valid = input.iter().take_while(|c| is_alphabet(**c)).count();
    if valid != input.len() {
        trace!(valid, total = input.len(), "base64 input truncated at invalid character");
    }

    // a single leftover sextet cannot complete a byte
    let usable = if valid % 4 == 1 { valid - 1 } else { valid };

    PREFIX_ENGINE
        .decode(&input[..usable])
        .unwrap_or_default()
}

fn is_alphabet(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'+' || c == b'/'
}
