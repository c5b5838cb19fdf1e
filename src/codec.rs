//! Base64 transport encoding for image bytes.
//!
//! The scripting bridge and the HTTP APIs only carry strings, so image
//! payloads cross both as base64 text. Encoding uses the standard RFC 4648
//! alphabet. Decoding is deliberately lenient beyond the RFC: data-URL
//! prefixes, padding, whitespace and any other non-alphabet characters are
//! stripped first, and a dangling trailing character is dropped instead of
//! failing the decode.

use crate::error::{Result, VariationError};
use base64::{
    alphabet,
    engine::{general_purpose, DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};

const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode without `=` padding.
pub fn encode(bytes: &[u8]) -> String {
    LENIENT.encode(bytes)
}

/// Encode with `=` padding, as the HTTP endpoints expect.
pub fn encode_padded(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}

pub fn decode(text: &str) -> Result<Vec<u8>> {
    let mut cleaned: String = strip_data_url(text)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '+' || *c == '/')
        .collect();

    // A lone sextet cannot carry a whole byte.
    if cleaned.len() % 4 == 1 {
        cleaned.pop();
    }

    LENIENT
        .decode(cleaned.as_bytes())
        .map_err(|e| VariationError::InvalidImage(format!("base64 decode failed: {}", e)))
}

/// Remove a leading `data:<mime>;base64,` prefix if present.
pub fn strip_data_url(text: &str) -> &str {
    let trimmed = text.trim_start();
    if !trimmed.starts_with("data:") {
        return text;
    }
    match trimmed.find(";base64,") {
        Some(pos) => &trimmed[pos + ";base64,".len()..],
        None => text,
    }
}

/// Build a `data:` URL for inline display.
pub fn data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, encode_padded(bytes))
}
