//! Base64url codec used for every byte field in WebAuthn JSON.
//!
//! Output never contains `+`, `/` or `=`. Input is accepted with or without
//! trailing padding, and the standard-alphabet characters `+` and `/` are
//! read as their URL-safe counterparts.

use base64::{
    Engine,
    alphabet::URL_SAFE,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use thiserror::Error;

const ENGINE: GeneralPurpose = GeneralPurpose::new(
    &URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Errors from decoding base64url text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The text is not valid base64url.
    #[error("invalid base64url: {0}")]
    Decode(#[from] base64::DecodeError),
}

/// Encode bytes as unpadded base64url text.
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    ENGINE.encode(bytes)
}

/// Decode base64url text back into bytes.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] if the text contains characters outside the
/// alphabet or has an impossible length.
pub fn decode(text: &str) -> Result<Vec<u8>, CodecError> {
    if text.contains(['+', '/']) {
        let normalized: String = text
            .chars()
            .map(|c| match c {
                '+' => '-',
                '/' => '_',
                other => other,
            })
            .collect();
        return Ok(ENGINE.decode(normalized)?);
    }
    Ok(ENGINE.decode(text)?)
}
