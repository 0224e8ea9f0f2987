//! JSON forms of WebAuthn options and credentials.
//!
//! Options travel from a relying party as JSON with base64url text where the
//! browser expects bytes; [`parse_creation_options`] and
//! [`parse_request_options`] decode them. Credentials travel the other way:
//! [`to_json`] encodes every byte field of a freshly created or asserted
//! credential.

mod options;
mod response;

pub use options::*;
pub use response::*;

use crate::codec::CodecError;
use thiserror::Error;

/// Errors converting between native and JSON credential shapes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerializationError {
    /// A text field was not valid base64url.
    #[error("invalid base64url in '{field}': {source}")]
    Decode {
        /// The JSON member that failed to decode.
        field: &'static str,
        /// The underlying codec failure.
        source: CodecError,
    },

    /// The response carries neither `signature` nor `attestationObject`, so it
    /// is neither an assertion nor an attestation.
    #[error("unrecognized authenticator response shape")]
    UnrecognizedResponseShape,

    /// A response of a recognized variant lacks a member that variant always
    /// carries.
    #[error("authenticator response is missing '{0}'")]
    MissingField(&'static str),
}

pub(crate) fn decode_field(field: &'static str, text: &str) -> Result<Vec<u8>, SerializationError> {
    crate::codec::decode(text).map_err(|source| SerializationError::Decode { field, source })
}
