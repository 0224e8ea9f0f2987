use super::SerializationError;
use crate::codec;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An `AuthenticatorResponse` as read off the host, before its variant is
/// known. Each member is `None` when the host object does not carry it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAuthenticatorResponse {
    /// `clientDataJSON`
    pub client_data_json: Option<Vec<u8>>,
    /// `attestationObject` (registration only)
    pub attestation_object: Option<Vec<u8>>,
    /// `authenticatorData`
    pub authenticator_data: Option<Vec<u8>>,
    /// `signature` (authentication only)
    pub signature: Option<Vec<u8>>,
    /// `userHandle` (authentication only, optional)
    pub user_handle: Option<Vec<u8>>,
    /// Result of `getTransports()`, or `None` when the method is missing.
    pub transports: Option<Vec<String>>,
}

/// A `PublicKeyCredential` as read off the host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCredential {
    /// `id`
    pub id: String,
    /// `rawId`
    pub raw_id: Vec<u8>,
    /// `type`
    pub kind: String,
    /// `authenticatorAttachment`
    pub authenticator_attachment: Option<String>,
    /// Result of `getClientExtensionResults()`, or `None` when unavailable.
    pub client_extension_results: Option<Map<String, Value>>,
    /// `response`
    pub response: RawAuthenticatorResponse,
}

/// `AuthenticatorAttestationResponse`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttestationResponse {
    /// `clientDataJSON`
    pub client_data_json: Vec<u8>,
    /// `attestationObject`
    pub attestation_object: Vec<u8>,
    /// Transports reported by the authenticator, empty when unknown.
    pub transports: Vec<String>,
}

/// `AuthenticatorAssertionResponse`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionResponse {
    /// `clientDataJSON`
    pub client_data_json: Vec<u8>,
    /// `authenticatorData`
    pub authenticator_data: Vec<u8>,
    /// `signature`
    pub signature: Vec<u8>,
    /// `userHandle`
    pub user_handle: Option<Vec<u8>>,
}

/// The two shapes an authenticator response can take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticatorResponse {
    /// Produced by `navigator.credentials.create()`.
    Registration(AttestationResponse),
    /// Produced by `navigator.credentials.get()`.
    Authentication(AssertionResponse),
}

impl TryFrom<RawAuthenticatorResponse> for AuthenticatorResponse {
    type Error = SerializationError;

    /// A response carrying `signature` is an assertion; otherwise one
    /// carrying `attestationObject` is an attestation.
    fn try_from(raw: RawAuthenticatorResponse) -> Result<Self, Self::Error> {
        if let Some(signature) = raw.signature {
            return Ok(Self::Authentication(AssertionResponse {
                client_data_json: raw
                    .client_data_json
                    .ok_or(SerializationError::MissingField("clientDataJSON"))?,
                authenticator_data: raw
                    .authenticator_data
                    .ok_or(SerializationError::MissingField("authenticatorData"))?,
                signature,
                user_handle: raw.user_handle,
            }));
        }

        if let Some(attestation_object) = raw.attestation_object {
            return Ok(Self::Registration(AttestationResponse {
                client_data_json: raw
                    .client_data_json
                    .ok_or(SerializationError::MissingField("clientDataJSON"))?,
                attestation_object,
                transports: raw.transports.unwrap_or_default(),
            }));
        }

        Err(SerializationError::UnrecognizedResponseShape)
    }
}

/// A `PublicKeyCredential` whose response variant is known.
#[derive(Debug, Clone, PartialEq)]
pub struct PublicKeyCredential {
    /// `id`
    pub id: String,
    /// `rawId`
    pub raw_id: Vec<u8>,
    /// `type`
    pub kind: String,
    /// `authenticatorAttachment`
    pub authenticator_attachment: Option<String>,
    /// Client extension outputs.
    pub client_extension_results: Map<String, Value>,
    /// The attestation or assertion.
    pub response: AuthenticatorResponse,
}

impl TryFrom<RawCredential> for PublicKeyCredential {
    type Error = SerializationError;

    fn try_from(raw: RawCredential) -> Result<Self, Self::Error> {
        Ok(Self {
            response: raw.response.try_into()?,
            id: raw.id,
            raw_id: raw.raw_id,
            kind: raw.kind,
            authenticator_attachment: raw.authenticator_attachment,
            client_extension_results: raw.client_extension_results.unwrap_or_default(),
        })
    }
}

impl PublicKeyCredential {
    /// `PublicKeyCredential.prototype.toJSON()`
    pub fn to_json(&self) -> PublicKeyCredentialJson {
        let response = match &self.response {
            AuthenticatorResponse::Registration(response) => {
                AuthenticatorResponseJson::Registration(AttestationResponseJson {
                    client_data_json: codec::encode(&response.client_data_json),
                    attestation_object: codec::encode(&response.attestation_object),
                    transports: response.transports.clone(),
                })
            }
            AuthenticatorResponse::Authentication(response) => {
                AuthenticatorResponseJson::Authentication(AssertionResponseJson {
                    client_data_json: codec::encode(&response.client_data_json),
                    authenticator_data: codec::encode(&response.authenticator_data),
                    signature: codec::encode(&response.signature),
                    user_handle: response.user_handle.as_ref().map(codec::encode),
                })
            }
        };

        PublicKeyCredentialJson {
            id: self.id.clone(),
            raw_id: codec::encode(&self.raw_id),
            response,
            authenticator_attachment: self.authenticator_attachment.clone(),
            client_extension_results: self.client_extension_results.clone(),
            kind: self.kind.clone(),
        }
    }
}

/// `AuthenticatorAttestationResponseJSON`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestationResponseJson {
    /// Base64url `clientDataJSON`.
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String,
    /// Base64url `attestationObject`.
    pub attestation_object: String,
    /// Transports reported by the authenticator.
    pub transports: Vec<String>,
}

/// `AuthenticatorAssertionResponseJSON`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssertionResponseJson {
    /// Base64url `clientDataJSON`.
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String,
    /// Base64url `authenticatorData`.
    pub authenticator_data: String,
    /// Base64url `signature`.
    pub signature: String,
    /// Base64url `userHandle`, omitted when the authenticator returned none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_handle: Option<String>,
}

/// The `response` member of a serialized credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuthenticatorResponseJson {
    /// `AuthenticatorAttestationResponseJSON`
    Registration(AttestationResponseJson),
    /// `AuthenticatorAssertionResponseJSON`
    Authentication(AssertionResponseJson),
}

/// `RegistrationResponseJSON` or `AuthenticationResponseJSON`, depending on
/// the response variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyCredentialJson {
    /// `id`
    pub id: String,
    /// Base64url `rawId`.
    pub raw_id: String,
    /// The encoded response.
    pub response: AuthenticatorResponseJson,
    /// `authenticatorAttachment`, omitted when null.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticator_attachment: Option<String>,
    /// Client extension outputs.
    #[serde(default)]
    pub client_extension_results: Map<String, Value>,
    /// `type`
    #[serde(rename = "type")]
    pub kind: String,
}

/// Serialize a credential read off the host.
///
/// # Errors
///
/// Returns [`SerializationError::UnrecognizedResponseShape`] if the response
/// carries neither `signature` nor `attestationObject`.
pub fn to_json(credential: RawCredential) -> Result<PublicKeyCredentialJson, SerializationError> {
    Ok(PublicKeyCredential::try_from(credential)?.to_json())
}
