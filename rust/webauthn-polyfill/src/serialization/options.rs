use super::{SerializationError, decode_field};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `PublicKeyCredentialDescriptorJSON`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicKeyCredentialDescriptorJson {
    /// Base64url credential ID.
    pub id: String,
    /// Credential type, normally `"public-key"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Transport hints, passed through as given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transports: Option<Vec<String>>,
    /// Any other members.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `PublicKeyCredentialDescriptor`
#[derive(Debug, Clone, PartialEq)]
pub struct PublicKeyCredentialDescriptor {
    /// Raw credential ID.
    pub id: Vec<u8>,
    /// Credential type, normally `"public-key"`.
    pub kind: String,
    /// Transport hints.
    pub transports: Option<Vec<String>>,
    /// Any other members.
    pub extra: Map<String, Value>,
}

impl PublicKeyCredentialDescriptor {
    fn from_json(
        field: &'static str,
        json: &PublicKeyCredentialDescriptorJson,
    ) -> Result<Self, SerializationError> {
        Ok(Self {
            id: decode_field(field, &json.id)?,
            kind: json.kind.clone(),
            transports: json.transports.clone(),
            extra: json.extra.clone(),
        })
    }

    fn from_json_list(
        field: &'static str,
        list: Option<&[PublicKeyCredentialDescriptorJson]>,
    ) -> Result<Vec<Self>, SerializationError> {
        list.unwrap_or_default()
            .iter()
            .map(|descriptor| Self::from_json(field, descriptor))
            .collect()
    }
}

/// `PublicKeyCredentialUserEntityJSON`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicKeyCredentialUserEntityJson {
    /// Base64url user handle.
    pub id: String,
    /// `name`, `displayName` and anything else, passed through.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `PublicKeyCredentialUserEntity`
#[derive(Debug, Clone, PartialEq)]
pub struct PublicKeyCredentialUserEntity {
    /// Raw user handle.
    pub id: Vec<u8>,
    /// `name`, `displayName` and anything else.
    pub extra: Map<String, Value>,
}

/// `PublicKeyCredentialCreationOptionsJSON`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyCredentialCreationOptionsJson {
    /// Base64url challenge.
    pub challenge: String,
    /// The account being registered.
    pub user: PublicKeyCredentialUserEntityJson,
    /// Credentials the authenticator must not already hold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_credentials: Option<Vec<PublicKeyCredentialDescriptorJson>>,
    /// `rp`, `pubKeyCredParams`, `timeout` and everything else.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `PublicKeyCredentialCreationOptions`, as passed to
/// `navigator.credentials.create({ publicKey })`.
#[derive(Debug, Clone, PartialEq)]
pub struct PublicKeyCredentialCreationOptions {
    /// Raw challenge.
    pub challenge: Vec<u8>,
    /// The account being registered.
    pub user: PublicKeyCredentialUserEntity,
    /// Credentials the authenticator must not already hold. Empty, never
    /// absent.
    pub exclude_credentials: Vec<PublicKeyCredentialDescriptor>,
    /// Every other member of the JSON options.
    pub extra: Map<String, Value>,
}

/// `PublicKeyCredentialRequestOptionsJSON`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyCredentialRequestOptionsJson {
    /// Base64url challenge.
    pub challenge: String,
    /// Credentials acceptable for this assertion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_credentials: Option<Vec<PublicKeyCredentialDescriptorJson>>,
    /// `rpId`, `userVerification`, `timeout` and everything else.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `PublicKeyCredentialRequestOptions`, as passed to
/// `navigator.credentials.get({ publicKey })`.
#[derive(Debug, Clone, PartialEq)]
pub struct PublicKeyCredentialRequestOptions {
    /// Raw challenge.
    pub challenge: Vec<u8>,
    /// Credentials acceptable for this assertion. Empty, never absent.
    pub allow_credentials: Vec<PublicKeyCredentialDescriptor>,
    /// Every other member of the JSON options.
    pub extra: Map<String, Value>,
}

/// `PublicKeyCredential.parseCreationOptionsFromJSON()`
///
/// # Errors
///
/// Fails if the challenge, user ID or any excluded credential ID is not valid
/// base64url.
pub fn parse_creation_options(
    options: &PublicKeyCredentialCreationOptionsJson,
) -> Result<PublicKeyCredentialCreationOptions, SerializationError> {
    Ok(PublicKeyCredentialCreationOptions {
        challenge: decode_field("challenge", &options.challenge)?,
        user: PublicKeyCredentialUserEntity {
            id: decode_field("user.id", &options.user.id)?,
            extra: options.user.extra.clone(),
        },
        exclude_credentials: PublicKeyCredentialDescriptor::from_json_list(
            "excludeCredentials[].id",
            options.exclude_credentials.as_deref(),
        )?,
        extra: options.extra.clone(),
    })
}

/// `PublicKeyCredential.parseRequestOptionsFromJSON()`
///
/// # Errors
///
/// Fails if the challenge or any allowed credential ID is not valid
/// base64url.
pub fn parse_request_options(
    options: &PublicKeyCredentialRequestOptionsJson,
) -> Result<PublicKeyCredentialRequestOptions, SerializationError> {
    Ok(PublicKeyCredentialRequestOptions {
        challenge: decode_field("challenge", &options.challenge)?,
        allow_credentials: PublicKeyCredentialDescriptor::from_json_list(
            "allowCredentials[].id",
            options.allow_credentials.as_deref(),
        )?,
        extra: options.extra.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn creation_options() -> PublicKeyCredentialCreationOptionsJson {
        serde_json::from_value(json!({
            "challenge": "AAAAAA",
            "rp": { "name": "WebAuthn Demo", "id": "try-webauthn.appspot.com" },
            "user": {
                "id": "AAAAAA",
                "name": "chromedemojp@gmail.com",
                "displayName": "Janelle Murells"
            },
            "pubKeyCredParams": [
                { "alg": -8, "type": "public-key" },
                { "alg": -7, "type": "public-key" },
                { "alg": -257, "type": "public-key" }
            ],
            "timeout": 300000,
            "attestation": "none",
            "excludeCredentials": [
                { "id": "AAAAAA", "type": "public-key", "transports": ["cable", "internal"] }
            ],
            "authenticatorSelection": {
                "authenticatorAttachment": "platform",
                "residentKey": "required",
                "userVerification": "required",
                "requireResidentKey": true
            },
            "extensions": { "credProps": true },
            "hints": []
        }))
        .unwrap()
    }

    #[test]
    fn decodes_creation_options() {
        let parsed = parse_creation_options(&creation_options()).unwrap();
        assert_eq!(parsed.challenge, vec![0, 0, 0, 0]);
        assert_eq!(parsed.user.id, vec![0, 0, 0, 0]);
        assert_eq!(parsed.user.extra.get("displayName"), Some(&json!("Janelle Murells")));
        assert_eq!(
            parsed.exclude_credentials,
            vec![PublicKeyCredentialDescriptor {
                id: vec![0, 0, 0, 0],
                kind: "public-key".into(),
                transports: Some(vec!["cable".into(), "internal".into()]),
                extra: Map::new(),
            }]
        );
        assert_eq!(parsed.extra.get("timeout"), Some(&json!(300000)));
        assert_eq!(parsed.extra.get("hints"), Some(&json!([])));
    }

    #[test]
    fn challenge_re_encodes_to_the_original_text() {
        let parsed = parse_creation_options(&creation_options()).unwrap();
        assert_eq!(codec::encode(&parsed.challenge), "AAAAAA");
    }

    #[test]
    fn missing_exclude_list_becomes_empty() {
        let mut options = creation_options();
        options.exclude_credentials = None;
        let parsed = parse_creation_options(&options).unwrap();
        assert!(parsed.exclude_credentials.is_empty());
    }

    #[test]
    fn parsing_leaves_the_input_untouched() {
        let options = creation_options();
        let before = options.clone();
        parse_creation_options(&options).unwrap();
        assert_eq!(options, before);
    }

    #[test]
    fn bad_user_id_names_the_field() {
        let mut options = creation_options();
        options.user.id = "A".into();
        assert!(matches!(
            parse_creation_options(&options),
            Err(SerializationError::Decode { field: "user.id", .. })
        ));
    }

    #[test]
    fn decodes_request_options() {
        let options: PublicKeyCredentialRequestOptionsJson = serde_json::from_value(json!({
            "challenge": "AAAAAA",
            "rpId": "try-webauthn.appspot.com",
            "timeout": 300000,
            "allowCredentials": [
                { "id": "AAAAAA", "type": "public-key", "transports": ["cable", "internal"] }
            ],
            "userVerification": "required"
        }))
        .unwrap();

        let parsed = parse_request_options(&options).unwrap();
        assert_eq!(parsed.challenge, vec![0, 0, 0, 0]);
        assert_eq!(parsed.allow_credentials.len(), 1);
        assert_eq!(parsed.allow_credentials[0].id, vec![0, 0, 0, 0]);
        assert_eq!(
            parsed.allow_credentials[0].transports,
            Some(vec!["cable".into(), "internal".into()])
        );
        assert_eq!(parsed.extra.get("rpId"), Some(&json!("try-webauthn.appspot.com")));
        assert_eq!(parsed.extra.get("allowCredentials"), None);
    }

    #[test]
    fn missing_allow_list_becomes_empty() {
        let options: PublicKeyCredentialRequestOptionsJson =
            serde_json::from_value(json!({ "challenge": "AQID" })).unwrap();
        let parsed = parse_request_options(&options).unwrap();
        assert_eq!(parsed.challenge, vec![1, 2, 3]);
        assert!(parsed.allow_credentials.is_empty());
    }

    #[test]
    fn bad_allowed_id_is_an_error() {
        let options: PublicKeyCredentialRequestOptionsJson = serde_json::from_value(json!({
            "challenge": "AQID",
            "allowCredentials": [{ "id": "!!", "type": "public-key" }]
        }))
        .unwrap();
        assert!(matches!(
            parse_request_options(&options),
            Err(SerializationError::Decode {
                field: "allowCredentials[].id",
                ..
            })
        ));
    }
}
