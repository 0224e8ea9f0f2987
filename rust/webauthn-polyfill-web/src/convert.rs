//! Conversions between JavaScript objects and the serializer's types.
//!
//! Byte members become `ArrayBuffer`s on the way in and are read from any
//! `BufferSource` on the way out. Every other member crosses as JSON.

use crate::{
    PolyfillError,
    js::{self, array_buffer, js_get, js_set, optional_bytes},
};
use js_sys::{Array, Object};
use wasm_bindgen::JsValue;
use webauthn_polyfill::serialization::{
    self, PublicKeyCredentialCreationOptions, PublicKeyCredentialCreationOptionsJson,
    PublicKeyCredentialDescriptor, PublicKeyCredentialRequestOptions,
    PublicKeyCredentialRequestOptionsJson, RawAuthenticatorResponse, RawCredential,
};

/// `parseCreationOptionsFromJSON(options)` on JavaScript values.
pub fn parse_creation_options(options: &JsValue) -> Result<Object, PolyfillError> {
    let options: PublicKeyCredentialCreationOptionsJson = js::from_js(options)?;
    creation_options_to_js(&serialization::parse_creation_options(&options)?)
}

/// `parseRequestOptionsFromJSON(options)` on JavaScript values.
pub fn parse_request_options(options: &JsValue) -> Result<Object, PolyfillError> {
    let options: PublicKeyCredentialRequestOptionsJson = js::from_js(options)?;
    request_options_to_js(&serialization::parse_request_options(&options)?)
}

/// `credential.toJSON()` on a JavaScript credential.
///
/// `clientExtensionResults` is taken verbatim from
/// `getClientExtensionResults()` when the credential has that method.
pub fn credential_to_json(credential: &JsValue) -> Result<Object, PolyfillError> {
    let json = serialization::to_json(read_credential(credential)?)?;
    let object = js::to_js_object(&json)?;
    if let Some(results) = js::call_method(credential, "getClientExtensionResults")? {
        js_set(&object, "clientExtensionResults", &results)?;
    }
    Ok(object)
}

/// Read the members of a `PublicKeyCredential` the serializer needs.
pub fn read_credential(credential: &JsValue) -> Result<RawCredential, PolyfillError> {
    let response = js_get(credential, "response")?;
    let transports = js::call_method(&response, "getTransports")?.map(|value| js::strings(&value));

    Ok(RawCredential {
        id: js_get(credential, "id")?.as_string().unwrap_or_default(),
        raw_id: optional_bytes(credential, "rawId")?.unwrap_or_default(),
        kind: js_get(credential, "type")?
            .as_string()
            .unwrap_or_else(|| "public-key".into()),
        authenticator_attachment: js_get(credential, "authenticatorAttachment")?.as_string(),
        client_extension_results: None,
        response: RawAuthenticatorResponse {
            client_data_json: optional_bytes(&response, "clientDataJSON")?,
            attestation_object: optional_bytes(&response, "attestationObject")?,
            authenticator_data: optional_bytes(&response, "authenticatorData")?,
            signature: optional_bytes(&response, "signature")?,
            user_handle: optional_bytes(&response, "userHandle")?,
            transports,
        },
    })
}

fn creation_options_to_js(
    options: &PublicKeyCredentialCreationOptions,
) -> Result<Object, PolyfillError> {
    let object = js::to_js_object(&options.extra)?;
    js_set(&object, "challenge", &array_buffer(&options.challenge))?;

    let user = js::to_js_object(&options.user.extra)?;
    js_set(&user, "id", &array_buffer(&options.user.id))?;
    js_set(&object, "user", &user)?;

    js_set(
        &object,
        "excludeCredentials",
        &descriptors_to_js(&options.exclude_credentials)?,
    )?;
    Ok(object)
}

fn request_options_to_js(
    options: &PublicKeyCredentialRequestOptions,
) -> Result<Object, PolyfillError> {
    let object = js::to_js_object(&options.extra)?;
    js_set(&object, "challenge", &array_buffer(&options.challenge))?;
    js_set(
        &object,
        "allowCredentials",
        &descriptors_to_js(&options.allow_credentials)?,
    )?;
    Ok(object)
}

fn descriptors_to_js(descriptors: &[PublicKeyCredentialDescriptor]) -> Result<Array, PolyfillError> {
    let array = Array::new();
    for descriptor in descriptors {
        let object = js::to_js_object(&descriptor.extra)?;
        js_set(&object, "id", &array_buffer(&descriptor.id))?;
        js_set(&object, "type", &JsValue::from_str(&descriptor.kind))?;
        if let Some(transports) = &descriptor.transports {
            js_set(&object, "transports", &js::to_js(transports)?)?;
        }
        array.push(&object);
    }
    Ok(array)
}
