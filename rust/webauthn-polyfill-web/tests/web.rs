//! Browser tests for the installed members.
//!
//! Each test installs onto a fresh stand-in for `PublicKeyCredential` built
//! with `js-sys`, so the page's own class is never modified.
//!
//! ```sh
//! wasm-pack test --headless --chrome rust/webauthn-polyfill-web
//! ```

#![cfg(all(target_arch = "wasm32", target_os = "unknown"))]

use js_sys::{Function, JSON, Object, Promise, Reflect, Uint8Array};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wasm_bindgen::{JsCast, prelude::*};
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use webauthn_polyfill::{
    CredentialHost, PolyfillConfig, Primitive,
    environment::{ParsedComponent, ParsedUserAgent, UserAgentParser},
    helpers::StaticParser,
};
use webauthn_polyfill_web::{
    JsCredentialHost, JsUserAgentParser, PolyfillError, install, read_config,
};

wasm_bindgen_test_configure!(run_in_dedicated_worker);

fn to_json(value: &JsValue) -> Value {
    let text = JSON::stringify(value).unwrap().as_string().unwrap();
    serde_json::from_str(&text).unwrap()
}

fn from_json(value: Value) -> JsValue {
    JSON::parse(&value.to_string()).unwrap()
}

fn bytes(value: &JsValue) -> Vec<u8> {
    Uint8Array::new(value).to_vec()
}

fn get(target: &JsValue, key: &str) -> JsValue {
    Reflect::get(target, &JsValue::from_str(key)).unwrap()
}

fn set(target: &JsValue, key: &str, value: &JsValue) {
    Reflect::set(target, &JsValue::from_str(key), value).unwrap();
}

fn method(target: &JsValue, key: &str) -> Function {
    get(target, key).dyn_into().unwrap()
}

/// A class with an empty prototype and nothing else.
fn empty_class() -> JsValue {
    let class: JsValue = Object::new().into();
    set(&class, "prototype", &Object::new());
    class
}

/// A static method that resolves to `value`.
fn resolving(value: JsValue) -> JsValue {
    let closure: Closure<dyn Fn() -> Promise> = Closure::new(move || Promise::resolve(&value));
    closure.into_js_value()
}

async fn call_async(class: &JsValue, key: &str) -> Value {
    let promise: Promise = method(class, key).call0(class).unwrap().dyn_into().unwrap();
    to_json(&JsFuture::from(promise).await.unwrap())
}

#[wasm_bindgen_test]
fn config_accepts_nothing_a_string_or_an_object() {
    assert_eq!(
        read_config(&JsValue::UNDEFINED).unwrap(),
        PolyfillConfig::default()
    );
    assert_eq!(
        read_config(&JsValue::from_str("Mozilla/5.0")).unwrap(),
        PolyfillConfig::for_user_agent("Mozilla/5.0")
    );
    assert_eq!(
        read_config(&from_json(json!({ "capabilities": false }))).unwrap(),
        PolyfillConfig {
            capabilities: false,
            ..Default::default()
        }
    );
    assert!(matches!(
        read_config(&JsValue::from_f64(1.0)),
        Err(PolyfillError::InvalidConfig(_))
    ));
}

#[wasm_bindgen_test]
fn ua_parser_result_is_read() {
    let constructor = Function::new_with_args(
        "ua",
        r#"return { getResult: function () { return {
            browser: { name: "Mobile Safari", version: "17.5" },
            engine: { name: "WebKit", version: "605.1.15" },
            os: { name: "iOS", version: ua === undefined ? "17.5" : "0" }
        }; } };"#,
    );
    let parser = JsUserAgentParser::new(constructor);

    assert_eq!(
        parser.parse(None),
        ParsedUserAgent {
            engine: ParsedComponent::new("WebKit", "605.1.15"),
            os: ParsedComponent::new("iOS", "17.5"),
            browser: ParsedComponent::new("Mobile Safari", "17.5"),
        }
    );
    assert_eq!(parser.parse(Some("custom")).os.version.as_deref(), Some("0"));
}

#[wasm_bindgen_test]
fn missing_ua_parser_parses_to_nothing() {
    assert_eq!(
        JsUserAgentParser::default().parse(Some("Mozilla/5.0")),
        ParsedUserAgent::default()
    );
}

#[wasm_bindgen_test]
async fn missing_members_are_installed() {
    let class = empty_class();
    let polyfill = install(
        &class,
        &StaticParser::mac_chrome("133.0.0.0"),
        &PolyfillConfig::default(),
    )
    .unwrap()
    .unwrap();

    assert_eq!(polyfill.plan.targets().count(), 4);
    for primitive in [
        Primitive::GetClientCapabilities,
        Primitive::ParseCreationOptionsFromJson,
        Primitive::ParseRequestOptionsFromJson,
    ] {
        assert!(get(&class, primitive.property()).is_function());
    }
    assert!(get(&get(&class, "prototype"), "toJSON").is_function());

    assert_eq!(
        call_async(&class, "getClientCapabilities").await,
        json!({
            "conditionalCreate": false,
            "relatedOrigins": true,
            "signalAllAcceptedCredentials": false,
            "signalCurrentUserDetails": false,
            "signalUnknownCredential": false,
        })
    );
}

#[wasm_bindgen_test]
async fn glitched_capabilities_are_renamed() {
    let class = empty_class();
    set(
        &class,
        "getClientCapabilities",
        &resolving(from_json(json!({
            "conditionalMediation": true,
            "hybridTransport": false,
        }))),
    );

    install(
        &class,
        &StaticParser::ios_17_5_safari(),
        &PolyfillConfig::default(),
    )
    .unwrap();

    assert_eq!(
        call_async(&class, "getClientCapabilities").await,
        json!({ "conditionalGet": true, "hybridTransport": false })
    );
}

#[wasm_bindgen_test]
async fn probes_feed_synthesized_capabilities() {
    let class = empty_class();
    set(
        &class,
        "isConditionalMediationAvailable",
        &resolving(JsValue::TRUE),
    );
    set(
        &class,
        "isUserVerifyingPlatformAuthenticatorAvailable",
        &resolving(JsValue::from_str("not a boolean")),
    );

    install(
        &class,
        &StaticParser::mac_chrome("135.0"),
        &PolyfillConfig::default(),
    )
    .unwrap();

    let report = call_async(&class, "getClientCapabilities").await;
    assert_eq!(report["conditionalGet"], json!(true));
    assert_eq!(report["conditionalCreate"], json!(true));
    assert_eq!(report.get("userVerifyingPlatformAuthenticator"), None);
}

#[wasm_bindgen_test]
fn compliant_native_members_are_kept() {
    let class = empty_class();
    let native = resolving(from_json(json!({ "conditionalGet": true })));
    set(&class, "getClientCapabilities", &native);

    let polyfill = install(
        &class,
        &StaticParser::mac_chrome("133.0.0.0"),
        &PolyfillConfig::default(),
    )
    .unwrap()
    .unwrap();

    assert!(!polyfill.plan.client_capabilities);
    assert_eq!(get(&class, "getClientCapabilities"), native);
}

#[wasm_bindgen_test]
fn installing_twice_leaves_the_class_alone() {
    let class = empty_class();
    let parser = StaticParser::mac_chrome("120.0");
    let config = PolyfillConfig::default();

    assert!(install(&class, &parser, &config).unwrap().is_some());
    let installed = get(&class, "parseRequestOptionsFromJSON");

    assert!(install(&class, &parser, &config).unwrap().is_none());
    assert_eq!(get(&class, "parseRequestOptionsFromJSON"), installed);
}

#[wasm_bindgen_test]
fn creation_options_are_decoded() {
    let class = empty_class();
    install(
        &class,
        &StaticParser::mac_chrome("120.0"),
        &PolyfillConfig {
            capabilities: false,
            ..Default::default()
        },
    )
    .unwrap();

    let options = from_json(json!({
        "challenge": "AAEC",
        "rp": { "name": "Example", "id": "example.com" },
        "user": { "id": "AQI", "name": "user@example.com", "displayName": "User" },
        "pubKeyCredParams": [{ "type": "public-key", "alg": -7 }],
        "excludeCredentials": [{ "id": "-_8", "type": "public-key", "transports": ["internal"] }],
    }));
    let parsed = method(&class, "parseCreationOptionsFromJSON")
        .call1(&class, &options)
        .unwrap();

    assert_eq!(bytes(&get(&parsed, "challenge")), vec![0, 1, 2]);
    assert_eq!(bytes(&get(&get(&parsed, "user"), "id")), vec![1, 2]);
    assert_eq!(
        to_json(&get(&parsed, "rp")),
        json!({ "name": "Example", "id": "example.com" })
    );
    let excluded = get(&get(&parsed, "excludeCredentials"), "0");
    assert_eq!(bytes(&get(&excluded, "id")), vec![0xfb, 0xff]);
    assert_eq!(to_json(&get(&excluded, "transports")), json!(["internal"]));
}

#[wasm_bindgen_test]
fn malformed_request_options_throw() {
    let class = empty_class();
    install(
        &class,
        &StaticParser::mac_chrome("120.0"),
        &PolyfillConfig::default(),
    )
    .unwrap();

    let error = method(&class, "parseRequestOptionsFromJSON")
        .call1(&class, &from_json(json!({ "challenge": "a" })))
        .unwrap_err();
    let message: String = error.unchecked_into::<js_sys::Error>().message().into();
    assert!(message.contains("challenge"));
}

#[wasm_bindgen_test]
fn assertion_serializes_through_to_json() {
    let class = empty_class();
    install(
        &class,
        &StaticParser::mac_chrome("120.0"),
        &PolyfillConfig::default(),
    )
    .unwrap();

    let credential: JsValue = Object::create(get(&class, "prototype").unchecked_ref()).into();
    set(&credential, "id", &JsValue::from_str("AAAA"));
    set(&credential, "rawId", &Uint8Array::from(&[0u8, 0, 0][..]).buffer());
    set(&credential, "type", &JsValue::from_str("public-key"));
    set(&credential, "authenticatorAttachment", &JsValue::NULL);

    let response: JsValue = Object::new().into();
    set(&response, "clientDataJSON", &Uint8Array::from(&b"{}"[..]).buffer());
    set(&response, "authenticatorData", &Uint8Array::from(&[1u8, 2, 3][..]).buffer());
    set(&response, "signature", &Uint8Array::from(&[4u8, 5][..]).buffer());
    set(&response, "userHandle", &JsValue::NULL);
    set(&credential, "response", &response);

    let json = method(&credential, "toJSON").call0(&credential).unwrap();

    assert_eq!(
        to_json(&json),
        json!({
            "id": "AAAA",
            "rawId": "AAAA",
            "response": {
                "clientDataJSON": "e30",
                "authenticatorData": "AQID",
                "signature": "BAU",
            },
            "clientExtensionResults": {},
            "type": "public-key",
        })
    );
}

#[wasm_bindgen_test]
async fn capabilities_defined_after_the_host_are_seen() {
    let class = empty_class();
    let host = JsCredentialHost::new(class.clone());
    assert!(!host.defines(Primitive::GetClientCapabilities));

    set(
        &class,
        "getClientCapabilities",
        &resolving(from_json(json!({ "conditionalGet": true }))),
    );

    assert!(host.defines(Primitive::GetClientCapabilities));
    let native = host.get_client_capabilities().await.unwrap();
    assert_eq!(Value::Object(native), json!({ "conditionalGet": true }));
}

#[wasm_bindgen_test]
fn installed_capabilities_are_not_mistaken_for_native() {
    let class = empty_class();
    install(
        &class,
        &StaticParser::mac_chrome("133.0.0.0"),
        &PolyfillConfig::default(),
    )
    .unwrap()
    .unwrap();

    assert!(get(&class, "getClientCapabilities").is_function());
    let host = JsCredentialHost::new(class);
    assert!(!host.defines(Primitive::GetClientCapabilities));
}
