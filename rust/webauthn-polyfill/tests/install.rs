//! Install planning: which `PublicKeyCredential` members get replaced.

use webauthn_polyfill::{
    InstallPlan, Polyfill, PolyfillConfig, Predicates, Primitive,
    environment::{ParsedComponent, ParsedUserAgent},
    helpers::{StaticHost, StaticParser},
};

fn chrome_with_native_capabilities() -> StaticHost {
    StaticHost::new()
        .with_client_capabilities(Ok(serde_json::json!({ "conditionalGet": true })))
        .with_member(Primitive::ParseCreationOptionsFromJson)
        .with_member(Primitive::ParseRequestOptionsFromJson)
        .with_member(Primitive::ToJson)
}

#[test]
fn compliant_native_capabilities_are_never_replaced() {
    let polyfill = Polyfill::prepare(
        &chrome_with_native_capabilities(),
        &StaticParser::mac_chrome("133.0.0.0"),
        &PolyfillConfig::default(),
    );
    assert!(polyfill.predicates.is_some());
    assert!(polyfill.plan.is_empty());
}

#[test]
fn glitched_native_capabilities_are_replaced() {
    let host = StaticHost::new().with_client_capabilities(Ok(serde_json::json!({})));
    let polyfill = Polyfill::prepare(
        &host,
        &StaticParser::ios_17_5_safari(),
        &PolyfillConfig::default(),
    );
    assert!(polyfill.plan.client_capabilities);
}

#[test]
fn missing_members_are_all_installed() {
    let polyfill = Polyfill::prepare(
        &StaticHost::new(),
        &StaticParser::mac_chrome("120.0"),
        &PolyfillConfig::default(),
    );
    assert_eq!(
        polyfill.plan.targets().collect::<Vec<_>>(),
        vec![
            Primitive::GetClientCapabilities,
            Primitive::ParseCreationOptionsFromJson,
            Primitive::ParseRequestOptionsFromJson,
            Primitive::ToJson,
        ]
    );
}

#[test]
fn linux_chrome_without_native_capabilities_is_polyfilled() {
    let polyfill = Polyfill::prepare(
        &StaticHost::new(),
        &StaticParser::linux_chrome("133.0.0.0"),
        &PolyfillConfig::default(),
    );

    let predicates = polyfill.predicates.expect("Linux Chrome is classified");
    assert!(predicates.desktop_blink_128_or_later);
    assert!(predicates.supports_related_origins());
    assert!(polyfill.plan.client_capabilities);
}

#[test]
fn unclassified_environment_still_installs_serialization() {
    let parser = StaticParser(ParsedUserAgent {
        engine: ParsedComponent::new("Blink", "128.0"),
        os: ParsedComponent {
            name: Some("Linux".into()),
            version: None,
        },
        browser: ParsedComponent::new("Chrome", "128.0"),
    });
    let polyfill = Polyfill::prepare(&StaticHost::new(), &parser, &PolyfillConfig::default());

    assert_eq!(polyfill.predicates, None);
    assert!(!polyfill.plan.client_capabilities);
    assert!(polyfill.plan.parse_creation_options);
    assert!(polyfill.plan.parse_request_options);
    assert!(polyfill.plan.to_json);
}

#[test]
fn config_can_disable_either_half() {
    let host = StaticHost::new();
    let predicates = Predicates::detect(&StaticParser::ios_17_5_safari(), None).unwrap();

    let capabilities_only = PolyfillConfig {
        serialization: false,
        ..Default::default()
    };
    assert_eq!(
        InstallPlan::new(&host, Some(&predicates), &capabilities_only),
        InstallPlan {
            client_capabilities: true,
            ..Default::default()
        }
    );

    let serialization_only = PolyfillConfig {
        capabilities: false,
        ..Default::default()
    };
    let plan = InstallPlan::new(&host, Some(&predicates), &serialization_only);
    assert!(!plan.client_capabilities);
    assert!(plan.to_json);
}

#[test]
fn existing_serializer_members_are_kept() {
    let host = StaticHost::new().with_member(Primitive::ToJson);
    let plan = InstallPlan::new(&host, None, &PolyfillConfig::default());
    assert!(!plan.to_json);
    assert!(plan.parse_creation_options);
}

#[test]
fn preparing_twice_is_stable() {
    let host = StaticHost::new();
    let parser = StaticParser::mac_safari_17_5();
    let config = PolyfillConfig::for_user_agent("ignored by the static parser");
    assert_eq!(
        Polyfill::prepare(&host, &parser, &config),
        Polyfill::prepare(&host, &parser, &config)
    );
}
