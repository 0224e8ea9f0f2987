//! Test doubles for the host and the user-agent parser.
//!
//! ```
//! use webauthn_polyfill::helpers::StaticHost;
//! use webauthn_polyfill::{CredentialHost, Primitive};
//!
//! let host = StaticHost::new()
//!     .with_conditional_mediation(Ok(true))
//!     .with_member(Primitive::SignalUnknownCredential);
//!
//! assert!(host.defines(Primitive::IsConditionalMediationAvailable));
//! assert!(!host.defines(Primitive::GetClientCapabilities));
//! ```

use crate::{
    environment::{ParsedComponent, ParsedUserAgent, UserAgentParser},
    host::{CredentialHost, HostError, NativeCapabilities, Primitive},
    sync::ConditionalSend,
};
use serde_json::Value;
use std::{
    collections::BTreeSet,
    future::Future,
    sync::{Arc, Mutex},
};

/// A [`CredentialHost`] with fixed members and canned results.
///
/// Clones share a call log.
#[derive(Debug, Clone, Default)]
pub struct StaticHost {
    members: BTreeSet<Primitive>,
    client_capabilities: Option<Result<NativeCapabilities, HostError>>,
    user_verifying_platform_authenticator: Option<Result<bool, HostError>>,
    conditional_mediation: Option<Result<bool, HostError>>,
    calls: Arc<Mutex<Vec<Primitive>>>,
}

impl StaticHost {
    /// A host on which nothing is defined.
    pub fn new() -> Self {
        Self::default()
    }

    /// Define `getClientCapabilities()` returning `result`. A JSON value that
    /// is not an object resolves to [`HostError::UnexpectedValue`].
    pub fn with_client_capabilities(mut self, result: Result<Value, HostError>) -> Self {
        let result = result.and_then(|value| match value {
            Value::Object(map) => Ok(map),
            other => Err(HostError::UnexpectedValue {
                primitive: Primitive::GetClientCapabilities,
                message: other.to_string(),
            }),
        });
        self.client_capabilities = Some(result);
        self
    }

    /// Define `isUserVerifyingPlatformAuthenticatorAvailable()`.
    pub fn with_user_verifying_platform_authenticator(
        mut self,
        result: Result<bool, HostError>,
    ) -> Self {
        self.user_verifying_platform_authenticator = Some(result);
        self
    }

    /// Define `isConditionalMediationAvailable()`.
    pub fn with_conditional_mediation(mut self, result: Result<bool, HostError>) -> Self {
        self.conditional_mediation = Some(result);
        self
    }

    /// Define a member that is only ever checked for presence.
    pub fn with_member(mut self, primitive: Primitive) -> Self {
        self.members.insert(primitive);
        self
    }

    /// Every primitive invoked so far, in order.
    pub fn calls(&self) -> Vec<Primitive> {
        self.calls.lock().expect("lock poisoned").clone()
    }

    fn call<T: Clone>(
        &self,
        primitive: Primitive,
        canned: &Option<Result<T, HostError>>,
    ) -> Result<T, HostError> {
        self.calls.lock().expect("lock poisoned").push(primitive);
        canned
            .clone()
            .unwrap_or(Err(HostError::Undefined(primitive)))
    }
}

impl CredentialHost for StaticHost {
    fn defines(&self, primitive: Primitive) -> bool {
        match primitive {
            Primitive::GetClientCapabilities => self.client_capabilities.is_some(),
            Primitive::IsUserVerifyingPlatformAuthenticatorAvailable => {
                self.user_verifying_platform_authenticator.is_some()
            }
            Primitive::IsConditionalMediationAvailable => self.conditional_mediation.is_some(),
            other => self.members.contains(&other),
        }
    }

    fn get_client_capabilities(
        &self,
    ) -> impl Future<Output = Result<NativeCapabilities, HostError>> + ConditionalSend {
        let result = self.call(Primitive::GetClientCapabilities, &self.client_capabilities);
        async move { result }
    }

    fn is_user_verifying_platform_authenticator_available(
        &self,
    ) -> impl Future<Output = Result<bool, HostError>> + ConditionalSend {
        let result = self.call(
            Primitive::IsUserVerifyingPlatformAuthenticatorAvailable,
            &self.user_verifying_platform_authenticator,
        );
        async move { result }
    }

    fn is_conditional_mediation_available(
        &self,
    ) -> impl Future<Output = Result<bool, HostError>> + ConditionalSend {
        let result = self.call(
            Primitive::IsConditionalMediationAvailable,
            &self.conditional_mediation,
        );
        async move { result }
    }
}

/// A [`UserAgentParser`] that ignores its input and returns fixed output.
#[derive(Debug, Clone, Default)]
pub struct StaticParser(pub ParsedUserAgent);

impl StaticParser {
    /// A parser reporting the given `(name, version)` triples.
    pub fn new(engine: (&str, &str), os: (&str, &str), browser: (&str, &str)) -> Self {
        Self(ParsedUserAgent {
            engine: ParsedComponent::new(engine.0, engine.1),
            os: ParsedComponent::new(os.0, os.1),
            browser: ParsedComponent::new(browser.0, browser.1),
        })
    }

    /// Safari 17.5 on iOS 17.5.
    pub fn ios_17_5_safari() -> Self {
        Self::new(
            ("WebKit", "605.1.15"),
            ("iOS", "17.5"),
            ("Mobile Safari", "17.5"),
        )
    }

    /// Safari 17.5 on macOS 14.
    pub fn mac_safari_17_5() -> Self {
        Self::new(("WebKit", "605.1.15"), ("Mac OS", "14.0"), ("Safari", "17.5"))
    }

    /// Chrome with the given version on macOS 10.15.7.
    pub fn mac_chrome(version: &str) -> Self {
        Self::new(("Blink", version), ("Mac OS", "10.15.7"), ("Chrome", version))
    }

    /// Chrome with the given version on X11 Linux, which reports its
    /// architecture as the OS version.
    pub fn linux_chrome(version: &str) -> Self {
        Self::new(("Blink", version), ("Linux", "x86_64"), ("Chrome", version))
    }
}

impl UserAgentParser for StaticParser {
    fn parse(&self, _user_agent: Option<&str>) -> ParsedUserAgent {
        self.0.clone()
    }
}
