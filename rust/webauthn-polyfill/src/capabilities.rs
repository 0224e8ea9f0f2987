//! `getClientCapabilities()` resolution.
//!
//! A [`CapabilityResolver`] produces the [`CapabilityReport`] for the current
//! environment. In a glitch window the native report is forwarded with
//! `conditionalMediation` renamed to `conditionalGet`. Otherwise the report is
//! synthesized from lower-level primitives and the environment predicates,
//! with any native report taking precedence over the synthesized fields.

use crate::{
    classifier::Predicates,
    host::{CredentialHost, HostError, NativeCapabilities, Primitive},
};
use futures_util::join;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::future::Future;

/// The pre-final name Safari 17.4 to 18.1 used for `conditionalGet`.
pub const CONDITIONAL_MEDIATION: &str = "conditionalMediation";

const CONDITIONAL_CREATE: &str = "conditionalCreate";
const CONDITIONAL_GET: &str = "conditionalGet";
const HYBRID_TRANSPORT: &str = "hybridTransport";
const PASSKEY_PLATFORM_AUTHENTICATOR: &str = "passkeyPlatformAuthenticator";
const RELATED_ORIGINS: &str = "relatedOrigins";
const SIGNAL_ALL_ACCEPTED_CREDENTIALS: &str = "signalAllAcceptedCredentials";
const SIGNAL_CURRENT_USER_DETAILS: &str = "signalCurrentUserDetails";
const SIGNAL_UNKNOWN_CREDENTIAL: &str = "signalUnknownCredential";
const USER_VERIFYING_PLATFORM_AUTHENTICATOR: &str = "userVerifyingPlatformAuthenticator";

/// The result of `getClientCapabilities()`.
///
/// `None` means unknown, not `false`. Unset fields are omitted from the
/// serialized form. `hybridTransport` and `passkeyPlatformAuthenticator` are
/// never synthesized, since they depend on radio hardware the polyfill cannot
/// observe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityReport {
    /// Conditional (automatic passkey upgrade) creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_create: Option<bool>,
    /// Conditional mediation (autofill UI) for `get()`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_get: Option<bool>,
    /// Cross-device authentication over the hybrid transport.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hybrid_transport: Option<bool>,
    /// A platform authenticator usable as a passkey provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passkey_platform_authenticator: Option<bool>,
    /// Related origin requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_origins: Option<bool>,
    /// `signalAllAcceptedCredentials()` is available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal_all_accepted_credentials: Option<bool>,
    /// `signalCurrentUserDetails()` is available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal_current_user_details: Option<bool>,
    /// `signalUnknownCredential()` is available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal_unknown_credential: Option<bool>,
    /// A user-verifying platform authenticator is available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_verifying_platform_authenticator: Option<bool>,
    /// Any other capability the host reported, such as `extension:prf`.
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl CapabilityReport {
    /// Map a native report onto the standard field names.
    ///
    /// `conditionalMediation` is read as `conditionalGet` and dropped. A known
    /// field holding something other than a boolean stays unset and its value
    /// is forwarded in [`extensions`](Self::extensions) under the same key.
    /// Everything else is forwarded untouched.
    pub fn from_native(mut native: NativeCapabilities) -> Self {
        let mut forwarded = Map::new();
        let mut take = |key: &str| match native.remove(key)? {
            Value::Bool(value) => Some(value),
            other => {
                forwarded.insert(key.to_owned(), other);
                None
            }
        };

        let conditional_mediation = take(CONDITIONAL_MEDIATION);
        let conditional_get = take(CONDITIONAL_GET).or(conditional_mediation);

        let mut report = Self {
            conditional_create: take(CONDITIONAL_CREATE),
            conditional_get,
            hybrid_transport: take(HYBRID_TRANSPORT),
            passkey_platform_authenticator: take(PASSKEY_PLATFORM_AUTHENTICATOR),
            related_origins: take(RELATED_ORIGINS),
            signal_all_accepted_credentials: take(SIGNAL_ALL_ACCEPTED_CREDENTIALS),
            signal_current_user_details: take(SIGNAL_CURRENT_USER_DETAILS),
            signal_unknown_credential: take(SIGNAL_UNKNOWN_CREDENTIAL),
            user_verifying_platform_authenticator: take(USER_VERIFYING_PLATFORM_AUTHENTICATOR),
            extensions: Map::new(),
        };

        if let Some(value) = forwarded.remove(CONDITIONAL_MEDIATION) {
            if report.conditional_get.is_none() && !forwarded.contains_key(CONDITIONAL_GET) {
                forwarded.insert(CONDITIONAL_GET.to_owned(), value);
            }
        }

        native.extend(forwarded);
        report.extensions = native;
        report
    }

    fn known_fields(&self) -> [(&'static str, Option<bool>); 9] {
        [
            (CONDITIONAL_CREATE, self.conditional_create),
            (CONDITIONAL_GET, self.conditional_get),
            (HYBRID_TRANSPORT, self.hybrid_transport),
            (PASSKEY_PLATFORM_AUTHENTICATOR, self.passkey_platform_authenticator),
            (RELATED_ORIGINS, self.related_origins),
            (SIGNAL_ALL_ACCEPTED_CREDENTIALS, self.signal_all_accepted_credentials),
            (SIGNAL_CURRENT_USER_DETAILS, self.signal_current_user_details),
            (SIGNAL_UNKNOWN_CREDENTIAL, self.signal_unknown_credential),
            (
                USER_VERIFYING_PLATFORM_AUTHENTICATOR,
                self.user_verifying_platform_authenticator,
            ),
        ]
    }

    /// Fill every unset field of `self` from `fallback`.
    ///
    /// A forwarded non-boolean value is dropped once its field is filled.
    pub fn or(self, fallback: CapabilityReport) -> Self {
        let mut extensions = fallback.extensions;
        extensions.extend(self.extensions);

        let mut merged = Self {
            conditional_create: self.conditional_create.or(fallback.conditional_create),
            conditional_get: self.conditional_get.or(fallback.conditional_get),
            hybrid_transport: self.hybrid_transport.or(fallback.hybrid_transport),
            passkey_platform_authenticator: self
                .passkey_platform_authenticator
                .or(fallback.passkey_platform_authenticator),
            related_origins: self.related_origins.or(fallback.related_origins),
            signal_all_accepted_credentials: self
                .signal_all_accepted_credentials
                .or(fallback.signal_all_accepted_credentials),
            signal_current_user_details: self
                .signal_current_user_details
                .or(fallback.signal_current_user_details),
            signal_unknown_credential: self
                .signal_unknown_credential
                .or(fallback.signal_unknown_credential),
            user_verifying_platform_authenticator: self
                .user_verifying_platform_authenticator
                .or(fallback.user_verifying_platform_authenticator),
            extensions,
        };

        for (key, value) in merged.known_fields() {
            if value.is_some() {
                merged.extensions.remove(key);
            }
        }
        merged
    }

    /// The report as a JSON object.
    pub fn to_value(&self) -> Value {
        // A struct of options and a string-keyed map always serializes.
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }
}

/// Computes the [`CapabilityReport`] for one environment.
///
/// Holds no state between calls: every [`CapabilityResolver::resolve`]
/// re-reads the host.
#[derive(Debug, Clone)]
pub struct CapabilityResolver<H> {
    host: H,
    predicates: Predicates,
}

impl<H> CapabilityResolver<H>
where
    H: CredentialHost,
{
    /// Create a resolver for `host` in the environment described by
    /// `predicates`.
    pub fn new(host: H, predicates: Predicates) -> Self {
        Self { host, predicates }
    }

    /// The host this resolver reads from.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The environment predicates this resolver decides with.
    pub fn predicates(&self) -> &Predicates {
        &self.predicates
    }

    /// Resolve the capability report. Never fails: a primitive that is absent
    /// or errors leaves its field at the documented fallback.
    pub async fn resolve(&self) -> CapabilityReport {
        if !self.host.defines(Primitive::GetClientCapabilities) {
            return self.synthesize().await;
        }

        if self.predicates.in_glitch_window() {
            return match self.host.get_client_capabilities().await {
                Ok(native) => {
                    tracing::debug!("forwarding native capabilities with conditionalGet renamed");
                    CapabilityReport::from_native(native)
                }
                Err(error) => {
                    tracing::warn!(%error, "native capability call failed, synthesizing");
                    self.synthesize().await
                }
            };
        }

        let (native, synthesized) = join!(self.host.get_client_capabilities(), self.synthesize());
        match native {
            Ok(native) => CapabilityReport::from_native(native).or(synthesized),
            Err(error) => {
                tracing::warn!(%error, "native capability call failed, synthesizing");
                synthesized
            }
        }
    }

    /// Build a report purely from lower-level primitives and predicates.
    pub async fn synthesize(&self) -> CapabilityReport {
        let (user_verifying_platform_authenticator, conditional_get) = join!(
            self.probe(
                Primitive::IsUserVerifyingPlatformAuthenticatorAvailable,
                || self.host.is_user_verifying_platform_authenticator_available(),
            ),
            self.probe(Primitive::IsConditionalMediationAvailable, || {
                self.host.is_conditional_mediation_available()
            }),
        );

        CapabilityReport {
            conditional_create: Some(self.predicates.supports_conditional_create()),
            conditional_get,
            hybrid_transport: None,
            passkey_platform_authenticator: None,
            related_origins: Some(self.predicates.supports_related_origins()),
            signal_all_accepted_credentials: Some(
                self.host.defines(Primitive::SignalAllAcceptedCredentials),
            ),
            signal_current_user_details: Some(
                self.host.defines(Primitive::SignalCurrentUserDetails),
            ),
            signal_unknown_credential: Some(self.host.defines(Primitive::SignalUnknownCredential)),
            user_verifying_platform_authenticator,
            extensions: Map::new(),
        }
    }

    async fn probe<C, F>(&self, primitive: Primitive, call: C) -> Option<bool>
    where
        C: FnOnce() -> F,
        F: Future<Output = Result<bool, HostError>>,
    {
        if !self.host.defines(primitive) {
            return None;
        }
        match call().await {
            Ok(available) => Some(available),
            Err(error) => {
                tracing::warn!(%primitive, %error, "capability probe failed");
                None
            }
        }
    }
}
