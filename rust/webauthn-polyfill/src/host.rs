//! Adapter over the host's `PublicKeyCredential` surface.
//!
//! The resolver and install planner only see the host through
//! [`CredentialHost`], so they can be driven by a JavaScript-backed adapter in
//! the browser or by a static double in tests.

use crate::sync::ConditionalSend;
use serde_json::{Map, Value};
use std::{
    fmt::{Display, Formatter},
    future::Future,
};
use thiserror::Error;

/// A named member of `PublicKeyCredential` that may or may not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Primitive {
    /// `PublicKeyCredential.getClientCapabilities()`
    GetClientCapabilities,
    /// `PublicKeyCredential.isUserVerifyingPlatformAuthenticatorAvailable()`
    IsUserVerifyingPlatformAuthenticatorAvailable,
    /// `PublicKeyCredential.isConditionalMediationAvailable()`
    IsConditionalMediationAvailable,
    /// `PublicKeyCredential.signalAllAcceptedCredentials()`
    SignalAllAcceptedCredentials,
    /// `PublicKeyCredential.signalCurrentUserDetails()`
    SignalCurrentUserDetails,
    /// `PublicKeyCredential.signalUnknownCredential()`
    SignalUnknownCredential,
    /// `PublicKeyCredential.parseCreationOptionsFromJSON()`
    ParseCreationOptionsFromJson,
    /// `PublicKeyCredential.parseRequestOptionsFromJSON()`
    ParseRequestOptionsFromJson,
    /// `PublicKeyCredential.prototype.toJSON()`
    ToJson,
}

impl Primitive {
    /// Every primitive, in declaration order.
    pub const ALL: [Primitive; 9] = [
        Primitive::GetClientCapabilities,
        Primitive::IsUserVerifyingPlatformAuthenticatorAvailable,
        Primitive::IsConditionalMediationAvailable,
        Primitive::SignalAllAcceptedCredentials,
        Primitive::SignalCurrentUserDetails,
        Primitive::SignalUnknownCredential,
        Primitive::ParseCreationOptionsFromJson,
        Primitive::ParseRequestOptionsFromJson,
        Primitive::ToJson,
    ];

    /// The JavaScript property name of this member.
    pub const fn property(&self) -> &'static str {
        match self {
            Primitive::GetClientCapabilities => "getClientCapabilities",
            Primitive::IsUserVerifyingPlatformAuthenticatorAvailable => {
                "isUserVerifyingPlatformAuthenticatorAvailable"
            }
            Primitive::IsConditionalMediationAvailable => "isConditionalMediationAvailable",
            Primitive::SignalAllAcceptedCredentials => "signalAllAcceptedCredentials",
            Primitive::SignalCurrentUserDetails => "signalCurrentUserDetails",
            Primitive::SignalUnknownCredential => "signalUnknownCredential",
            Primitive::ParseCreationOptionsFromJson => "parseCreationOptionsFromJSON",
            Primitive::ParseRequestOptionsFromJson => "parseRequestOptionsFromJSON",
            Primitive::ToJson => "toJSON",
        }
    }

    /// Whether the member lives on `PublicKeyCredential.prototype` rather
    /// than on the constructor itself.
    pub const fn is_prototype_member(&self) -> bool {
        matches!(self, Primitive::ToJson)
    }
}

impl Display for Primitive {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.property())
    }
}

/// A failed call into a host primitive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The primitive does not exist on this host.
    #[error("{0} is not defined")]
    Undefined(Primitive),

    /// The primitive threw or its promise rejected.
    #[error("{primitive} rejected: {message}")]
    Rejected {
        /// The primitive that was called.
        primitive: Primitive,
        /// Host-provided description of the failure.
        message: String,
    },

    /// The primitive resolved to a value of the wrong shape.
    #[error("{primitive} returned an unexpected value: {message}")]
    UnexpectedValue {
        /// The primitive that was called.
        primitive: Primitive,
        /// Description of what was received.
        message: String,
    },
}

/// The object returned by a native `getClientCapabilities()`, keyed by the
/// names the host chose.
pub type NativeCapabilities = Map<String, Value>;

/// Read access to the host's credential API.
///
/// Every call may fail with [`HostError::Undefined`] when
/// [`CredentialHost::defines`] reports the member as absent.
pub trait CredentialHost {
    /// Whether `primitive` currently exists as a callable member.
    fn defines(&self, primitive: Primitive) -> bool;

    /// Invoke the native `getClientCapabilities()`.
    fn get_client_capabilities(
        &self,
    ) -> impl Future<Output = Result<NativeCapabilities, HostError>> + ConditionalSend;

    /// Invoke `isUserVerifyingPlatformAuthenticatorAvailable()`.
    fn is_user_verifying_platform_authenticator_available(
        &self,
    ) -> impl Future<Output = Result<bool, HostError>> + ConditionalSend;

    /// Invoke `isConditionalMediationAvailable()`.
    fn is_conditional_mediation_available(
        &self,
    ) -> impl Future<Output = Result<bool, HostError>> + ConditionalSend;
}
