#![warn(missing_docs)]

//! Interoperability shims for the WebAuthn `PublicKeyCredential` API.
//!
//! Browsers ship different subsets of the final WebAuthn Level 3 surface, and
//! some ship members that deviate from it. This crate decides, for a given
//! browser, what `getClientCapabilities()` should report and how credential
//! options and responses convert to and from their JSON forms:
//!
//! - [`codec`]: base64url, used for every byte field in WebAuthn JSON
//! - [`environment`] and [`classifier`]: the browser environment and the
//!   named gaps it exhibits
//! - [`capabilities`]: the capability report, forwarded or synthesized
//! - [`serialization`]: `parse*OptionsFromJSON` and `toJSON`
//! - [`install`]: which host members to replace
//!
//! All host access goes through the [`CredentialHost`] trait, so the logic
//! runs the same against the browser binding and against test doubles.

pub mod capabilities;
pub mod classifier;
pub mod codec;
pub mod environment;
pub mod host;
pub mod install;
pub mod serialization;

mod config;
mod sync;

#[cfg(feature = "helpers")]
pub mod helpers;

pub use capabilities::{CapabilityReport, CapabilityResolver};
pub use classifier::Predicates;
pub use codec::CodecError;
pub use config::PolyfillConfig;
pub use environment::{EnvironmentDescriptor, EnvironmentError, UserAgentParser};
pub use host::{CredentialHost, HostError, NativeCapabilities, Primitive};
pub use install::{InstallPlan, Polyfill};
pub use serialization::SerializationError;
pub use sync::ConditionalSend;
