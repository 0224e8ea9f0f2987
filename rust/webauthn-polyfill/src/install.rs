//! Which host members the polyfill replaces.
//!
//! The decision is pure: it reads member presence and environment predicates
//! and never writes to the host. Executing a [`Polyfill`] is left to the
//! platform binding.

use crate::{
    classifier::Predicates,
    config::PolyfillConfig,
    environment::UserAgentParser,
    host::{CredentialHost, Primitive},
};

/// The members to define on the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallPlan {
    /// Define `getClientCapabilities`.
    pub client_capabilities: bool,
    /// Define `parseCreationOptionsFromJSON`.
    pub parse_creation_options: bool,
    /// Define `parseRequestOptionsFromJSON`.
    pub parse_request_options: bool,
    /// Define `PublicKeyCredential.prototype.toJSON`.
    pub to_json: bool,
}

impl InstallPlan {
    /// Decide what to install.
    ///
    /// `getClientCapabilities` is replaced when it is absent or known to be
    /// divergent (glitch window), and only when the environment could be
    /// classified. The serializer members are added only when absent.
    pub fn new<H>(host: &H, predicates: Option<&Predicates>, config: &PolyfillConfig) -> Self
    where
        H: CredentialHost + ?Sized,
    {
        let absent = |primitive| !host.defines(primitive);

        Self {
            client_capabilities: config.capabilities
                && predicates.is_some_and(|predicates| {
                    absent(Primitive::GetClientCapabilities) || predicates.in_glitch_window()
                }),
            parse_creation_options: config.serialization
                && absent(Primitive::ParseCreationOptionsFromJson),
            parse_request_options: config.serialization
                && absent(Primitive::ParseRequestOptionsFromJson),
            to_json: config.serialization && absent(Primitive::ToJson),
        }
    }

    /// The members this plan defines.
    pub fn targets(&self) -> impl Iterator<Item = Primitive> + use<> {
        [
            (self.client_capabilities, Primitive::GetClientCapabilities),
            (
                self.parse_creation_options,
                Primitive::ParseCreationOptionsFromJson,
            ),
            (
                self.parse_request_options,
                Primitive::ParseRequestOptionsFromJson,
            ),
            (self.to_json, Primitive::ToJson),
        ]
        .into_iter()
        .filter_map(|(install, primitive)| install.then_some(primitive))
    }

    /// Whether there is nothing to install.
    pub fn is_empty(&self) -> bool {
        self.targets().next().is_none()
    }
}

/// A classified environment together with its install plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Polyfill {
    /// The environment predicates, or `None` if the user agent could not be
    /// classified.
    pub predicates: Option<Predicates>,
    /// What to install.
    pub plan: InstallPlan,
}

impl Polyfill {
    /// Classify the configured user agent and plan the install.
    ///
    /// An unclassifiable environment is expected on unknown platforms: it
    /// only disables the capability replacement.
    pub fn prepare<H, P>(host: &H, parser: &P, config: &PolyfillConfig) -> Self
    where
        H: CredentialHost + ?Sized,
        P: UserAgentParser + ?Sized,
    {
        let predicates = match Predicates::detect(parser, config.user_agent.as_deref()) {
            Ok(predicates) => Some(predicates),
            Err(error) => {
                tracing::info!(%error, "environment not classified, skipping getClientCapabilities");
                None
            }
        };

        let plan = InstallPlan::new(host, predicates.as_ref(), config);
        for primitive in plan.targets() {
            tracing::info!(%primitive, "installing polyfill");
        }

        Self { predicates, plan }
    }
}
