use serde::{Deserialize, Serialize};

/// Options accepted by the polyfill entry point.
///
/// Deserializes from a camelCase object in which every member is optional:
///
/// ```
/// # use webauthn_polyfill::PolyfillConfig;
/// let config: PolyfillConfig = serde_json::from_str(r#"{ "serialization": false }"#).unwrap();
/// assert!(config.capabilities);
/// assert!(!config.serialization);
/// assert_eq!(config.user_agent, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolyfillConfig {
    /// User agent to classify. `None` classifies the ambient runtime.
    pub user_agent: Option<String>,
    /// Consider installing `getClientCapabilities`.
    pub capabilities: bool,
    /// Consider installing the JSON parse and serialize methods.
    pub serialization: bool,
}

impl Default for PolyfillConfig {
    fn default() -> Self {
        Self {
            user_agent: None,
            capabilities: true,
            serialization: true,
        }
    }
}

impl PolyfillConfig {
    /// The default configuration, classifying `user_agent` instead of the
    /// ambient one.
    pub fn for_user_agent(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: Some(user_agent.into()),
            ..Self::default()
        }
    }
}
