use thiserror::Error;
use webauthn_polyfill::SerializationError;

/// Errors raised while installing the polyfill or while running one of the
/// installed members.
#[derive(Debug, Error)]
pub enum PolyfillError {
    /// A global the binding needs is missing.
    #[error("{0} is not available")]
    Unavailable(&'static str),

    /// A JavaScript operation threw.
    #[error("JS error: {0}")]
    Js(String),

    /// A value could not be moved across the JSON boundary.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Options or a credential could not be converted.
    #[error(transparent)]
    Serialization(#[from] SerializationError),

    /// The argument to `applyPolyfill` was not a string or an object.
    #[error("invalid polyfill config: {0}")]
    InvalidConfig(String),
}

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
impl From<PolyfillError> for wasm_bindgen::JsValue {
    fn from(value: PolyfillError) -> Self {
        js_sys::Error::new(&value.to_string()).into()
    }
}
