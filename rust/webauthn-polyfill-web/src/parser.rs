//! [`UserAgentParser`] backed by ua-parser-js.

use crate::{PolyfillError, js};
use js_sys::{Array, Function, Reflect};
use wasm_bindgen::JsValue;
use webauthn_polyfill::environment::{ParsedComponent, ParsedUserAgent, UserAgentParser};

/// Adapter over a ua-parser-js `UAParser` constructor.
///
/// The page is expected to expose the constructor as `globalThis.UAParser`.
/// Without it every user agent parses to nothing, which leaves the
/// environment unclassified.
#[derive(Debug, Clone, Default)]
pub struct JsUserAgentParser {
    constructor: Option<Function>,
}

impl JsUserAgentParser {
    /// Use the given `UAParser` constructor.
    pub fn new(constructor: Function) -> Self {
        Self {
            constructor: Some(constructor),
        }
    }

    /// Use `globalThis.UAParser`, if the page defines it.
    pub fn from_global() -> Self {
        Self {
            constructor: js::function(&js_sys::global(), "UAParser"),
        }
    }

    fn result(&self, user_agent: Option<&str>) -> Result<ParsedUserAgent, PolyfillError> {
        let constructor = self
            .constructor
            .as_ref()
            .ok_or(PolyfillError::Unavailable("UAParser"))?;

        let arguments = Array::new();
        if let Some(user_agent) = user_agent {
            arguments.push(&JsValue::from_str(user_agent));
        }
        let parser = Reflect::construct(constructor, &arguments)
            .map_err(|e| PolyfillError::Js(js::describe(&e)))?;
        let result = js::call_method(&parser, "getResult")?
            .ok_or(PolyfillError::Unavailable("UAParser.prototype.getResult"))?;

        Ok(ParsedUserAgent {
            engine: component(&result, "engine")?,
            os: component(&result, "os")?,
            browser: component(&result, "browser")?,
        })
    }
}

impl UserAgentParser for JsUserAgentParser {
    fn parse(&self, user_agent: Option<&str>) -> ParsedUserAgent {
        self.result(user_agent).unwrap_or_else(|error| {
            tracing::warn!(%error, "user agent could not be parsed");
            ParsedUserAgent::default()
        })
    }
}

fn component(result: &JsValue, key: &str) -> Result<ParsedComponent, PolyfillError> {
    let component = js::js_get(result, key)?;
    if !component.is_object() {
        return Ok(ParsedComponent::default());
    }
    Ok(ParsedComponent {
        name: js::js_get(&component, "name")?.as_string(),
        version: js::js_get(&component, "version")?.as_string(),
    })
}
