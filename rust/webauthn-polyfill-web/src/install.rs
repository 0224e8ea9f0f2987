//! Installing planned members onto `PublicKeyCredential`.

use crate::{
    JsCredentialHost, JsUserAgentParser, PolyfillError, convert,
    host::{installed_marker, is_installed},
    js::{self, describe},
};
use js_sys::{Function, Object, Promise, Reflect};
use std::rc::Rc;
use wasm_bindgen::{JsCast, prelude::*};
use wasm_bindgen_futures::future_to_promise;
use webauthn_polyfill::{CapabilityResolver, Polyfill, PolyfillConfig, Primitive, UserAgentParser};

#[wasm_bindgen(inline_js = "export function bind_this(f) { return function () { return f(this); }; }")]
extern "C" {
    /// Wrap `f` so that it receives the call's `this` as its argument.
    fn bind_this(f: &Function) -> Function;
}

/// Runs when the module is instantiated.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// Install the polyfill onto `globalThis.PublicKeyCredential`.
///
/// Does nothing when the page has no `PublicKeyCredential`.
#[wasm_bindgen(js_name = "applyPolyfill")]
pub fn apply_polyfill(config: JsValue) -> Result<(), PolyfillError> {
    let config = read_config(&config)?;
    let class = js::js_get(&js_sys::global(), "PublicKeyCredential")?;
    if class.is_undefined() {
        tracing::info!("PublicKeyCredential is not defined, nothing to polyfill");
        return Ok(());
    }
    install(&class, &JsUserAgentParser::from_global(), &config)?;
    Ok(())
}

/// Read the argument of `applyPolyfill`: nothing, a user agent string or a
/// config object.
pub fn read_config(value: &JsValue) -> Result<PolyfillConfig, PolyfillError> {
    if value.is_undefined() || value.is_null() {
        return Ok(PolyfillConfig::default());
    }
    if let Some(user_agent) = value.as_string() {
        return Ok(PolyfillConfig::for_user_agent(user_agent));
    }
    if value.is_object() {
        return js::from_js(value);
    }
    Err(PolyfillError::InvalidConfig(describe(value)))
}

/// Plan and install the polyfill onto `class`.
///
/// A class is only ever installed onto once. Later calls leave it untouched
/// and return `None`.
pub fn install<P>(
    class: &JsValue,
    parser: &P,
    config: &PolyfillConfig,
) -> Result<Option<Polyfill>, PolyfillError>
where
    P: UserAgentParser + ?Sized,
{
    if is_installed(class) {
        tracing::debug!("polyfill already installed");
        return Ok(None);
    }

    let host = JsCredentialHost::new(class.clone());
    let polyfill = Polyfill::prepare(&host, parser, config);

    let class_object: &Object = class.unchecked_ref();
    let plan = polyfill.plan;

    if let (true, Some(predicates)) = (plan.client_capabilities, polyfill.predicates) {
        let resolver = CapabilityResolver::new(host, predicates);
        let function = client_capabilities(resolver);
        mark_installed(&function)?;
        define(class_object, Primitive::GetClientCapabilities, &function)?;
    }
    if plan.parse_creation_options {
        define(
            class_object,
            Primitive::ParseCreationOptionsFromJson,
            &serializer(convert::parse_creation_options),
        )?;
    }
    if plan.parse_request_options {
        define(
            class_object,
            Primitive::ParseRequestOptionsFromJson,
            &serializer(convert::parse_request_options),
        )?;
    }
    if plan.to_json {
        let prototype: Object = js::js_get(class, "prototype")?
            .dyn_into()
            .map_err(|_| PolyfillError::Unavailable("PublicKeyCredential.prototype"))?;
        define(
            &prototype,
            Primitive::ToJson,
            &bind_this(&serializer(convert::credential_to_json)),
        )?;
    }

    mark_installed(class)?;
    Ok(Some(polyfill))
}

fn mark_installed(target: &JsValue) -> Result<(), PolyfillError> {
    Reflect::set(target, &installed_marker(), &JsValue::TRUE)
        .map(|_| ())
        .map_err(|error| PolyfillError::Js(describe(&error)))
}

fn define(target: &Object, primitive: Primitive, function: &Function) -> Result<(), PolyfillError> {
    let descriptor = Object::new();
    js::js_set(&descriptor, "value", function)?;
    js::js_set(&descriptor, "writable", &JsValue::TRUE)?;
    js::js_set(&descriptor, "configurable", &JsValue::TRUE)?;
    Object::define_property(target, &JsValue::from_str(primitive.property()), &descriptor);
    Ok(())
}

fn client_capabilities(resolver: CapabilityResolver<JsCredentialHost>) -> Function {
    let resolver = Rc::new(resolver);
    let closure: Closure<dyn Fn() -> Promise> = Closure::new(move || {
        let resolver = resolver.clone();
        future_to_promise(async move {
            let report = resolver.resolve().await;
            js::to_js(&report).map_err(JsValue::from)
        })
    });
    closure.into_js_value().unchecked_into()
}

fn serializer(run: fn(&JsValue) -> Result<Object, PolyfillError>) -> Function {
    let closure: Closure<dyn Fn(JsValue) -> Result<JsValue, JsValue>> =
        Closure::new(move |value: JsValue| -> Result<JsValue, JsValue> {
            Ok(run(&value)?.into())
        });
    closure.into_js_value().unchecked_into()
}
