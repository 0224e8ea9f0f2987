//! Small helpers over `Reflect` and `JSON`.

use crate::PolyfillError;
use js_sys::{Array, Function, JSON, Object, Reflect, Uint8Array};
use serde::{Serialize, de::DeserializeOwned};
use wasm_bindgen::{JsCast, JsValue};

/// Shorthand for `Reflect::get` with a string key.
pub(crate) fn js_get(target: &JsValue, key: &str) -> Result<JsValue, PolyfillError> {
    Reflect::get(target, &JsValue::from_str(key))
        .map_err(|e| PolyfillError::Js(format!("failed to get '{key}': {}", describe(&e))))
}

/// Shorthand for `Reflect::set` with a string key.
pub(crate) fn js_set(target: &Object, key: &str, value: &JsValue) -> Result<(), PolyfillError> {
    Reflect::set(target, &JsValue::from_str(key), value)
        .map_err(|e| PolyfillError::Js(format!("failed to set '{key}': {}", describe(&e))))?;
    Ok(())
}

/// The function stored under `key`, if there is one.
pub(crate) fn function(target: &JsValue, key: &str) -> Option<Function> {
    if target.is_undefined() || target.is_null() {
        return None;
    }
    Reflect::get(target, &JsValue::from_str(key))
        .ok()?
        .dyn_into::<Function>()
        .ok()
}

/// Call the method `key` on `target` if it exists.
pub(crate) fn call_method(target: &JsValue, key: &str) -> Result<Option<JsValue>, PolyfillError> {
    let Some(method) = function(target, key) else {
        return Ok(None);
    };
    method
        .call0(target)
        .map(Some)
        .map_err(|e| PolyfillError::Js(format!("'{key}' threw: {}", describe(&e))))
}

/// Copy an `ArrayBuffer` or typed-array view into a `Vec<u8>`.
pub(crate) fn array_buffer_to_vec(value: &JsValue) -> Vec<u8> {
    Uint8Array::new(value).to_vec()
}

/// Like [`array_buffer_to_vec`], mapping `null` and `undefined` to `None`.
pub(crate) fn optional_bytes(
    target: &JsValue,
    key: &str,
) -> Result<Option<Vec<u8>>, PolyfillError> {
    let value = js_get(target, key)?;
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    Ok(Some(array_buffer_to_vec(&value)))
}

/// A fresh `ArrayBuffer` holding `bytes`.
pub(crate) fn array_buffer(bytes: &[u8]) -> JsValue {
    Uint8Array::from(bytes).buffer().into()
}

/// Read an array of strings, skipping anything that is not a string.
pub(crate) fn strings(value: &JsValue) -> Vec<String> {
    if !Array::is_array(value) {
        return Vec::new();
    }
    Array::from(value)
        .iter()
        .filter_map(|item| item.as_string())
        .collect()
}

/// Move a Rust value into JavaScript through its JSON form.
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, PolyfillError> {
    let text = serde_json::to_string(value)?;
    JSON::parse(&text).map_err(|e| PolyfillError::Js(describe(&e)))
}

/// Like [`to_js`], for values that serialize to a JSON object.
pub(crate) fn to_js_object<T: Serialize + ?Sized>(value: &T) -> Result<Object, PolyfillError> {
    to_js(value)?
        .dyn_into::<Object>()
        .map_err(|value| PolyfillError::Js(format!("expected an object, got {}", describe(&value))))
}

/// Read a JavaScript value into Rust through its JSON form.
pub(crate) fn from_js<T: DeserializeOwned>(value: &JsValue) -> Result<T, PolyfillError> {
    let text = JSON::stringify(value)
        .map_err(|e| PolyfillError::Js(describe(&e)))?
        .as_string()
        .ok_or_else(|| PolyfillError::Js(format!("{} has no JSON form", describe(value))))?;
    Ok(serde_json::from_str(&text)?)
}

/// A readable description of a thrown value.
pub(crate) fn describe(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return format!(
            "{}: {}",
            String::from(error.name()),
            String::from(error.message())
        );
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
