#![warn(missing_docs)]

//! Browser bindings for [`webauthn_polyfill`].
//!
//! Exposes a single entry point to JavaScript:
//!
//! ```ignore
//! // This is JavaScript code that uses the WASM bindings, not a Rust doctest
//! import { UAParser } from "ua-parser-js";
//! import { applyPolyfill } from "webauthn-polyfill-web";
//!
//! globalThis.UAParser = UAParser;
//! applyPolyfill();
//!
//! const capabilities = await PublicKeyCredential.getClientCapabilities();
//! ```
//!
//! `applyPolyfill` accepts nothing, a user agent string, or an object with
//! `userAgent`, `capabilities` and `serialization` members.
//!
//! On targets other than `wasm32-unknown-unknown` only [`PolyfillError`] is
//! available.

mod error;
pub use error::*;

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
mod js;

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
pub mod convert;
#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
mod host;
#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
mod install;
#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
mod parser;

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
pub use host::JsCredentialHost;
#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
pub use install::{apply_polyfill, install, read_config};
#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
pub use parser::JsUserAgentParser;
