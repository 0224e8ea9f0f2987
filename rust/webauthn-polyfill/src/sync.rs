//! Cross-target `Send` bound for host futures.
//!
//! Host adapters backed by JavaScript promises produce futures that are not
//! `Send`, while native test doubles run on a multi-threaded runtime.

/// `Send` on native targets. Bounds every future a
/// [`CredentialHost`](crate::CredentialHost) returns.
#[cfg(not(target_arch = "wasm32"))]
pub trait ConditionalSend: Send {}

#[cfg(not(target_arch = "wasm32"))]
impl<T: Send> ConditionalSend for T {}

/// No bound on `wasm32`. Bounds every future a
/// [`CredentialHost`](crate::CredentialHost) returns.
#[cfg(target_arch = "wasm32")]
pub trait ConditionalSend {}

#[cfg(target_arch = "wasm32")]
impl<T> ConditionalSend for T {}
