//! [`CredentialHost`] over a JavaScript `PublicKeyCredential` class.

use crate::js::{self, describe};
use js_sys::{Function, Promise, Reflect, Symbol};
use std::future::Future;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use webauthn_polyfill::{ConditionalSend, CredentialHost, HostError, NativeCapabilities, Primitive};

/// The `PublicKeyCredential` class of the running page, or a stand-in with
/// the same shape.
///
/// `getClientCapabilities` is captured when the host is created, so the
/// resolver keeps calling the native method after the polyfill has replaced
/// it on the class. If none was captured it is looked up on each call,
/// skipping functions the polyfill installed. Every other member is looked up
/// on each call.
#[derive(Debug, Clone)]
pub struct JsCredentialHost {
    class: JsValue,
    client_capabilities: Option<Function>,
}

impl JsCredentialHost {
    /// Wrap `class`.
    pub fn new(class: JsValue) -> Self {
        let client_capabilities =
            js::function(&class, Primitive::GetClientCapabilities.property());
        Self {
            class,
            client_capabilities,
        }
    }

    /// The wrapped class.
    pub fn class(&self) -> &JsValue {
        &self.class
    }

    fn method(&self, primitive: Primitive) -> Option<Function> {
        match primitive {
            Primitive::GetClientCapabilities => self.client_capabilities.clone().or_else(|| {
                js::function(&self.class, primitive.property()).filter(|method| !is_installed(method))
            }),
            primitive if primitive.is_prototype_member() => js::js_get(&self.class, "prototype")
                .ok()
                .and_then(|prototype| js::function(&prototype, primitive.property())),
            primitive => js::function(&self.class, primitive.property()),
        }
    }

    fn invoke(&self, primitive: Primitive) -> Result<JsFuture, HostError> {
        let method = self
            .method(primitive)
            .ok_or(HostError::Undefined(primitive))?;
        let value = method
            .call0(&self.class)
            .map_err(|error| rejected(primitive, &error))?;
        Ok(JsFuture::from(Promise::resolve(&value)))
    }
}

impl CredentialHost for JsCredentialHost {
    fn defines(&self, primitive: Primitive) -> bool {
        self.method(primitive).is_some()
    }

    fn get_client_capabilities(
        &self,
    ) -> impl Future<Output = Result<NativeCapabilities, HostError>> + ConditionalSend {
        let primitive = Primitive::GetClientCapabilities;
        let pending = self.invoke(primitive);
        async move {
            let value = pending?
                .await
                .map_err(|error| rejected(primitive, &error))?;
            js::from_js::<NativeCapabilities>(&value).map_err(|error| {
                HostError::UnexpectedValue {
                    primitive,
                    message: error.to_string(),
                }
            })
        }
    }

    fn is_user_verifying_platform_authenticator_available(
        &self,
    ) -> impl Future<Output = Result<bool, HostError>> + ConditionalSend {
        let primitive = Primitive::IsUserVerifyingPlatformAuthenticatorAvailable;
        boolean(primitive, self.invoke(primitive))
    }

    fn is_conditional_mediation_available(
        &self,
    ) -> impl Future<Output = Result<bool, HostError>> + ConditionalSend {
        let primitive = Primitive::IsConditionalMediationAvailable;
        boolean(primitive, self.invoke(primitive))
    }
}

async fn boolean(
    primitive: Primitive,
    pending: Result<JsFuture, HostError>,
) -> Result<bool, HostError> {
    let value = pending?
        .await
        .map_err(|error| rejected(primitive, &error))?;
    value.as_bool().ok_or_else(|| HostError::UnexpectedValue {
        primitive,
        message: describe(&value),
    })
}

/// The registered symbol marking classes and functions the polyfill installed.
pub(crate) fn installed_marker() -> Symbol {
    Symbol::for_("webauthn-polyfill.installed")
}

/// Whether `target` carries the [`installed_marker`].
pub(crate) fn is_installed(target: &JsValue) -> bool {
    Reflect::has(target, &installed_marker()).unwrap_or(false)
}

fn rejected(primitive: Primitive, error: &JsValue) -> HostError {
    HostError::Rejected {
        primitive,
        message: describe(error),
    }
}
