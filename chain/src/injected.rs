//! The EIP-1193 provider handle a wallet extension injects into the page.

#[cfg(target_arch = "wasm32")]
pub use wasm32::InjectedWallet;

#[cfg(not(target_arch = "wasm32"))]
pub use non_wasm32::InjectedWallet;

#[cfg(target_arch = "wasm32")]
mod wasm32 {
    use async_trait::async_trait;
    use js_sys::Function;
    use js_sys::Promise;
    use js_sys::Reflect;
    use serde_json::Value;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::JsValue;
    use wasm_bindgen_futures::JsFuture;

    use crate::error::ProviderError;
    use crate::error::WalletError;
    use crate::provider::WalletProvider;

    /// Handle to `window.ethereum`.
    #[derive(Clone)]
    pub struct InjectedWallet {
        provider: JsValue,
    }

    impl InjectedWallet {
        /// Looks for a wallet extension's provider handle on the page.
        pub fn detect() -> Result<Self, WalletError> {
            let window = web_sys::window().ok_or(WalletError::MissingProvider)?;
            let provider = Reflect::get(window.as_ref(), &JsValue::from_str("ethereum"))
                .map_err(|_| WalletError::MissingProvider)?;
            if provider.is_undefined() || provider.is_null() {
                return Err(WalletError::MissingProvider);
            }
            Ok(Self { provider })
        }
    }

    #[async_trait(?Send)]
    impl WalletProvider for InjectedWallet {
        async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
            let args = js_sys::Object::new();
            Reflect::set(&args, &"method".into(), &JsValue::from_str(method))
                .map_err(|e| decode_error(method, &e))?;
            let params = js_sys::JSON::parse(&params.to_string())
                .map_err(|e| decode_error(method, &e))?;
            Reflect::set(&args, &"params".into(), &params)
                .map_err(|e| decode_error(method, &e))?;

            let request: Function = Reflect::get(&self.provider, &"request".into())
                .ok()
                .and_then(|f| f.dyn_into().ok())
                .ok_or_else(|| ProviderError::Unsupported {
                    method: "request".to_owned(),
                })?;
            let promise: Promise = request
                .call1(&self.provider, &args)
                .map_err(|e| rpc_error(method, &e))?
                .dyn_into()
                .map_err(|e| decode_error(method, &e))?;
            let result = JsFuture::from(promise)
                .await
                .map_err(|e| rpc_error(method, &e))?;

            // `undefined` does not stringify; treat it as null.
            match js_sys::JSON::stringify(&result)
                .ok()
                .and_then(|s| s.as_string())
            {
                Some(text) => serde_json::from_str(&text)
                    .map_err(|e| ProviderError::Decode(format!("{method} response: {e}"))),
                None => Ok(Value::Null),
            }
        }
    }

    /// Pulls `code`/`message` out of an EIP-1193 error object.
    fn rpc_error(method: &str, error: &JsValue) -> ProviderError {
        let code = Reflect::get(error, &"code".into())
            .ok()
            .and_then(|code| code.as_f64())
            .map(|code| code as i64);
        let message = Reflect::get(error, &"message".into())
            .ok()
            .and_then(|message| message.as_string())
            .or_else(|| error.as_string())
            .unwrap_or_else(|| format!("{error:?}"));
        match code {
            Some(code) => ProviderError::rpc(method, code, message),
            None => ProviderError::Rpc {
                method: method.to_owned(),
                code: 0,
                message,
            },
        }
    }

    fn decode_error(method: &str, error: &JsValue) -> ProviderError {
        ProviderError::Decode(format!("{method}: {error:?}"))
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod non_wasm32 {
    //! Stub so the crate builds for native targets; there is no injected
    //! wallet outside a browser.

    use async_trait::async_trait;
    use serde_json::Value;

    use crate::error::ProviderError;
    use crate::error::WalletError;
    use crate::provider::WalletProvider;

    #[derive(Clone)]
    pub struct InjectedWallet;

    impl InjectedWallet {
        pub fn detect() -> Result<Self, WalletError> {
            Err(WalletError::MissingProvider)
        }
    }

    #[async_trait(?Send)]
    impl WalletProvider for InjectedWallet {
        async fn request(&self, method: &str, _params: Value) -> Result<Value, ProviderError> {
            Err(ProviderError::Unsupported {
                method: method.to_owned(),
            })
        }
    }
}
