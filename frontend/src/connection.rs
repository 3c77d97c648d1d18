use futures_util::future::LocalBoxFuture;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

use tably_client::transport::{ToggleRequest, Transport, TransportError};

/// Browser transport: one `fetch` POST per toggle request, anti-forgery token
/// attached. Non-2xx statuses map to `TransportError::Status`; everything the
/// browser refuses below that maps to `TransportError::Network`.
pub struct FetchTransport {
    api_base: String,
    csrf_token: String,
}

impl FetchTransport {
    pub fn new(api_base: &str, csrf_token: &str) -> Self {
        FetchTransport {
            api_base: api_base.trim_end_matches('/').to_owned(),
            csrf_token: csrf_token.to_owned(),
        }
    }

    async fn post(url: String, csrf_token: String, body: Option<String>) -> Result<String, TransportError> {
        let headers = Headers::new().map_err(network)?;
        headers.set("X-CSRFToken", &csrf_token).map_err(network)?;
        headers
            .set("X-Requested-With", "XMLHttpRequest")
            .map_err(network)?;

        let mut opts = RequestInit::new();
        opts.method("POST");
        if let Some(body) = &body {
            headers
                .set("Content-Type", "application/x-www-form-urlencoded")
                .map_err(network)?;
            opts.body(Some(&JsValue::from_str(body)));
        }
        opts.headers(headers.as_ref());

        let request = Request::new_with_str_and_init(&url, &opts).map_err(network)?;
        let window = web_sys::window()
            .ok_or_else(|| TransportError::Network("no window".to_owned()))?;

        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(network)?
            .dyn_into()
            .map_err(|_| TransportError::Network("fetch did not yield a response".to_owned()))?;

        if !response.ok() {
            return Err(TransportError::Status(response.status()));
        }

        let text = JsFuture::from(response.text().map_err(network)?)
            .await
            .map_err(network)?;
        text.as_string()
            .ok_or_else(|| TransportError::Malformed("response body was not text".to_owned()))
    }
}

fn network(err: JsValue) -> TransportError {
    TransportError::Network(format!("{:?}", err))
}

impl Transport for FetchTransport {
    fn send(&self, request: ToggleRequest) -> LocalBoxFuture<'static, Result<String, TransportError>> {
        let url = format!("{}{}", self.api_base, request.path);
        let csrf_token = self.csrf_token.clone();
        Box::pin(Self::post(url, csrf_token, request.body))
    }
}
