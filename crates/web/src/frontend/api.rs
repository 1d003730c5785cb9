//! Form submission over `fetch`.

use invoicedesk_core::ActionState;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestCredentials, RequestInit, Response, UrlSearchParams, window};

pub const SIGN_UP_PATH: &str = "/signup";

fn js_err(context: &str, e: JsValue) -> String {
    format!("{context}: {e:?}")
}

/// Post the form urlencoded and read back the action state as JSON.
pub async fn submit_sign_up(fields: &[(&str, String)]) -> Result<ActionState, String> {
    let window = window().ok_or_else(|| "No window object".to_string())?;

    let params = UrlSearchParams::new().map_err(|e| js_err("Failed to build form body", e))?;
    for (name, value) in fields {
        params.append(name, value);
    }
    let body: String = params.to_string().into();

    let headers = Headers::new().map_err(|e| js_err("Failed to build headers", e))?;
    headers
        .set("Accept", "application/json")
        .map_err(|e| js_err("Failed to set Accept", e))?;
    headers
        .set("Content-Type", "application/x-www-form-urlencoded")
        .map_err(|e| js_err("Failed to set Content-Type", e))?;

    let init = RequestInit::new();
    init.set_method("POST");
    init.set_headers(&headers);
    init.set_body(&JsValue::from_str(&body));
    init.set_credentials(RequestCredentials::SameOrigin);

    let request = Request::new_with_str_and_init(SIGN_UP_PATH, &init)
        .map_err(|e| js_err("Failed to build request", e))?;

    let response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| js_err("Request failed", e))?;
    let response: Response = response
        .dyn_into()
        .map_err(|e| js_err("Unexpected fetch result", e))?;

    let json = JsFuture::from(response.json().map_err(|e| js_err("Failed to read body", e))?)
        .await
        .map_err(|e| js_err("Response is not JSON", e))?;

    serde_wasm_bindgen::from_value(json).map_err(|e| format!("Failed to deserialize result: {:?}", e))
}
