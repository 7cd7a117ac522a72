use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response, Window};

use scribepad_shared::api::{interpret_submit_response, SubmitRequest, SubmitResponse};
use scribepad_shared::{ApiError, Identity, SubmissionPayload};

fn network_error(error: JsValue) -> ApiError {
    ApiError::Network(
        error
            .as_string()
            .or_else(|| {
                error
                    .dyn_ref::<js_sys::Error>()
                    .map(|error| String::from(error.message()))
            })
            .unwrap_or_else(|| "fetch failed".to_string()),
    )
}

pub async fn submit_sample(
    window: &Window,
    url: &str,
    identity: &Identity,
    payload: &SubmissionPayload,
) -> Result<SubmitResponse, ApiError> {
    let body = SubmitRequest::new(identity, payload).to_json()?;
    log::debug!(
        "POST {url} strokes={} transcription_chars={}",
        payload.strokes.len(),
        payload.transcription.chars().count()
    );

    let headers = Headers::new().map_err(network_error)?;
    headers
        .set("Content-Type", "application/json")
        .map_err(network_error)?;
    let init = RequestInit::new();
    init.set_method("POST");
    init.set_mode(RequestMode::Cors);
    init.set_headers(&headers);
    init.set_body(&JsValue::from_str(&body));
    let request = Request::new_with_str_and_init(url, &init).map_err(network_error)?;

    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(network_error)?
        .dyn_into()
        .map_err(network_error)?;
    let status = response.status();
    let text = JsFuture::from(response.text().map_err(network_error)?)
        .await
        .map_err(network_error)?
        .as_string()
        .unwrap_or_default();
    log::debug!("Response status: {status}");
    interpret_submit_response(status, &text)
}
