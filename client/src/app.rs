use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, CustomEvent, CustomEventInit, Element, Event, HtmlButtonElement,
    HtmlCanvasElement, HtmlTextAreaElement, PointerEvent, Window,
};

use scribepad_shared::api::{SubmitResponse, SubmittedDetail};
use scribepad_shared::sanitize::sanitize_json;
use scribepad_shared::session::SubmissionReport;
use scribepad_shared::{ClientConfig, Identity, SubmissionPayload, SubmitError};

use crate::dom::{
    event_to_point, get_element, resize_canvas, set_busy, set_status, set_toggle_button,
};
use crate::net::submit_sample;
use crate::render::{apply_path_op, clear_surface};
use crate::state::State;

const CONFIG_GLOBAL: &str = "__SCRIBEPAD_CONFIG";
const SUBMITTED_EVENT: &str = "scribepad:submitted";

thread_local! {
    static IDENTITY: RefCell<Option<Identity>> = const { RefCell::new(None) };
}

/// Lets the host page name the signed-in user. Takes precedence over the
/// identity in the page config.
#[wasm_bindgen]
pub fn set_identity(doctor_id: String, email: String) {
    IDENTITY.with(|identity| {
        *identity.borrow_mut() = Some(Identity { doctor_id, email });
    });
}

#[wasm_bindgen]
pub fn clear_identity() {
    IDENTITY.with(|identity| identity.borrow_mut().take());
}

/// Cleans stroke data supplied by the page (`[[[x, y, t], ...], ...]`) with
/// the same rules a submission goes through.
#[wasm_bindgen]
pub fn sanitize_sample(strokes: JsValue) -> Result<JsValue, JsValue> {
    let text = js_sys::JSON::stringify(&strokes)?
        .as_string()
        .ok_or_else(|| JsValue::from_str("Strokes are not serializable"))?;
    let value: serde_json::Value =
        serde_json::from_str(&text).map_err(|error| JsValue::from_str(&error.to_string()))?;
    let sanitized = sanitize_json(&value, js_sys::Date::now() as i64)
        .map_err(|error| JsValue::from_str(&error.to_string()))?;
    log::debug!(
        "Sanitized page strokes: kept {}, dropped {} strokes and {} points",
        sanitized.strokes.len(),
        sanitized.dropped_strokes,
        sanitized.dropped_points
    );
    let text = serde_json::to_string(&sanitized.strokes)
        .map_err(|error| JsValue::from_str(&error.to_string()))?;
    js_sys::JSON::parse(&text)
}

fn current_identity(config: &ClientConfig) -> Option<Identity> {
    IDENTITY
        .with(|identity| identity.borrow().clone())
        .or_else(|| config.identity.clone())
}

fn debug_enabled(window: &Window) -> bool {
    let search = window.location().search().ok().unwrap_or_default();
    search.contains("debug=1")
        || search.contains("debug=true")
        || search.contains("log=1")
        || search.contains("log=true")
}

fn document_ready_state(document: &web_sys::Document) -> Option<String> {
    Reflect::get(document.as_ref(), &JsValue::from_str("readyState"))
        .ok()?
        .as_string()
}

fn init_logging(window: &Window) {
    let level = if debug_enabled(window) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    let _ = console_log::init_with_level(level);
}

fn load_config(window: &Window) -> ClientConfig {
    let value = match Reflect::get(window.as_ref(), &JsValue::from_str(CONFIG_GLOBAL)) {
        Ok(value) if !value.is_undefined() && !value.is_null() => value,
        _ => return ClientConfig::default(),
    };
    let Some(text) = js_sys::JSON::stringify(&value)
        .ok()
        .and_then(|text| text.as_string())
    else {
        log::warn!("{CONFIG_GLOBAL} is not serializable, using defaults");
        return ClientConfig::default();
    };
    match ClientConfig::from_json(&text) {
        Ok(config) => config,
        Err(error) => {
            log::warn!("Ignoring invalid {CONFIG_GLOBAL}: {error}");
            ClientConfig::default()
        }
    }
}

fn log_report(report: &SubmissionReport) {
    log::debug!(
        "Submitting {} of {} strokes ({} points dropped), {} bytes",
        report.kept_strokes,
        report.input_strokes,
        report.dropped_points,
        report.final_bytes
    );
    if let Some(stride) = report.stride {
        log::info!(
            "Data too large ({} bytes), kept every {stride}th point ({} bytes)",
            report.original_bytes,
            report.final_bytes
        );
    }
    if report.transcription_truncated {
        log::info!("Transcription truncated before submission");
    }
}

fn dispatch_submitted(
    window: &Window,
    payload: &SubmissionPayload,
    response: &SubmitResponse,
) -> Result<(), JsValue> {
    let text = SubmittedDetail::new(payload, response)
        .to_json()
        .map_err(|error| JsValue::from_str(&error.to_string()))?;
    let detail = js_sys::JSON::parse(&text)?;
    let init = CustomEventInit::new();
    init.set_detail(&detail);
    let event = CustomEvent::new_with_event_init_dict(SUBMITTED_EVENT, &init)?;
    window.dispatch_event(&event)?;
    Ok(())
}

fn show_error(status_el: &Element, status_text: &Element, message: &str) {
    set_status(status_el, status_text, "error", message);
}

#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;
    let started = Rc::new(Cell::new(false));

    if document_ready_state(&document).as_deref() == Some("complete") {
        started.set(true);
        return start_app();
    }

    let onload_started = started.clone();
    let onload = Closure::<dyn FnMut(Event)>::new(move |_| {
        if onload_started.replace(true) {
            return;
        }
        if let Err(err) = start_app() {
            web_sys::console::error_1(&err);
        }
    });
    window.add_event_listener_with_callback("load", onload.as_ref().unchecked_ref())?;
    onload.forget();

    Ok(())
}

fn start_app() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;

    init_logging(&window);
    let config = load_config(&window);
    log::debug!("Submitting to {}", config.submit_url());

    let canvas: HtmlCanvasElement = get_element(&document, "pad")?;
    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("Missing canvas context"))?
        .dyn_into::<CanvasRenderingContext2d>()?;
    let _ = canvas.style().set_property("touch-action", "none");

    let transcription_input: HtmlTextAreaElement = get_element(&document, "transcription")?;
    let clear_button: HtmlButtonElement = get_element(&document, "clear")?;
    let expand_button: HtmlButtonElement = get_element(&document, "expand")?;
    let submit_button: HtmlButtonElement = get_element(&document, "submit")?;
    let status_el = document
        .get_element_by_id("status")
        .ok_or_else(|| JsValue::from_str("Missing status element"))?;
    let status_text = document
        .get_element_by_id("statusText")
        .ok_or_else(|| JsValue::from_str("Missing status text"))?;

    let state = Rc::new(RefCell::new(State::new(canvas.clone(), ctx, config)));

    resize_canvas(&window, &mut state.borrow_mut());
    set_toggle_button(&expand_button, false);
    set_busy(&submit_button, false);
    set_status(&status_el, &status_text, "idle", "Ready");

    {
        let resize_state = state.clone();
        let resize_window = window.clone();
        let onresize = Closure::<dyn FnMut(Event)>::new(move |_| {
            resize_canvas(&resize_window, &mut resize_state.borrow_mut());
        });
        window.add_event_listener_with_callback("resize", onresize.as_ref().unchecked_ref())?;
        onresize.forget();
    }

    {
        let expand_state = state.clone();
        let expand_window = window.clone();
        let button = expand_button.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            let mut state = expand_state.borrow_mut();
            state.expanded = !state.expanded;
            set_toggle_button(&button, state.expanded);
            let title = if state.expanded {
                "Minimize canvas"
            } else {
                "Maximize canvas"
            };
            let _ = button.set_attribute("title", title);
            resize_canvas(&expand_window, &mut state);
        });
        expand_button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let input_state = state.clone();
        let input = transcription_input.clone();
        let oninput = Closure::<dyn FnMut(Event)>::new(move |_| {
            input_state.borrow_mut().session.transcription = input.value();
        });
        transcription_input
            .add_event_listener_with_callback("input", oninput.as_ref().unchecked_ref())?;
        oninput.forget();
    }

    {
        let clear_state = state.clone();
        let input = transcription_input.clone();
        let status_el = status_el.clone();
        let status_text = status_text.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            let mut state = clear_state.borrow_mut();
            match state.session.clear() {
                Ok(()) => {
                    state.active_pointer = None;
                    input.set_value("");
                    clear_surface(&state);
                    set_status(&status_el, &status_text, "idle", "Ready");
                }
                Err(error) => show_error(&status_el, &status_text, &error.to_string()),
            }
        });
        clear_button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let down_state = state.clone();
        let down_canvas = canvas.clone();
        let ondown = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            if event.button() != 0 {
                return;
            }
            let mut state = down_state.borrow_mut();
            if state.session.is_pending() {
                return;
            }
            if matches!(state.active_pointer, Some(id) if id != event.pointer_id()) {
                event.prevent_default();
                return;
            }
            let Some(point) = event_to_point(&down_canvas, &event) else {
                return;
            };
            event.prevent_default();
            let now = js_sys::Date::now();
            if let Some(op) = state.session.capture.pointer_down(point, now) {
                state.active_pointer = Some(event.pointer_id());
                apply_path_op(&state.ctx, op);
            }
        });
        canvas.add_event_listener_with_callback("pointerdown", ondown.as_ref().unchecked_ref())?;
        ondown.forget();
    }

    {
        let move_state = state.clone();
        let move_canvas = canvas.clone();
        let onmove = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let mut state = move_state.borrow_mut();
            if state.active_pointer != Some(event.pointer_id()) {
                return;
            }
            event.prevent_default();
            let Some(point) = event_to_point(&move_canvas, &event) else {
                return;
            };
            let now = js_sys::Date::now();
            if let Some(op) = state.session.capture.pointer_move(point, now) {
                apply_path_op(&state.ctx, op);
            }
        });
        canvas.add_event_listener_with_callback("pointermove", onmove.as_ref().unchecked_ref())?;
        onmove.forget();
    }

    {
        let stop_state = state.clone();
        let onstop = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let mut state = stop_state.borrow_mut();
            if state.active_pointer != Some(event.pointer_id()) {
                return;
            }
            event.prevent_default();
            state.active_pointer = None;
            if let Some(op) = state.session.capture.pointer_up() {
                apply_path_op(&state.ctx, op);
            }
        });
        canvas.add_event_listener_with_callback("pointerup", onstop.as_ref().unchecked_ref())?;
        canvas
            .add_event_listener_with_callback("pointercancel", onstop.as_ref().unchecked_ref())?;
        canvas.add_event_listener_with_callback("pointerleave", onstop.as_ref().unchecked_ref())?;
        onstop.forget();
    }

    {
        let submit_state = state.clone();
        let submit_window = window.clone();
        let button = submit_button.clone();
        let input = transcription_input.clone();
        let status_el = status_el.clone();
        let status_text = status_text.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            let (identity, prepared, url) = {
                let mut guard = submit_state.borrow_mut();
                let state = &mut *guard;
                let Some(identity) = current_identity(&state.config) else {
                    show_error(
                        &status_el,
                        &status_text,
                        &SubmitError::MissingIdentity.to_string(),
                    );
                    return;
                };
                let now = js_sys::Date::now() as i64;
                match state.session.begin_submit(&state.config.limits, now) {
                    Ok(prepared) => (identity, prepared, state.config.submit_url()),
                    Err(error) => {
                        show_error(&status_el, &status_text, &error.to_string());
                        return;
                    }
                }
            };
            log_report(&prepared.report);
            set_busy(&button, true);
            input.set_read_only(true);
            set_status(&status_el, &status_text, "pending", "Submitting...");

            let state = submit_state.clone();
            let window = submit_window.clone();
            let button = button.clone();
            let input = input.clone();
            let status_el = status_el.clone();
            let status_text = status_text.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let result = submit_sample(&window, &url, &identity, &prepared.payload).await;
                {
                    let mut state = state.borrow_mut();
                    state.session.finish_submit(result.is_ok());
                    if result.is_ok() {
                        input.set_value("");
                        clear_surface(&state);
                    }
                }
                match result {
                    Ok(response) => {
                        set_status(&status_el, &status_text, "ok", "Sample submitted");
                        if let Err(err) =
                            dispatch_submitted(&window, &prepared.payload, &response)
                        {
                            web_sys::console::error_1(&err);
                        }
                    }
                    Err(error) => {
                        log::warn!("Submission failed: {error}");
                        show_error(&status_el, &status_text, &error.to_string());
                    }
                }
                input.set_read_only(false);
                set_busy(&button, false);
            });
        });
        submit_button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    log::info!("Handwriting pad ready");
    Ok(())
}
