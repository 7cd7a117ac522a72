use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlButtonElement, HtmlCanvasElement, PointerEvent, Window};

use scribepad_shared::capture::SurfacePoint;

use crate::render::{prepare_context, redraw};
use crate::state::State;

pub fn get_element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element: {id}")))?;
    element
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Invalid element type: {id}")))
}

pub fn set_toggle_button(button: &HtmlButtonElement, active: bool) {
    let pressed = if active { "true" } else { "false" };
    let _ = button.set_attribute("aria-pressed", pressed);
}

pub fn set_busy(button: &HtmlButtonElement, busy: bool) {
    let value = if busy { "true" } else { "false" };
    let _ = button.set_attribute("aria-busy", value);
    button.set_disabled(busy);
}

pub fn set_status(status_el: &Element, status_text: &Element, state: &str, text: &str) {
    let _ = status_el.set_attribute("data-state", state);
    status_text.set_text_content(Some(text));
}

/// Sizes the surface to its container and the expand toggle, then repaints
/// the committed strokes at their recorded coordinates.
pub fn resize_canvas(window: &Window, state: &mut State) {
    let width = state
        .canvas
        .parent_element()
        .map(|parent| f64::from(parent.client_width()) - 2.0)
        .unwrap_or(state.board_width)
        .max(1.0);
    let viewport_height = window
        .inner_height()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0);
    let height = state
        .config
        .surface
        .surface_height(state.expanded, viewport_height);
    log::debug!(
        "Resizing canvas from {}x{} to {width}x{height}",
        state.board_width,
        state.board_height
    );

    let dpr = window.device_pixel_ratio().max(1.0);
    state.canvas.set_width((width * dpr) as u32);
    state.canvas.set_height((height * dpr) as u32);
    let style = state.canvas.style();
    let _ = style.set_property("width", &format!("{width}px"));
    let _ = style.set_property("height", &format!("{height}px"));
    let _ = state.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
    state.board_width = width;
    state.board_height = height;

    state.session.capture.interrupt();
    state.active_pointer = None;
    prepare_context(&state.ctx, &state.config.surface);
    redraw(state);
}

/// `MouseEvent::client_x` is typed as an integer; pen and touch input report
/// fractional positions, so the raw doubles are read off the event.
fn client_coordinate(event: &PointerEvent, key: &str) -> Option<f64> {
    Reflect::get(event.as_ref(), &JsValue::from_str(key))
        .ok()?
        .as_f64()
}

pub fn event_to_point(canvas: &HtmlCanvasElement, event: &PointerEvent) -> Option<SurfacePoint> {
    let rect = canvas.get_bounding_client_rect();
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return None;
    }
    let client_x = client_coordinate(event, "clientX")?;
    let client_y = client_coordinate(event, "clientY")?;
    Some(SurfacePoint::from_client(
        client_x,
        client_y,
        rect.left(),
        rect.top(),
    ))
}
