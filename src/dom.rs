// Browser plumbing helpers

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, Window};

/// Retrieve the global `window` object, if one exists.
///
/// Returns `None` outside of a browser context so callers can degrade
/// instead of panicking.
#[must_use]
pub fn window() -> Option<Window> {
    web_sys::window()
}

/// Retrieve the document object for DOM interactions, if one exists.
#[must_use]
pub fn document() -> Option<Document> {
    window().and_then(|win| win.document())
}

/// Convert a JavaScript value into a readable string for log output.
#[must_use]
pub fn js_error_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|err| err.message().into())
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Set or clear an element's inline `display: none` flag.
///
/// Showing removes the inline property rather than forcing a display mode,
/// so breakpoint-scoped stylesheet rules keep control over whether the
/// element actually renders.
pub fn set_hidden(el: &HtmlElement, hidden: bool) {
    let style = el.style();
    if hidden {
        if let Err(err) = style.set_property("display", "none") {
            log::warn!("failed to hide element: {}", js_error_message(&err));
        }
    } else if let Err(err) = style.remove_property("display") {
        log::warn!("failed to show element: {}", js_error_message(&err));
    }
}

/// Whether the element currently carries the inline `display: none` flag.
#[must_use]
pub fn is_hidden(el: &HtmlElement) -> bool {
    el.style()
        .get_property_value("display")
        .is_ok_and(|value| value == "none")
}
