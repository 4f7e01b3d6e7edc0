use pickmeup_core::Rect;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, Window};

use crate::error::WebError;

/// Retrieve the global `window` object.
///
/// # Errors
/// Returns an error when executed outside of a browser context.
pub fn window() -> Result<Window, WebError> {
    web_sys::window().ok_or(WebError::MissingWindow)
}

/// Retrieve the document object for DOM interactions.
///
/// # Errors
/// Returns an error when the document cannot be accessed from the current window.
pub fn document() -> Result<Document, WebError> {
    window()?.document().ok_or(WebError::MissingDocument)
}

/// Convert a JavaScript value into a readable string for error reporting.
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

/// Log an error message to the browser console.
pub fn console_error(message: &str) {
    web_sys::console::error_1(&JsValue::from(message));
}

/// Wrap a failed DOM call.
pub(crate) fn dom_err(value: &JsValue) -> WebError {
    WebError::Dom(js_error_message(value))
}

/// Resolve a selector string or an element handed over from JavaScript.
///
/// # Errors
/// Returns an error when the selector matches nothing or the value is neither.
pub fn resolve_target(target: &JsValue) -> Result<Element, WebError> {
    if let Some(selector) = target.as_string() {
        return document()?
            .query_selector(&selector)
            .map_err(|err| dom_err(&err))?
            .ok_or(WebError::TargetNotFound(selector));
    }
    target
        .dyn_ref::<Element>()
        .cloned()
        .ok_or(WebError::InvalidTarget)
}

/// Every attribute of `element` as name/value pairs.
#[must_use]
pub fn attributes(element: &Element) -> Vec<(String, String)> {
    element
        .get_attribute_names()
        .iter()
        .filter_map(|name| name.as_string())
        .filter_map(|name| {
            let value = element.get_attribute(&name)?;
            Some((name, value))
        })
        .collect()
}

/// Border box of `element` in page coordinates.
#[must_use]
pub fn page_rect(element: &Element) -> Rect {
    let rect = element.get_bounding_client_rect();
    let (scroll_x, scroll_y) = scroll_offsets();
    Rect {
        left: rect.left() + scroll_x,
        top: rect.top() + scroll_y,
        width: rect.width(),
        height: rect.height(),
    }
}

/// Size of a rendered element; position is left at zero.
#[must_use]
pub fn element_size(element: &HtmlElement) -> Rect {
    Rect {
        width: f64::from(element.offset_width()),
        height: f64::from(element.offset_height()),
        ..Rect::default()
    }
}

/// Visible part of the page.
#[must_use]
pub fn viewport() -> Rect {
    let (left, top) = scroll_offsets();
    let (width, height) = document()
        .ok()
        .and_then(|doc| doc.document_element())
        .map_or((0.0, 0.0), |root| {
            (f64::from(root.client_width()), f64::from(root.client_height()))
        });
    Rect {
        left,
        top,
        width,
        height,
    }
}

fn scroll_offsets() -> (f64, f64) {
    window().map_or((0.0, 0.0), |win| {
        (
            win.page_x_offset().unwrap_or_default(),
            win.page_y_offset().unwrap_or_default(),
        )
    })
}

/// Create an element with the given classes.
///
/// # Errors
/// Returns an error if the document is unavailable or element creation fails.
pub fn create_with_classes(tag: &str, classes: &[&str]) -> Result<HtmlElement, WebError> {
    let element = document()?
        .create_element(tag)
        .map_err(|err| dom_err(&err))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| WebError::Dom(format!("<{tag}> is not an HtmlElement")))?;
    if !classes.is_empty() {
        element.set_class_name(&classes.join(" "));
    }
    Ok(element)
}

/// Closest ancestor-or-self matching `selector`.
#[must_use]
pub fn closest(element: &Element, selector: &str) -> Option<Element> {
    element.closest(selector).ok().flatten()
}
