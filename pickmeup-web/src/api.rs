//! JavaScript entry points.
//!
//! `pickmeup(target, options)` attaches a picker to an element and returns a
//! [`PickMeUp`] handle. Pickers are kept in a per-thread registry keyed by an
//! id stored on the anchor, so attaching twice yields the same instance.

use std::cell::{Cell, RefCell};

use js_sys::{Array, Function, Object, Reflect};
use pickmeup_core::{
    DateInput, DateQuery, DateReport, DateValue, DayRender, DayRenderHook, OptionLayer, Options,
    Picked, Picker, PickerHandle, Registry, SystemClock,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::adapter::{DomAdapter, ID_ATTR, Templates};
use crate::binding;
use crate::dom;
use crate::error::WebError;

const DATE_KEYS: [&str; 4] = ["date", "current", "min", "max"];
const FUNCTION_KEYS: [&str; 5] = [
    "render",
    "instance_template",
    "instanceTemplate",
    "instance_content_template",
    "instanceContentTemplate",
];

thread_local! {
    static REGISTRY: RefCell<Registry<u32, DomAdapter>> = RefCell::new(Registry::new());
    static NEXT_ID: Cell<u32> = const { Cell::new(1) };
}

/// Attach a date picker to `target` (a CSS selector or an element).
///
/// # Errors
/// Returns a JavaScript error when the target cannot be found, the options
/// object is malformed or the widget cannot be mounted.
#[wasm_bindgen(js_name = pickmeup)]
pub fn attach(target: JsValue, options: JsValue) -> Result<PickMeUp, JsValue> {
    let anchor = dom::resolve_target(&target)?;
    if let Some(existing) = existing_picker(&anchor) {
        return Ok(existing);
    }

    let explicit = option_layer(&options)?;
    let attributes = OptionLayer::from_attributes(
        dom::attributes(&anchor)
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str())),
    );
    let clock = SystemClock;
    let resolved = Options::resolve(attributes, explicit, &clock);
    let flat = resolved.flat;

    let key = NEXT_ID.with(|next| {
        let id = next.get();
        next.set(id.wrapping_add(1));
        id
    });
    anchor
        .set_attribute(ID_ATTR, &key.to_string())
        .map_err(|err| dom::dom_err(&err))?;
    let adapter = DomAdapter::mount(anchor, flat)?.with_templates(templates(&options));
    // Built outside the registry borrow: the first render already emits events.
    let picker = Picker::new(resolved, adapter, Box::new(clock));
    let handle = REGISTRY.with(|registry| registry.borrow_mut().attach(key, move || picker));
    binding::bind(&handle, flat)?;
    log::debug!("pickmeup attached as #{key}");
    Ok(PickMeUp { key, handle })
}

fn existing_picker(anchor: &Element) -> Option<PickMeUp> {
    let key: u32 = anchor.get_attribute(ID_ATTR)?.parse().ok()?;
    let handle = REGISTRY.with(|registry| registry.borrow().get(&key))?;
    Some(PickMeUp { key, handle })
}

/// Read a JavaScript options object into a configuration layer. Date-valued
/// keys and the `render` callback are taken apart because they may hold
/// `Date` objects and functions.
fn option_layer(options: &JsValue) -> Result<OptionLayer, WebError> {
    if options.is_undefined() || options.is_null() {
        return Ok(OptionLayer::default());
    }
    let plain = Object::assign(&Object::new(), options.unchecked_ref());
    for key in DATE_KEYS.iter().chain(&FUNCTION_KEYS) {
        let _ = Reflect::delete_property(&plain, &JsValue::from_str(key));
    }
    let mut layer: OptionLayer = serde_wasm_bindgen::from_value(plain.into())
        .map_err(|err| WebError::Options(err.to_string()))?;

    let field = |key: &str| Reflect::get(options, &JsValue::from_str(key)).ok();
    layer.date = field("date").and_then(|value| date_input(&value));
    layer.current = field("current").and_then(|value| date_input(&value));
    layer.min = field("min").and_then(|value| date_input(&value));
    layer.max = field("max").and_then(|value| date_input(&value));
    if let Some(render) = field("render").and_then(|value| value.dyn_into::<Function>().ok()) {
        layer.render = Some(render_hook(render));
    }
    Ok(layer)
}

/// `instance_template` and `instance_content_template` hooks, snake or camel case.
fn templates(options: &JsValue) -> Templates {
    let function = |names: [&str; 2]| {
        names.iter().find_map(|name| {
            Reflect::get(options, &JsValue::from_str(name))
                .ok()
                .and_then(|value| value.dyn_into::<Function>().ok())
        })
    };
    if options.is_undefined() || options.is_null() {
        return Templates::default();
    }
    Templates {
        shell: function(["instance_template", "instanceTemplate"]),
        content: function(["instance_content_template", "instanceContentTemplate"]),
    }
}

fn date_input(value: &JsValue) -> Option<DateInput> {
    if value.is_undefined() || value.is_null() {
        return None;
    }
    if let Some(date) = value.dyn_ref::<js_sys::Date>() {
        return from_js_date(date).map(DateInput::Date);
    }
    if let Some(items) = value.dyn_ref::<Array>() {
        return Some(DateInput::List(
            items.iter().filter_map(|item| date_input(&item)).collect(),
        ));
    }
    value.as_string().map(DateInput::Text)
}

fn from_js_date(date: &js_sys::Date) -> Option<DateValue> {
    DateValue::from_ymd(
        i32::try_from(date.get_full_year()).ok()?,
        date.get_month(),
        date.get_date(),
    )
}

fn to_js_date(date: DateValue) -> js_sys::Date {
    js_sys::Date::new_with_year_month_day(
        u32::try_from(date.year()).unwrap_or_default(),
        i32::try_from(date.month0()).unwrap_or_default(),
        i32::try_from(date.day()).unwrap_or(1),
    )
}

fn render_hook(callback: Function) -> DayRenderHook {
    DayRenderHook::new(move |date| {
        callback
            .call1(&JsValue::NULL, &to_js_date(date))
            .ok()
            .filter(|value| !value.is_undefined() && !value.is_null())
            .and_then(|value| serde_wasm_bindgen::from_value::<DayRender>(value).ok())
            .unwrap_or_default()
    })
}

fn picked_to_js<T>(picked: Picked<T>, convert: impl Fn(T) -> JsValue) -> JsValue {
    match picked {
        Picked::One(value) => convert(value),
        Picked::Many(values) => values.into_iter().map(convert).collect::<Array>().into(),
    }
}

/// Operations on an attached picker. Every call is a no-op once the picker
/// has been destroyed.
#[wasm_bindgen]
pub struct PickMeUp {
    key: u32,
    handle: PickerHandle<DomAdapter>,
}

#[wasm_bindgen]
impl PickMeUp {
    pub fn show(&self, force: Option<bool>) {
        self.handle.show(force.unwrap_or(false));
    }

    pub fn hide(&self) {
        self.handle.hide();
    }

    #[wasm_bindgen(js_name = toggleOpenState)]
    pub fn toggle_open_state(&self) {
        self.handle.toggle_open_state();
    }

    /// Reposition and re-read the anchor's value.
    pub fn update(&self) {
        self.handle.force_reposition();
    }

    pub fn clear(&self) {
        self.handle.clear_selection();
    }

    pub fn prev(&self, fill: Option<bool>) {
        self.handle.page_prev(fill.unwrap_or(true));
    }

    pub fn next(&self, fill: Option<bool>) {
        self.handle.page_next(fill.unwrap_or(true));
    }

    /// `formatted` may be `true`, a format string, or omitted for `Date` values.
    #[wasm_bindgen(js_name = getDate)]
    pub fn get_date(&self, formatted: JsValue) -> JsValue {
        let query = formatted.as_string().map_or_else(
            || {
                if formatted.is_truthy() {
                    DateQuery::Formatted
                } else {
                    DateQuery::Raw
                }
            },
            DateQuery::Pattern,
        );
        match self.handle.get_date(&query) {
            Some(DateReport::Raw(dates)) => picked_to_js(dates, |date| to_js_date(date).into()),
            Some(DateReport::Text(text)) => picked_to_js(text, |value| JsValue::from_str(&value)),
            None => JsValue::UNDEFINED,
        }
    }

    #[wasm_bindgen(js_name = setDate)]
    pub fn set_date(&self, date: JsValue, current: JsValue) {
        let Some(input) = date_input(&date) else {
            log::warn!("setDate ignored a value that is not a date, string or array");
            return;
        };
        let current = date_input(&current);
        self.handle.set_date(&input, current.as_ref());
    }

    pub fn fill(&self) {
        self.handle.fill();
    }

    /// Remove the widget and all of its listeners. Called from one of the
    /// widget's own event listeners, the removal completes when that event
    /// has been handled.
    pub fn destroy(&self) {
        REGISTRY.with(|registry| registry.borrow_mut().destroy(&self.key));
    }
}
