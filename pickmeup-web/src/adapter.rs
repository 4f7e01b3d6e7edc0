//! `web-sys` implementation of the render adapter.

use js_sys::{Array, Function, Object, Reflect};
use pickmeup_core::constants::{
    CLASS_BUTTON, CLASS_DAY_OF_WEEK, CLASS_HEADER, CLASS_INSTANCE, CLASS_NEXT, CLASS_PREV,
};
use pickmeup_core::{
    CalendarInstance, CalendarView, ClickTarget, Geometry, PickerEvent, Point, RenderAdapter,
    ViewLevel,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CustomEvent, CustomEventInit, Element, Event, HtmlElement, HtmlInputElement};

use crate::binding::Listener;
use crate::dom;
use crate::error::WebError;

pub(crate) const ID_ATTR: &str = "data-pmu-id";
const INSTANCE_ATTR: &str = "data-pmu-instance";
const CELL_ATTR: &str = "data-pmu-cell";

/// Optional JavaScript markup hooks.
///
/// `shell(context)` returns the instance wrapper (an element or an HTML
/// string) holding `.pmu-prev`, `.pmu-month` and `.pmu-next`; `context` has
/// `prev`, `next`, `weekdays` and `level`. `content(cells, className)` returns
/// the element that holds the cell elements.
#[derive(Debug, Clone, Default)]
pub struct Templates {
    pub shell: Option<Function>,
    pub content: Option<Function>,
}

pub struct DomAdapter {
    anchor: Element,
    root: HtmlElement,
    input: Option<HtmlInputElement>,
    view: Option<CalendarView>,
    templates: Templates,
    permanent: Vec<Listener>,
    while_open: Vec<Listener>,
}

impl DomAdapter {
    /// Create the widget root and mount it: inside the anchor when `flat`,
    /// otherwise at the end of `<body>`.
    ///
    /// # Errors
    /// Returns an error if the root cannot be created or mounted.
    pub fn mount(anchor: Element, flat: bool) -> Result<Self, WebError> {
        let root = dom::create_with_classes("div", &[])?;
        let parent: Element = if flat {
            anchor.clone()
        } else {
            dom::document()?
                .body()
                .ok_or(WebError::MissingDocument)?
                .into()
        };
        parent
            .append_child(&root)
            .map_err(|err| dom::dom_err(&err))?;
        let input = anchor.dyn_ref::<HtmlInputElement>().cloned();
        Ok(Self {
            anchor,
            root,
            input,
            view: None,
            templates: Templates::default(),
            permanent: Vec::new(),
            while_open: Vec::new(),
        })
    }

    #[must_use]
    pub fn with_templates(mut self, templates: Templates) -> Self {
        self.templates = templates;
        self
    }

    #[must_use]
    pub const fn anchor(&self) -> &Element {
        &self.anchor
    }

    #[must_use]
    pub const fn root(&self) -> &HtmlElement {
        &self.root
    }

    /// Take ownership of the listeners; `while_open` ones are attached by
    /// [`RenderAdapter::set_open_listeners`].
    pub fn install(&mut self, permanent: Vec<Listener>, while_open: Vec<Listener>) {
        for listener in &permanent {
            listener.attach();
        }
        self.permanent = permanent;
        self.while_open = while_open;
    }

    /// Map a clicked element back to what it stands for in the last pass.
    #[must_use]
    pub fn resolve_click(&self, target: &Element) -> Option<ClickTarget> {
        let button = dom::closest(target, &format!(".{CLASS_BUTTON}"))?;
        let instance = dom::closest(&button, &format!(".{CLASS_INSTANCE}"))?
            .get_attribute(INSTANCE_ATTR)?
            .parse()
            .ok()?;
        let classes = button.class_list();
        if classes.contains(CLASS_PREV) {
            return Some(ClickTarget::Prev { instance });
        }
        if classes.contains(CLASS_NEXT) {
            return Some(ClickTarget::Next { instance });
        }
        if classes.contains(CLASS_HEADER) {
            return Some(ClickTarget::Header { instance });
        }
        let index: usize = button.get_attribute(CELL_ATTR)?.parse().ok()?;
        let cell = self.view.as_ref()?.instances.get(instance)?.cells.get(index)?;
        Some(ClickTarget::Cell {
            instance,
            tag: cell.tag,
            disabled: cell.disabled,
        })
    }

    /// Whether `event` passed through the widget or the anchor. The dispatch
    /// path is used because a render pass may already have detached the target.
    #[must_use]
    pub fn owns_event(&self, event: &Event) -> bool {
        let anchor: &JsValue = self.anchor.as_ref();
        let root: &JsValue = self.root.as_ref();
        event
            .composed_path()
            .iter()
            .any(|node| node == *anchor || node == *root)
    }

    fn build(&self, view: &CalendarView) -> Result<(), WebError> {
        self.root.set_inner_html("");
        for instance in &view.instances {
            let shell = match &self.templates.shell {
                Some(template) => custom_shell(template, view)?,
                None => default_shell(view, instance.level)?,
            };
            shell
                .class_list()
                .add_1(CLASS_INSTANCE)
                .map_err(|err| dom::dom_err(&err))?;
            shell
                .set_attribute(INSTANCE_ATTR, &instance.index.to_string())
                .map_err(|err| dom::dom_err(&err))?;
            fill_nav(&shell, view, instance)?;

            let mut cells = Vec::with_capacity(instance.cells.len());
            for (index, cell) in instance.cells.iter().enumerate() {
                let button = dom::create_with_classes("div", &cell.class_names())?;
                button.set_text_content(Some(&cell.label));
                button
                    .set_attribute(CELL_ATTR, &index.to_string())
                    .map_err(|err| dom::dom_err(&err))?;
                cells.push(button);
            }
            let section = match &self.templates.content {
                Some(template) => custom_content(template, &cells, instance.section_class())?,
                None => default_content(&cells, instance.section_class())?,
            };
            shell
                .append_child(&section)
                .map_err(|err| dom::dom_err(&err))?;
            self.root
                .append_child(&shell)
                .map_err(|err| dom::dom_err(&err))?;
        }
        Ok(())
    }
}

fn default_shell(view: &CalendarView, level: ViewLevel) -> Result<Element, WebError> {
    let shell = dom::create_with_classes("div", &[CLASS_INSTANCE])?;
    let nav = dom::create_with_classes("nav", &[])?;
    let prev = dom::create_with_classes("div", &[CLASS_PREV, CLASS_BUTTON])?;
    prev.set_inner_html(&view.prev_label);
    let header = dom::create_with_classes("div", &[CLASS_HEADER, CLASS_BUTTON])?;
    let next = dom::create_with_classes("div", &[CLASS_NEXT, CLASS_BUTTON])?;
    next.set_inner_html(&view.next_label);
    for part in [&prev, &header, &next] {
        nav.append_child(part).map_err(|err| dom::dom_err(&err))?;
    }
    shell.append_child(&nav).map_err(|err| dom::dom_err(&err))?;

    if level == ViewLevel::Days {
        let weekdays = dom::create_with_classes("div", &[CLASS_DAY_OF_WEEK])?;
        for name in &view.weekdays {
            let label = dom::create_with_classes("div", &[])?;
            label.set_text_content(Some(name));
            weekdays
                .append_child(&label)
                .map_err(|err| dom::dom_err(&err))?;
        }
        shell
            .append_child(&weekdays)
            .map_err(|err| dom::dom_err(&err))?;
    }
    Ok(shell.into())
}

fn custom_shell(template: &Function, view: &CalendarView) -> Result<Element, WebError> {
    let context = Object::new();
    let weekdays: Array = view
        .weekdays
        .iter()
        .map(|name| JsValue::from_str(name))
        .collect();
    for (key, value) in [
        ("prev", JsValue::from_str(&view.prev_label)),
        ("next", JsValue::from_str(&view.next_label)),
        ("weekdays", weekdays.into()),
        ("level", JsValue::from_str(view.level.as_str())),
    ] {
        Reflect::set(&context, &JsValue::from_str(key), &value)
            .map_err(|err| dom::dom_err(&err))?;
    }
    let produced = template
        .call1(&JsValue::NULL, &context)
        .map_err(|err| dom::dom_err(&err))?;
    if let Some(element) = produced.dyn_ref::<Element>() {
        return Ok(element.clone());
    }
    let markup = produced.as_string().ok_or_else(|| {
        WebError::Template("instance_template returned neither markup nor an element".into())
    })?;
    let holder = dom::create_with_classes("div", &[])?;
    holder.set_inner_html(&markup);
    holder
        .first_element_child()
        .ok_or_else(|| WebError::Template("instance_template markup has no element".into()))
}

/// Header text and prev/next visibility, wherever the shell put them.
fn fill_nav(
    shell: &Element,
    view: &CalendarView,
    instance: &CalendarInstance,
) -> Result<(), WebError> {
    let find = |class: &str| {
        shell
            .query_selector(&format!(".{class}"))
            .map_err(|err| dom::dom_err(&err))
    };
    if let Some(header) = find(CLASS_HEADER)? {
        header.set_text_content(Some(&instance.header));
    }
    for (class, shown) in [(CLASS_PREV, view.show_prev), (CLASS_NEXT, view.show_next)] {
        if let Some(button) = find(class)?.and_then(|el| el.dyn_into::<HtmlElement>().ok()) {
            set_visible(&button, shown);
        }
    }
    Ok(())
}

fn default_content(cells: &[HtmlElement], section_class: &str) -> Result<Element, WebError> {
    let section = dom::create_with_classes("div", &[section_class])?;
    for cell in cells {
        section
            .append_child(cell)
            .map_err(|err| dom::dom_err(&err))?;
    }
    Ok(section.into())
}

fn custom_content(
    template: &Function,
    cells: &[HtmlElement],
    section_class: &str,
) -> Result<Element, WebError> {
    let elements: Array = cells.iter().collect();
    template
        .call2(&JsValue::NULL, &elements, &JsValue::from_str(section_class))
        .map_err(|err| dom::dom_err(&err))?
        .dyn_into::<Element>()
        .map_err(|_| {
            WebError::Template("instance_content_template must return an element".into())
        })
}

fn set_visible(element: &HtmlElement, visible: bool) {
    let value = if visible { "visible" } else { "hidden" };
    if let Err(err) = element.style().set_property("visibility", value) {
        log::warn!("could not toggle visibility: {}", dom::js_error_message(&err));
    }
}

impl RenderAdapter for DomAdapter {
    fn render(&mut self, view: &CalendarView) {
        if let Err(err) = self.build(view) {
            log::error!("render failed: {err}");
        }
        self.view = Some(view.clone());
    }

    fn set_marker(&mut self, marker: &str, enabled: bool) {
        if let Err(err) = self.root.class_list().toggle_with_force(marker, enabled) {
            log::warn!("could not toggle {marker}: {}", dom::js_error_message(&err));
        }
    }

    fn geometry(&self) -> Option<Geometry> {
        Some(Geometry {
            anchor: dom::page_rect(&self.anchor),
            widget: dom::element_size(&self.root),
            viewport: dom::viewport(),
        })
    }

    fn move_to(&mut self, point: Point) {
        let style = self.root.style();
        let placed = style
            .set_property("top", &format!("{}px", point.top))
            .and_then(|()| style.set_property("left", &format!("{}px", point.left)));
        if let Err(err) = placed {
            log::warn!("could not position picker: {}", dom::js_error_message(&err));
        }
    }

    fn input_value(&self) -> Option<String> {
        self.input.as_ref().map(HtmlInputElement::value)
    }

    fn set_input_value(&mut self, value: &str) {
        if let Some(input) = &self.input {
            input.set_value(value);
        }
    }

    fn dispatch(&mut self, event: &PickerEvent) -> bool {
        let init = CustomEventInit::new();
        init.set_bubbles(false);
        init.set_cancelable(event.cancelable());
        if let PickerEvent::Change(detail) = event {
            match serde_wasm_bindgen::to_value(detail) {
                Ok(value) => init.set_detail(&value),
                Err(err) => log::warn!("change detail not serializable: {err}"),
            }
        }
        let dispatched = CustomEvent::new_with_event_init_dict(&event.dom_name(), &init)
            .and_then(|custom| self.anchor.dispatch_event(&custom));
        dispatched.unwrap_or_else(|err| {
            log::warn!(
                "could not dispatch {}: {}",
                event.dom_name(),
                dom::js_error_message(&err)
            );
            true
        })
    }

    fn set_open_listeners(&mut self, active: bool) {
        for listener in &self.while_open {
            if active {
                listener.attach();
            } else {
                listener.detach();
            }
        }
    }

    fn teardown(&mut self) {
        let mut retired = std::mem::take(&mut self.permanent);
        retired.append(&mut self.while_open);
        for listener in &retired {
            listener.detach();
        }
        self.root.remove();
        self.view = None;
        if let Err(err) = self.anchor.remove_attribute(ID_ATTR) {
            log::warn!("could not clear {ID_ATTR}: {}", dom::js_error_message(&err));
        }
        // Teardown may run inside one of these handlers; free them later.
        let release = Closure::once_into_js(move || drop(retired));
        let queued = dom::window().map(|window| window.queue_microtask(release.unchecked_ref()));
        if let Err(err) = queued {
            log::warn!("could not release listeners: {err}");
        }
    }
}
