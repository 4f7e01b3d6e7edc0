//! DOM event wiring for an attached picker.

use pickmeup_core::PickerHandle;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::Closure;
use web_sys::{Element, Event, EventTarget, KeyboardEvent};

use crate::adapter::DomAdapter;
use crate::dom;
use crate::error::WebError;

type Handler = Closure<dyn FnMut(Event)>;

/// An owned event subscription that can be switched on and off.
pub struct Listener {
    target: EventTarget,
    event: &'static str,
    handler: Handler,
}

impl Listener {
    fn new(
        target: impl Into<EventTarget>,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Self {
        Self {
            target: target.into(),
            event,
            handler: Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>),
        }
    }

    pub fn attach(&self) {
        if let Err(err) = self
            .target
            .add_event_listener_with_callback(self.event, self.handler.as_ref().unchecked_ref())
        {
            log::warn!("could not listen for {}: {}", self.event, dom::js_error_message(&err));
        }
    }

    pub fn detach(&self) {
        if let Err(err) = self
            .target
            .remove_event_listener_with_callback(self.event, self.handler.as_ref().unchecked_ref())
        {
            log::warn!(
                "could not stop listening for {}: {}",
                self.event,
                dom::js_error_message(&err)
            );
        }
    }
}

fn event_element(event: &Event) -> Option<Element> {
    event.target().and_then(|target| target.dyn_into::<Element>().ok())
}

/// Subscribe the picker behind `handle` to its DOM events.
///
/// # Errors
/// Returns an error when the document or window is unavailable.
pub fn bind(handle: &PickerHandle<DomAdapter>, flat: bool) -> Result<(), WebError> {
    let Some((anchor, root)) =
        handle.with(|picker| (picker.adapter().anchor().clone(), picker.adapter().root().clone()))
    else {
        return Ok(());
    };
    let document = dom::document()?;
    let window = dom::window()?;

    let mut permanent = Vec::new();
    let mut while_open = Vec::new();

    let clicks = handle.clone();
    permanent.push(Listener::new(root.clone(), "click", move |event: Event| {
        let Some(target) = event_element(&event) else {
            return;
        };
        clicks.with(|picker| {
            if let Some(click) = picker.adapter().resolve_click(&target) {
                picker.click(click);
            }
        });
    }));
    permanent.push(Listener::new(root, "mousedown", |event: Event| {
        event.prevent_default();
    }));

    if !flat {
        let opener = handle.clone();
        permanent.push(Listener::new(anchor.clone(), "click", move |_| {
            opener.show(false);
        }));
        for name in ["input", "change"] {
            let updater = handle.clone();
            permanent.push(Listener::new(anchor.clone(), name, move |_| {
                updater.with(|picker| picker.input_changed());
            }));
        }
        let closer = handle.clone();
        permanent.push(Listener::new(anchor, "keydown", move |event: Event| {
            let is_tab = event
                .dyn_ref::<KeyboardEvent>()
                .is_some_and(|key| key.key() == "Tab");
            if is_tab {
                closer.with(|picker| picker.key_tab());
            }
        }));

        let outside = handle.clone();
        let document_root = document
            .document_element()
            .ok_or(WebError::MissingDocument)?;
        while_open.push(Listener::new(document_root, "click", move |event: Event| {
            outside.with(|picker| {
                if !picker.adapter().owns_event(&event) {
                    picker.outside_click();
                }
            });
        }));
        let resized = handle.clone();
        while_open.push(Listener::new(window, "resize", move |_| {
            resized.with(|picker| picker.viewport_resized());
        }));
    }

    handle.with(|picker| picker.adapter_mut().install(permanent, while_open));
    Ok(())
}
