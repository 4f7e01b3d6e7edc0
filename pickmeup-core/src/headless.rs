//! In-memory rendering surface.
//!
//! Keeps the last rendered view, the marker set, emitted notifications and a
//! simulated input value. Used by the yew component, the terminal preview and
//! the tests.

use std::collections::BTreeSet;

use crate::RenderAdapter;
use crate::events::PickerEvent;
use crate::position::{Geometry, Point};
use crate::view::CalendarView;

#[derive(Debug, Clone, Default)]
pub struct RecordingAdapter {
    view: Option<CalendarView>,
    renders: usize,
    markers: BTreeSet<String>,
    events: Vec<PickerEvent>,
    vetoed: BTreeSet<&'static str>,
    input: Option<String>,
    geometry: Option<Geometry>,
    placed_at: Option<Point>,
    listening: bool,
    torn_down: bool,
}

impl RecordingAdapter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a text input anchor holding `value`.
    #[must_use]
    pub fn with_input(mut self, value: &str) -> Self {
        self.input = Some(value.to_string());
        self
    }

    #[must_use]
    pub const fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Move the simulated boxes, as a resize or scroll would.
    pub const fn set_geometry(&mut self, geometry: Geometry) {
        self.geometry = Some(geometry);
    }

    /// Make listeners cancel every future `name` notification.
    pub fn veto(&mut self, name: &'static str) {
        self.vetoed.insert(name);
    }

    pub fn allow(&mut self, name: &'static str) {
        self.vetoed.remove(name);
    }

    /// Overwrite the simulated input, as typing would.
    pub fn type_input(&mut self, value: &str) {
        self.input = Some(value.to_string());
    }

    #[must_use]
    pub const fn view(&self) -> Option<&CalendarView> {
        self.view.as_ref()
    }

    #[must_use]
    pub const fn render_count(&self) -> usize {
        self.renders
    }

    #[must_use]
    pub fn has_marker(&self, marker: &str) -> bool {
        self.markers.contains(marker)
    }

    #[must_use]
    pub fn markers(&self) -> Vec<&str> {
        self.markers.iter().map(String::as_str).collect()
    }

    #[must_use]
    pub fn events(&self) -> &[PickerEvent] {
        &self.events
    }

    /// Names of the notifications emitted so far, `fill` excluded.
    #[must_use]
    pub fn event_names(&self) -> Vec<&'static str> {
        self.events
            .iter()
            .map(PickerEvent::name)
            .filter(|name| *name != "fill")
            .collect()
    }

    pub fn take_events(&mut self) -> Vec<PickerEvent> {
        std::mem::take(&mut self.events)
    }

    #[must_use]
    pub fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    #[must_use]
    pub const fn placed_at(&self) -> Option<Point> {
        self.placed_at
    }

    #[must_use]
    pub const fn is_listening(&self) -> bool {
        self.listening
    }

    #[must_use]
    pub const fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

impl RenderAdapter for RecordingAdapter {
    fn render(&mut self, view: &CalendarView) {
        self.view = Some(view.clone());
        self.renders += 1;
    }

    fn set_marker(&mut self, marker: &str, enabled: bool) {
        if enabled {
            self.markers.insert(marker.to_string());
        } else {
            self.markers.remove(marker);
        }
    }

    fn geometry(&self) -> Option<Geometry> {
        self.geometry
    }

    fn move_to(&mut self, point: Point) {
        self.placed_at = Some(point);
    }

    fn input_value(&self) -> Option<String> {
        self.input.clone()
    }

    fn set_input_value(&mut self, value: &str) {
        if self.input.is_some() {
            self.input = Some(value.to_string());
        }
    }

    fn dispatch(&mut self, event: &PickerEvent) -> bool {
        self.events.push(event.clone());
        !(event.cancelable() && self.vetoed.contains(event.name()))
    }

    fn set_open_listeners(&mut self, active: bool) {
        self.listening = active;
    }

    fn teardown(&mut self) {
        self.torn_down = true;
        self.listening = false;
    }
}
