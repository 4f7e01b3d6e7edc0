//! PickMeUp Engine
//!
//! Platform-agnostic core of the PickMeUp date picker: calendar arithmetic,
//! locale-aware formatting and parsing, selection rules, grid computation and
//! the interaction controller. Rendering is delegated to a [`RenderAdapter`].

pub mod constants;
pub mod controller;
pub mod date;
pub mod error;
pub mod events;
pub mod format;
pub mod headless;
pub mod locale;
pub mod options;
pub mod position;
pub mod selection;
pub mod view;
pub mod widget;

// Re-export commonly used types
pub use controller::{ClickTarget, DateQuery, DateReport, Picker};
pub use date::{Clock, DateValue, FixedClock, SystemClock, days_in_month, truncate_to_day};
pub use error::OptionError;
pub use events::{ChangeDetail, Picked, PickerEvent};
pub use format::{DateCodec, DateInput, format_date, format_datetime};
pub use headless::RecordingAdapter;
pub use locale::Locale;
pub use options::{
    DayRender, DayRenderHook, OptionLayer, Options, Position, ViewLevel, correct_view,
};
pub use position::{Geometry, Point, Rect, compute_position};
pub use selection::{Bounds, DateRange, Selection, SelectionMode, SelectionModel};
pub use view::{CalendarInstance, CalendarView, Cell, CellTag, ViewBuilder};
pub use widget::{PickerHandle, Registry};

/// Trait for abstracting the surface a picker renders into
/// Platform-specific implementations should provide this
pub trait RenderAdapter {
    /// Materialize one render pass
    fn render(&mut self, view: &CalendarView);

    /// Add or remove a marker class on the widget root
    fn set_marker(&mut self, marker: &str, enabled: bool);

    /// Page-relative boxes used for placement, if the surface has any
    fn geometry(&self) -> Option<Geometry>;

    fn move_to(&mut self, point: Point);

    /// Current value of the anchor when it is a text input
    fn input_value(&self) -> Option<String>;

    fn set_input_value(&mut self, value: &str);

    /// Emit a notification; returns `false` when a listener cancelled it
    fn dispatch(&mut self, event: &PickerEvent) -> bool;

    /// Start or stop listening for outside clicks and viewport resizes
    fn set_open_listeners(&mut self, _active: bool) {}

    /// Remove everything the adapter added to the host
    fn teardown(&mut self) {}
}

/// Resolve options from the attribute and explicit layers and attach a picker.
pub fn attach<A: RenderAdapter>(
    adapter: A,
    attributes: OptionLayer,
    explicit: OptionLayer,
    clock: Box<dyn Clock>,
) -> Picker<A> {
    let options = Options::resolve(attributes, explicit, clock.as_ref());
    Picker::new(options, adapter, clock)
}
