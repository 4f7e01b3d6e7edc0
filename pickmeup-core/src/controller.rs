//! Interaction controller.
//!
//! [`Picker`] owns the mutable widget state (selection, navigation anchor,
//! view level, open flag) and turns host operations and pointer clicks into
//! state transitions followed by a render pass through its [`RenderAdapter`].

use crate::RenderAdapter;
use crate::constants::{CLASS_FLAT, CLASS_HIDDEN, CLASS_ROOT, YEARS_WINDOW};
use crate::date::{Clock, DateValue};
use crate::events::{ChangeDetail, Picked, PickerEvent};
use crate::format::{DateCodec, DateInput};
use crate::options::{Options, ViewLevel};
use crate::position::compute_position;
use crate::selection::{AssignRules, Selection, SelectionMode, SelectionModel};
use crate::view::{CalendarView, CellTag, ViewBuilder};

/// Element of the rendered widget that received a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Prev { instance: usize },
    Next { instance: usize },
    Header { instance: usize },
    Cell {
        instance: usize,
        tag: CellTag,
        disabled: bool,
    },
}

/// Shape of the value returned by [`Picker::get_date`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DateQuery {
    #[default]
    Raw,
    Formatted,
    Pattern(String),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum DateReport {
    Raw(Picked<DateValue>),
    Text(Picked<String>),
}

pub struct Picker<A: RenderAdapter> {
    options: Options,
    codec: DateCodec,
    selection: SelectionModel,
    anchor: DateValue,
    view: ViewLevel,
    open: bool,
    rendering: bool,
    clock: Box<dyn Clock>,
    adapter: A,
}

impl<A: RenderAdapter> Picker<A> {
    /// Attach a widget: apply root markers, load the initial selection and
    /// render once.
    pub fn new(options: Options, adapter: A, clock: Box<dyn Clock>) -> Self {
        let today = clock.today();
        let mut picker = Self {
            codec: options.codec(),
            selection: SelectionModel::new(options.mode, today),
            anchor: today.first_of_month(),
            view: options.view,
            open: options.flat,
            rendering: false,
            clock,
            adapter,
            options,
        };
        picker.adapter.set_marker(CLASS_ROOT, true);
        if !picker.options.class_name.is_empty() {
            let extra = picker.options.class_name.clone();
            for class in extra.split_whitespace() {
                picker.adapter.set_marker(class, true);
            }
        }
        picker.adapter.set_marker(CLASS_FLAT, picker.options.flat);
        picker.adapter.set_marker(CLASS_HIDDEN, !picker.options.flat);

        let date = picker
            .options
            .date
            .clone()
            .unwrap_or(DateInput::Date(today));
        let current = picker.options.current.clone();
        picker.set_date(&date, current.as_ref());
        log::debug!(
            "picker attached: mode={} view={} flat={}",
            picker.options.mode,
            picker.view,
            picker.options.flat
        );
        picker
    }

    #[must_use]
    pub const fn options(&self) -> &Options {
        &self.options
    }

    #[must_use]
    pub const fn codec(&self) -> &DateCodec {
        &self.codec
    }

    #[must_use]
    pub const fn selection(&self) -> &Selection {
        self.selection.selection()
    }

    #[must_use]
    pub const fn anchor(&self) -> DateValue {
        self.anchor
    }

    #[must_use]
    pub const fn view_level(&self) -> ViewLevel {
        self.view
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub const fn adapter(&self) -> &A {
        &self.adapter
    }

    pub const fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    fn today(&self) -> DateValue {
        self.clock.today()
    }

    /// Compute the grids for the current state without rendering them.
    #[must_use]
    pub fn view(&self) -> CalendarView {
        ViewBuilder::new(&self.options, &self.codec).build(
            self.anchor,
            self.view,
            self.selection.selection(),
            self.today(),
        )
    }

    /// Render pass. Calls made while a pass is running are dropped.
    pub fn fill(&mut self) {
        if self.rendering {
            log::debug!("render requested during a render pass; skipped");
            return;
        }
        self.rendering = true;
        let view = self.view();
        self.anchor = view.anchor;
        for level in [ViewLevel::Days, ViewLevel::Months, ViewLevel::Years] {
            self.adapter.set_marker(level.class_name(), level == self.view);
        }
        self.adapter.render(&view);
        self.adapter.dispatch(&PickerEvent::Fill);
        self.rendering = false;
    }

    /// Open the widget; `force` re-runs the sequence on an open widget.
    pub fn show(&mut self, force: bool) {
        if !force && self.open {
            return;
        }
        self.fill();
        if let Some(value) = self.adapter.input_value()
            && !value.is_empty()
        {
            self.set_date(&DateInput::Text(value), None);
        }
        self.selection.reset_range_progress();
        if !self.adapter.dispatch(&PickerEvent::Show) {
            log::debug!("show cancelled by listener");
            return;
        }
        if !self.options.flat {
            if let Some(geometry) = self.adapter.geometry() {
                let point = compute_position(self.options.position, &geometry);
                self.adapter.move_to(point);
            }
            self.adapter.set_open_listeners(true);
        }
        self.adapter.set_marker(CLASS_HIDDEN, false);
        self.open = true;
    }

    pub fn hide(&mut self) {
        if !self.adapter.dispatch(&PickerEvent::Hide) {
            log::debug!("hide cancelled by listener");
            return;
        }
        self.adapter.set_marker(CLASS_HIDDEN, true);
        self.adapter.set_open_listeners(false);
        self.selection.reset_range_progress();
        self.open = false;
    }

    pub fn toggle_open_state(&mut self) {
        if self.open && !self.options.flat {
            self.hide();
        } else {
            self.show(false);
        }
    }

    /// Re-run the show sequence so position and typed input are refreshed.
    pub fn force_reposition(&mut self) {
        self.adapter.set_open_listeners(false);
        self.show(true);
    }

    /// Empty a Multiple or Range selection; Single keeps its date.
    pub fn clear_selection(&mut self) {
        if self.selection.clear() {
            self.fill();
        }
    }

    pub fn page_prev(&mut self, rerender: bool) {
        self.page(-1, rerender);
    }

    pub fn page_next(&mut self, rerender: bool) {
        self.page(1, rerender);
    }

    fn page(&mut self, direction: i32, rerender: bool) {
        self.anchor = match self.view {
            ViewLevel::Days => self.anchor.add_months(direction),
            ViewLevel::Months => self.anchor.add_years(direction),
            ViewLevel::Years => self.anchor.add_years(direction * YEARS_WINDOW),
        };
        if rerender {
            self.fill();
        }
    }

    #[must_use]
    pub fn get_date(&self, query: &DateQuery) -> DateReport {
        let dates = self.selection.dates();
        let mode = self.selection.mode();
        match query {
            DateQuery::Raw => DateReport::Raw(Picked::for_mode(mode, dates)),
            DateQuery::Formatted => DateReport::Text(Picked::for_mode(
                mode,
                dates.into_iter().map(|date| self.codec.format(date)).collect(),
            )),
            DateQuery::Pattern(pattern) => DateReport::Text(Picked::for_mode(
                mode,
                dates
                    .into_iter()
                    .map(|date| self.codec.format_with(date, pattern))
                    .collect(),
            )),
        }
    }

    /// Replace the selection from host input and move the anchor to
    /// `current`, else the last selected date, else today.
    pub fn set_date(&mut self, input: &DateInput, current: Option<&DateInput>) {
        let now = self.clock.now();
        let today = self.today();
        let parsed = self.codec.parse(input, now);
        let rules = AssignRules {
            bounds: self.options.bounds(),
            day_selection: self.options.select_day,
        };
        self.selection.assign(&parsed, rules, today);

        let anchor = current
            .and_then(|current| self.codec.parse(current, now).first().copied())
            .or_else(|| self.selection.selection().last())
            .unwrap_or(today);
        self.anchor = anchor.first_of_month();
        self.fill();

        if self.options.default_date
            && let Some(existing) = self.adapter.input_value()
        {
            let value = self.formatted_value();
            if existing.is_empty() {
                let detail = self.change_detail();
                self.adapter.dispatch(&PickerEvent::Change(detail));
            }
            if existing != value {
                self.adapter.set_input_value(&value);
            }
        }
    }

    /// Handle a click inside the widget; returns whether anything happened.
    pub fn click(&mut self, target: ClickTarget) -> bool {
        match target {
            ClickTarget::Cell { disabled: true, .. } => return false,
            ClickTarget::Prev { .. } => self.page_prev(false),
            ClickTarget::Next { .. } => self.page_next(false),
            ClickTarget::Header { instance } => self.header_clicked(instance),
            ClickTarget::Cell { instance, tag, .. } => self.cell_clicked(instance, tag),
        }
        self.fill();
        true
    }

    /// A click landed outside both the widget and its anchor.
    pub fn outside_click(&mut self) {
        if self.open && !self.options.flat {
            self.hide();
        }
    }

    pub fn key_tab(&mut self) {
        if !self.options.flat {
            self.hide();
        }
    }

    /// The anchor's value changed through typing or a change event.
    pub fn input_changed(&mut self) {
        self.force_reposition();
    }

    pub fn viewport_resized(&mut self) {
        if self.open && !self.options.flat {
            self.show(true);
        }
    }

    /// Detach and hand back the adapter so the host can tear down its markup.
    pub fn destroy(mut self) -> A {
        self.adapter.set_open_listeners(false);
        self.adapter.teardown();
        self.adapter
    }

    fn instance_offset(&self, instance: usize) -> i32 {
        let to_i32 = |value: usize| i32::try_from(value).unwrap_or(i32::MAX);
        to_i32(instance) - to_i32(self.options.current_instance())
    }

    fn header_clicked(&mut self, instance: usize) {
        self.anchor = self.anchor.add_months(self.instance_offset(instance));
        let options = &self.options;
        self.view = match self.view {
            ViewLevel::Years => {
                if let Some(last) = self.selection.selection().last() {
                    self.anchor = last.first_of_month();
                }
                if options.select_day {
                    ViewLevel::Days
                } else if options.select_month {
                    ViewLevel::Months
                } else {
                    ViewLevel::Years
                }
            }
            ViewLevel::Months if options.select_year => ViewLevel::Years,
            ViewLevel::Months if options.select_day => ViewLevel::Days,
            ViewLevel::Days if options.select_month => ViewLevel::Months,
            ViewLevel::Days if options.select_year => ViewLevel::Years,
            unchanged => unchanged,
        };
        log::debug!("header click: now showing {}", self.view);
    }

    fn cell_clicked(&mut self, instance: usize, tag: CellTag) {
        match tag {
            CellTag::Year { year } => {
                self.anchor = self.anchor.with_year(year);
                if self.options.select_month {
                    self.view = ViewLevel::Months;
                } else if self.options.select_day {
                    self.view = ViewLevel::Days;
                } else {
                    self.commit(self.anchor);
                }
            }
            CellTag::Month { year, month0 } => {
                self.anchor = self.anchor.with_year(year).with_month0(month0);
                if self.options.select_day {
                    self.view = ViewLevel::Days;
                } else {
                    self.commit(self.anchor);
                }
                self.anchor = self.anchor.add_months(-self.instance_offset(instance));
            }
            CellTag::Day { date } => self.commit(date),
        }
    }

    fn commit(&mut self, date: DateValue) {
        self.selection.apply(date);
        if self.adapter.input_value().is_some() {
            let value = self.formatted_value();
            self.adapter.set_input_value(&value);
        }
        let detail = self.change_detail();
        log::debug!("selection changed to {:?}", detail.formatted_date);
        self.adapter.dispatch(&PickerEvent::Change(detail));
        if !self.options.flat
            && self.options.hide_on_select
            && (self.selection.mode() != SelectionMode::Range
                || !self.selection.awaiting_range_end())
        {
            self.hide();
        }
    }

    fn formatted_value(&self) -> String {
        self.codec.format_joined(&self.selection.dates())
    }

    fn change_detail(&self) -> ChangeDetail {
        let dates = self.selection.dates();
        let mode = self.selection.mode();
        ChangeDetail {
            formatted_date: Picked::for_mode(
                mode,
                dates.iter().map(|date| self.codec.format(*date)).collect(),
            ),
            date: Picked::for_mode(mode, dates),
        }
    }
}
