//! Grid computation for one render pass.
//!
//! [`ViewBuilder::build`] turns the navigation anchor, the current view level
//! and the selection into a [`CalendarView`]: one [`CalendarInstance`] per
//! linked calendar, each holding the labeled, flagged cells the render adapter
//! materializes. Nothing here touches the DOM.

use serde::Serialize;

use crate::constants::{
    CLASS_BUTTON, CLASS_DISABLED, CLASS_NOT_IN_MONTH, CLASS_SATURDAY, CLASS_SECTION_DAYS,
    CLASS_SECTION_MONTHS, CLASS_SECTION_YEARS, CLASS_SELECTED, CLASS_SUNDAY, CLASS_TODAY,
    DAYS_GRID_CELLS, DAYS_PER_WEEK, MAX_ANCHOR_SHIFTS, MONTHS_PER_YEAR, YEARS_BEFORE_ANCHOR,
    YEARS_WINDOW,
};
use crate::date::DateValue;
use crate::format::DateCodec;
use crate::options::{Options, ViewLevel};
use crate::selection::{Bounds, Selection};

/// What a cell stands for when it is clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CellTag {
    Day { date: DateValue },
    Month { year: i32, month0: u32 },
    Year { year: i32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub label: String,
    pub tag: CellTag,
    pub disabled: bool,
    pub selected: bool,
    pub today: bool,
    pub outside_month: bool,
    pub sunday: bool,
    pub saturday: bool,
    /// Extra classes requested by the day render hook.
    pub extra_classes: Vec<String>,
}

impl Cell {
    fn plain(label: String, tag: CellTag) -> Self {
        Self {
            label,
            tag,
            disabled: false,
            selected: false,
            today: false,
            outside_month: false,
            sunday: false,
            saturday: false,
            extra_classes: Vec::new(),
        }
    }

    /// Marker classes in a stable order, button class first.
    #[must_use]
    pub fn class_names(&self) -> Vec<&str> {
        let mut classes = vec![CLASS_BUTTON];
        let flags = [
            (self.outside_month, CLASS_NOT_IN_MONTH),
            (self.sunday, CLASS_SUNDAY),
            (self.saturday, CLASS_SATURDAY),
            (self.today, CLASS_TODAY),
            (self.selected, CLASS_SELECTED),
            (self.disabled, CLASS_DISABLED),
        ];
        classes.extend(flags.iter().filter(|(on, _)| *on).map(|(_, class)| *class));
        classes.extend(self.extra_classes.iter().map(String::as_str));
        classes
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarInstance {
    pub index: usize,
    pub header: String,
    pub level: ViewLevel,
    pub cells: Vec<Cell>,
}

impl CalendarInstance {
    #[must_use]
    pub const fn section_class(&self) -> &'static str {
        match self.level {
            ViewLevel::Days => CLASS_SECTION_DAYS,
            ViewLevel::Months => CLASS_SECTION_MONTHS,
            ViewLevel::Years => CLASS_SECTION_YEARS,
        }
    }

    #[must_use]
    pub fn selected(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|cell| cell.selected)
    }
}

/// Everything the adapter needs to draw one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarView {
    pub level: ViewLevel,
    /// Anchor after empty-range avoidance; callers persist it.
    pub anchor: DateValue,
    pub instances: Vec<CalendarInstance>,
    pub show_prev: bool,
    pub show_next: bool,
    pub prev_label: String,
    pub next_label: String,
    /// Weekday row, rotated to the configured first day.
    pub weekdays: Vec<String>,
}

pub struct ViewBuilder<'a> {
    options: &'a Options,
    codec: &'a DateCodec,
}

impl<'a> ViewBuilder<'a> {
    #[must_use]
    pub const fn new(options: &'a Options, codec: &'a DateCodec) -> Self {
        Self { options, codec }
    }

    /// Compute every instance for `anchor` at `level`.
    #[must_use]
    pub fn build(
        &self,
        anchor: DateValue,
        level: ViewLevel,
        selection: &Selection,
        today: DateValue,
    ) -> CalendarView {
        let anchor = self.settle_anchor(anchor, level);
        let count = self.options.calendars.max(1);
        let bounds = self.options.bounds();

        let instances: Vec<CalendarInstance> = (0..count)
            .map(|index| {
                let local = self.instance_date(anchor, level, index);
                CalendarInstance {
                    index,
                    header: self.header(local, level),
                    level,
                    cells: match level {
                        ViewLevel::Days => self.day_cells(local, &bounds, selection, today),
                        ViewLevel::Months => month_cells(local.year(), &bounds, selection, self.codec),
                        ViewLevel::Years => year_cells(local.year(), &bounds, selection),
                    },
                }
            })
            .collect();

        let window_start = self.instance_date(anchor, level, 0).first_of_month();
        let window_end = self.instance_date(anchor, level, count - 1).last_of_month();
        let show_prev = bounds.min.is_none_or(|min| min < window_start);
        let show_next = bounds.max.is_none_or(|max| max > window_end);

        CalendarView {
            level,
            anchor,
            instances,
            show_prev,
            show_next,
            prev_label: self.options.prev.clone(),
            next_label: self.options.next.clone(),
            weekdays: self
                .codec
                .locale()
                .weekday_headers(self.options.first_day)
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }

    /// Date the `index`-th instance is centered on.
    #[must_use]
    pub fn instance_date(&self, anchor: DateValue, level: ViewLevel, index: usize) -> DateValue {
        let offset = signed(index) - signed(self.options.current_instance());
        match level {
            ViewLevel::Days => anchor.add_months(offset),
            ViewLevel::Months => anchor.add_years(offset),
            ViewLevel::Years => anchor.add_years(offset.saturating_mul(YEARS_WINDOW)),
        }
    }

    /// Move the anchor month by month until the shown window is not entirely
    /// outside the bounds, stopping before the direction would reverse.
    fn settle_anchor(&self, anchor: DateValue, level: ViewLevel) -> DateValue {
        let mut anchor = anchor;
        let mut direction = 0;
        for _ in 0..MAX_ANCHOR_SHIFTS {
            let step = self.required_shift(anchor, level);
            if step == 0 || (direction != 0 && step != direction) {
                break;
            }
            direction = step;
            anchor = anchor.add_months(step);
        }
        if direction != 0 {
            log::debug!("anchor moved to {anchor} to keep selectable dates in view");
        }
        anchor
    }

    fn required_shift(&self, anchor: DateValue, level: ViewLevel) -> i32 {
        let limits = self.options.bounds().month_ends();
        let first = self.instance_date(anchor, level, 0);
        let span = signed(self.options.calendars.max(1)) - 1;
        if let Some(max) = limits.max {
            let last = if self.options.select_day {
                first.add_months(span)
            } else if self.options.select_month {
                first.add_years(span)
            } else {
                first.add_years(span.saturating_mul(YEARS_WINDOW))
            };
            if last > max {
                return -1;
            }
        }
        if let Some(min) = limits.min
            && min > first.last_of_month()
        {
            return 1;
        }
        0
    }

    fn header(&self, local: DateValue, level: ViewLevel) -> String {
        match level {
            ViewLevel::Days => self.codec.format_with(local, &self.options.title_format),
            ViewLevel::Months => local.year().to_string(),
            ViewLevel::Years => {
                let first = local.year() - YEARS_BEFORE_ANCHOR;
                format!("{first} - {}", first + YEARS_WINDOW - 1)
            }
        }
    }

    fn day_cells(
        &self,
        local: DateValue,
        bounds: &Bounds,
        selection: &Selection,
        today: DateValue,
    ) -> Vec<Cell> {
        let first = local.first_of_month();
        let lead = (i64::from(first.weekday()) - i64::from(self.options.first_day))
            .rem_euclid(DAYS_PER_WEEK);
        let start = first.add_days(-lead);

        (0..DAYS_GRID_CELLS)
            .map(|offset| {
                let date = start.add_days(i64::try_from(offset).unwrap_or_default());
                let hook = self
                    .options
                    .render
                    .as_ref()
                    .map(|hook| hook.call(date))
                    .unwrap_or_default();
                let disabled = hook.disabled || !bounds.contains(date);
                let mut cell = Cell::plain(date.day().to_string(), CellTag::Day { date });
                cell.outside_month = date.month0() != first.month0();
                cell.sunday = date.weekday() == 0;
                cell.saturday = date.weekday() == 6;
                cell.today = date == today;
                cell.disabled = disabled;
                cell.selected = !disabled && (hook.selected || selection.is_day_selected(date));
                cell.extra_classes = hook
                    .class_name
                    .iter()
                    .flat_map(|names| names.split_whitespace())
                    .map(str::to_string)
                    .collect();
                cell
            })
            .collect()
    }
}

fn month_cells(year: i32, bounds: &Bounds, selection: &Selection, codec: &DateCodec) -> Vec<Cell> {
    (0..MONTHS_PER_YEAR)
        .map(|month0| {
            let before_min = bounds.min.is_some_and(|min| {
                year < min.year() || (year == min.year() && month0 < min.month0())
            });
            let after_max = bounds.max.is_some_and(|max| {
                year > max.year() || (year >= max.year() && month0 > max.month0())
            });
            let mut cell = Cell::plain(
                codec.locale().month_short(month0).to_string(),
                CellTag::Month { year, month0 },
            );
            cell.disabled = before_min || after_max;
            cell.selected = !cell.disabled && selection.is_month_selected(year, month0);
            cell
        })
        .collect()
}

fn year_cells(anchor_year: i32, bounds: &Bounds, selection: &Selection) -> Vec<Cell> {
    let first = anchor_year - YEARS_BEFORE_ANCHOR;
    (first..first + YEARS_WINDOW)
        .map(|year| {
            let mut cell = Cell::plain(year.to_string(), CellTag::Year { year });
            cell.disabled = bounds.min.is_some_and(|min| year < min.year())
                || bounds.max.is_some_and(|max| year > max.year());
            cell.selected = !cell.disabled && selection.is_year_selected(year);
            cell
        })
        .collect()
}

fn signed(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
