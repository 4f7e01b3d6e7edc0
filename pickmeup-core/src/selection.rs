//! Selection state and the mode-specific rules for changing it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::date::DateValue;
use crate::error::OptionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    #[default]
    Single,
    Multiple,
    Range,
}

impl SelectionMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Multiple => "multiple",
            Self::Range => "range",
        }
    }
}

impl FromStr for SelectionMode {
    type Err = OptionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "multiple" => Ok(Self::Multiple),
            "range" => Ok(Self::Range),
            _ => Err(OptionError::UnknownVariant {
                field: "mode",
                value: value.to_string(),
            }),
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional earliest/latest selectable dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub min: Option<DateValue>,
    pub max: Option<DateValue>,
}

impl Bounds {
    #[must_use]
    pub const fn new(min: Option<DateValue>, max: Option<DateValue>) -> Self {
        Self { min, max }
    }

    /// Replace out-of-range dates by the violated bound.
    #[must_use]
    pub fn clamp(&self, date: DateValue) -> DateValue {
        match (self.min, self.max) {
            (Some(min), _) if date < min => min,
            (_, Some(max)) if date > max => max,
            _ => date,
        }
    }

    #[must_use]
    pub fn contains(&self, date: DateValue) -> bool {
        self.min.is_none_or(|min| date >= min) && self.max.is_none_or(|max| date <= max)
    }

    /// Both bounds moved to the last day of their month.
    #[must_use]
    pub fn month_ends(&self) -> Self {
        Self {
            min: self.min.map(DateValue::last_of_month),
            max: self.max.map(DateValue::last_of_month),
        }
    }
}

/// Inclusive pair with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: DateValue,
    end: DateValue,
}

impl DateRange {
    /// Order the two ends so the invariant holds.
    #[must_use]
    pub fn new(a: DateValue, b: DateValue) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    #[must_use]
    pub const fn start(&self) -> DateValue {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> DateValue {
        self.end
    }

    #[must_use]
    pub fn contains(&self, date: DateValue) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Single(DateValue),
    Multiple(Vec<DateValue>),
    /// `None` once cleared.
    Range(Option<DateRange>),
}

impl Selection {
    #[must_use]
    pub const fn mode(&self) -> SelectionMode {
        match self {
            Self::Single(_) => SelectionMode::Single,
            Self::Multiple(_) => SelectionMode::Multiple,
            Self::Range(_) => SelectionMode::Range,
        }
    }

    /// Selected dates in storage order.
    #[must_use]
    pub fn dates(&self) -> Vec<DateValue> {
        match self {
            Self::Single(date) => vec![*date],
            Self::Multiple(dates) => dates.clone(),
            Self::Range(range) => range
                .map(|range| vec![range.start, range.end])
                .unwrap_or_default(),
        }
    }

    #[must_use]
    pub fn last(&self) -> Option<DateValue> {
        match self {
            Self::Single(date) => Some(*date),
            Self::Multiple(dates) => dates.last().copied(),
            Self::Range(range) => range.map(|range| range.end),
        }
    }

    #[must_use]
    pub fn is_year_selected(&self, year: i32) -> bool {
        match self {
            Self::Single(date) => date.year() == year,
            Self::Multiple(dates) => dates.iter().any(|date| date.year() == year),
            Self::Range(range) => {
                range.is_some_and(|r| r.start.year() <= year && year <= r.end.year())
            }
        }
    }

    /// Range selection covers whole years between its ends; the boundary
    /// years are gated by month.
    #[must_use]
    pub fn is_month_selected(&self, year: i32, month0: u32) -> bool {
        let matches = |date: &DateValue| date.year() == year && date.month0() == month0;
        match self {
            Self::Single(date) => matches(date),
            Self::Multiple(dates) => dates.iter().any(matches),
            Self::Range(None) => false,
            Self::Range(Some(range)) => {
                let (first_year, last_year) = (range.start.year(), range.end.year());
                let (first_month, last_month) = (range.start.month0(), range.end.month0());
                (year > first_year && year < last_year)
                    || (year == first_year && year < last_year && month0 >= first_month)
                    || (year > first_year && year == last_year && month0 <= last_month)
                    || (year == first_year
                        && year == last_year
                        && month0 >= first_month
                        && month0 <= last_month)
            }
        }
    }

    #[must_use]
    pub fn is_day_selected(&self, date: DateValue) -> bool {
        match self {
            Self::Single(selected) => *selected == date,
            Self::Multiple(dates) => dates.contains(&date),
            Self::Range(range) => range.is_some_and(|range| range.contains(date)),
        }
    }
}

/// Rules applied whenever the selection is assigned programmatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignRules {
    pub bounds: Bounds,
    pub day_selection: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionModel {
    selection: Selection,
    awaiting_range_end: bool,
}

impl SelectionModel {
    #[must_use]
    pub fn new(mode: SelectionMode, today: DateValue) -> Self {
        let selection = match mode {
            SelectionMode::Single => Selection::Single(today),
            SelectionMode::Multiple => Selection::Multiple(vec![today]),
            SelectionMode::Range => Selection::Range(Some(DateRange::new(today, today))),
        };
        Self {
            selection,
            awaiting_range_end: false,
        }
    }

    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub const fn mode(&self) -> SelectionMode {
        self.selection.mode()
    }

    #[must_use]
    pub fn dates(&self) -> Vec<DateValue> {
        self.selection.dates()
    }

    /// True between the two clicks that assemble a range.
    #[must_use]
    pub const fn awaiting_range_end(&self) -> bool {
        self.awaiting_range_end
    }

    pub fn reset_range_progress(&mut self) {
        self.awaiting_range_end = false;
    }

    /// Commit a picked date according to the selection mode.
    pub fn apply(&mut self, candidate: DateValue) {
        match &mut self.selection {
            Selection::Single(date) => *date = candidate,
            Selection::Multiple(dates) => {
                if let Some(idx) = dates.iter().position(|date| *date == candidate) {
                    dates.remove(idx);
                } else {
                    dates.push(candidate);
                }
            }
            Selection::Range(range) => {
                let start = match range {
                    Some(current) if self.awaiting_range_end => current.start,
                    _ => candidate,
                };
                *range = Some(DateRange::new(candidate, start));
                self.awaiting_range_end = !self.awaiting_range_end;
            }
        }
    }

    /// Empty the selection; Single mode always keeps its date.
    pub fn clear(&mut self) -> bool {
        let cleared = match &mut self.selection {
            Selection::Single(_) => return false,
            Selection::Multiple(dates) => {
                dates.clear();
                true
            }
            Selection::Range(range) => {
                *range = None;
                true
            }
        };
        self.awaiting_range_end = false;
        cleared
    }

    /// Replace the selection with parsed dates: fill mode arity, clamp to the
    /// bounds, coarsen to the first of the month without day selection and
    /// drop duplicates.
    pub fn assign(&mut self, parsed: &[DateValue], rules: AssignRules, today: DateValue) {
        let normalize = |date: DateValue| {
            let date = rules.bounds.clamp(date);
            if rules.day_selection {
                date
            } else {
                date.first_of_month()
            }
        };
        self.selection = match self.mode() {
            SelectionMode::Single => {
                Selection::Single(normalize(parsed.first().copied().unwrap_or(today)))
            }
            SelectionMode::Multiple => {
                let mut dates: Vec<DateValue> = Vec::with_capacity(parsed.len());
                for date in parsed.iter().copied().map(normalize) {
                    if !dates.contains(&date) {
                        dates.push(date);
                    }
                }
                Selection::Multiple(dates)
            }
            SelectionMode::Range => match parsed {
                [] => Selection::Range(None),
                [start] => Selection::Range(Some(DateRange::new(normalize(*start), normalize(*start)))),
                [start, end, ..] => {
                    Selection::Range(Some(DateRange::new(normalize(*start), normalize(*end))))
                }
            },
        };
    }
}
