//! Layered option resolution.
//!
//! Options arrive in up to three layers: built-in defaults, declarative
//! `pmu-*` attributes on the anchor element, and the options passed at
//! construction. Each layer is an [`OptionLayer`] of optional, loosely typed
//! values; [`Options::resolve`] merges them once and validates the result into
//! the typed [`Options`] held for the widget's lifetime.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    ATTRIBUTE_PREFIX, CLASS_VIEW_DAYS, CLASS_VIEW_MONTHS, CLASS_VIEW_YEARS, DEFAULT_FIRST_DAY,
    DEFAULT_FORMAT, DEFAULT_NEXT_LABEL, DEFAULT_PREV_LABEL, DEFAULT_SEPARATOR,
    DEFAULT_TITLE_FORMAT,
};
use crate::date::{Clock, DateValue};
use crate::error::OptionError;
use crate::format::{DateCodec, DateInput};
use crate::locale::Locale;
use crate::selection::{Bounds, SelectionMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewLevel {
    #[default]
    Days,
    Months,
    Years,
}

impl ViewLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Days => "days",
            Self::Months => "months",
            Self::Years => "years",
        }
    }

    /// Marker class carried by the widget root while this level is shown.
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Days => CLASS_VIEW_DAYS,
            Self::Months => CLASS_VIEW_MONTHS,
            Self::Years => CLASS_VIEW_YEARS,
        }
    }
}

impl FromStr for ViewLevel {
    type Err = OptionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "days" => Ok(Self::Days),
            "months" => Ok(Self::Months),
            "years" => Ok(Self::Years),
            _ => Err(OptionError::UnknownVariant {
                field: "view",
                value: value.to_string(),
            }),
        }
    }
}

impl fmt::Display for ViewLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Side of the anchor the floating widget opens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Top,
    #[default]
    Bottom,
    Left,
    Right,
}

impl FromStr for Position {
    type Err = OptionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            _ => Err(OptionError::UnknownVariant {
                field: "position",
                value: value.to_string(),
            }),
        }
    }
}

/// What the per-day hook may say about a day cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DayRender {
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub selected: bool,
    #[serde(default, alias = "className")]
    pub class_name: Option<String>,
}

/// Per-day customization hook called for every rendered day cell.
#[derive(Clone)]
pub struct DayRenderHook(Rc<dyn Fn(DateValue) -> DayRender>);

impl DayRenderHook {
    pub fn new(hook: impl Fn(DateValue) -> DayRender + 'static) -> Self {
        Self(Rc::new(hook))
    }

    #[must_use]
    pub fn call(&self, date: DateValue) -> DayRender {
        (self.0)(date)
    }
}

impl fmt::Debug for DayRenderHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DayRenderHook(..)")
    }
}

impl PartialEq for DayRenderHook {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// One configuration layer; `None` defers to the layer below.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OptionLayer {
    pub date: Option<DateInput>,
    pub current: Option<DateInput>,
    pub mode: Option<String>,
    pub view: Option<String>,
    #[serde(alias = "selectDay")]
    pub select_day: Option<bool>,
    #[serde(alias = "selectMonth")]
    pub select_month: Option<bool>,
    #[serde(alias = "selectYear")]
    pub select_year: Option<bool>,
    pub calendars: Option<i64>,
    pub format: Option<String>,
    #[serde(alias = "titleFormat")]
    pub title_format: Option<String>,
    pub separator: Option<String>,
    #[serde(alias = "firstDay", alias = "first_day_of_week", alias = "firstDayOfWeek")]
    pub first_day: Option<i64>,
    pub min: Option<DateInput>,
    pub max: Option<DateInput>,
    pub flat: Option<bool>,
    pub position: Option<String>,
    #[serde(alias = "hideOnSelect")]
    pub hide_on_select: Option<bool>,
    #[serde(alias = "className")]
    pub class_name: Option<String>,
    #[serde(alias = "defaultDate")]
    pub default_date: Option<bool>,
    pub locale: Option<Locale>,
    pub prev: Option<String>,
    pub next: Option<String>,
    #[serde(skip)]
    pub render: Option<DayRenderHook>,
}

impl OptionLayer {
    /// Read `pmu-*` attributes. Values that fail to parse are logged and skipped.
    pub fn from_attributes<'a, I>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut layer = Self::default();
        for (name, value) in attributes {
            let Some(key) = name.strip_prefix(ATTRIBUTE_PREFIX) else {
                continue;
            };
            if let Err(err) = layer.set_attribute(&key.replace('-', "_"), value) {
                log::warn!("ignoring attribute {name}: {err}");
            }
        }
        layer
    }

    fn set_attribute(&mut self, key: &str, value: &str) -> Result<(), OptionError> {
        let text = || Some(value.to_string());
        match key {
            "date" => self.date = Some(DateInput::from(value)),
            "current" => self.current = Some(DateInput::from(value)),
            "min" => self.min = Some(DateInput::from(value)),
            "max" => self.max = Some(DateInput::from(value)),
            "mode" => self.mode = text(),
            "view" => self.view = text(),
            "position" => self.position = text(),
            "format" => self.format = text(),
            "title_format" => self.title_format = text(),
            "separator" => self.separator = text(),
            "class_name" => self.class_name = text(),
            "prev" => self.prev = text(),
            "next" => self.next = text(),
            "select_day" => self.select_day = Some(parse_bool("select_day", value)?),
            "select_month" => self.select_month = Some(parse_bool("select_month", value)?),
            "select_year" => self.select_year = Some(parse_bool("select_year", value)?),
            "flat" => self.flat = Some(parse_bool("flat", value)?),
            "hide_on_select" => self.hide_on_select = Some(parse_bool("hide_on_select", value)?),
            "default_date" => self.default_date = Some(parse_bool("default_date", value)?),
            "calendars" => self.calendars = Some(parse_int("calendars", value)?),
            "first_day" => self.first_day = Some(parse_int("first_day", value)?),
            "locale" => {
                self.locale =
                    Some(Locale::from_json(value).map_err(|e| OptionError::Locale(e.to_string()))?);
            }
            other => return Err(OptionError::UnknownOption(other.to_string())),
        }
        Ok(())
    }

    /// Stack `over` on top of `self`.
    #[must_use]
    pub fn overlay(self, over: Self) -> Self {
        Self {
            date: over.date.or(self.date),
            current: over.current.or(self.current),
            mode: over.mode.or(self.mode),
            view: over.view.or(self.view),
            select_day: over.select_day.or(self.select_day),
            select_month: over.select_month.or(self.select_month),
            select_year: over.select_year.or(self.select_year),
            calendars: over.calendars.or(self.calendars),
            format: over.format.or(self.format),
            title_format: over.title_format.or(self.title_format),
            separator: over.separator.or(self.separator),
            first_day: over.first_day.or(self.first_day),
            min: over.min.or(self.min),
            max: over.max.or(self.max),
            flat: over.flat.or(self.flat),
            position: over.position.or(self.position),
            hide_on_select: over.hide_on_select.or(self.hide_on_select),
            class_name: over.class_name.or(self.class_name),
            default_date: over.default_date.or(self.default_date),
            locale: over.locale.or(self.locale),
            prev: over.prev.or(self.prev),
            next: over.next.or(self.next),
            render: over.render.or(self.render),
        }
    }

    #[must_use]
    pub fn with_render(mut self, hook: DayRenderHook) -> Self {
        self.render = Some(hook);
        self
    }
}

fn parse_bool(field: &'static str, value: &str) -> Result<bool, OptionError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(OptionError::InvalidBool {
            field,
            value: value.to_string(),
        }),
    }
}

fn parse_int(field: &'static str, value: &str) -> Result<i64, OptionError> {
    value
        .trim()
        .parse()
        .map_err(|_| OptionError::InvalidInteger {
            field,
            value: value.to_string(),
        })
}

fn or_default<T: FromStr<Err = OptionError> + Default>(value: Option<&str>) -> T {
    value.map_or_else(T::default, |raw| {
        raw.parse().unwrap_or_else(|err| {
            log::warn!("{err}; using default");
            T::default()
        })
    })
}

/// Step the initial view toward an enabled granularity.
///
/// The four corrections run once in order, so with every `select_*` flag off
/// the view settles on months.
#[must_use]
pub fn correct_view(view: ViewLevel, select_day: bool, select_month: bool, select_year: bool) -> ViewLevel {
    let mut view = view;
    if view == ViewLevel::Days && !select_day {
        view = ViewLevel::Months;
    }
    if view == ViewLevel::Months && !select_month {
        view = ViewLevel::Years;
    }
    if view == ViewLevel::Years && !select_year {
        view = ViewLevel::Days;
    }
    if view == ViewLevel::Days && !select_day {
        view = ViewLevel::Months;
    }
    view
}

/// Fully resolved, validated configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Initial selection; `None` selects today.
    pub date: Option<DateInput>,
    /// Initial navigation anchor; `None` follows the selection.
    pub current: Option<DateInput>,
    pub mode: SelectionMode,
    pub view: ViewLevel,
    pub select_day: bool,
    pub select_month: bool,
    pub select_year: bool,
    pub calendars: usize,
    pub format: String,
    pub title_format: String,
    pub separator: String,
    /// 0 = Sunday .. 6 = Saturday.
    pub first_day: u8,
    pub min: Option<DateValue>,
    pub max: Option<DateValue>,
    pub flat: bool,
    pub position: Position,
    pub hide_on_select: bool,
    pub class_name: String,
    pub default_date: bool,
    pub locale: Locale,
    pub prev: String,
    pub next: String,
    pub render: Option<DayRenderHook>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            date: None,
            current: None,
            mode: SelectionMode::Single,
            view: ViewLevel::Days,
            select_day: true,
            select_month: true,
            select_year: true,
            calendars: 1,
            format: DEFAULT_FORMAT.to_string(),
            title_format: DEFAULT_TITLE_FORMAT.to_string(),
            separator: DEFAULT_SEPARATOR.to_string(),
            first_day: DEFAULT_FIRST_DAY,
            min: None,
            max: None,
            flat: false,
            position: Position::Bottom,
            hide_on_select: false,
            class_name: String::new(),
            default_date: true,
            locale: Locale::default(),
            prev: DEFAULT_PREV_LABEL.to_string(),
            next: DEFAULT_NEXT_LABEL.to_string(),
            render: None,
        }
    }
}

impl Options {
    /// Merge defaults, then `attributes`, then `explicit`, and validate.
    #[must_use]
    pub fn resolve(attributes: OptionLayer, explicit: OptionLayer, clock: &dyn Clock) -> Self {
        Self::from_layer(attributes.overlay(explicit), clock)
    }

    /// Validate a merged layer; anything missing or invalid takes its default.
    #[must_use]
    pub fn from_layer(layer: OptionLayer, clock: &dyn Clock) -> Self {
        let defaults = Self::default();
        let select_day = layer.select_day.unwrap_or(defaults.select_day);
        let select_month = layer.select_month.unwrap_or(defaults.select_month);
        let select_year = layer.select_year.unwrap_or(defaults.select_year);
        let view = correct_view(
            or_default(layer.view.as_deref()),
            select_day,
            select_month,
            select_year,
        );
        let calendars = layer
            .calendars
            .map_or(1, |count| usize::try_from(count.max(1)).unwrap_or(1));
        let first_day = match layer.first_day {
            None => DEFAULT_FIRST_DAY,
            Some(day) => u8::try_from(day)
                .ok()
                .filter(|day| *day <= 6)
                .unwrap_or_else(|| {
                    log::warn!(
                        "{}; using default",
                        OptionError::OutOfRange {
                            field: "first_day",
                            min: 0,
                            max: 6,
                            value: day,
                        }
                    );
                    DEFAULT_FIRST_DAY
                }),
        };

        let mut options = Self {
            date: layer.date,
            current: layer.current,
            mode: or_default(layer.mode.as_deref()),
            view,
            select_day,
            select_month,
            select_year,
            calendars,
            format: layer.format.unwrap_or(defaults.format),
            title_format: layer.title_format.unwrap_or(defaults.title_format),
            separator: layer.separator.unwrap_or(defaults.separator),
            first_day,
            min: None,
            max: None,
            flat: layer.flat.unwrap_or(defaults.flat),
            position: or_default(layer.position.as_deref()),
            hide_on_select: layer.hide_on_select.unwrap_or(defaults.hide_on_select),
            class_name: layer.class_name.unwrap_or(defaults.class_name),
            default_date: layer.default_date.unwrap_or(defaults.default_date),
            locale: layer.locale.unwrap_or(defaults.locale),
            prev: layer.prev.unwrap_or(defaults.prev),
            next: layer.next.unwrap_or(defaults.next),
            render: layer.render,
        };

        let codec = options.codec();
        let bound = |input: Option<DateInput>| {
            input
                .and_then(|input| codec.parse(&input, clock.now()).first().copied())
                .map(|date| if select_day { date } else { date.first_of_month() })
        };
        options.min = bound(layer.min);
        options.max = bound(layer.max);
        log::debug!(
            "resolved options: mode={} view={} calendars={}",
            options.mode,
            options.view,
            options.calendars
        );
        options
    }

    #[must_use]
    pub fn codec(&self) -> DateCodec {
        DateCodec::new(&self.format, &self.separator, self.locale.clone())
    }

    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        Bounds::new(self.min, self.max)
    }

    /// Index of the instance the navigation anchor is shown in.
    #[must_use]
    pub const fn current_instance(&self) -> usize {
        self.calendars / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::FixedClock;

    fn clock() -> FixedClock {
        FixedClock::at(2023, 5, 15)
    }

    #[test]
    fn defaults_match_documented_values() {
        let options = Options::resolve(OptionLayer::default(), OptionLayer::default(), &clock());
        assert_eq!(options.mode, SelectionMode::Single);
        assert_eq!(options.view, ViewLevel::Days);
        assert_eq!(options.calendars, 1);
        assert_eq!(options.format, "d-m-Y");
        assert_eq!(options.title_format, "B, Y");
        assert_eq!(options.separator, " - ");
        assert_eq!(options.first_day, 1);
        assert_eq!(options.position, Position::Bottom);
        assert!(options.default_date);
        assert!(!options.flat);
    }

    #[test]
    fn view_settles_on_months_when_nothing_is_selectable() {
        for view in [ViewLevel::Days, ViewLevel::Months, ViewLevel::Years] {
            assert_eq!(correct_view(view, false, false, false), ViewLevel::Months);
        }
        assert_eq!(correct_view(ViewLevel::Days, false, true, true), ViewLevel::Months);
        assert_eq!(correct_view(ViewLevel::Days, false, false, true), ViewLevel::Years);
        assert_eq!(correct_view(ViewLevel::Years, true, true, false), ViewLevel::Days);
        assert_eq!(correct_view(ViewLevel::Months, true, false, false), ViewLevel::Days);
    }

    #[test]
    fn attributes_override_defaults_but_not_explicit_options() {
        let attributes = OptionLayer::from_attributes([
            ("pmu-mode", "range"),
            ("pmu-calendars", "3"),
            ("pmu-hide-on-select", "true"),
            ("data-unrelated", "x"),
        ]);
        let explicit = OptionLayer {
            calendars: Some(2),
            ..OptionLayer::default()
        };
        let options = Options::resolve(attributes, explicit, &clock());
        assert_eq!(options.mode, SelectionMode::Range);
        assert_eq!(options.calendars, 2);
        assert!(options.hide_on_select);
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let attributes = OptionLayer::from_attributes([
            ("pmu-mode", "week"),
            ("pmu-calendars", "many"),
            ("pmu-flat", "perhaps"),
            ("pmu-position", "center"),
            ("pmu-first_day", "9"),
        ]);
        let options = Options::resolve(attributes, OptionLayer::default(), &clock());
        assert_eq!(options.mode, SelectionMode::Single);
        assert_eq!(options.calendars, 1);
        assert!(!options.flat);
        assert_eq!(options.position, Position::Bottom);
        assert_eq!(options.first_day, 1);
    }

    #[test]
    fn calendars_is_at_least_one() {
        let explicit = OptionLayer {
            calendars: Some(-4),
            ..OptionLayer::default()
        };
        let options = Options::resolve(OptionLayer::default(), explicit, &clock());
        assert_eq!(options.calendars, 1);
    }

    #[test]
    fn bounds_are_parsed_with_format_and_coarsened() {
        let explicit = OptionLayer {
            min: Some("10-02-2023".into()),
            max: Some("20-08-2023".into()),
            select_day: Some(false),
            ..OptionLayer::default()
        };
        let options = Options::resolve(OptionLayer::default(), explicit, &clock());
        assert_eq!(options.min, DateValue::from_ymd(2023, 1, 1));
        assert_eq!(options.max, DateValue::from_ymd(2023, 7, 1));
        assert_eq!(options.view, ViewLevel::Months);
    }

    #[test]
    fn json_layer_accepts_camel_case() {
        let layer: OptionLayer = serde_json::from_str(
            r#"{"mode":"multiple","selectDay":false,"titleFormat":"Y","firstDay":0,"date":["01-01-2023","02-01-2023"]}"#,
        )
        .unwrap();
        assert_eq!(layer.mode.as_deref(), Some("multiple"));
        assert_eq!(layer.select_day, Some(false));
        assert_eq!(layer.title_format.as_deref(), Some("Y"));
        assert_eq!(layer.first_day, Some(0));
        assert!(matches!(layer.date, Some(DateInput::List(ref items)) if items.len() == 2));
    }

    #[test]
    fn render_hook_survives_overlay() {
        let hook = DayRenderHook::new(|_| DayRender {
            disabled: true,
            ..DayRender::default()
        });
        let explicit = OptionLayer::default().with_render(hook.clone());
        let options = Options::resolve(OptionLayer::default(), explicit, &clock());
        assert_eq!(options.render, Some(hook));
    }
}
