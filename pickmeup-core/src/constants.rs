//! Centralized constants for the PickMeUp engine.
//!
//! Class names and event names form the contract with host stylesheets and
//! listeners, so they live here rather than being spelled out at call sites.

// Defaults -----------------------------------------------------------------
pub const DEFAULT_FORMAT: &str = "d-m-Y";
pub const DEFAULT_TITLE_FORMAT: &str = "B, Y";
pub const DEFAULT_SEPARATOR: &str = " - ";
pub const DEFAULT_PREV_LABEL: &str = "\u{25C0}";
pub const DEFAULT_NEXT_LABEL: &str = "\u{25B6}";
pub const DEFAULT_FIRST_DAY: u8 = 1;

// Grid geometry ------------------------------------------------------------
pub const DAYS_GRID_CELLS: usize = 42;
pub const MONTHS_PER_YEAR: u32 = 12;
pub const YEARS_WINDOW: i32 = 12;
pub const YEARS_BEFORE_ANCHOR: i32 = 6;
pub const DAYS_PER_WEEK: i64 = 7;

// Parsing ------------------------------------------------------------------
/// Two-digit years below this pivot land in the 2000s, the rest in the 1900s.
pub const TWO_DIGIT_YEAR_PIVOT: i64 = 29;
/// Years at or below this value are treated as two-digit years.
pub const TWO_DIGIT_YEAR_LIMIT: i64 = 100;

// View builder -------------------------------------------------------------
/// Upper bound on anchor shifts performed while skipping all-disabled windows.
pub const MAX_ANCHOR_SHIFTS: u32 = 4_800;

// Declarative configuration ------------------------------------------------
pub const ATTRIBUTE_PREFIX: &str = "pmu-";
pub const EVENT_PREFIX: &str = "pickmeup-";

// Markers ------------------------------------------------------------------
pub const CLASS_ROOT: &str = "pickmeup";
pub const CLASS_FLAT: &str = "pmu-flat";
pub const CLASS_HIDDEN: &str = "pmu-hidden";
pub const CLASS_INSTANCE: &str = "pmu-instance";
pub const CLASS_BUTTON: &str = "pmu-button";
pub const CLASS_PREV: &str = "pmu-prev";
pub const CLASS_NEXT: &str = "pmu-next";
pub const CLASS_HEADER: &str = "pmu-month";
pub const CLASS_DAY_OF_WEEK: &str = "pmu-day-of-week";
pub const CLASS_DISABLED: &str = "pmu-disabled";
pub const CLASS_SELECTED: &str = "pmu-selected";
pub const CLASS_TODAY: &str = "pmu-today";
pub const CLASS_NOT_IN_MONTH: &str = "pmu-not-in-month";
pub const CLASS_SUNDAY: &str = "pmu-sunday";
pub const CLASS_SATURDAY: &str = "pmu-saturday";
pub const CLASS_VIEW_DAYS: &str = "pmu-view-days";
pub const CLASS_VIEW_MONTHS: &str = "pmu-view-months";
pub const CLASS_VIEW_YEARS: &str = "pmu-view-years";
pub const CLASS_SECTION_DAYS: &str = "pmu-days";
pub const CLASS_SECTION_MONTHS: &str = "pmu-months";
pub const CLASS_SECTION_YEARS: &str = "pmu-years";
