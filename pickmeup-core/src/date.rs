//! Calendar arithmetic on day-granular values.
//!
//! Every operation returns a new value; nothing here mutates in place, so the
//! same date can be shared between the selection and the navigation anchor.

use std::fmt;

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::constants::MONTHS_PER_YEAR;

/// A calendar day with the time-of-day dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateValue(NaiveDate);

impl DateValue {
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Build a date from a year, a 0-based month and a 1-based day.
    #[must_use]
    pub fn from_ymd(year: i32, month0: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month0 + 1, day).map(Self)
    }

    #[must_use]
    pub const fn naive(self) -> NaiveDate {
        self.0
    }

    #[must_use]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// 0-based month (January is 0).
    #[must_use]
    pub fn month0(self) -> u32 {
        self.0.month0()
    }

    #[must_use]
    pub fn day(self) -> u32 {
        self.0.day()
    }

    /// Day of the week with Sunday as 0.
    #[must_use]
    pub fn weekday(self) -> u32 {
        self.0.weekday().num_days_from_sunday()
    }

    /// 1-based ordinal of the day within its year.
    #[must_use]
    pub fn day_of_year(self) -> u32 {
        self.0.ordinal()
    }

    #[must_use]
    pub fn at_midnight(self) -> NaiveDateTime {
        self.0.and_time(NaiveTime::MIN)
    }

    /// Shift by `days`; values outside the representable range leave the date unchanged.
    #[must_use]
    pub fn add_days(self, days: i64) -> Self {
        TimeDelta::try_days(days)
            .and_then(|delta| self.0.checked_add_signed(delta))
            .map_or(self, Self)
    }

    /// Shift by whole months, clamping the day to the length of the target month.
    #[must_use]
    pub fn add_months(self, months: i32) -> Self {
        let total = i64::from(self.year()) * i64::from(MONTHS_PER_YEAR)
            + i64::from(self.month0())
            + i64::from(months);
        let Ok(year) = i32::try_from(total.div_euclid(i64::from(MONTHS_PER_YEAR))) else {
            return self;
        };
        let month0 = u32::try_from(total.rem_euclid(i64::from(MONTHS_PER_YEAR))).unwrap_or(0);
        let day = self.day().min(days_in_month(year, month0));
        Self::from_ymd(year, month0, day).unwrap_or(self)
    }

    /// Shift by whole years, clamping Feb 29 to Feb 28 in common years.
    #[must_use]
    pub fn add_years(self, years: i32) -> Self {
        years
            .checked_mul(12)
            .map_or(self, |months| self.add_months(months))
    }

    #[must_use]
    pub fn first_of_month(self) -> Self {
        self.with_day(1)
    }

    #[must_use]
    pub fn last_of_month(self) -> Self {
        self.with_day(days_in_month(self.year(), self.month0()))
    }

    #[must_use]
    pub fn with_year(self, year: i32) -> Self {
        let day = self.day().min(days_in_month(year, self.month0()));
        Self::from_ymd(year, self.month0(), day).unwrap_or(self)
    }

    #[must_use]
    pub fn with_month0(self, month0: u32) -> Self {
        let month0 = month0.min(MONTHS_PER_YEAR - 1);
        let day = self.day().min(days_in_month(self.year(), month0));
        Self::from_ymd(self.year(), month0, day).unwrap_or(self)
    }

    #[must_use]
    pub fn with_day(self, day: u32) -> Self {
        let day = day.clamp(1, days_in_month(self.year(), self.month0()));
        Self::from_ymd(self.year(), self.month0(), day).unwrap_or(self)
    }
}

impl From<NaiveDate> for DateValue {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Drop the time-of-day from a wall-clock timestamp.
#[must_use]
pub fn truncate_to_day(datetime: NaiveDateTime) -> DateValue {
    DateValue(datetime.date())
}

/// Number of days in a month, found by probing day 28..=31 until the month rolls over.
#[must_use]
pub fn days_in_month(year: i32, month0: u32) -> u32 {
    (28..=31)
        .take_while(|day| NaiveDate::from_ymd_opt(year, month0 + 1, *day).is_some())
        .last()
        .unwrap_or(28)
}

/// Source of the current wall-clock time.
///
/// The browser build reads the local clock; tests pin a fixed instant so that
/// "today" markers and parse fallbacks are deterministic.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> DateValue {
        truncate_to_day(self.now())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    /// Midnight of the given day; invalid input falls back to the Unix epoch.
    #[must_use]
    pub fn at(year: i32, month0: u32, day: u32) -> Self {
        let date = DateValue::from_ymd(year, month0, day)
            .unwrap_or(DateValue(NaiveDate::default()));
        Self(date.at_midnight())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month0: u32, day: u32) -> DateValue {
        DateValue::from_ymd(year, month0, day).unwrap()
    }

    #[test]
    fn add_months_clamps_to_month_length() {
        assert_eq!(ymd(2021, 0, 31).add_months(1), ymd(2021, 1, 28));
        assert_eq!(ymd(2024, 0, 31).add_months(1), ymd(2024, 1, 29));
        assert_eq!(ymd(2023, 2, 31).add_months(-1), ymd(2023, 1, 28));
        assert_eq!(ymd(2023, 11, 15).add_months(1), ymd(2024, 0, 15));
        assert_eq!(ymd(2023, 0, 15).add_months(-13), ymd(2021, 11, 15));
    }

    #[test]
    fn add_years_handles_leap_day() {
        assert_eq!(ymd(2024, 1, 29).add_years(1), ymd(2025, 1, 28));
        assert_eq!(ymd(2024, 1, 29).add_years(4), ymd(2028, 1, 29));
        assert_eq!(ymd(2020, 5, 1).add_years(-12), ymd(2008, 5, 1));
    }

    #[test]
    fn add_days_crosses_month_and_year() {
        assert_eq!(ymd(2023, 11, 31).add_days(1), ymd(2024, 0, 1));
        assert_eq!(ymd(2024, 2, 1).add_days(-1), ymd(2024, 1, 29));
    }

    #[test]
    fn day_of_year_is_one_based() {
        assert_eq!(ymd(2023, 0, 1).day_of_year(), 1);
        assert_eq!(ymd(2024, 11, 31).day_of_year(), 366);
        assert_eq!(ymd(2023, 11, 31).day_of_year(), 365);
    }

    #[test]
    fn days_in_month_handles_month_rollover() {
        assert_eq!(days_in_month(2024, 1), 29);
        assert_eq!(days_in_month(2023, 1), 28);
        assert_eq!(days_in_month(2023, 3), 30);
        assert_eq!(days_in_month(2023, 11), 31);
    }

    #[test]
    fn month_edges_and_setters_clamp() {
        let date = ymd(2023, 0, 31);
        assert_eq!(date.first_of_month(), ymd(2023, 0, 1));
        assert_eq!(ymd(2024, 1, 10).last_of_month(), ymd(2024, 1, 29));
        assert_eq!(date.with_month0(1), ymd(2023, 1, 28));
        assert_eq!(ymd(2024, 1, 29).with_year(2023), ymd(2023, 1, 28));
        assert_eq!(date.with_day(40), ymd(2023, 0, 31));
    }

    #[test]
    fn truncation_drops_time_of_day() {
        let noon = ymd(2023, 5, 15).naive().and_hms_opt(12, 30, 5).unwrap();
        assert_eq!(truncate_to_day(noon), ymd(2023, 5, 15));
        assert_eq!(FixedClock(noon).today(), ymd(2023, 5, 15));
    }

    #[test]
    fn weekday_counts_from_sunday() {
        assert_eq!(ymd(2023, 5, 18).weekday(), 0);
        assert_eq!(ymd(2023, 5, 17).weekday(), 6);
    }

    #[test]
    fn display_is_iso() {
        assert_eq!(ymd(2023, 5, 1).to_string(), "2023-06-01");
    }
}
