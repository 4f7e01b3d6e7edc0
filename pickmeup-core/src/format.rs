//! strftime-like formatting and the tolerant parser that reverses it.
//!
//! Parsing never fails: anything it cannot make sense of becomes "now",
//! truncated to the day.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use regex::Regex;
use serde::Deserialize;

use crate::constants::{MONTHS_PER_YEAR, TWO_DIGIT_YEAR_LIMIT, TWO_DIGIT_YEAR_PIVOT};
use crate::date::{DateValue, truncate_to_day};
use crate::locale::Locale;

/// Format a wall-clock timestamp with the directive set described on [`DateCodec`].
#[must_use]
pub fn format_datetime(datetime: &NaiveDateTime, pattern: &str, locale: &Locale) -> String {
    let year = datetime.year();
    let month0 = datetime.month0();
    let day = datetime.day();
    let weekday = datetime.weekday().num_days_from_sunday();
    let hour = datetime.hour();
    let pm = hour >= 12;
    let hour12 = match if pm { hour - 12 } else { hour } {
        0 => 12,
        h => h,
    };
    let minute = datetime.minute();
    let second = datetime.second();

    let mut out = String::with_capacity(pattern.len() * 2);
    for directive in pattern.chars() {
        match directive {
            'a' => out.push_str(locale.day_short(weekday)),
            'A' => out.push_str(locale.day_name(weekday)),
            'b' => out.push_str(locale.month_short(month0)),
            'B' => out.push_str(locale.month_name(month0)),
            'C' => out.push_str(&(1 + year.div_euclid(100)).to_string()),
            'd' => out.push_str(&format!("{day:02}")),
            'e' => out.push_str(&day.to_string()),
            'H' => out.push_str(&format!("{hour:02}")),
            'I' => out.push_str(&format!("{hour12:02}")),
            'j' => out.push_str(&format!("{:03}", datetime.ordinal())),
            'k' => out.push_str(&hour.to_string()),
            'l' => out.push_str(&hour12.to_string()),
            'm' => out.push_str(&format!("{:02}", month0 + 1)),
            'M' => out.push_str(&format!("{minute:02}")),
            'p' | 'P' => out.push_str(if pm { "PM" } else { "AM" }),
            's' => out.push_str(&datetime.and_utc().timestamp().to_string()),
            'S' => out.push_str(&format!("{second:02}")),
            'u' => out.push_str(&(weekday + 1).to_string()),
            'w' => out.push_str(&weekday.to_string()),
            'y' => out.extend(year.to_string().chars().skip(2).take(2)),
            'Y' => out.push_str(&year.to_string()),
            other => out.push(other),
        }
    }
    out
}

#[must_use]
pub fn format_date(date: DateValue, pattern: &str, locale: &Locale) -> String {
    format_datetime(&date.at_midnight(), pattern, locale)
}

/// A date as handed over by the host: already a date, free text, or a list of either.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DateInput {
    Text(String),
    List(Vec<DateInput>),
    #[serde(skip_deserializing)]
    Date(DateValue),
}

impl From<&str> for DateInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for DateInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<DateValue> for DateInput {
    fn from(value: DateValue) -> Self {
        Self::Date(value)
    }
}

impl From<Vec<DateValue>> for DateInput {
    fn from(values: Vec<DateValue>) -> Self {
        Self::List(values.into_iter().map(Self::Date).collect())
    }
}

/// Formatter/parser pair bound to one format string, separator and locale.
///
/// Directives: `a/A` weekday short/long, `b/B` month short/long, `C` century,
/// `d/e` day padded/unpadded, `H/I/k/l` hour 24h/12h padded/unpadded, `j` day
/// of year, `m` month, `M` minutes, `p/P` AM/PM, `s` unix seconds, `S`
/// seconds, `u/w` weekday from Sunday as 1/0, `y/Y` 2-/4-digit year.
#[derive(Debug, Clone)]
pub struct DateCodec {
    format: String,
    separator: String,
    locale: Locale,
    splitter: Option<Regex>,
}

impl DateCodec {
    #[must_use]
    pub fn new(format: &str, separator: &str, locale: Locale) -> Self {
        let splitter = build_splitter(&locale);
        Self {
            format: format.to_string(),
            separator: separator.to_string(),
            locale,
            splitter,
        }
    }

    #[must_use]
    pub fn format_str(&self) -> &str {
        &self.format
    }

    #[must_use]
    pub fn separator(&self) -> &str {
        &self.separator
    }

    #[must_use]
    pub const fn locale(&self) -> &Locale {
        &self.locale
    }

    #[must_use]
    pub fn format(&self, date: DateValue) -> String {
        format_date(date, &self.format, &self.locale)
    }

    #[must_use]
    pub fn format_with(&self, date: DateValue, pattern: &str) -> String {
        format_date(date, pattern, &self.locale)
    }

    /// Format several dates and join them with the separator.
    #[must_use]
    pub fn format_joined(&self, dates: &[DateValue]) -> String {
        dates
            .iter()
            .map(|date| self.format(*date))
            .collect::<Vec<_>>()
            .join(&self.separator)
    }

    /// Parse host input into an ordered list of dates.
    ///
    /// Only an empty list yields an empty result; empty text means today.
    #[must_use]
    pub fn parse(&self, input: &DateInput, now: NaiveDateTime) -> Vec<DateValue> {
        match input {
            DateInput::Date(date) => vec![*date],
            DateInput::List(items) => items
                .iter()
                .flat_map(|item| self.parse(item, now))
                .collect(),
            DateInput::Text(text) => {
                if !text.is_empty() && !self.separator.is_empty() && text.contains(&self.separator)
                {
                    text.split(self.separator.as_str())
                        .map(|piece| self.parse_text(piece.trim(), now))
                        .collect()
                } else {
                    vec![self.parse_text(text, now)]
                }
            }
        }
    }

    /// Parse a single formatted value, falling back to today.
    #[must_use]
    pub fn parse_text(&self, text: &str, now: NaiveDateTime) -> DateValue {
        if text.is_empty() {
            return truncate_to_day(now);
        }
        let parts = self.split(text);
        let directives = self.split(&self.format);
        let mut fields = ParsedFields::default();
        for (part, directive) in parts.iter().zip(directives.iter()) {
            if fields.read(directive, part, &self.locale).is_none() {
                log::debug!("unparseable {directive:?} field {part:?} in {text:?}");
                return truncate_to_day(now);
            }
        }
        fields.compose(now).unwrap_or_else(|| {
            log::debug!("{text:?} does not describe a valid date");
            truncate_to_day(now)
        })
    }

    fn split<'t>(&self, text: &'t str) -> Vec<&'t str> {
        match &self.splitter {
            Some(re) => re.split(text).collect(),
            None => text
                .split(|c: char| !c.is_ascii_alphanumeric())
                .filter(|piece| !piece.is_empty())
                .collect(),
        }
    }
}

/// Split on runs of characters that cannot belong to a number or a month name.
fn build_splitter(locale: &Locale) -> Option<Regex> {
    let mut extra: Vec<char> = locale
        .month_name_chars()
        .filter(|c| !c.is_ascii_alphanumeric())
        .collect();
    extra.sort_unstable();
    extra.dedup();
    let escaped: String = extra
        .iter()
        .map(|c| regex::escape(&c.to_string()))
        .collect();
    match Regex::new(&format!("[^0-9a-zA-Z{escaped}]+")) {
        Ok(re) => Some(re),
        Err(err) => {
            log::warn!("falling back to ASCII field splitting: {err}");
            None
        }
    }
}

#[derive(Debug, Default)]
struct ParsedFields {
    year: Option<i64>,
    month0: Option<i64>,
    day: Option<i64>,
    hour: Option<i64>,
    minute: Option<i64>,
}

impl ParsedFields {
    /// Returns `None` when a numeric field has no leading integer.
    fn read(&mut self, directive: &str, part: &str, locale: &Locale) -> Option<()> {
        match directive {
            "b" => {
                self.month0 = Some(locale.month_short_index(part).map_or(-1, i64::from));
            }
            "B" => {
                self.month0 = Some(locale.month_index(part).map_or(-1, i64::from));
            }
            "d" | "e" => self.day = Some(leading_int(part)?),
            "m" => self.month0 = Some(leading_int(part)? - 1),
            "y" | "Y" => {
                let year = leading_int(part)?;
                self.year = Some(if year > TWO_DIGIT_YEAR_LIMIT {
                    year
                } else if year < TWO_DIGIT_YEAR_PIVOT {
                    year + 2000
                } else {
                    year + 1900
                });
            }
            "H" | "I" | "k" | "l" => self.hour = Some(leading_int(part)?),
            "p" | "P" => {
                let marker = part.to_ascii_lowercase();
                self.hour = self.hour.map(|hour| {
                    if marker.contains("pm") && hour < 12 {
                        hour + 12
                    } else if marker.contains("am") && hour >= 12 {
                        hour - 12
                    } else {
                        hour
                    }
                });
            }
            "M" => self.minute = Some(leading_int(part)?),
            _ => {}
        }
        Some(())
    }

    /// Overflowing components carry into the next unit, as a calendar constructor would.
    fn compose(&self, now: NaiveDateTime) -> Option<DateValue> {
        let year = self.year.unwrap_or_else(|| i64::from(now.year()));
        let month0 = self.month0.unwrap_or_else(|| i64::from(now.month0()));
        let day = self.day.unwrap_or_else(|| i64::from(now.day()));
        let hour = self.hour.unwrap_or_else(|| i64::from(now.hour()));
        let minute = self.minute.unwrap_or_else(|| i64::from(now.minute()));

        let months = i64::from(MONTHS_PER_YEAR);
        let year = i32::try_from(year.checked_add(month0.div_euclid(months))?).ok()?;
        let month = u32::try_from(month0.rem_euclid(months)).ok()? + 1;
        let first = NaiveDate::from_ymd_opt(year, month, 1)?.and_time(NaiveTime::MIN);
        let offset = TimeDelta::try_days(day.checked_sub(1)?)?
            .checked_add(&TimeDelta::try_hours(hour)?)?
            .checked_add(&TimeDelta::try_minutes(minute)?)?;
        first.checked_add_signed(offset).map(truncate_to_day)
    }
}

/// Leading-integer semantics: optional sign followed by digits, rest ignored.
fn leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|value| sign * value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month0: u32, day: u32) -> DateValue {
        DateValue::from_ymd(year, month0, day).unwrap()
    }

    fn now() -> NaiveDateTime {
        ymd(2023, 5, 15).naive().and_hms_opt(10, 20, 30).unwrap()
    }

    fn codec(format: &str) -> DateCodec {
        DateCodec::new(format, " - ", Locale::english().clone())
    }

    #[test]
    fn formats_every_directive() {
        let datetime = ymd(2024, 1, 29).naive().and_hms_opt(13, 5, 9).unwrap();
        let locale = Locale::english();
        let render = |pattern: &str| format_datetime(&datetime, pattern, locale);
        assert_eq!(render("a A"), "Thu Thursday");
        assert_eq!(render("b B"), "Feb February");
        assert_eq!(render("C"), "21");
        assert_eq!(render("d e"), "29 29");
        assert_eq!(render("H I k l"), "13 01 13 1");
        assert_eq!(render("j"), "060");
        assert_eq!(render("m M S"), "02 05 09");
        assert_eq!(render("p P"), "PM PM");
        assert_eq!(render("u w"), "5 4");
        assert_eq!(render("y Y"), "24 2024");
        assert_eq!(render("s"), datetime.and_utc().timestamp().to_string());
    }

    #[test]
    fn unknown_directives_pass_through() {
        let date = ymd(2023, 5, 5);
        assert_eq!(format_date(date, "d.m.Y!", Locale::english()), "05.06.2023!");
        assert_eq!(format_date(date, "[x]", Locale::english()), "[x]");
    }

    #[test]
    fn midnight_renders_as_twelve_am() {
        let date = ymd(2023, 0, 1);
        assert_eq!(format_date(date, "I:M p", Locale::english()), "12:00 AM");
    }

    #[test]
    fn parses_formatted_dates_back() {
        let dates = [
            ymd(2024, 1, 29),
            ymd(2023, 0, 31),
            ymd(2023, 11, 31),
            ymd(2000, 0, 1),
            ymd(2023, 5, 15),
        ];
        for format in ["d-m-Y", "e/m/y", "b d, Y", "B e Y", "Y.m.d", "a, d B Y", "d-m-Y H:M"] {
            let codec = codec(format);
            for date in dates {
                let text = codec.format(date);
                assert_eq!(codec.parse_text(&text, now()), date, "{format}: {text}");
            }
        }
    }

    #[test]
    fn two_digit_years_pivot_at_twenty_nine() {
        let codec = codec("d-m-y");
        assert_eq!(codec.parse_text("01-02-28", now()), ymd(2028, 1, 1));
        assert_eq!(codec.parse_text("01-02-29", now()), ymd(1929, 1, 1));
        assert_eq!(codec.parse_text("01-02-1850", now()), ymd(1850, 1, 1));
    }

    #[test]
    fn missing_fields_default_from_now() {
        let codec = codec("d-m-Y");
        assert_eq!(codec.parse_text("03", now()), ymd(2023, 5, 3));
        assert_eq!(codec.parse_text("03-04", now()), ymd(2023, 3, 3));
    }

    #[test]
    fn garbage_falls_back_to_today() {
        let codec = codec("d-m-Y");
        assert_eq!(codec.parse_text("soon", now()), ymd(2023, 5, 15));
        assert_eq!(codec.parse_text("", now()), ymd(2023, 5, 15));
    }

    #[test]
    fn overflowing_components_roll_over() {
        let codec = codec("d-m-Y");
        assert_eq!(codec.parse_text("31-04-2023", now()), ymd(2023, 4, 1));
        assert_eq!(codec.parse_text("00-03-2024", now()), ymd(2024, 1, 29));
        assert_eq!(codec.parse_text("08x-01-2023", now()), ymd(2023, 0, 8));
    }

    #[test]
    fn unknown_month_name_rolls_into_previous_december() {
        let codec = codec("d B Y");
        assert_eq!(codec.parse_text("5 Smarch 2023", now()), ymd(2022, 11, 5));
    }

    #[test]
    fn meridiem_adjusts_preceding_hour() {
        let codec = codec("d-m-Y I:M p");
        assert_eq!(codec.parse_text("15-06-2023 11:30 PM", now()), ymd(2023, 5, 15));
        let late = DateCodec::new("d-m-Y H", " - ", Locale::english().clone());
        assert_eq!(late.parse_text("15-06-2023 25", now()), ymd(2023, 5, 16));
    }

    #[test]
    fn separator_splits_multiple_values() {
        let codec = codec("d-m-Y");
        let input = DateInput::from("01-02-2023 - 10-02-2023");
        assert_eq!(
            codec.parse(&input, now()),
            vec![ymd(2023, 1, 1), ymd(2023, 1, 10)]
        );
        let list = DateInput::List(vec!["05-05-2023".into(), ymd(2020, 0, 1).into()]);
        assert_eq!(
            codec.parse(&list, now()),
            vec![ymd(2023, 4, 5), ymd(2020, 0, 1)]
        );
        assert!(codec.parse(&DateInput::List(Vec::new()), now()).is_empty());
        assert_eq!(codec.format_joined(&[ymd(2023, 1, 1), ymd(2023, 1, 2)]), "01-02-2023 - 02-02-2023");
    }

    #[test]
    fn non_ascii_month_names_stay_whole() {
        let mut locale = Locale::english().clone();
        locale.months[7] = "août".to_string();
        let codec = DateCodec::new("d B Y", " - ", locale);
        let date = ymd(2023, 7, 12);
        let text = codec.format(date);
        assert_eq!(text, "12 août 2023");
        assert_eq!(codec.parse_text(&text, now()), date);
    }

    #[test]
    fn input_deserializes_from_json_shapes() {
        let single: DateInput = serde_json::from_str(r#""15-06-2023""#).unwrap();
        assert_eq!(single, DateInput::from("15-06-2023"));
        let many: DateInput = serde_json::from_str(r#"["a", ["b"]]"#).unwrap();
        assert!(matches!(many, DateInput::List(ref items) if items.len() == 2));
    }
}
