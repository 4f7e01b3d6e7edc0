//! Day and month names used for formatting, parsing and weekday headers.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static ENGLISH: Lazy<Locale> = Lazy::new(|| Locale {
    days: strings(&[
        "Sunday",
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
    ]),
    days_short: strings(&["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]),
    days_min: strings(&["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"]),
    months: strings(&[
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ]),
    months_short: strings(&[
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ]),
});

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

/// Names are indexed with Sunday = 0 and January = 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    pub days: Vec<String>,
    #[serde(alias = "daysShort")]
    pub days_short: Vec<String>,
    #[serde(alias = "daysMin")]
    pub days_min: Vec<String>,
    pub months: Vec<String>,
    #[serde(alias = "monthsShort")]
    pub months_short: Vec<String>,
}

impl Default for Locale {
    fn default() -> Self {
        Self::english().clone()
    }
}

impl Locale {
    #[must_use]
    pub fn english() -> &'static Self {
        &ENGLISH
    }

    /// Load a locale from JSON; accepts both `days_short` and `daysShort` keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a name table is missing.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn day_name(&self, weekday: u32) -> &str {
        lookup(&self.days, weekday)
    }

    #[must_use]
    pub fn day_short(&self, weekday: u32) -> &str {
        lookup(&self.days_short, weekday)
    }

    #[must_use]
    pub fn month_name(&self, month0: u32) -> &str {
        lookup(&self.months, month0)
    }

    #[must_use]
    pub fn month_short(&self, month0: u32) -> &str {
        lookup(&self.months_short, month0)
    }

    #[must_use]
    pub fn month_index(&self, name: &str) -> Option<u32> {
        position(&self.months, name)
    }

    #[must_use]
    pub fn month_short_index(&self, name: &str) -> Option<u32> {
        position(&self.months_short, name)
    }

    /// Two-letter weekday headers rotated so the row starts at `first_day`.
    #[must_use]
    pub fn weekday_headers(&self, first_day: u8) -> Vec<&str> {
        let len = self.days_min.len();
        if len == 0 {
            return Vec::new();
        }
        let start = usize::from(first_day) % len;
        self.days_min[start..]
            .iter()
            .chain(&self.days_min[..start])
            .map(String::as_str)
            .collect()
    }

    /// Every character appearing in any month name or abbreviation.
    pub(crate) fn month_name_chars(&self) -> impl Iterator<Item = char> + '_ {
        self.months
            .iter()
            .chain(&self.months_short)
            .flat_map(|name| name.chars())
    }
}

fn lookup(table: &[String], index: u32) -> &str {
    usize::try_from(index)
        .ok()
        .and_then(|idx| table.get(idx))
        .map_or("", String::as_str)
}

fn position(table: &[String], name: &str) -> Option<u32> {
    table
        .iter()
        .position(|entry| entry == name)
        .and_then(|idx| u32::try_from(idx).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_tables_are_complete() {
        let locale = Locale::english();
        assert_eq!(locale.days.len(), 7);
        assert_eq!(locale.months_short.len(), 12);
        assert_eq!(locale.month_name(5), "June");
        assert_eq!(locale.day_short(0), "Sun");
        assert_eq!(locale.month_name(12), "");
    }

    #[test]
    fn weekday_headers_rotate_to_first_day() {
        let locale = Locale::english();
        assert_eq!(locale.weekday_headers(0)[0], "Su");
        let monday_first = locale.weekday_headers(1);
        assert_eq!(monday_first.first(), Some(&"Mo"));
        assert_eq!(monday_first.last(), Some(&"Su"));
    }

    #[test]
    fn json_accepts_camel_case_keys() {
        let json = r#"{
            "days": ["Dimanche","Lundi","Mardi","Mercredi","Jeudi","Vendredi","Samedi"],
            "daysShort": ["Dim","Lun","Mar","Mer","Jeu","Ven","Sam"],
            "daysMin": ["Di","Lu","Ma","Me","Je","Ve","Sa"],
            "months": ["janvier","février","mars","avril","mai","juin","juillet","août","septembre","octobre","novembre","décembre"],
            "monthsShort": ["janv","févr","mars","avr","mai","juin","juil","août","sept","oct","nov","déc"]
        }"#;
        let locale = Locale::from_json(json).unwrap();
        assert_eq!(locale.month_index("août"), Some(7));
        assert_eq!(locale.month_short_index("déc"), Some(11));
        assert_eq!(locale.month_index("August"), None);
    }
}
