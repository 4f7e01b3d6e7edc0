use serde::Serialize;

use crate::constants::EVENT_PREFIX;
use crate::date::DateValue;
use crate::selection::SelectionMode;

/// One value in Single mode, a list otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Picked<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> Picked<T> {
    #[must_use]
    pub fn for_mode(mode: SelectionMode, values: Vec<T>) -> Self {
        if mode == SelectionMode::Single {
            let mut values = values.into_iter();
            if let Some(first) = values.next() {
                return Self::One(first);
            }
            return Self::Many(Vec::new());
        }
        Self::Many(values)
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        }
    }
}

/// Payload of the `change` notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeDetail {
    pub date: Picked<DateValue>,
    pub formatted_date: Picked<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "detail", rename_all = "lowercase")]
pub enum PickerEvent {
    Show,
    Hide,
    Change(ChangeDetail),
    Fill,
}

impl PickerEvent {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Show => "show",
            Self::Hide => "hide",
            Self::Change(_) => "change",
            Self::Fill => "fill",
        }
    }

    /// Name of the DOM event carrying this notification.
    #[must_use]
    pub fn dom_name(&self) -> String {
        format!("{EVENT_PREFIX}{}", self.name())
    }

    /// Listeners may veto showing and hiding.
    #[must_use]
    pub const fn cancelable(&self) -> bool {
        matches!(self, Self::Show | Self::Hide)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_prefixed() {
        assert_eq!(PickerEvent::Show.dom_name(), "pickmeup-show");
        assert!(PickerEvent::Hide.cancelable());
        assert!(!PickerEvent::Fill.cancelable());
    }

    #[test]
    fn single_mode_detail_is_scalar() {
        let date = DateValue::from_ymd(2023, 5, 15).unwrap();
        let detail = ChangeDetail {
            date: Picked::for_mode(SelectionMode::Single, vec![date]),
            formatted_date: Picked::for_mode(SelectionMode::Single, vec!["15-06-2023".to_string()]),
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["date"], "2023-06-15");
        assert_eq!(json["formatted_date"], "15-06-2023");

        let many = Picked::for_mode(SelectionMode::Range, vec![date, date]);
        assert_eq!(serde_json::to_value(&many).unwrap().as_array().map(Vec::len), Some(2));
    }
}
