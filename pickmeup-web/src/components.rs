pub mod calendar;

pub use calendar::{Calendar, CalendarProps};
