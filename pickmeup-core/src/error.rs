use thiserror::Error;

/// Raised while reading a configuration value; callers log it and keep the
/// value from the lower configuration layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OptionError {
    #[error("unknown {field} value {value:?}")]
    UnknownVariant { field: &'static str, value: String },
    #[error("{field} expects a boolean (got {value:?})")]
    InvalidBool { field: &'static str, value: String },
    #[error("{field} expects an integer (got {value:?})")]
    InvalidInteger { field: &'static str, value: String },
    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },
    #[error("locale could not be read: {0}")]
    Locale(String),
    #[error("unknown option {0:?}")]
    UnknownOption(String),
}
