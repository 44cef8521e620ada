use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    #[error("the path is empty")]
    EmptyPath,

    #[error("invalid path segment '{0}'")]
    InvalidSegment(String),

    #[error("the key '{key}' is not present in the mapping")]
    MissingKey { key: String },

    #[error("the index {index} is out of range for a sequence of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("cannot apply segment '{segment}': expected {expected}, found {actual}")]
    TypeMismatch {
        segment: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("the path has {count} segments, more than the supported {max}")]
    TooManySegments { count: usize, max: usize },
}

/// Describes the shape of a value for error messages.
pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Object(_) => "a mapping",
        Value::Array(_) => "a sequence",
        Value::String(_) => "a string",
        Value::Number(_) => "a number",
        Value::Bool(_) => "a boolean",
        Value::Null => "null",
    }
}
