//! Error types for refract decoding.
//!
//! Only the codec fails. Unknown element names, duplicate registrations and
//! plugins without hooks are tolerated and never surface here.

use thiserror::Error;

use crate::class::ContentShape;

/// Main error type for the refract elements library.
#[derive(Debug, Error)]
pub enum RefractError {
    /// A full-form refract value was not a JSON object.
    #[error("Refract value must be an object, got {0}")]
    NotAnObject(&'static str),

    /// A compact-form refract value was not a JSON array.
    #[error("Compact refract value must be an array, got {0}")]
    NotAnArray(&'static str),

    /// A compact-form refract value did not have exactly four positions.
    #[error("Compact refract value must have 4 entries [element, meta, attributes, content], got {0}")]
    InvalidCompactLength(usize),

    /// The `element` field is absent.
    #[error("Refract value is missing the 'element' field")]
    MissingElementName,

    /// The `element` field is present but not a string.
    #[error("Refract 'element' field must be a string, got {0}")]
    InvalidElementName(&'static str),

    /// A structural field (`meta`, `attributes`, or a refracted attribute) has the wrong JSON type.
    #[error("Invalid '{field}' in element '{element}': expected {expected}, got {found}")]
    InvalidField {
        element: String,
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Content does not match the content shape declared by the element class.
    #[error("Content of element '{element}' does not match its class: expected {expected}, got {found}")]
    ContentMismatch {
        element: String,
        expected: ContentShape,
        found: &'static str,
    },

    /// Nesting exceeded the configured recursion limit.
    #[error("Refract nesting exceeds maximum depth of {0}")]
    DepthLimitExceeded(usize),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for refract operations.
pub type Result<T> = std::result::Result<T, RefractError>;

/// Human-readable name of a JSON value's type, used in error messages.
#[must_use]
pub fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
