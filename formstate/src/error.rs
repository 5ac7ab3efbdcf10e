//! Error types

/// Errors raised by the validation engine.
///
/// Failing validation rules are not errors; they show up as data on the
/// form. These are contract violations by the caller.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// The schema declares a field the value store does not contain.
    #[error("Found validation rules for \"{field}\", but no value for \"{field}\".")]
    MissingValue { field: String },

    /// Values must be a JSON object keyed by field name.
    #[error("Form values must be a JSON object")]
    NotAnObject,

    /// A server error document could not be parsed.
    #[error("Invalid error document: {0}")]
    Json(#[from] serde_json::Error),
}

impl FormError {
    /// Creates a new missing value error.
    pub fn missing_value(field: impl Into<String>) -> Self {
        Self::MissingValue {
            field: field.into(),
        }
    }
}
