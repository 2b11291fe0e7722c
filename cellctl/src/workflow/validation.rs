//! Form validation errors.

use thiserror::Error;

/// Why a form could not be turned into an update. Each variant names exactly one field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is blank
    #[error("{label} is required")]
    Required { field: &'static str, label: &'static str },

    /// A picker holds something that is neither empty, its sentinel, nor an id
    #[error("Invalid selection for {field}: {value:?}")]
    InvalidReference { field: &'static str, value: String },

    /// A free-form value could not be parsed
    #[error("Invalid value for {field}: {value:?}")]
    InvalidValue { field: &'static str, value: String },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: &'static str, min: i64, max: i64 },
}

impl ValidationError {
    pub fn required(field: &'static str, label: &'static str) -> Self {
        Self::Required { field, label }
    }

    /// The offending field
    pub fn field(&self) -> &'static str {
        match self {
            Self::Required { field, .. }
            | Self::InvalidReference { field, .. }
            | Self::InvalidValue { field, .. }
            | Self::OutOfRange { field, .. } => field,
        }
    }
}

impl From<ValidationError> for crate::errors::Error {
    fn from(err: ValidationError) -> Self {
        crate::errors::Error::Validation {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}
