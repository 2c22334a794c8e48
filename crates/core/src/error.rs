//! Common error handling utilities and conventions

/// Standard result type for core operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Core error types that can be shared across crates
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize, thiserror::Error)]
pub enum CoreError {
    /// A required form field was left blank
    #[error("{field} is required")]
    MissingField { field: String },

    /// A coordinate could not be read as a finite number
    #[error("Invalid {field}: {value}")]
    InvalidCoordinate { field: String, value: String },
}

impl CoreError {
    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create an invalid coordinate error
    pub fn invalid_coordinate(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidCoordinate {
            field: field.into(),
            value: value.into(),
        }
    }
}
