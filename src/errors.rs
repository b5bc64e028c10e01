//! Error types for snapshot ingestion and the library boundary.
//!
//! Ingestion validates raw records up front and fails fast with a
//! [`ValidationError`] instead of letting missing or unparseable fields
//! silently skew recency comparisons further down the pipeline. Everything
//! past ingestion is total over a valid [`crate::core::Snapshot`].

use thiserror::Error;

/// Why a raw snapshot record was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field was absent or empty
    #[error("{entity} {id}: missing required field `{field}`")]
    MissingField {
        entity: &'static str,
        id: String,
        field: &'static str,
    },

    /// A timestamp field could not be parsed
    #[error("{entity} {id}: unparseable timestamp in `{field}`: {value:?}")]
    InvalidTimestamp {
        entity: &'static str,
        id: String,
        field: &'static str,
        value: String,
    },

    /// A field held a value outside its allowed set
    #[error("{entity} {id}: invalid value for `{field}`: {value:?}")]
    InvalidValue {
        entity: &'static str,
        id: String,
        field: &'static str,
        value: String,
    },
}

impl ValidationError {
    pub fn missing(entity: &'static str, id: impl Into<String>, field: &'static str) -> Self {
        Self::MissingField {
            entity,
            id: id.into(),
            field,
        }
    }

    pub fn timestamp(
        entity: &'static str,
        id: impl Into<String>,
        field: &'static str,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidTimestamp {
            entity,
            id: id.into(),
            field,
            value: value.into(),
        }
    }

    pub fn invalid(
        entity: &'static str,
        id: impl Into<String>,
        field: &'static str,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            entity,
            id: id.into(),
            field,
            value: value.into(),
        }
    }

    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field, .. }
            | Self::InvalidTimestamp { field, .. }
            | Self::InvalidValue { field, .. } => field,
        }
    }
}

/// Main error type for repopulse operations
#[derive(Debug, Error)]
pub enum Error {
    /// Raw snapshot failed validation
    #[error("Invalid snapshot: {0}")]
    Validation(#[from] ValidationError),

    /// No scenario with the requested id exists
    #[error("Unknown simulation scenario: {0}")]
    ScenarioNotFound(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message_names_entity_and_field() {
        let err = ValidationError::missing("commit", "abc123", "date");
        assert_eq!(
            err.to_string(),
            "commit abc123: missing required field `date`"
        );
        assert_eq!(err.field(), "date");
    }

    #[test]
    fn test_timestamp_error_is_distinct_from_missing() {
        let err = ValidationError::timestamp("pull request", "7", "createdAt", "yesterday");
        assert!(matches!(err, ValidationError::InvalidTimestamp { .. }));
        assert!(err.to_string().contains("\"yesterday\""));
    }

    #[test]
    fn test_validation_error_converts_into_error() {
        let err: Error = ValidationError::invalid("branch", "dev", "status", "x").into();
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().starts_with("Invalid snapshot:"));
    }
}
