//! Error types for layout-types crate.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors that can occur while building or parsing layout types.
#[derive(Debug, Error)]
pub enum LayoutTypesError {
    /// The graph or tensor failed structural validation.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The wire representation could not be parsed.
    #[error("invalid graph JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for layout-types operations.
pub type Result<T> = std::result::Result<T, LayoutTypesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_from_validation() {
        let err: LayoutTypesError = ValidationError::EmptyNodeId(3).into();
        assert!(matches!(err, LayoutTypesError::Validation(_)));
        assert!(err.to_string().contains("position 3"));
    }

    #[test]
    fn error_from_json() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json");
        let err: LayoutTypesError = match parse {
            Err(e) => e.into(),
            Ok(_) => return,
        };
        assert!(err.to_string().starts_with("invalid graph JSON"));
    }
}
