//! Error types for layout-pipeline crate.

use layout_models::{BackendType, ModelError};
use layout_types::{LayoutTypesError, ValidationError};
use thiserror::Error;

/// Errors surfaced by the layout service.
///
/// Everything not listed here degrades into a [`LayoutOutcome`] with
/// recorded degradations instead of failing.
///
/// [`LayoutOutcome`]: crate::LayoutOutcome
#[derive(Debug, Error)]
pub enum LayoutError {
    /// The configured numeric backend was not built into this binary.
    #[error("numeric backend {backend} is unavailable: {reason}")]
    BackendUnavailable {
        /// Requested backend.
        backend: BackendType,
        /// Why it cannot be used.
        reason: String,
    },

    /// The graph input could not be parsed.
    #[error("invalid constraint graph: {0}")]
    Graph(#[from] LayoutTypesError),

    /// A value failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A model failed to load or run.
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// The graph has more rooms than the model can place.
    #[error("graph has {rooms} rooms, the model places at most {capacity}")]
    CapacityExceeded {
        /// Rooms in the graph.
        rooms: usize,
        /// Model capacity.
        capacity: usize,
    },

    /// The pipeline configuration is inconsistent.
    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),

    /// Configuration JSON could not be parsed.
    #[error("configuration JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LayoutError {
    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }

    /// Creates a backend unavailable error.
    #[must_use]
    pub fn backend_unavailable(backend: BackendType, reason: impl Into<String>) -> Self {
        Self::BackendUnavailable {
            backend,
            reason: reason.into(),
        }
    }

    /// Returns `true` for the process-level failure callers must handle by
    /// switching to a non-learned path.
    #[must_use]
    pub const fn is_backend_unavailable(&self) -> bool {
        matches!(self, Self::BackendUnavailable { .. })
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, LayoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = LayoutError::backend_unavailable(BackendType::Wgpu, "not compiled in");
        assert!(err.to_string().contains("wgpu"));
        assert!(err.is_backend_unavailable());

        let err = LayoutError::CapacityExceeded {
            rooms: 12,
            capacity: 8,
        };
        assert!(err.to_string().contains("12"));
        assert!(!err.is_backend_unavailable());
    }

    #[test]
    fn error_from_model() {
        let err: LayoutError = ModelError::EmptyGraph.into();
        assert!(matches!(err, LayoutError::Model(_)));
    }

    #[test]
    fn validation_is_transparent() {
        let err: LayoutError = ValidationError::EmptyNodeId(2).into();
        assert_eq!(err.to_string(), ValidationError::EmptyNodeId(2).to_string());
    }
}
