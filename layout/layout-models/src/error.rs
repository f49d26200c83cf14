//! Error types for layout-models crate.

use thiserror::Error;

/// Errors that can occur in layout-models operations.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Failed to load checkpoint.
    #[error("failed to load checkpoint from {path}: {reason}")]
    LoadCheckpoint {
        /// Path to the checkpoint file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Failed to save checkpoint.
    #[error("failed to save checkpoint to {path}: {reason}")]
    SaveCheckpoint {
        /// Path to the checkpoint file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Invalid model configuration.
    #[error("invalid model configuration: {0}")]
    InvalidConfig(String),

    /// Checkpoint file not found.
    #[error("checkpoint not found: {0}")]
    CheckpointNotFound(String),

    /// Unsupported checkpoint format.
    #[error("unsupported checkpoint format: {0}")]
    UnsupportedFormat(String),

    /// A weight or input tensor does not have the configured shape.
    #[error("shape mismatch in {name}: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Tensor name.
        name: String,
        /// Expected shape.
        expected: String,
        /// Actual shape.
        actual: String,
    },

    /// The graph has no nodes to pool over.
    #[error("cannot encode a graph with no nodes")]
    EmptyGraph,

    /// A reverse step was requested outside the schedule.
    #[error("timestep {timestep} is outside a schedule of {steps} steps")]
    TimestepOutOfRange {
        /// Requested timestep.
        timestep: usize,
        /// Number of steps in the schedule.
        steps: usize,
    },

    /// Tensor values could not be read back to the host.
    #[error("tensor readback failed: {0}")]
    Readback(String),

    /// A tensor stage failed structural validation.
    #[error(transparent)]
    Validation(#[from] layout_types::ValidationError),
}

impl ModelError {
    /// Creates a load checkpoint error.
    #[must_use]
    pub fn load_checkpoint(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::LoadCheckpoint {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a save checkpoint error.
    #[must_use]
    pub fn save_checkpoint(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SaveCheckpoint {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid config error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }

    /// Creates a checkpoint not found error.
    #[must_use]
    pub fn checkpoint_not_found(path: impl Into<String>) -> Self {
        Self::CheckpointNotFound(path.into())
    }

    /// Creates an unsupported format error.
    #[must_use]
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat(format.into())
    }

    /// Creates a shape mismatch error.
    #[must_use]
    pub fn shape_mismatch(
        name: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::ShapeMismatch {
            name: name.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Creates a readback error.
    #[must_use]
    pub fn readback(reason: impl Into<String>) -> Self {
        Self::Readback(reason.into())
    }

    /// Returns `true` if this error means the checkpoint file is absent.
    #[must_use]
    pub const fn is_missing_checkpoint(&self) -> bool {
        matches!(self, Self::CheckpointNotFound(_))
    }
}

/// Result type for layout-models operations.
pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_load_checkpoint() {
        let err = ModelError::load_checkpoint("encoder.bin", "file corrupted");
        assert!(err.to_string().contains("encoder.bin"));
        assert!(err.to_string().contains("file corrupted"));
    }

    #[test]
    fn error_checkpoint_not_found() {
        let err = ModelError::checkpoint_not_found("/ckpt/missing.bin");
        assert!(err.to_string().contains("/ckpt/missing.bin"));
        assert!(err.is_missing_checkpoint());
        assert!(!ModelError::EmptyGraph.is_missing_checkpoint());
    }

    #[test]
    fn error_shape_mismatch() {
        let err = ModelError::shape_mismatch("gat1.lin", "[64, 256]", "[32, 256]");
        let msg = err.to_string();
        assert!(msg.contains("gat1.lin"));
        assert!(msg.contains("[64, 256]"));
        assert!(msg.contains("[32, 256]"));
    }

    #[test]
    fn error_timestep() {
        let err = ModelError::TimestepOutOfRange {
            timestep: 50,
            steps: 50,
        };
        assert!(err.to_string().contains("50 steps"));
    }

    #[test]
    fn error_from_validation() {
        let err: ModelError = layout_types::ValidationError::LayoutLength {
            expected: 32,
            actual: 4,
        }
        .into();
        assert!(matches!(err, ModelError::Validation(_)));
    }
}
