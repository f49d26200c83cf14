//! Error types for scene construction and GLB encoding.

use thiserror::Error;

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// Errors that can occur while building or encoding a scene.
#[derive(Debug, Error)]
pub enum SceneError {
    /// A room box cannot be extruded.
    #[error("room {id} cannot be extruded: {reason}")]
    MalformedRoom {
        /// Room id.
        id: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The encoded asset would not fit the container's 32-bit lengths.
    #[error("scene too large to encode: {bytes} bytes")]
    TooLarge {
        /// Size that overflowed.
        bytes: usize,
    },

    /// The bytes are not a well-formed GLB container.
    #[error("invalid GLB: {message}")]
    InvalidGlb {
        /// Description of what was invalid.
        message: String,
    },

    /// The scene JSON could not be produced or parsed.
    #[error("scene JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SceneError {
    /// Creates a malformed room error.
    #[must_use]
    pub fn malformed_room(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedRoom {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid GLB error.
    #[must_use]
    pub fn invalid_glb(message: impl Into<String>) -> Self {
        Self::InvalidGlb {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = SceneError::malformed_room("kitchen", "width is NaN");
        let msg = err.to_string();
        assert!(msg.contains("kitchen"));
        assert!(msg.contains("width is NaN"));

        let err = SceneError::invalid_glb("bad magic");
        assert!(err.to_string().contains("bad magic"));
    }

    #[test]
    fn error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: SceneError = io_err.into();
        assert!(matches!(err, SceneError::Io(_)));
    }
}
