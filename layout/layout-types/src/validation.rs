//! Validation error types.

use thiserror::Error;

/// Structural problems found in a constraint graph or a layout tensor.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Two nodes share an id.
    #[error("duplicate node id: {0}")]
    DuplicateNodeId(String),

    /// A node has an empty id.
    #[error("node at position {0} has an empty id")]
    EmptyNodeId(usize),

    /// An edge references a node that does not exist.
    #[error("edge {source_id} -> {target_id} references unknown node {missing}")]
    UnknownEdgeEndpoint {
        /// Edge source id.
        source_id: String,
        /// Edge target id.
        target_id: String,
        /// The id that could not be resolved.
        missing: String,
    },

    /// An area bound is negative or not finite.
    #[error("room {id} has an invalid area bound: {value}")]
    InvalidArea {
        /// Room id.
        id: String,
        /// Offending value.
        value: f64,
    },

    /// A layout vector has the wrong length for its room capacity.
    #[error("layout vector length mismatch: expected {expected}, got {actual}")]
    LayoutLength {
        /// Expected number of values (`4 x capacity`).
        expected: usize,
        /// Actual number of values.
        actual: usize,
    },

    /// A tensor stage carries a different node order than the graph it is
    /// decoded against.
    #[error("node order mismatch at slot {slot}: expected {expected}, got {actual}")]
    OrderMismatch {
        /// Slot index.
        slot: usize,
        /// Node id the graph has at this slot.
        expected: String,
        /// Node id the tensor stage carries at this slot.
        actual: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::DuplicateNodeId("kitchen_1".to_string());
        assert!(err.to_string().contains("kitchen_1"));

        let err = ValidationError::UnknownEdgeEndpoint {
            source_id: "a".to_string(),
            target_id: "b".to_string(),
            missing: "b".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("a -> b"));
        assert!(msg.contains("unknown node b"));
    }

    #[test]
    fn error_layout_length() {
        let err = ValidationError::LayoutLength {
            expected: 32,
            actual: 28,
        };
        let msg = err.to_string();
        assert!(msg.contains("32"));
        assert!(msg.contains("28"));
    }
}
