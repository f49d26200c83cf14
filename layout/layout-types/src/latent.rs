//! Graph embeddings and flat layout vectors.

use serde::{Deserialize, Serialize};

use crate::features::NodeOrder;
use crate::validation::ValidationError;

/// Values per room in a layout vector: `(x_raw, y_raw, w_raw, h_raw)`.
pub const VALUES_PER_ROOM: usize = 4;

/// Fixed-width summary of one constraint graph.
///
/// The embedding itself carries no per-node addressing; the order is kept
/// so later stages can be checked against the graph they came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEmbedding {
    order: NodeOrder,
    values: Vec<f32>,
}

impl GraphEmbedding {
    /// Wraps encoder output.
    #[must_use]
    pub const fn new(order: NodeOrder, values: Vec<f32>) -> Self {
        Self { order, values }
    }

    /// Slot order of the graph this embedding summarizes.
    #[must_use]
    pub const fn order(&self) -> &NodeOrder {
        &self.order
    }

    /// Embedding values.
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Embedding width.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.values.len()
    }
}

/// Flat `4 x capacity` latent box encoding.
///
/// Room slot `i` owns values `4i..4i+4`. Only the first
/// `min(order.len(), capacity)` slots correspond to graph nodes.
///
/// # Example
///
/// ```
/// use layout_types::{LayoutVector, NodeOrder};
///
/// let order = NodeOrder::new(vec!["a".into()]);
/// let layout = LayoutVector::new(order, 2, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]).unwrap();
/// assert_eq!(layout.room_count(), 1);
/// assert_eq!(layout.room(0), Some([0.0, 1.0, 2.0, 3.0]));
/// assert_eq!(layout.room(1), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutVector {
    order: NodeOrder,
    capacity: usize,
    values: Vec<f32>,
}

impl LayoutVector {
    /// Wraps sampler output.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::LayoutLength`] if `values` is not exactly
    /// `4 x capacity` long.
    pub fn new(
        order: NodeOrder,
        capacity: usize,
        values: Vec<f32>,
    ) -> Result<Self, ValidationError> {
        let expected = capacity * VALUES_PER_ROOM;
        if values.len() != expected {
            return Err(ValidationError::LayoutLength {
                expected,
                actual: values.len(),
            });
        }
        Ok(Self {
            order,
            capacity,
            values,
        })
    }

    /// Slot order of the graph this layout belongs to.
    #[must_use]
    pub const fn order(&self) -> &NodeOrder {
        &self.order
    }

    /// Maximum number of rooms the vector can encode.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Raw values.
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Number of slots that map to graph nodes.
    #[must_use]
    pub fn room_count(&self) -> usize {
        self.order.len().min(self.capacity)
    }

    /// Number of graph nodes that did not fit.
    #[must_use]
    pub fn dropped_count(&self) -> usize {
        self.order.len().saturating_sub(self.capacity)
    }

    /// The raw 4-tuple of a mapped slot.
    #[must_use]
    pub fn room(&self, slot: usize) -> Option<[f32; VALUES_PER_ROOM]> {
        if slot >= self.room_count() {
            return None;
        }
        let start = slot * VALUES_PER_ROOM;
        let chunk = self.values.get(start..start + VALUES_PER_ROOM)?;
        Some([chunk[0], chunk[1], chunk[2], chunk[3]])
    }
}
