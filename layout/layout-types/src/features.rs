//! Per-node feature tensors and the slot order shared by every tensor stage.

use serde::{Deserialize, Serialize};

use crate::graph::ConstraintGraph;
use crate::room::RoomType;
use crate::validation::ValidationError;

/// Divisor applied to room areas before they enter the encoder.
pub const AREA_NORMALIZER: f64 = 50.0;

/// Area assumed for rooms without usable bounds, in square meters.
pub const AREA_DEFAULT: f64 = 15.0;

/// Width of one node feature row: one-hot room type plus normalized area.
pub const FEATURE_DIM: usize = RoomType::COUNT + 1;

/// Slot-to-node-id mapping carried alongside every tensor stage.
///
/// Slot `i` of a feature row, a layout vector 4-tuple, or a decoded room
/// always refers to the node with id `ids()[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodeOrder(Vec<String>);

impl NodeOrder {
    /// Creates an order from node ids.
    #[must_use]
    pub const fn new(ids: Vec<String>) -> Self {
        Self(ids)
    }

    /// Node ids in slot order.
    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.0
    }

    /// Node id at a slot.
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<&str> {
        self.0.get(slot).map(String::as_str)
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Checks that this order is the slot order of `graph`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::OrderMismatch`] at the first differing
    /// slot, with `actual` empty when one side runs out.
    pub fn verify(&self, graph: &ConstraintGraph) -> Result<(), ValidationError> {
        let nodes = graph.nodes();
        let slots = self.0.len().max(nodes.len());
        for slot in 0..slots {
            let expected = nodes.get(slot).map(|node| node.id.as_str());
            let actual = self.get(slot);
            if expected != actual {
                return Err(ValidationError::OrderMismatch {
                    slot,
                    expected: expected.unwrap_or_default().to_string(),
                    actual: actual.unwrap_or_default().to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Row-major `N x FEATURE_DIM` node features plus connectivity.
///
/// # Example
///
/// ```
/// use layout_types::{ConstraintGraph, FeatureTensor, FEATURE_DIM};
///
/// let graph = ConstraintGraph::from_json(
///     r#"{"nodes": [{"id": "k", "type": "kitchen", "min_area": 10, "max_area": 20}], "links": []}"#,
/// ).unwrap();
///
/// let features = FeatureTensor::from_graph(&graph);
/// assert_eq!(features.node_count(), 1);
/// assert_eq!(features.row(0).len(), FEATURE_DIM);
/// assert_eq!(features.row(0)[1], 1.0);
/// assert!((features.row(0)[FEATURE_DIM - 1] - 0.3).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTensor {
    order: NodeOrder,
    data: Vec<f32>,
    edge_index: Vec<[usize; 2]>,
}

impl FeatureTensor {
    /// Encodes every node of a graph, preserving its node order.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_graph(graph: &ConstraintGraph) -> Self {
        let mut data = Vec::with_capacity(graph.node_count() * FEATURE_DIM);
        for node in graph.nodes() {
            let mut row = [0.0_f32; FEATURE_DIM];
            row[node.category().index()] = 1.0;
            row[RoomType::COUNT] = (node.resolved_area() / AREA_NORMALIZER) as f32;
            data.extend_from_slice(&row);
        }

        Self {
            order: graph.node_order(),
            data,
            edge_index: graph.edge_index(),
        }
    }

    /// Slot order of the rows.
    #[must_use]
    pub const fn order(&self) -> &NodeOrder {
        &self.order
    }

    /// Number of rows.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.order.len()
    }

    /// Row width.
    #[must_use]
    pub const fn dim(&self) -> usize {
        FEATURE_DIM
    }

    /// Row-major feature values.
    #[must_use]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Features of one node.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is out of range.
    #[must_use]
    pub fn row(&self, slot: usize) -> &[f32] {
        &self.data[slot * FEATURE_DIM..(slot + 1) * FEATURE_DIM]
    }

    /// Connectivity as `[source, target]` slot pairs, both directions.
    #[must_use]
    pub fn edge_index(&self) -> &[[usize; 2]] {
        &self.edge_index
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::graph::{AdjacencyEdge, EdgeType, GraphAttributes, RoomNode};
    use approx::assert_relative_eq;

    fn graph() -> ConstraintGraph {
        ConstraintGraph::new(
            vec![
                RoomNode::new("a", "A", "bedroom").with_area(Some(12.0), Some(16.0)),
                RoomNode::new("b", "B", "garage"),
                RoomNode::new("c", "C", "bathroom").with_area(Some(5.0), None),
            ],
            vec![AdjacencyEdge::new("a", "c", EdgeType::Adjacent)],
            GraphAttributes::default(),
        )
        .unwrap()
    }

    #[test]
    fn one_hot_and_area() {
        let features = FeatureTensor::from_graph(&graph());
        assert_eq!(features.node_count(), 3);
        assert_eq!(features.data().len(), 3 * FEATURE_DIM);

        let bedroom = features.row(0);
        assert_relative_eq!(bedroom[RoomType::Bedroom.index()], 1.0);
        assert_relative_eq!(bedroom.iter().take(RoomType::COUNT).sum::<f32>(), 1.0);
        assert_relative_eq!(bedroom[RoomType::COUNT], 14.0 / 50.0);

        let other = features.row(1);
        assert_relative_eq!(other[RoomType::Other.index()], 1.0);
        assert_relative_eq!(other[RoomType::COUNT], 15.0 / 50.0);

        assert_relative_eq!(features.row(2)[RoomType::COUNT], 5.0 / 50.0);
    }

    #[test]
    fn order_and_edges_follow_graph() {
        let graph = graph();
        let features = FeatureTensor::from_graph(&graph);
        assert_eq!(features.order().ids(), &["a", "b", "c"]);
        assert_eq!(features.edge_index(), &[[0, 2], [2, 0]]);
        assert!(features.order().verify(&graph).is_ok());
    }

    #[test]
    fn verify_reports_first_mismatch() {
        let graph = graph();
        let swapped = NodeOrder::new(vec!["a".into(), "c".into(), "b".into()]);
        let err = swapped.verify(&graph).unwrap_err();
        assert_eq!(
            err,
            ValidationError::OrderMismatch {
                slot: 1,
                expected: "b".to_string(),
                actual: "c".to_string(),
            }
        );

        let short = NodeOrder::new(vec!["a".into()]);
        assert!(matches!(
            short.verify(&graph),
            Err(ValidationError::OrderMismatch { slot: 1, .. })
        ));
    }
}
