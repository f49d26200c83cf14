//! Room-adjacency constraint graphs in node-link form.

use hashbrown::HashMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;
use crate::features::{AREA_DEFAULT, NodeOrder};
use crate::program::GlobalConstraints;
use crate::room::RoomType;
use crate::validation::ValidationError;

/// Desired spatial relationship between two rooms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EdgeType {
    /// Connected by a door or opening.
    Direct,
    /// Share a wall, no access required.
    #[default]
    Adjacent,
    /// Close proximity.
    Near,
    /// Should be kept apart.
    Far,
}

impl EdgeType {
    /// Attraction weight used when an edge carries no explicit weight.
    ///
    /// Negative values mean repulsion.
    #[must_use]
    pub const fn default_weight(&self) -> f64 {
        match self {
            Self::Direct => 1.0,
            Self::Adjacent => 0.8,
            Self::Near => 0.5,
            Self::Far => -0.5,
        }
    }

    /// Returns the wire label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Adjacent => "adjacent",
            Self::Near => "near",
            Self::Far => "far",
        }
    }
}

/// A room in the constraint graph.
///
/// # Example
///
/// ```
/// use layout_types::{RoomNode, RoomType};
///
/// let node = RoomNode::new("k1", "Kitchen", "kitchen").with_area(Some(10.0), Some(14.0));
/// assert_eq!(node.category(), RoomType::Kitchen);
/// assert!((node.resolved_area() - 12.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomNode {
    /// Unique node id.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,

    /// Display label.
    #[serde(default = "default_label")]
    pub label: String,

    /// Free-form room type label (see [`RoomNode::category`]).
    #[serde(rename = "type", default = "default_room_type")]
    pub room_type: String,

    /// Minimum area in square meters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_area: Option<f64>,

    /// Maximum area in square meters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_area: Option<f64>,

    /// Preferred width/height ratio.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<f64>,

    /// Whether the room needs windows.
    #[serde(default)]
    pub natural_light: bool,

    /// Free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_label() -> String {
    "Room".to_string()
}

fn default_room_type() -> String {
    RoomType::Other.as_str().to_string()
}

impl RoomNode {
    /// Creates a node with no area bounds.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        room_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            room_type: room_type.into(),
            min_area: None,
            max_area: None,
            aspect_ratio: None,
            natural_light: false,
            description: None,
        }
    }

    /// Sets the area bounds.
    #[must_use]
    pub const fn with_area(mut self, min_area: Option<f64>, max_area: Option<f64>) -> Self {
        self.min_area = min_area;
        self.max_area = max_area;
        self
    }

    /// Sets the natural light requirement.
    #[must_use]
    pub const fn with_natural_light(mut self, natural_light: bool) -> Self {
        self.natural_light = natural_light;
        self
    }

    /// Returns the encoder category of this room.
    #[must_use]
    pub fn category(&self) -> RoomType {
        RoomType::from_label(&self.room_type)
    }

    /// Returns the area the encoder sees, in square meters.
    ///
    /// Midpoint of the bounds when both are given, the minimum alone when
    /// only it is given, [`AREA_DEFAULT`] otherwise. A bound of zero counts
    /// as not given.
    #[must_use]
    pub fn resolved_area(&self) -> f64 {
        let given = |bound: Option<f64>| bound.filter(|value| *value != 0.0);
        match (given(self.min_area), given(self.max_area)) {
            (Some(min), Some(max)) => (min + max) / 2.0,
            (Some(min), None) => min,
            _ => AREA_DEFAULT,
        }
    }
}

/// A desired relationship between two rooms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjacencyEdge {
    /// Source node id.
    #[serde(deserialize_with = "deserialize_id")]
    pub source: String,

    /// Target node id.
    #[serde(deserialize_with = "deserialize_id")]
    pub target: String,

    /// Relationship kind.
    #[serde(rename = "type", default)]
    pub kind: EdgeType,

    /// Explicit weight, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,

    /// Free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AdjacencyEdge {
    /// Creates an edge weighted by its kind.
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>, kind: EdgeType) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
            weight: Some(kind.default_weight()),
            description: None,
        }
    }

    /// Returns the explicit weight or the kind's default.
    #[must_use]
    pub fn effective_weight(&self) -> f64 {
        self.weight.unwrap_or_else(|| self.kind.default_weight())
    }
}

/// Graph-level attributes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphAttributes {
    /// The free-text prompt the graph was derived from.
    #[serde(default, alias = "prompt", skip_serializing_if = "Option::is_none")]
    pub raw_prompt: Option<String>,

    /// Connectivity flag as reported by the producer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_connected: Option<bool>,

    /// Whole-plan constraints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_constraints: Option<GlobalConstraints>,

    /// Any other attributes, preserved verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Summary counts for a constraint graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    /// Number of rooms.
    pub node_count: usize,
    /// Number of adjacency requirements.
    pub edge_count: usize,
    /// Whether every room is reachable from every other.
    pub is_connected: bool,
}

/// Node-link wire shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct NodeLinkGraph {
    #[serde(default)]
    directed: bool,
    #[serde(default)]
    multigraph: bool,
    #[serde(default)]
    graph: GraphAttributes,
    #[serde(default)]
    nodes: Vec<RoomNode>,
    #[serde(default, alias = "links")]
    edges: Vec<AdjacencyEdge>,
}

/// An immutable, validated room-adjacency graph.
///
/// Node ids are unique and every edge references existing nodes. The
/// order of [`ConstraintGraph::nodes`] is the slot order used by every
/// tensor stage downstream.
///
/// # Example
///
/// ```
/// use layout_types::ConstraintGraph;
///
/// let json = r#"{
///     "nodes": [
///         {"id": "living", "label": "Living Room", "type": "living_room"},
///         {"id": "kitchen", "label": "Kitchen", "type": "kitchen"}
///     ],
///     "links": [{"source": "living", "target": "kitchen", "type": "direct"}],
///     "graph": {"raw_prompt": "small flat"}
/// }"#;
///
/// let graph = ConstraintGraph::from_json(json).unwrap();
/// assert_eq!(graph.node_count(), 2);
/// assert!(graph.is_connected());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NodeLinkGraph", into = "NodeLinkGraph")]
pub struct ConstraintGraph {
    nodes: Vec<RoomNode>,
    edges: Vec<AdjacencyEdge>,
    attributes: GraphAttributes,
    index: HashMap<String, usize>,
}

impl ConstraintGraph {
    /// Builds a graph, validating ids, areas and edge endpoints.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when an id is empty or duplicated, an
    /// area bound is negative or not finite, or an edge names an unknown
    /// node.
    pub fn new(
        nodes: Vec<RoomNode>,
        edges: Vec<AdjacencyEdge>,
        attributes: GraphAttributes,
    ) -> std::result::Result<Self, ValidationError> {
        let mut index = HashMap::with_capacity(nodes.len());
        for (position, node) in nodes.iter().enumerate() {
            if node.id.is_empty() {
                return Err(ValidationError::EmptyNodeId(position));
            }
            for bound in [node.min_area, node.max_area].into_iter().flatten() {
                if !bound.is_finite() || bound < 0.0 {
                    return Err(ValidationError::InvalidArea {
                        id: node.id.clone(),
                        value: bound,
                    });
                }
            }
            if index.insert(node.id.clone(), position).is_some() {
                return Err(ValidationError::DuplicateNodeId(node.id.clone()));
            }
        }

        for edge in &edges {
            for endpoint in [&edge.source, &edge.target] {
                if !index.contains_key(endpoint.as_str()) {
                    return Err(ValidationError::UnknownEdgeEndpoint {
                        source_id: edge.source.clone(),
                        target_id: edge.target.clone(),
                        missing: endpoint.clone(),
                    });
                }
            }
        }

        Ok(Self {
            nodes,
            edges,
            attributes,
            index,
        })
    }

    /// Parses a graph from node-link JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid node-link JSON or the
    /// graph fails validation.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a graph from an already-decoded node-link JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not have the node-link shape or
    /// the graph fails validation.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Serializes the graph to node-link JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rooms in slot order.
    #[must_use]
    pub fn nodes(&self) -> &[RoomNode] {
        &self.nodes
    }

    /// Adjacency requirements.
    #[must_use]
    pub fn edges(&self) -> &[AdjacencyEdge] {
        &self.edges
    }

    /// Graph-level attributes.
    #[must_use]
    pub const fn attributes(&self) -> &GraphAttributes {
        &self.attributes
    }

    /// Number of rooms.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of adjacency requirements.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if the graph has no rooms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the slot of a node id.
    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Returns the node with the given id.
    #[must_use]
    pub fn node_by_id(&self, id: &str) -> Option<&RoomNode> {
        self.index_of(id).map(|slot| &self.nodes[slot])
    }

    /// Returns the slot order of this graph.
    #[must_use]
    pub fn node_order(&self) -> NodeOrder {
        NodeOrder::new(self.nodes.iter().map(|node| node.id.clone()).collect())
    }

    /// Returns connectivity as `[source, target]` slot pairs.
    ///
    /// The graph is undirected, so every edge appears in both directions.
    /// Self-loops appear once.
    #[must_use]
    pub fn edge_index(&self) -> Vec<[usize; 2]> {
        let mut pairs = Vec::with_capacity(self.edges.len() * 2);
        for edge in &self.edges {
            let (Some(a), Some(b)) = (self.index_of(&edge.source), self.index_of(&edge.target))
            else {
                continue;
            };
            pairs.push([a, b]);
            if a != b {
                pairs.push([b, a]);
            }
        }
        pairs
    }

    /// Returns `true` if every room is reachable from every other.
    ///
    /// An empty graph counts as connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        let n = self.nodes.len();
        if n == 0 {
            return true;
        }

        let mut neighbours = vec![Vec::new(); n];
        for [a, b] in self.edge_index() {
            neighbours[a].push(b);
        }

        let mut seen = vec![false; n];
        let mut stack = vec![0];
        seen[0] = true;
        let mut reached = 1;
        while let Some(slot) = stack.pop() {
            for &next in &neighbours[slot] {
                if !seen[next] {
                    seen[next] = true;
                    reached += 1;
                    stack.push(next);
                }
            }
        }
        reached == n
    }

    pub(crate) fn set_connectivity_flag(&mut self, connected: bool) {
        self.attributes.is_connected = Some(connected);
    }

    /// Returns summary counts.
    #[must_use]
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            is_connected: self.is_connected(),
        }
    }
}

impl TryFrom<NodeLinkGraph> for ConstraintGraph {
    type Error = ValidationError;

    fn try_from(wire: NodeLinkGraph) -> std::result::Result<Self, Self::Error> {
        Self::new(wire.nodes, wire.edges, wire.graph)
    }
}

impl From<ConstraintGraph> for NodeLinkGraph {
    fn from(graph: ConstraintGraph) -> Self {
        Self {
            directed: false,
            multigraph: false,
            graph: graph.attributes,
            nodes: graph.nodes,
            edges: graph.edges,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
    Text(String),
    Integer(i64),
}

/// Accepts string or integer node ids.
fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match WireId::deserialize(deserializer)? {
        WireId::Text(text) => text,
        WireId::Integer(number) => number.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn three_rooms() -> ConstraintGraph {
        ConstraintGraph::new(
            vec![
                RoomNode::new("living", "Living Room", "living_room"),
                RoomNode::new("kitchen", "Kitchen", "kitchen"),
                RoomNode::new("bed", "Bedroom", "bedroom"),
            ],
            vec![AdjacencyEdge::new("living", "kitchen", EdgeType::Direct)],
            GraphAttributes::default(),
        )
        .unwrap()
    }

    #[test]
    fn edge_type_weights() {
        assert_relative_eq!(EdgeType::Direct.default_weight(), 1.0);
        assert_relative_eq!(EdgeType::Adjacent.default_weight(), 0.8);
        assert_relative_eq!(EdgeType::Near.default_weight(), 0.5);
        assert_relative_eq!(EdgeType::Far.default_weight(), -0.5);
    }

    #[test]
    fn resolved_area_rules() {
        let both = RoomNode::new("a", "A", "kitchen").with_area(Some(10.0), Some(20.0));
        assert_relative_eq!(both.resolved_area(), 15.0);

        let min_only = RoomNode::new("a", "A", "kitchen").with_area(Some(12.0), None);
        assert_relative_eq!(min_only.resolved_area(), 12.0);

        let max_only = RoomNode::new("a", "A", "kitchen").with_area(None, Some(30.0));
        assert_relative_eq!(max_only.resolved_area(), AREA_DEFAULT);

        let zero_min = RoomNode::new("a", "A", "kitchen").with_area(Some(0.0), Some(30.0));
        assert_relative_eq!(zero_min.resolved_area(), AREA_DEFAULT);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let result = ConstraintGraph::new(
            vec![
                RoomNode::new("a", "A", "kitchen"),
                RoomNode::new("a", "B", "bedroom"),
            ],
            Vec::new(),
            GraphAttributes::default(),
        );
        assert_eq!(
            result.err(),
            Some(ValidationError::DuplicateNodeId("a".to_string()))
        );
    }

    #[test]
    fn rejects_dangling_edges() {
        let result = ConstraintGraph::new(
            vec![RoomNode::new("a", "A", "kitchen")],
            vec![AdjacencyEdge::new("a", "ghost", EdgeType::Near)],
            GraphAttributes::default(),
        );
        assert!(matches!(
            result,
            Err(ValidationError::UnknownEdgeEndpoint { ref missing, .. }) if missing == "ghost"
        ));
    }

    #[test]
    fn rejects_negative_area() {
        let result = ConstraintGraph::new(
            vec![RoomNode::new("a", "A", "kitchen").with_area(Some(-1.0), None)],
            Vec::new(),
            GraphAttributes::default(),
        );
        assert!(matches!(result, Err(ValidationError::InvalidArea { .. })));
    }

    #[test]
    fn edge_index_is_bidirectional() {
        let graph = three_rooms();
        assert_eq!(graph.edge_index(), vec![[0, 1], [1, 0]]);
    }

    #[test]
    fn connectivity() {
        let graph = three_rooms();
        assert!(!graph.is_connected());

        let stats = graph.stats();
        assert_eq!(stats.node_count, 3);
        assert_eq!(stats.edge_count, 1);
        assert!(!stats.is_connected);

        let empty =
            ConstraintGraph::new(Vec::new(), Vec::new(), GraphAttributes::default()).unwrap();
        assert!(empty.is_connected());
    }

    #[test]
    fn parses_links_and_integer_ids() {
        let json = r#"{
            "directed": false,
            "multigraph": false,
            "graph": {"raw_prompt": "two rooms", "is_connected": true, "style": "modern"},
            "nodes": [
                {"id": 1, "label": "Kitchen", "type": "kitchen", "min_area": 10, "max_area": null},
                {"id": 2, "type": "garage"}
            ],
            "links": [{"source": 1, "target": 2, "type": "far"}]
        }"#;

        let graph = ConstraintGraph::from_json(json).unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.nodes()[0].id, "1");
        assert_eq!(graph.nodes()[1].label, "Room");
        assert_eq!(graph.nodes()[1].category(), RoomType::Other);
        assert_eq!(graph.edges()[0].kind, EdgeType::Far);
        assert_relative_eq!(graph.edges()[0].effective_weight(), -0.5);
        assert_eq!(graph.attributes().raw_prompt.as_deref(), Some("two rooms"));
        assert_eq!(
            graph.attributes().extra.get("style"),
            Some(&serde_json::Value::String("modern".to_string()))
        );
    }

    #[test]
    fn parses_edges_key() {
        let json = r#"{
            "nodes": [{"id": "a"}, {"id": "b"}],
            "edges": [{"source": "a", "target": "b", "type": "near", "weight": 0.25}]
        }"#;
        let graph = ConstraintGraph::from_json(json).unwrap();
        assert_relative_eq!(graph.edges()[0].effective_weight(), 0.25);
    }

    #[test]
    fn invalid_json_reports_validation() {
        let json = r#"{"nodes": [{"id": "a"}], "links": [{"source": "a", "target": "b"}]}"#;
        let err = ConstraintGraph::from_json(json).unwrap_err();
        assert!(err.to_string().contains("unknown node b"));
    }

    #[test]
    fn json_round_trip_preserves_order() {
        let graph = three_rooms();
        let text = graph.to_json().unwrap();
        let parsed = ConstraintGraph::from_json(&text).unwrap();
        assert_eq!(parsed.node_order(), graph.node_order());
        assert_eq!(parsed.index_of("bed"), Some(2));
    }
}
