//! Structured architectural programs and their conversion to constraint graphs.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::graph::{AdjacencyEdge, ConstraintGraph, EdgeType, GraphAttributes, RoomNode};
use crate::validation::ValidationError;

/// Per-room sizing and lighting requirements.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoomConstraint {
    /// Minimum area in square meters.
    #[serde(default)]
    pub min_area: Option<f64>,
    /// Maximum area in square meters.
    #[serde(default)]
    pub max_area: Option<f64>,
    /// Preferred width/height ratio.
    #[serde(default)]
    pub aspect_ratio: Option<f64>,
    /// Requires windows.
    #[serde(default)]
    pub natural_light: bool,
}

/// A room requested by the program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramRoom {
    /// Unique id, e.g. `living_room_1`.
    pub id: String,
    /// Human readable name.
    pub name: String,
    /// Room type label.
    #[serde(rename = "type")]
    pub room_type: String,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Sizing requirements.
    #[serde(default)]
    pub constraints: RoomConstraint,
}

/// A relationship requested between two rooms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjacency {
    /// First room id.
    pub room_id_a: String,
    /// Second room id.
    pub room_id_b: String,
    /// Relationship kind.
    #[serde(rename = "type")]
    pub kind: EdgeType,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Whole-plan constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalConstraints {
    /// Lower bound on total floor area.
    #[serde(default)]
    pub total_area_min: Option<f64>,
    /// Upper bound on total floor area.
    #[serde(default)]
    pub total_area_max: Option<f64>,
    /// Number of floors, at least one.
    #[serde(default = "default_floors")]
    pub floors: u32,
    /// Architectural style.
    #[serde(default)]
    pub style: Option<String>,
    /// Site width in meters.
    #[serde(default)]
    pub site_width: Option<f64>,
    /// Site depth in meters.
    #[serde(default)]
    pub site_depth: Option<f64>,
}

const fn default_floors() -> u32 {
    1
}

impl Default for GlobalConstraints {
    fn default() -> Self {
        Self {
            total_area_min: None,
            total_area_max: None,
            floors: default_floors(),
            style: None,
            site_width: None,
            site_depth: None,
        }
    }
}

/// A structured description of the rooms and relationships a plan needs.
///
/// # Example
///
/// ```
/// use layout_types::{Adjacency, ArchitecturalProgram, EdgeType, ProgramRoom, RoomConstraint};
///
/// let room = |id: &str, kind: &str| ProgramRoom {
///     id: id.to_string(),
///     name: id.to_string(),
///     room_type: kind.to_string(),
///     description: None,
///     constraints: RoomConstraint::default(),
/// };
///
/// let program = ArchitecturalProgram {
///     rooms: vec![room("living", "living_room"), room("kitchen", "kitchen")],
///     adjacencies: vec![Adjacency {
///         room_id_a: "living".to_string(),
///         room_id_b: "kitchen".to_string(),
///         kind: EdgeType::Direct,
///         description: None,
///     }],
///     global_constraints: Default::default(),
///     raw_prompt: Some("open plan".to_string()),
/// };
///
/// let graph = program.to_constraint_graph().unwrap();
/// assert_eq!(graph.edge_count(), 1);
/// assert_eq!(graph.attributes().is_connected, Some(true));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArchitecturalProgram {
    /// Requested rooms.
    pub rooms: Vec<ProgramRoom>,
    /// Requested relationships.
    #[serde(default)]
    pub adjacencies: Vec<Adjacency>,
    /// Whole-plan constraints.
    #[serde(default)]
    pub global_constraints: GlobalConstraints,
    /// The prompt the program was parsed from.
    #[serde(default)]
    pub raw_prompt: Option<String>,
}

impl ArchitecturalProgram {
    /// Converts the program into a constraint graph.
    ///
    /// Adjacencies naming unknown rooms are skipped. Repeated adjacencies
    /// between the same pair of rooms collapse into one edge, the last one
    /// winning. The connectivity flag is computed and stored as a graph
    /// attribute.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if room ids are empty or duplicated,
    /// or an area bound is invalid.
    pub fn to_constraint_graph(&self) -> Result<ConstraintGraph, ValidationError> {
        let nodes: Vec<RoomNode> = self
            .rooms
            .iter()
            .map(|room| RoomNode {
                id: room.id.clone(),
                label: room.name.clone(),
                room_type: room.room_type.clone(),
                min_area: room.constraints.min_area,
                max_area: room.constraints.max_area,
                aspect_ratio: room.constraints.aspect_ratio,
                natural_light: room.constraints.natural_light,
                description: room.description.clone(),
            })
            .collect();

        let mut edges: Vec<AdjacencyEdge> = Vec::with_capacity(self.adjacencies.len());
        let mut pairs: HashMap<(&str, &str), usize> = HashMap::new();
        for adjacency in &self.adjacencies {
            let a = adjacency.room_id_a.as_str();
            let b = adjacency.room_id_b.as_str();
            let known = |id: &str| self.rooms.iter().any(|room| room.id == id);
            if !known(a) || !known(b) {
                continue;
            }

            let mut edge = AdjacencyEdge::new(a, b, adjacency.kind);
            edge.description.clone_from(&adjacency.description);

            let key = if a <= b { (a, b) } else { (b, a) };
            match pairs.get(&key) {
                Some(&slot) => edges[slot] = edge,
                None => {
                    pairs.insert(key, edges.len());
                    edges.push(edge);
                }
            }
        }

        let attributes = GraphAttributes {
            raw_prompt: self.raw_prompt.clone(),
            is_connected: None,
            global_constraints: Some(self.global_constraints.clone()),
            extra: serde_json::Map::new(),
        };

        let mut graph = ConstraintGraph::new(nodes, edges, attributes)?;
        let connected = graph.is_connected();
        graph.set_connectivity_flag(connected);
        Ok(graph)
    }
}
