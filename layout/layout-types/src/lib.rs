//! Value types for floor-plan layout generation.
//!
//! This crate provides the data that flows between the pipeline stages:
//!
//! # Graph Types
//!
//! - [`ConstraintGraph`] - Validated room-adjacency graph (node-link JSON)
//! - [`RoomNode`] / [`AdjacencyEdge`] - Rooms and their desired relationships
//! - [`RoomType`] - The ten categories the encoder distinguishes
//! - [`ArchitecturalProgram`] - Structured program, convertible to a graph
//!
//! # Tensor Stages
//!
//! - [`FeatureTensor`] - One-hot room type plus normalized area per node
//! - [`GraphEmbedding`] - Fixed-width summary of one graph
//! - [`LayoutVector`] - Flat `4 x capacity` latent box encoding
//! - [`NodeOrder`] - Slot-to-node-id mapping carried by every stage
//!
//! # Output Types
//!
//! - [`RoomGeometry`] - Decoded room box in pixel-like units (50 per meter)
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with no numeric backend dependencies. Model,
//! scene and pipeline crates all build on it.
//!
//! # Example
//!
//! ```
//! use layout_types::{ConstraintGraph, FeatureTensor};
//!
//! let graph = ConstraintGraph::from_json(r#"{
//!     "nodes": [
//!         {"id": "living", "label": "Living Room", "type": "living_room"},
//!         {"id": "kitchen", "label": "Kitchen", "type": "kitchen"},
//!         {"id": "bed", "label": "Bedroom", "type": "bedroom"}
//!     ],
//!     "links": [{"source": "living", "target": "kitchen", "type": "direct", "weight": 1.0}],
//!     "graph": {"raw_prompt": "a small flat"}
//! }"#).unwrap();
//!
//! let features = FeatureTensor::from_graph(&graph);
//! assert_eq!(features.node_count(), 3);
//! assert_eq!(features.edge_index().len(), 2);
//! assert_eq!(features.order(), &graph.node_order());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod error;
mod features;
mod geometry;
mod graph;
mod latent;
mod program;
mod room;
mod validation;

// Re-export graph types
pub use graph::{AdjacencyEdge, ConstraintGraph, EdgeType, GraphAttributes, GraphStats, RoomNode};
pub use program::{
    Adjacency, ArchitecturalProgram, GlobalConstraints, ProgramRoom, RoomConstraint,
};
pub use room::RoomType;

// Re-export tensor stages
pub use features::{AREA_DEFAULT, AREA_NORMALIZER, FEATURE_DIM, FeatureTensor, NodeOrder};
pub use latent::{GraphEmbedding, LayoutVector, VALUES_PER_ROOM};

// Re-export output types
pub use geometry::{RoomGeometry, UNITS_PER_METER};

// Re-export validation
pub use validation::ValidationError;

// Re-export error types
pub use error::{LayoutTypesError, Result};
