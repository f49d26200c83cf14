//! Floor-plan layout generation from constraint graphs.
//!
//! This crate wires the learned stages and the geometry stages into one
//! service:
//!
//! ```text
//! ConstraintGraph -> FeatureTensor -> GraphEncoder -> GraphEmbedding
//!     -> DiffusionSampler -> LayoutVector -> LayoutDecoder -> RoomGeometry
//!     -> SVG render, optional GLB scene
//! ```
//!
//! # Service
//!
//! - [`LayoutService`] - Owns the weights (loaded lazily, once), runs
//!   requests concurrently, reports availability up front
//! - [`LayoutOutcome`] - SVG, rooms and any [`Degradation`]s: untrained
//!   weights, truncated rooms, placeholder or unavailable 3D scene
//!
//! # Stages
//!
//! - [`LayoutDecoder`] - Latent boxes to pixel-like room boxes, positional
//!   over the graph's node order
//! - [`render_svg`] - One rectangle and label per room on a fixed canvas
//!
//! # Configuration
//!
//! [`PipelineConfig`] gathers every stage's settings, loads from JSON and
//! cross-checks the sizes the stages share.
//!
//! # Example
//!
//! ```
//! use layout_pipeline::{LayoutService, PipelineConfig};
//! use layout_types::ConstraintGraph;
//!
//! let service = LayoutService::cpu(PipelineConfig::default()).unwrap();
//! assert!(service.is_available());
//!
//! let graph = ConstraintGraph::from_json(r#"{
//!     "nodes": [
//!         {"id": "living", "label": "Living Room", "type": "living_room"},
//!         {"id": "kitchen", "label": "Kitchen", "type": "kitchen"},
//!         {"id": "bed", "label": "Bedroom", "type": "bedroom"}
//!     ],
//!     "links": [{"source": "living", "target": "kitchen", "type": "direct"}]
//! }"#).unwrap();
//!
//! let outcome = service.generate_seeded(&graph, 7).unwrap();
//! assert_eq!(outcome.rooms.len(), 3);
//! assert_eq!(outcome.svg.matches("<rect").count(), 3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod config;
mod decode;
mod error;
mod outcome;
mod render;
mod service;

pub use config::{CapacityPolicy, CheckpointConfig, PipelineConfig};
pub use decode::{DecoderConfig, LayoutDecoder};
pub use error::{LayoutError, Result};
pub use outcome::{Degradation, LayoutOutcome};
pub use render::{DEFAULT_FILL, RenderConfig, render_svg, room_fill};
pub use service::LayoutService;
