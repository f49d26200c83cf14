//! Geometry extrusion and GLB export for floor plans.
//!
//! This crate turns decoded 2D room boxes into a 3D scene and encodes it
//! as a binary glTF container.
//!
//! # Scene Construction
//!
//! - [`Scene3D`] - Five solids per room: a floor slab colored by room type
//!   and four gray walls standing outside the slab
//! - [`ExtrusionConfig`] - Wall height and thickness, slab thickness, unit
//!   scale (50 units per meter by default)
//! - [`box_mesh`] - Flat-shaded box triangulation
//!
//! # Export
//!
//! - [`write_glb`] / [`parse_glb`] - GLB container encoding and decoding
//! - [`GlbAsset`] - Encoded asset with base64 transport
//! - [`Extruder`] - Export with fallbacks: `None` when 3D is disabled for
//!   the process, a placeholder asset when a scene cannot be built
//!
//! # Example
//!
//! ```
//! use layout_scene::{Extruder, ExtrusionConfig, parse_glb};
//! use layout_types::RoomGeometry;
//!
//! let rooms = vec![
//!     RoomGeometry::from_center("living", "Living", "living_room", 300.0, 300.0, 150.0, 100.0),
//!     RoomGeometry::from_center("kitchen", "Kitchen", "kitchen", 450.0, 300.0, 100.0, 100.0),
//! ];
//!
//! let extruder = Extruder::new(ExtrusionConfig::default().with_wall_height(2.7));
//! if let Some(asset) = extruder.extrude(&rooms) {
//!     let doc = parse_glb(asset.as_bytes()).unwrap();
//!     assert_eq!(doc.mesh_count(), 10);
//!     let _transport = asset.to_base64();
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod backend;
mod color;
mod error;
mod extrude;
mod glb;
mod scene;
mod solid;

pub use backend::BackendStatus;
pub use color::{DEFAULT_FLOOR_COLOR, Rgba, WALL_COLOR, color_factor, floor_color};
pub use error::{SceneError, SceneResult};
pub use extrude::Extruder;
pub use glb::{
    GLB_MAGIC, GLB_VERSION, GlbAsset, GlbDocument, parse_glb, placeholder_glb, write_glb,
};
pub use scene::{ExtrusionConfig, SOLIDS_PER_ROOM, Scene3D};
pub use solid::{BoxMesh, Solid, SolidKind, WallSide, box_mesh};
