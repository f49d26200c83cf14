//! Extrusion of 2D room boxes into a scene of colored solids.

use layout_types::RoomGeometry;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::color::{WALL_COLOR, floor_color};
use crate::error::{SceneError, SceneResult};
use crate::solid::{Solid, SolidKind, WallSide};

/// Solids emitted per room: one floor slab and four walls.
pub const SOLIDS_PER_ROOM: usize = 5;

/// Extrusion parameters, in meters except for the unit scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtrusionConfig {
    /// Wall height.
    pub wall_height: f64,
    /// Wall thickness.
    pub wall_thickness: f64,
    /// Floor slab thickness.
    pub floor_thickness: f64,
    /// Meters per pixel-like geometry unit.
    pub meters_per_unit: f64,
}

impl Default for ExtrusionConfig {
    fn default() -> Self {
        Self {
            wall_height: 3.0,
            wall_thickness: 0.2,
            floor_thickness: 0.2,
            meters_per_unit: 0.02,
        }
    }
}

impl ExtrusionConfig {
    /// Sets the wall height.
    #[must_use]
    pub const fn with_wall_height(mut self, height: f64) -> Self {
        self.wall_height = height;
        self
    }

    /// Sets the wall thickness.
    #[must_use]
    pub const fn with_wall_thickness(mut self, thickness: f64) -> Self {
        self.wall_thickness = thickness;
        self
    }

    /// Sets the floor slab thickness.
    #[must_use]
    pub const fn with_floor_thickness(mut self, thickness: f64) -> Self {
        self.floor_thickness = thickness;
        self
    }

    /// Sets the unit scale.
    #[must_use]
    pub const fn with_meters_per_unit(mut self, scale: f64) -> Self {
        self.meters_per_unit = scale;
        self
    }

    /// Returns `true` if every parameter is finite and positive.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        [
            self.wall_height,
            self.wall_thickness,
            self.floor_thickness,
            self.meters_per_unit,
        ]
        .iter()
        .all(|v| v.is_finite() && *v > 0.0)
    }
}

/// An extruded floor plan: a flat list of solids, five per room.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene3D {
    solids: Vec<Solid>,
}

impl Scene3D {
    /// Extrudes every room.
    ///
    /// Plan `x` maps to scene `x`, plan `y` maps to scene `z`, and `y` is up.
    /// The floor slab sits on `y = 0`; walls stand outside the slab so the
    /// interior keeps the room's full footprint.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::MalformedRoom`] for a room with non-finite
    /// coordinates or a non-positive extent, and for an invalid config.
    ///
    /// # Example
    ///
    /// ```
    /// use layout_scene::{ExtrusionConfig, Scene3D};
    /// use layout_types::RoomGeometry;
    ///
    /// let rooms = vec![RoomGeometry::from_center("k", "Kitchen", "kitchen", 400.0, 300.0, 100.0, 50.0)];
    /// let scene = Scene3D::from_rooms(&rooms, &ExtrusionConfig::default()).unwrap();
    /// assert_eq!(scene.len(), 5);
    /// ```
    pub fn from_rooms(rooms: &[RoomGeometry], config: &ExtrusionConfig) -> SceneResult<Self> {
        if !config.is_valid() {
            return Err(SceneError::malformed_room(
                "*",
                format!("invalid extrusion config {config:?}"),
            ));
        }

        let mut solids = Vec::with_capacity(rooms.len() * SOLIDS_PER_ROOM);
        for room in rooms {
            extrude_room(room, config, &mut solids)?;
        }
        Ok(Self { solids })
    }

    /// All solids in insertion order.
    #[must_use]
    pub fn solids(&self) -> &[Solid] {
        &self.solids
    }

    /// Number of solids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.solids.len()
    }

    /// Returns `true` if the scene has no solids.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.solids.is_empty()
    }
}

fn extrude_room(
    room: &RoomGeometry,
    config: &ExtrusionConfig,
    solids: &mut Vec<Solid>,
) -> SceneResult<()> {
    if !room.is_well_formed() {
        return Err(SceneError::malformed_room(
            &room.id,
            format!(
                "box ({}, {}) {}x{} is not finite and positive",
                room.center_x, room.center_y, room.width, room.height
            ),
        ));
    }

    let s = config.meters_per_unit;
    let w = room.width * s;
    let d = room.height * s;
    let x = room.center_x * s;
    let z = room.center_y * s;
    let h = config.wall_height;
    let t = config.wall_thickness;

    let mut push = |kind, extents, translation, color| {
        solids.push(Solid {
            room_id: room.id.clone(),
            kind,
            extents,
            translation,
            color,
        });
    };

    push(
        SolidKind::Floor,
        Vector3::new(w, config.floor_thickness, d),
        Vector3::new(x, config.floor_thickness / 2.0, z),
        floor_color(&room.room_type),
    );

    let across = Vector3::new(w + 2.0 * t, h, t);
    push(
        SolidKind::Wall(WallSide::North),
        across,
        Vector3::new(x, h / 2.0, z - d / 2.0 - t / 2.0),
        WALL_COLOR,
    );
    push(
        SolidKind::Wall(WallSide::South),
        across,
        Vector3::new(x, h / 2.0, z + d / 2.0 + t / 2.0),
        WALL_COLOR,
    );

    let along = Vector3::new(t, h, d);
    push(
        SolidKind::Wall(WallSide::East),
        along,
        Vector3::new(x + w / 2.0 + t / 2.0, h / 2.0, z),
        WALL_COLOR,
    );
    push(
        SolidKind::Wall(WallSide::West),
        along,
        Vector3::new(x - w / 2.0 - t / 2.0, h / 2.0, z),
        WALL_COLOR,
    );

    Ok(())
}
