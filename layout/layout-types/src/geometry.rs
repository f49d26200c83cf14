//! Decoded 2D room boxes.

use serde::{Deserialize, Serialize};

/// Pixel-like units per meter in room geometry.
pub const UNITS_PER_METER: f64 = 50.0;

/// One room's axis-aligned footprint in pixel-like units.
///
/// `(x, y)` is the top-left corner; `center_x`/`center_y` are kept
/// alongside so consumers never recompute them.
///
/// # Example
///
/// ```
/// use layout_types::RoomGeometry;
///
/// let room = RoomGeometry::from_center("k", "Kitchen", "kitchen", 400.0, 300.0, 100.0, 50.0);
/// assert_eq!(room.x, 350.0);
/// assert_eq!(room.y, 275.0);
/// assert!(room.is_well_formed());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomGeometry {
    /// Originating node id.
    pub id: String,
    /// Display label.
    pub name: String,
    /// Room type label.
    #[serde(rename = "type")]
    pub room_type: String,
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
    /// Horizontal center.
    pub center_x: f64,
    /// Vertical center.
    pub center_y: f64,
}

impl RoomGeometry {
    /// Builds a box from its center and extents.
    #[must_use]
    pub fn from_center(
        id: impl Into<String>,
        name: impl Into<String>,
        room_type: impl Into<String>,
        center_x: f64,
        center_y: f64,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            room_type: room_type.into(),
            x: center_x - width / 2.0,
            y: center_y - height / 2.0,
            width,
            height,
            center_x,
            center_y,
        }
    }

    /// Returns `true` if every coordinate is finite and both extents are
    /// positive.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        [
            self.x,
            self.y,
            self.width,
            self.height,
            self.center_x,
            self.center_y,
        ]
        .iter()
        .all(|value| value.is_finite())
            && self.width > 0.0
            && self.height > 0.0
    }

    /// Floor area in square meters.
    #[must_use]
    pub fn area_m2(&self) -> f64 {
        (self.width / UNITS_PER_METER) * (self.height / UNITS_PER_METER)
    }
}
