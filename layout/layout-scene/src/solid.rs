//! Axis-aligned solid boxes and their triangulation.

use nalgebra::Vector3;

use crate::color::Rgba;

/// Which side of a room a wall closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WallSide {
    /// Towards negative z.
    North,
    /// Towards positive z.
    South,
    /// Towards positive x.
    East,
    /// Towards negative x.
    West,
}

impl WallSide {
    /// Short suffix used in node names.
    #[must_use]
    pub const fn suffix(&self) -> &'static str {
        match self {
            Self::North => "n",
            Self::South => "s",
            Self::East => "e",
            Self::West => "w",
        }
    }
}

/// Role of a solid within its room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolidKind {
    /// The floor slab.
    Floor,
    /// One of the four walls.
    Wall(WallSide),
}

/// A colored box, centered on `translation`.
#[derive(Debug, Clone, PartialEq)]
pub struct Solid {
    /// Room the solid belongs to.
    pub room_id: String,
    /// Floor or wall.
    pub kind: SolidKind,
    /// Full size along x, y (up) and z, in meters.
    pub extents: Vector3<f64>,
    /// Center position in meters.
    pub translation: Vector3<f64>,
    /// Surface color.
    pub color: Rgba,
}

impl Solid {
    /// Node name, e.g. `kitchen_floor` or `kitchen_wall_n`.
    #[must_use]
    pub fn name(&self) -> String {
        match self.kind {
            SolidKind::Floor => format!("{}_floor", self.room_id),
            SolidKind::Wall(side) => format!("{}_wall_{}", self.room_id, side.suffix()),
        }
    }

    /// Box volume in cubic meters.
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.extents.x * self.extents.y * self.extents.z
    }

    /// Triangulates the box around the origin.
    #[must_use]
    pub fn mesh(&self) -> BoxMesh {
        box_mesh(&self.extents)
    }
}

/// Triangle mesh of one box with per-face normals.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxMesh {
    /// Vertex positions, four per face.
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals, matching `positions`.
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices, CCW when viewed from outside.
    pub indices: Vec<u16>,
}

impl BoxMesh {
    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Componentwise minimum of the positions.
    #[must_use]
    pub fn min(&self) -> [f32; 3] {
        self.positions.iter().fold([f32::INFINITY; 3], |acc, p| {
            [acc[0].min(p[0]), acc[1].min(p[1]), acc[2].min(p[2])]
        })
    }

    /// Componentwise maximum of the positions.
    #[must_use]
    pub fn max(&self) -> [f32; 3] {
        self.positions.iter().fold([f32::NEG_INFINITY; 3], |acc, p| {
            [acc[0].max(p[0]), acc[1].max(p[1]), acc[2].max(p[2])]
        })
    }

    /// Signed enclosed volume; positive when the winding faces outward.
    #[must_use]
    pub fn signed_volume(&self) -> f64 {
        let mut volume = 0.0;
        for tri in self.indices.chunks_exact(3) {
            let [v0, v1, v2] = [tri[0], tri[1], tri[2]].map(|i| {
                let p = self.positions[usize::from(i)];
                Vector3::new(f64::from(p[0]), f64::from(p[1]), f64::from(p[2]))
            });
            volume += v0.dot(&v1.cross(&v2));
        }
        volume / 6.0
    }
}

/// Corners of the unit cube, indexed by `x | y << 1 | z << 2` order below.
const CORNERS: [[f64; 3]; 8] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [1.0, 1.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 1.0],
    [1.0, 1.0, 1.0],
    [0.0, 1.0, 1.0],
];

/// Faces as corner quads, CCW from outside, with their normals.
const FACES: [([usize; 4], [f32; 3]); 6] = [
    ([0, 3, 2, 1], [0.0, 0.0, -1.0]),
    ([4, 5, 6, 7], [0.0, 0.0, 1.0]),
    ([0, 1, 5, 4], [0.0, -1.0, 0.0]),
    ([3, 7, 6, 2], [0.0, 1.0, 0.0]),
    ([0, 4, 7, 3], [-1.0, 0.0, 0.0]),
    ([1, 2, 6, 5], [1.0, 0.0, 0.0]),
];

/// Builds a box of the given extents centered at the origin.
///
/// Each face gets its own four vertices so normals stay flat: 24 vertices
/// and 36 indices in total.
///
/// # Example
///
/// ```
/// use layout_scene::box_mesh;
/// use nalgebra::Vector3;
///
/// let mesh = box_mesh(&Vector3::new(2.0, 1.0, 3.0));
/// assert_eq!(mesh.vertex_count(), 24);
/// assert_eq!(mesh.indices.len(), 36);
/// assert!((mesh.signed_volume() - 6.0).abs() < 1e-6);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn box_mesh(extents: &Vector3<f64>) -> BoxMesh {
    let mut positions = Vec::with_capacity(24);
    let mut normals = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (quad, normal) in FACES {
        let base = positions.len() as u16;
        for corner in quad {
            let c = CORNERS[corner];
            positions.push([
                ((c[0] - 0.5) * extents.x) as f32,
                ((c[1] - 0.5) * extents.y) as f32,
                ((c[2] - 0.5) * extents.z) as f32,
            ]);
            normals.push(normal);
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    BoxMesh {
        positions,
        normals,
        indices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn box_bounds() {
        let mesh = box_mesh(&Vector3::new(4.0, 0.2, 2.0));
        assert_eq!(mesh.min(), [-2.0, -0.1, -1.0]);
        assert_eq!(mesh.max(), [2.0, 0.1, 1.0]);
    }

    #[test]
    fn box_is_closed_and_outward() {
        let mesh = box_mesh(&Vector3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(mesh.signed_volume(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn normals_match_winding() {
        let mesh = box_mesh(&Vector3::new(1.0, 2.0, 3.0));
        for tri in mesh.indices.chunks_exact(3) {
            let p = |i: u16| {
                let v = mesh.positions[usize::from(i)];
                Vector3::new(v[0], v[1], v[2])
            };
            let face_normal = (p(tri[1]) - p(tri[0])).cross(&(p(tri[2]) - p(tri[0])));
            let n = mesh.normals[usize::from(tri[0])];
            let stored = Vector3::new(n[0], n[1], n[2]);
            assert!(face_normal.dot(&stored) > 0.0);
        }
    }

    #[test]
    fn solid_names() {
        let floor = Solid {
            room_id: "kitchen".to_string(),
            kind: SolidKind::Floor,
            extents: Vector3::new(2.0, 0.2, 3.0),
            translation: Vector3::zeros(),
            color: [0, 0, 0, 255],
        };
        assert_eq!(floor.name(), "kitchen_floor");
        assert_relative_eq!(floor.volume(), 1.2, epsilon = 1e-12);

        let wall = Solid {
            kind: SolidKind::Wall(WallSide::East),
            ..floor
        };
        assert_eq!(wall.name(), "kitchen_wall_e");
    }
}
