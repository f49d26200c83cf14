//! Room-type color lookup.

/// RGBA color, 8 bits per channel.
pub type Rgba = [u8; 4];

/// Color of every wall.
pub const WALL_COLOR: Rgba = [200, 200, 200, 255];

/// Floor color for room types without an entry.
pub const DEFAULT_FLOOR_COLOR: Rgba = [200, 200, 200, 255];

const FLOOR_PALETTE: [(&str, Rgba); 10] = [
    ("living_room", [255, 204, 128, 255]),
    ("kitchen", [239, 154, 154, 255]),
    ("bedroom", [144, 202, 249, 255]),
    ("bathroom", [129, 199, 132, 255]),
    ("balcony", [176, 190, 197, 255]),
    ("entrance", [255, 245, 157, 255]),
    ("corridor", [224, 224, 224, 255]),
    ("dining_room", [255, 171, 145, 255]),
    ("study", [188, 170, 164, 255]),
    ("other", [206, 147, 216, 255]),
];

/// Floor slab color for a room type label.
///
/// # Example
///
/// ```
/// use layout_scene::{floor_color, DEFAULT_FLOOR_COLOR};
///
/// assert_eq!(floor_color("kitchen"), [239, 154, 154, 255]);
/// assert_eq!(floor_color("garage"), DEFAULT_FLOOR_COLOR);
/// ```
#[must_use]
pub fn floor_color(room_type: &str) -> Rgba {
    FLOOR_PALETTE
        .iter()
        .find(|(name, _)| *name == room_type)
        .map_or(DEFAULT_FLOOR_COLOR, |(_, color)| *color)
}

/// Converts to the `[0, 1]` factors glTF materials use.
#[must_use]
pub fn color_factor(color: Rgba) -> [f32; 4] {
    color.map(|channel| f32::from(channel) / 255.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn palette_entries() {
        assert_eq!(floor_color("living_room"), [255, 204, 128, 255]);
        assert_eq!(floor_color("other"), [206, 147, 216, 255]);
        assert_eq!(floor_color("corridor"), [224, 224, 224, 255]);
    }

    #[test]
    fn unknown_types_are_gray() {
        assert_eq!(floor_color("storage"), DEFAULT_FLOOR_COLOR);
        assert_eq!(floor_color(""), DEFAULT_FLOOR_COLOR);
    }

    #[test]
    fn factors_are_normalized() {
        let factor = color_factor([255, 0, 51, 255]);
        assert_relative_eq!(factor[0], 1.0);
        assert_relative_eq!(factor[1], 0.0);
        assert_relative_eq!(factor[2], 0.2);
        assert_relative_eq!(factor[3], 1.0);
    }
}
