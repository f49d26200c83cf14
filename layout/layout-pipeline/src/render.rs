//! Flat SVG rendering of decoded rooms.

use layout_types::RoomGeometry;
use serde::{Deserialize, Serialize};

/// Fill for room types without a palette entry.
pub const DEFAULT_FILL: &str = "#FFFFFF";

const FILL_PALETTE: [(&str, &str); 8] = [
    ("living_room", "#FFCC80"),
    ("kitchen", "#EF9A9A"),
    ("bedroom", "#90CAF9"),
    ("bathroom", "#81C784"),
    ("balcony", "#B0BEC5"),
    ("entrance", "#FFF59D"),
    ("corridor", "#E0E0E0"),
    ("other", "#CE93D8"),
];

/// Canvas and styling for the 2D render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Canvas background color.
    pub background: String,
    /// Room outline width.
    pub stroke_width: f64,
    /// Room fill opacity.
    pub fill_opacity: f64,
    /// Label font family.
    pub font_family: String,
    /// Label font size.
    pub font_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background: "#f0f0f0".to_string(),
            stroke_width: 2.0,
            fill_opacity: 0.7,
            font_family: "Arial".to_string(),
            font_size: 12,
        }
    }
}

impl RenderConfig {
    /// Sets the canvas size.
    #[must_use]
    pub const fn with_canvas(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Returns `true` if the canvas is non-empty and the opacity in `[0, 1]`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && (0.0..=1.0).contains(&self.fill_opacity)
            && self.stroke_width >= 0.0
    }
}

/// SVG fill color for a room type label.
///
/// # Example
///
/// ```
/// use layout_pipeline::{room_fill, DEFAULT_FILL};
///
/// assert_eq!(room_fill("kitchen"), "#EF9A9A");
/// assert_eq!(room_fill("storage"), DEFAULT_FILL);
/// ```
#[must_use]
pub fn room_fill(room_type: &str) -> &'static str {
    FILL_PALETTE
        .iter()
        .find(|(name, _)| *name == room_type)
        .map_or(DEFAULT_FILL, |(_, fill)| *fill)
}

/// Renders rooms as one rectangle and one centered label each.
///
/// # Example
///
/// ```
/// use layout_pipeline::{render_svg, RenderConfig};
/// use layout_types::RoomGeometry;
///
/// let rooms = vec![RoomGeometry::from_center("k", "Kitchen", "kitchen", 400.0, 300.0, 100.0, 50.0)];
/// let svg = render_svg(&rooms, &RenderConfig::default());
/// assert!(svg.starts_with("<svg width=\"800\" height=\"600\""));
/// assert_eq!(svg.matches("<rect").count(), 1);
/// assert!(svg.contains(">Kitchen</text>"));
/// ```
#[must_use]
pub fn render_svg(rooms: &[RoomGeometry], config: &RenderConfig) -> String {
    let mut svg = format!(
        r#"<svg width="{}" height="{}" xmlns="http://www.w3.org/2000/svg" style="background-color: {};">"#,
        config.width,
        config.height,
        escape_xml(&config.background),
    );

    for room in rooms {
        svg.push_str(&format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" stroke="black" stroke-width="{}" fill-opacity="{}" />"#,
            room.x,
            room.y,
            room.width,
            room.height,
            room_fill(&room.room_type),
            config.stroke_width,
            config.fill_opacity,
        ));
        svg.push_str(&format!(
            r#"<text x="{}" y="{}" font-family="{}" font-size="{}" text-anchor="middle" fill="black">{}</text>"#,
            room.x + room.width / 2.0,
            room.y + room.height / 2.0,
            escape_xml(&config.font_family),
            config.font_size,
            escape_xml(&room.name),
        ));
    }

    svg.push_str("</svg>");
    svg
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rooms() -> Vec<RoomGeometry> {
        vec![
            RoomGeometry::from_center("l", "Living Room", "living_room", 300.0, 300.0, 100.0, 80.0),
            RoomGeometry::from_center("k", "Kitchen", "kitchen", 420.0, 300.0, 60.0, 60.0),
            RoomGeometry::from_center("s", "Store", "storage", 500.0, 300.0, 40.0, 40.0),
        ]
    }

    #[test]
    fn one_rect_and_label_per_room() {
        let svg = render_svg(&rooms(), &RenderConfig::default());
        assert_eq!(svg.matches("<rect").count(), 3);
        assert_eq!(svg.matches("<text").count(), 3);
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("background-color: #f0f0f0;"));
    }

    #[test]
    fn rect_attributes() {
        let svg = render_svg(&rooms()[1..2], &RenderConfig::default());
        assert!(svg.contains(
            r##"<rect x="390" y="270" width="60" height="60" fill="#EF9A9A" stroke="black" stroke-width="2" fill-opacity="0.7" />"##
        ));
        assert!(svg.contains(r#"<text x="420" y="300" font-family="Arial" font-size="12""#));
    }

    #[test]
    fn unknown_type_is_white() {
        let svg = render_svg(&rooms()[2..], &RenderConfig::default());
        assert!(svg.contains(r##"fill="#FFFFFF""##));
    }

    #[test]
    fn labels_are_escaped() {
        let room = RoomGeometry::from_center("x", "Bed & <Bath>", "bathroom", 100.0, 100.0, 50.0, 50.0);
        let svg = render_svg(&[room], &RenderConfig::default());
        assert!(svg.contains(">Bed &amp; &lt;Bath&gt;</text>"));
    }

    #[test]
    fn empty_render_is_bare_canvas() {
        let svg = render_svg(&[], &RenderConfig::default().with_canvas(400, 300));
        assert!(svg.starts_with(r#"<svg width="400" height="300""#));
        assert!(!svg.contains("<rect"));
    }

    #[test]
    fn config_validity() {
        assert!(RenderConfig::default().is_valid());
        assert!(!RenderConfig::default().with_canvas(0, 600).is_valid());
    }
}
