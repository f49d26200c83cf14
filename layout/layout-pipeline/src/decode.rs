//! Layout vector to room geometry.

use layout_types::{ConstraintGraph, LayoutVector, RoomGeometry, ValidationError};
use serde::{Deserialize, Serialize};

/// Latent-to-pixel mapping constants.
///
/// # Example
///
/// ```
/// use layout_pipeline::DecoderConfig;
///
/// let config = DecoderConfig::default();
/// assert_eq!(config.scale, 5.0);
/// assert_eq!(config.min_extent, 20.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Multiplier from latent units to pixel-like units.
    pub scale: f64,
    /// Horizontal canvas offset of the latent origin.
    pub offset_x: f64,
    /// Vertical canvas offset of the latent origin.
    pub offset_y: f64,
    /// Added to every decoded extent.
    pub min_extent: f64,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            scale: 5.0,
            offset_x: 400.0,
            offset_y: 300.0,
            min_extent: 20.0,
        }
    }
}

impl DecoderConfig {
    /// Sets the latent scale.
    #[must_use]
    pub const fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the canvas offsets.
    #[must_use]
    pub const fn with_offset(mut self, offset_x: f64, offset_y: f64) -> Self {
        self.offset_x = offset_x;
        self.offset_y = offset_y;
        self
    }

    /// Returns `true` if every value is finite and the extent floor positive.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        [self.scale, self.offset_x, self.offset_y, self.min_extent]
            .iter()
            .all(|v| v.is_finite())
            && self.min_extent > 0.0
    }
}

/// Reads room boxes out of a layout vector.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutDecoder {
    config: DecoderConfig,
}

impl LayoutDecoder {
    /// Creates a decoder.
    #[must_use]
    pub const fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// Decoder constants.
    #[must_use]
    pub const fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decodes the first `min(N, capacity)` rooms.
    ///
    /// Slot `i` reads `(x, y, w, h)` at offset `4i`. Extents are
    /// `|raw| * scale + min_extent`, so every room keeps a minimum
    /// footprint. Rooms take id, label and type from node `i` of `graph`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::OrderMismatch`] if the layout was not
    /// produced from this graph's node order.
    ///
    /// # Example
    ///
    /// ```
    /// use layout_pipeline::LayoutDecoder;
    /// use layout_types::{ConstraintGraph, LayoutVector};
    ///
    /// let graph = ConstraintGraph::from_json(
    ///     r#"{"nodes": [{"id": "k", "label": "Kitchen", "type": "kitchen"}], "links": []}"#,
    /// ).unwrap();
    /// let layout = LayoutVector::new(graph.node_order(), 1, vec![0.0, 0.0, 2.0, -4.0]).unwrap();
    ///
    /// let rooms = LayoutDecoder::default().decode(&layout, &graph).unwrap();
    /// assert_eq!(rooms[0].center_x, 400.0);
    /// assert_eq!(rooms[0].width, 30.0);
    /// assert_eq!(rooms[0].height, 40.0);
    /// ```
    pub fn decode(
        &self,
        layout: &LayoutVector,
        graph: &ConstraintGraph,
    ) -> Result<Vec<RoomGeometry>, ValidationError> {
        layout.order().verify(graph)?;

        let c = &self.config;
        let rooms = graph
            .nodes()
            .iter()
            .enumerate()
            .take(layout.room_count())
            .filter_map(|(slot, node)| {
                let [x_raw, y_raw, w_raw, h_raw] = layout.room(slot)?.map(f64::from);
                Some(RoomGeometry::from_center(
                    node.id.clone(),
                    node.label.clone(),
                    node.room_type.clone(),
                    x_raw * c.scale + c.offset_x,
                    y_raw * c.scale + c.offset_y,
                    w_raw.abs() * c.scale + c.min_extent,
                    h_raw.abs() * c.scale + c.min_extent,
                ))
            })
            .collect();
        Ok(rooms)
    }
}
