//! Layout results and the ways they can be degraded.

use std::fmt;

use layout_scene::GlbAsset;
use layout_types::RoomGeometry;
use serde::{Deserialize, Serialize};

/// A reason a result is valid but of reduced quality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Degradation {
    /// A model had no checkpoint and runs with random weights.
    UntrainedWeights {
        /// Which model.
        model: String,
    },
    /// Rooms beyond the model capacity received no geometry.
    Truncated {
        /// Rooms in the graph.
        rooms: usize,
        /// Rooms placed.
        placed: usize,
    },
    /// The scene could not be built; the asset is the placeholder.
    PlaceholderScene,
    /// 3D export is disabled for this process.
    SceneUnavailable {
        /// Why it is disabled.
        reason: String,
    },
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UntrainedWeights { model } => {
                write!(f, "{model} has no checkpoint, output comes from untrained weights")
            }
            Self::Truncated { rooms, placed } => {
                write!(f, "only {placed} of {rooms} rooms were placed")
            }
            Self::PlaceholderScene => write!(f, "3D scene failed to build, placeholder returned"),
            Self::SceneUnavailable { reason } => write!(f, "3D export unavailable: {reason}"),
        }
    }
}

/// Result of one layout request.
///
/// # Example
///
/// ```
/// use layout_pipeline::{Degradation, LayoutOutcome};
///
/// let outcome = LayoutOutcome::new("<svg></svg>".to_string(), Vec::new())
///     .with_degradation(Degradation::PlaceholderScene);
/// assert!(outcome.is_degraded());
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct LayoutOutcome {
    /// 2D SVG render of `rooms`.
    pub svg: String,
    /// Decoded rooms in graph node order.
    pub rooms: Vec<RoomGeometry>,
    /// Quality problems, empty for a clean result.
    pub degradations: Vec<Degradation>,
    /// Extruded scene, when requested and available.
    #[serde(skip)]
    pub scene: Option<GlbAsset>,
}

impl LayoutOutcome {
    /// Creates a clean outcome without a scene.
    #[must_use]
    pub const fn new(svg: String, rooms: Vec<RoomGeometry>) -> Self {
        Self {
            svg,
            rooms,
            degradations: Vec::new(),
            scene: None,
        }
    }

    /// Adds a degradation.
    #[must_use]
    pub fn with_degradation(mut self, degradation: Degradation) -> Self {
        self.degradations.push(degradation);
        self
    }

    /// Returns `true` if anything reduced the quality of this result.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        !self.degradations.is_empty()
    }

    /// Returns `true` if any checkpoint was missing.
    #[must_use]
    pub fn is_untrained(&self) -> bool {
        self.degradations
            .iter()
            .any(|d| matches!(d, Degradation::UntrainedWeights { .. }))
    }

    /// Returns `true` if rooms were dropped.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.degradations
            .iter()
            .any(|d| matches!(d, Degradation::Truncated { .. }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn clean_outcome() {
        let outcome = LayoutOutcome::new(String::new(), Vec::new());
        assert!(!outcome.is_degraded());
        assert!(!outcome.is_untrained());
        assert!(outcome.scene.is_none());
    }

    #[test]
    fn flags() {
        let outcome = LayoutOutcome::new(String::new(), Vec::new())
            .with_degradation(Degradation::Truncated {
                rooms: 12,
                placed: 8,
            })
            .with_degradation(Degradation::UntrainedWeights {
                model: "encoder".into(),
            });
        assert!(outcome.is_truncated());
        assert!(outcome.is_untrained());
    }

    #[test]
    fn serializes_tagged() {
        let outcome = LayoutOutcome::new("<svg/>".into(), Vec::new())
            .with_degradation(Degradation::Truncated {
                rooms: 10,
                placed: 8,
            });
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["degradations"][0]["kind"], "truncated");
        assert_eq!(json["degradations"][0]["placed"], 8);
        assert!(json.get("scene").is_none());
    }

    #[test]
    fn display() {
        let text = Degradation::Truncated {
            rooms: 12,
            placed: 8,
        }
        .to_string();
        assert_eq!(text, "only 8 of 12 rooms were placed");
    }
}
