//! The geometry extruder with its failure policy.

use layout_types::RoomGeometry;
use tracing::{debug, warn};

use crate::backend::BackendStatus;
use crate::error::SceneResult;
use crate::glb::GlbAsset;
use crate::scene::{ExtrusionConfig, Scene3D};

/// Turns decoded rooms into a GLB asset.
///
/// Export never fails outright: a disabled backend yields `None`, and a
/// scene that cannot be built yields the placeholder asset.
///
/// # Example
///
/// ```
/// use layout_scene::{Extruder, ExtrusionConfig};
/// use layout_types::RoomGeometry;
///
/// let extruder = Extruder::new(ExtrusionConfig::default());
/// let rooms = vec![RoomGeometry::from_center("k", "Kitchen", "kitchen", 400.0, 300.0, 100.0, 50.0)];
/// if let Some(asset) = extruder.extrude(&rooms) {
///     assert!(!asset.is_placeholder());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Extruder {
    config: ExtrusionConfig,
    status: BackendStatus,
}

impl Extruder {
    /// Creates an extruder using the process-wide backend status.
    #[must_use]
    pub fn new(config: ExtrusionConfig) -> Self {
        Self::with_status(config, BackendStatus::get().clone())
    }

    /// Creates an extruder with an explicit backend status.
    #[must_use]
    pub const fn with_status(config: ExtrusionConfig, status: BackendStatus) -> Self {
        Self { config, status }
    }

    /// Extrusion parameters.
    #[must_use]
    pub const fn config(&self) -> &ExtrusionConfig {
        &self.config
    }

    /// Backend status this extruder was built with.
    #[must_use]
    pub const fn status(&self) -> &BackendStatus {
        &self.status
    }

    /// Returns `true` if 3D export is available.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.status.is_ready()
    }

    /// Builds and encodes the scene, propagating any failure.
    ///
    /// # Errors
    ///
    /// Returns the scene construction or encoding error.
    pub fn try_extrude(&self, rooms: &[RoomGeometry]) -> SceneResult<GlbAsset> {
        let scene = Scene3D::from_rooms(rooms, &self.config)?;
        GlbAsset::from_scene(&scene)
    }

    /// Builds and encodes the scene.
    ///
    /// Returns `None` when 3D export is disabled, and the placeholder asset
    /// when this particular input cannot be extruded.
    #[must_use]
    pub fn extrude(&self, rooms: &[RoomGeometry]) -> Option<GlbAsset> {
        if let BackendStatus::Disabled { reason } = &self.status {
            debug!(%reason, "3D export skipped");
            return None;
        }

        match self.try_extrude(rooms) {
            Ok(asset) => {
                debug!(rooms = rooms.len(), bytes = asset.len(), "scene exported");
                Some(asset)
            }
            Err(e) => {
                warn!(error = %e, rooms = rooms.len(), "scene export failed, returning placeholder");
                Some(GlbAsset::placeholder())
            }
        }
    }
}
