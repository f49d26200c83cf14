//! Process-wide availability of 3D export.
//!
//! The probe runs once per process. When it fails, 3D export stays
//! disabled for the process lifetime and every extrusion returns no asset.

use std::sync::OnceLock;

use tracing::{info, warn};

static SCENE_BACKEND: OnceLock<BackendStatus> = OnceLock::new();

/// Whether the 3D export path can be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendStatus {
    /// Scenes can be built and encoded.
    Ready,
    /// 3D export is off for this process.
    Disabled {
        /// Why the probe failed.
        reason: String,
    },
}

impl BackendStatus {
    /// Creates a disabled status.
    #[must_use]
    pub fn disabled(reason: impl Into<String>) -> Self {
        Self::Disabled {
            reason: reason.into(),
        }
    }

    /// The process-wide status, probed on first call.
    ///
    /// # Example
    ///
    /// ```
    /// use layout_scene::BackendStatus;
    ///
    /// if BackendStatus::get().is_ready() {
    ///     println!("3D export available");
    /// }
    /// ```
    #[must_use]
    pub fn get() -> &'static Self {
        SCENE_BACKEND.get_or_init(|| {
            let status = Self::probe();
            match &status {
                Self::Ready => info!("3D scene export initialized"),
                Self::Disabled { reason } => {
                    warn!(%reason, "3D scene export disabled for this process");
                }
            }
            status
        })
    }

    /// Returns `true` if scenes can be exported.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Failure reason, if disabled.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Ready => None,
            Self::Disabled { reason } => Some(reason),
        }
    }

    #[cfg(feature = "glb")]
    fn probe() -> Self {
        match self_test() {
            Ok(()) => Self::Ready,
            Err(e) => Self::disabled(format!("self-test failed: {e}")),
        }
    }

    #[cfg(not(feature = "glb"))]
    fn probe() -> Self {
        Self::disabled("built without the `glb` feature")
    }
}

/// Encodes and decodes a one-room scene.
#[cfg(feature = "glb")]
fn self_test() -> crate::error::SceneResult<()> {
    use crate::error::SceneError;
    use crate::glb::{parse_glb, write_glb};
    use crate::scene::{ExtrusionConfig, SOLIDS_PER_ROOM, Scene3D};
    use layout_types::RoomGeometry;

    let room = RoomGeometry::from_center("probe", "Probe", "other", 50.0, 50.0, 50.0, 50.0);
    let scene = Scene3D::from_rooms(&[room], &ExtrusionConfig::default())?;
    let doc = parse_glb(&write_glb(&scene)?)?;
    if doc.mesh_count() == SOLIDS_PER_ROOM {
        Ok(())
    } else {
        Err(SceneError::invalid_glb(format!(
            "expected {SOLIDS_PER_ROOM} meshes, decoded {}",
            doc.mesh_count()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_is_stable() {
        let first = BackendStatus::get();
        let second = BackendStatus::get();
        assert!(std::ptr::eq(first, second));
    }

    #[cfg(feature = "glb")]
    #[test]
    fn default_build_is_ready() {
        assert!(BackendStatus::get().is_ready());
        assert!(BackendStatus::get().reason().is_none());
    }

    #[test]
    fn disabled_reason() {
        let status = BackendStatus::disabled("no writer");
        assert!(!status.is_ready());
        assert_eq!(status.reason(), Some("no writer"));
    }
}
