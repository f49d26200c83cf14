//! Pipeline configuration.

use std::path::{Path, PathBuf};

use layout_models::{BackendType, GraphEncoderConfig, LayoutDiffusionConfig, ScheduleConfig};
use layout_scene::ExtrusionConfig;
use layout_types::{FEATURE_DIM, VALUES_PER_ROOM};
use serde::{Deserialize, Serialize};

use crate::decode::DecoderConfig;
use crate::error::{LayoutError, Result};
use crate::render::RenderConfig;

/// What to do with graphs larger than the model's room capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityPolicy {
    /// Place the first rooms and flag the outcome as degraded.
    #[default]
    Truncate,
    /// Refuse the request with [`LayoutError::CapacityExceeded`].
    Reject,
}

/// Where trained weights live.
///
/// # Example
///
/// ```
/// use layout_pipeline::CheckpointConfig;
/// use std::path::Path;
///
/// let config = CheckpointConfig::new("weights");
/// assert_eq!(config.encoder_path(), Path::new("weights/gnn_encoder_v1.bin"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckpointConfig {
    /// Checkpoint directory.
    pub dir: PathBuf,
    /// Graph encoder file name.
    pub encoder: String,
    /// Diffusion model file name.
    pub diffusion: String,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self::new("checkpoints")
    }
}

impl CheckpointConfig {
    /// Uses the standard file names inside `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            encoder: "gnn_encoder_v1.bin".to_string(),
            diffusion: "diffusion_v1.bin".to_string(),
        }
    }

    /// Full path of the encoder checkpoint.
    #[must_use]
    pub fn encoder_path(&self) -> PathBuf {
        self.dir.join(&self.encoder)
    }

    /// Full path of the diffusion checkpoint.
    #[must_use]
    pub fn diffusion_path(&self) -> PathBuf {
        self.dir.join(&self.diffusion)
    }
}

/// Configuration of every pipeline stage.
///
/// Missing JSON fields take their defaults, which reproduce the reference
/// sizing: an 11-wide feature row, a 128-wide embedding, 8 rooms and a
/// 50-step inference schedule.
///
/// # Example
///
/// ```
/// use layout_pipeline::{CapacityPolicy, PipelineConfig};
///
/// let config = PipelineConfig::from_json(r#"{"capacity": "reject", "schedule": {"steps": 20}}"#).unwrap();
/// assert_eq!(config.capacity, CapacityPolicy::Reject);
/// assert_eq!(config.schedule.steps, 20);
/// assert_eq!(config.max_rooms(), 8);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Graph encoder sizing.
    pub encoder: GraphEncoderConfig,

    /// Diffusion model sizing.
    pub diffusion: LayoutDiffusionConfig,

    /// Sampling schedule.
    pub schedule: ScheduleConfig,

    /// Latent-to-pixel mapping.
    pub decoder: DecoderConfig,

    /// 2D render styling.
    pub render: RenderConfig,

    /// 3D extrusion parameters.
    pub extrusion: ExtrusionConfig,

    /// Checkpoint locations.
    pub checkpoints: CheckpointConfig,

    /// Numeric backend.
    pub backend: BackendType,

    /// Oversized graph handling.
    pub capacity: CapacityPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            encoder: GraphEncoderConfig::default(),
            diffusion: LayoutDiffusionConfig::default(),
            schedule: ScheduleConfig::inference(),
            decoder: DecoderConfig::default(),
            render: RenderConfig::default(),
            extrusion: ExtrusionConfig::default(),
            checkpoints: CheckpointConfig::default(),
            backend: BackendType::default(),
            capacity: CapacityPolicy::default(),
        }
    }
}

impl PipelineConfig {
    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Json`] if the text is not a valid config.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an I/O or JSON error.
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Serializes to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Json`] on serialization failure.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Sets the checkpoint directory, keeping file names.
    #[must_use]
    pub fn with_checkpoint_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.checkpoints.dir = dir.into();
        self
    }

    /// Sets the encoder sizing.
    #[must_use]
    pub const fn with_encoder(mut self, encoder: GraphEncoderConfig) -> Self {
        self.encoder = encoder;
        self
    }

    /// Sets the diffusion model sizing.
    #[must_use]
    pub const fn with_diffusion(mut self, diffusion: LayoutDiffusionConfig) -> Self {
        self.diffusion = diffusion;
        self
    }

    /// Sets the sampling schedule.
    #[must_use]
    pub const fn with_schedule(mut self, schedule: ScheduleConfig) -> Self {
        self.schedule = schedule;
        self
    }

    /// Sets the extrusion parameters.
    #[must_use]
    pub const fn with_extrusion(mut self, extrusion: ExtrusionConfig) -> Self {
        self.extrusion = extrusion;
        self
    }

    /// Sets the numeric backend.
    #[must_use]
    pub const fn with_backend(mut self, backend: BackendType) -> Self {
        self.backend = backend;
        self
    }

    /// Sets the capacity policy.
    #[must_use]
    pub const fn with_capacity(mut self, capacity: CapacityPolicy) -> Self {
        self.capacity = capacity;
        self
    }

    /// Rooms the diffusion model places per layout.
    #[must_use]
    pub const fn max_rooms(&self) -> usize {
        self.diffusion.max_rooms()
    }

    /// Checks every stage and the sizes shared between stages.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidConfig`] naming the first problem.
    pub fn validate(&self) -> Result<()> {
        let fail = |reason: String| Err(LayoutError::invalid_config(reason));

        if !self.encoder.is_valid() {
            return fail(format!("encoder {:?}", self.encoder));
        }
        if !self.diffusion.is_valid() {
            return fail(format!("diffusion {:?}", self.diffusion));
        }
        if !self.schedule.is_valid() {
            return fail(format!("schedule {:?}", self.schedule));
        }
        if !self.decoder.is_valid() {
            return fail(format!("decoder {:?}", self.decoder));
        }
        if !self.render.is_valid() {
            return fail(format!("render {:?}", self.render));
        }
        if !self.extrusion.is_valid() {
            return fail(format!("extrusion {:?}", self.extrusion));
        }
        if self.encoder.node_dim != FEATURE_DIM {
            return fail(format!(
                "encoder node_dim is {}, feature rows are {FEATURE_DIM} wide",
                self.encoder.node_dim
            ));
        }
        if self.encoder.out_dim != self.diffusion.condition_dim {
            return fail(format!(
                "encoder out_dim {} differs from diffusion condition_dim {}",
                self.encoder.out_dim, self.diffusion.condition_dim
            ));
        }
        if self.diffusion.input_dim % VALUES_PER_ROOM != 0 || self.max_rooms() == 0 {
            return fail(format!(
                "diffusion input_dim {} is not a positive multiple of {VALUES_PER_ROOM}",
                self.diffusion.input_dim
            ));
        }
        Ok(())
    }

    /// Returns `true` if [`validate`](Self::validate) passes.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_is_reference_sizing() {
        let config = PipelineConfig::default();
        assert_eq!(config.encoder.node_dim, 11);
        assert_eq!(config.encoder.out_dim, 128);
        assert_eq!(config.diffusion.input_dim, 32);
        assert_eq!(config.schedule.steps, 50);
        assert_eq!(config.max_rooms(), 8);
        assert_eq!(config.capacity, CapacityPolicy::Truncate);
        assert!(config.is_valid());
    }

    #[test]
    fn json_round_trip() {
        let config = PipelineConfig::default()
            .with_checkpoint_dir("/var/lib/floorplan")
            .with_capacity(CapacityPolicy::Reject);
        let parsed = PipelineConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn empty_json_is_default() {
        assert_eq!(PipelineConfig::from_json("{}").unwrap(), PipelineConfig::default());
    }

    #[test]
    fn from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.json");
        std::fs::write(&path, r#"{"backend": "ndarray", "extrusion": {"wall_height": 2.6}}"#)
            .unwrap();
        let config = PipelineConfig::from_file(&path).unwrap();
        assert!((config.extrusion.wall_height - 2.6).abs() < 1e-12);
        assert!(PipelineConfig::from_file(&dir.path().join("absent.json")).is_err());
    }

    #[test]
    fn condition_width_must_match() {
        let config = PipelineConfig::default().with_encoder(GraphEncoderConfig::new(64, 64));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("condition_dim"));
    }

    #[test]
    fn node_dim_must_match_features() {
        let config = PipelineConfig::default()
            .with_encoder(GraphEncoderConfig::default().with_node_dim(12));
        assert!(!config.is_valid());
    }

    #[test]
    fn input_dim_must_hold_whole_rooms() {
        let config = PipelineConfig::default().with_diffusion(LayoutDiffusionConfig::new(30, 128));
        assert!(!config.is_valid());
    }

    #[test]
    fn stage_configs_are_checked() {
        let config = PipelineConfig::default().with_schedule(ScheduleConfig::new(0));
        assert!(!config.is_valid());

        let config = PipelineConfig::default()
            .with_extrusion(ExtrusionConfig::default().with_wall_height(0.0));
        assert!(!config.is_valid());
    }

    #[test]
    fn checkpoint_paths() {
        let config = CheckpointConfig::default();
        assert_eq!(config.diffusion_path(), PathBuf::from("checkpoints/diffusion_v1.bin"));
    }
}
