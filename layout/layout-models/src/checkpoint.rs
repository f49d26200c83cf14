//! Checkpoint persistence for model weights.

use std::path::{Path, PathBuf};

use burn::module::Module;
use burn::prelude::Backend;
use burn::record::{BinFileRecorder, FullPrecisionSettings, PrettyJsonFileRecorder, Recorder};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Supported checkpoint file formats.
///
/// # Example
///
/// ```
/// use layout_models::CheckpointFormat;
///
/// let format = CheckpointFormat::from_extension("bin");
/// assert_eq!(format, Some(CheckpointFormat::Binary));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CheckpointFormat {
    /// Binary format.
    ///
    /// Uses Burn's `BinFileRecorder` with full precision.
    #[default]
    Binary,

    /// JSON format.
    ///
    /// Uses Burn's `PrettyJsonFileRecorder`, readable but larger.
    Json,
}

impl CheckpointFormat {
    /// Determines format from file extension.
    ///
    /// - `.bin` -> Binary
    /// - `.json` -> Json
    /// - Other -> None
    ///
    /// Only the extensions Burn's recorders write are accepted, so a saved
    /// checkpoint always lands at the path it was saved under.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "bin" => Some(Self::Binary),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Determines format from file path.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Returns the default file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Binary => "bin",
            Self::Json => "json",
        }
    }

    /// Returns the format name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Json => "json",
        }
    }
}

impl std::fmt::Display for CheckpointFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Saves model weights to `path`, choosing the format from its extension.
///
/// Used by tooling and tests; inference never writes checkpoints.
///
/// # Errors
///
/// Returns `ModelError::UnsupportedFormat` if the extension is not a
/// checkpoint format, `ModelError::SaveCheckpoint` if writing fails.
pub fn save_checkpoint<B, M>(model: &M, path: &Path) -> Result<PathBuf>
where
    B: Backend,
    M: Module<B>,
{
    let display = path.display().to_string();
    let format =
        CheckpointFormat::from_path(path).ok_or_else(|| ModelError::unsupported_format(&display))?;
    let record = model.clone().into_record();

    match format {
        CheckpointFormat::Binary => {
            let recorder = BinFileRecorder::<FullPrecisionSettings>::new();
            recorder
                .record(record, path.to_path_buf())
                .map_err(|e| ModelError::save_checkpoint(&display, e.to_string()))?;
        }
        CheckpointFormat::Json => {
            let recorder = PrettyJsonFileRecorder::<FullPrecisionSettings>::new();
            recorder
                .record(record, path.to_path_buf())
                .map_err(|e| ModelError::save_checkpoint(&display, e.to_string()))?;
        }
    }

    Ok(path.with_extension(format.extension()))
}

/// Loads model weights from `path` into `model`.
///
/// The loaded record replaces every parameter. Callers compare the result
/// against their configuration afterwards (see the models'
/// `verify_shapes`).
///
/// # Errors
///
/// Returns `ModelError::CheckpointNotFound` if the file doesn't exist,
/// `ModelError::UnsupportedFormat` if the format can't be determined and
/// `ModelError::LoadCheckpoint` if decoding fails.
pub fn load_checkpoint<B, M>(model: M, path: &Path, device: &B::Device) -> Result<M>
where
    B: Backend,
    M: Module<B>,
{
    let display = path.display().to_string();

    if !path.exists() {
        return Err(ModelError::checkpoint_not_found(display));
    }

    let format =
        CheckpointFormat::from_path(path).ok_or_else(|| ModelError::unsupported_format(&display))?;

    let loaded = match format {
        CheckpointFormat::Binary => {
            let recorder = BinFileRecorder::<FullPrecisionSettings>::new();
            model
                .load_file(path, &recorder, device)
                .map_err(|e| ModelError::load_checkpoint(&display, e.to_string()))?
        }
        CheckpointFormat::Json => {
            let recorder = PrettyJsonFileRecorder::<FullPrecisionSettings>::new();
            model
                .load_file(path, &recorder, device)
                .map_err(|e| ModelError::load_checkpoint(&display, e.to_string()))?
        }
    };

    Ok(loaded)
}
