//! Backend type definitions.

use serde::{Deserialize, Serialize};

/// CPU backend every build carries.
pub type CpuBackend = burn_ndarray::NdArray<f32>;

/// GPU backend, present with the `wgpu` feature.
#[cfg(feature = "wgpu")]
pub type GpuBackend = burn::backend::Wgpu;

/// Supported numeric backends.
///
/// # Example
///
/// ```
/// use layout_models::BackendType;
///
/// let backend = BackendType::NdArray;
/// assert!(backend.is_cpu());
/// assert!(backend.is_compiled());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendType {
    /// CPU backend using ndarray.
    ///
    /// Always available.
    #[default]
    NdArray,

    /// GPU backend using WGPU.
    ///
    /// Requires the `wgpu` feature and compatible GPU hardware.
    Wgpu,
}

impl BackendType {
    /// Returns `true` if this is a CPU backend.
    #[must_use]
    pub const fn is_cpu(&self) -> bool {
        matches!(self, Self::NdArray)
    }

    /// Returns `true` if this is a GPU backend.
    #[must_use]
    pub const fn is_gpu(&self) -> bool {
        matches!(self, Self::Wgpu)
    }

    /// Returns `true` if support for this backend was built into the binary.
    #[must_use]
    pub const fn is_compiled(&self) -> bool {
        match self {
            Self::NdArray => true,
            Self::Wgpu => cfg!(feature = "wgpu"),
        }
    }

    /// Returns the backend name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::NdArray => "ndarray",
            Self::Wgpu => "wgpu",
        }
    }
}

impl std::fmt::Display for BackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_type_default() {
        assert_eq!(BackendType::default(), BackendType::NdArray);
    }

    #[test]
    fn backend_type_kinds() {
        assert!(BackendType::NdArray.is_cpu());
        assert!(!BackendType::NdArray.is_gpu());
        assert!(BackendType::Wgpu.is_gpu());
    }

    #[test]
    fn cpu_is_always_compiled() {
        assert!(BackendType::NdArray.is_compiled());
        assert_eq!(BackendType::Wgpu.is_compiled(), cfg!(feature = "wgpu"));
    }

    #[test]
    fn backend_type_display() {
        assert_eq!(format!("{}", BackendType::NdArray), "ndarray");
        assert_eq!(format!("{}", BackendType::Wgpu), "wgpu");
    }

    #[test]
    fn backend_type_serialization() {
        let json = serde_json::to_string(&BackendType::Wgpu).unwrap_or_default();
        assert_eq!(json, "\"wgpu\"");

        let parsed: Result<BackendType, _> = serde_json::from_str(&json);
        assert_eq!(parsed.unwrap_or_default(), BackendType::Wgpu);
    }
}
