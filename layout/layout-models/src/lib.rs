//! Burn models for floor-plan layout generation.
//!
//! This crate provides the learned stages of the layout pipeline, built with
//! the Burn framework, along with checkpoint save/load functionality.
//!
//! # Model Architectures
//!
//! - [`GraphEncoder`] - Graph attention network pooling a constraint graph
//!   into a fixed-width embedding
//! - [`LayoutDiffusion`] - Conditional noise predictor over layout vectors
//!
//! # Diffusion Process
//!
//! - [`NoiseSchedule`] - Linear beta schedule with precomputed terms
//! - [`DiffusionSampler`] - Closed-form forward process, reverse steps and
//!   ancestral sampling driven by an explicit random source
//!
//! # Checkpoint Persistence
//!
//! Weights are stored with Burn's recorders, format chosen by extension:
//! - Binary (`.bin`)
//! - JSON (`.json`)
//!
//! Every model exposes `verify_shapes` so a loaded checkpoint can be checked
//! against the configured sizing.
//!
//! # Backend Support
//!
//! Models are generic over Burn backends:
//! - `burn-ndarray` - CPU inference (always built)
//! - `wgpu` - GPU inference (optional feature)
//!
//! # Example
//!
//! ```
//! use burn_ndarray::NdArray;
//! use layout_models::prelude::*;
//! use layout_types::{ConstraintGraph, FeatureTensor};
//! use rand::SeedableRng;
//!
//! type B = NdArray<f32>;
//! let device = Default::default();
//!
//! let graph = ConstraintGraph::from_json(
//!     r#"{"nodes": [{"id": "living", "type": "living_room"}, {"id": "kitchen", "type": "kitchen"}],
//!         "links": [{"source": "living", "target": "kitchen", "type": "direct"}]}"#,
//! ).unwrap();
//!
//! let encoder = GraphEncoder::<B>::new(GraphEncoderConfig::default(), &device);
//! let embedding = encoder.encode(&FeatureTensor::from_graph(&graph), &device).unwrap();
//!
//! let model = LayoutDiffusion::<B>::new(LayoutDiffusionConfig::default(), &device);
//! let sampler = DiffusionSampler::new(model, NoiseSchedule::new(&ScheduleConfig::new(10)), device);
//!
//! let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(3);
//! let layout = sampler.sample_layout(&embedding, &mut rng).unwrap();
//! assert_eq!(layout.room_count(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod backend;
mod checkpoint;
mod diffusion;
mod encoder;
mod error;
mod gat;
mod sampler;
mod schedule;

// Re-export model types
pub use diffusion::{LayoutDiffusion, LayoutDiffusionConfig, sinusoidal_embedding};
pub use encoder::{GraphEncoder, GraphEncoderConfig};
pub use gat::{GatLayer, HeadMerge};

// Re-export diffusion process
pub use sampler::{DiffusionSampler, gaussian};
pub use schedule::{NoiseSchedule, ScheduleConfig};

// Re-export checkpoint utilities
pub use checkpoint::{CheckpointFormat, load_checkpoint, save_checkpoint};

// Re-export backend utilities
#[cfg(feature = "wgpu")]
pub use backend::GpuBackend;
pub use backend::{BackendType, CpuBackend};

// Re-export error types
pub use error::{ModelError, Result};

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{
        BackendType, CheckpointFormat, CpuBackend, DiffusionSampler, GraphEncoder,
        GraphEncoderConfig, LayoutDiffusion, LayoutDiffusionConfig, ModelError, NoiseSchedule,
        ScheduleConfig, load_checkpoint, save_checkpoint,
    };
}
