//! The inference orchestrator.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use burn::module::Module;
use burn::prelude::Backend;
use layout_models::{
    CpuBackend, DiffusionSampler, GraphEncoder, LayoutDiffusion, NoiseSchedule, load_checkpoint,
};
use layout_scene::{Extruder, GlbAsset};
use layout_types::{ConstraintGraph, FeatureTensor, RoomGeometry};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::config::{CapacityPolicy, PipelineConfig};
use crate::decode::LayoutDecoder;
use crate::error::{LayoutError, Result};
use crate::outcome::{Degradation, LayoutOutcome};
use crate::render::render_svg;

/// Weights shared by every request once loaded.
#[derive(Debug, Clone)]
struct LoadedModels<B: Backend> {
    encoder: GraphEncoder<B>,
    sampler: DiffusionSampler<B>,
    untrained: Vec<Degradation>,
}

/// Sequences encoder, sampler, decoder, renderer and extruder.
///
/// Weights load lazily on the first request, at most once per service even
/// under concurrent first use. A missing checkpoint is not an error: the
/// model keeps its random initialization and every outcome carries an
/// [`Degradation::UntrainedWeights`] entry.
///
/// Missing checkpoints are logged with a single `warn!` when the load
/// happens, so once per service. A host that shares one service across
/// its workers logs it once per process.
///
/// # Example
///
/// ```
/// use layout_pipeline::{LayoutService, PipelineConfig};
/// use layout_types::ConstraintGraph;
///
/// let config = PipelineConfig::default().with_checkpoint_dir("no/such/dir");
/// let service = LayoutService::cpu(config).unwrap();
///
/// let graph = ConstraintGraph::from_json(
///     r#"{"nodes": [{"id": "k", "label": "Kitchen", "type": "kitchen"}], "links": []}"#,
/// ).unwrap();
///
/// let outcome = service.generate_seeded(&graph, 42).unwrap();
/// assert_eq!(outcome.rooms.len(), 1);
/// assert!(outcome.is_untrained());
/// ```
#[derive(Debug)]
pub struct LayoutService<B: Backend = CpuBackend> {
    config: PipelineConfig,
    device: B::Device,
    decoder: LayoutDecoder,
    extruder: Extruder,
    unavailable: Option<String>,
    models: Mutex<Option<LoadedModels<B>>>,
    loads: AtomicUsize,
}

impl LayoutService<CpuBackend> {
    /// Creates a service on the CPU backend.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidConfig`] if the configuration does not
    /// validate.
    pub fn cpu(config: PipelineConfig) -> Result<Self> {
        Self::new(config, Default::default())
    }
}

impl<B: Backend> LayoutService<B> {
    /// Creates a service. No weights are loaded yet.
    ///
    /// The configured backend is checked here, once; if it was not built
    /// in, [`is_available`](Self::is_available) reports `false` and every
    /// request fails with [`LayoutError::BackendUnavailable`].
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidConfig`] if the configuration does not
    /// validate.
    pub fn new(config: PipelineConfig, device: B::Device) -> Result<Self> {
        config.validate()?;

        let unavailable = if config.backend.is_compiled() {
            None
        } else {
            let reason = format!("built without the `{}` feature", config.backend.name());
            warn!(backend = %config.backend, %reason, "layout inference disabled");
            Some(reason)
        };

        Ok(Self {
            decoder: LayoutDecoder::new(config.decoder),
            extruder: Extruder::new(config.extrusion),
            config,
            device,
            unavailable,
            models: Mutex::new(None),
            loads: AtomicUsize::new(0),
        })
    }

    /// Replaces the extruder.
    #[must_use]
    pub fn with_extruder(mut self, extruder: Extruder) -> Self {
        self.extruder = extruder;
        self
    }

    /// Pipeline configuration.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Returns `true` if requests can run at all.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.unavailable.is_none()
    }

    /// Returns `true` if 3D export is available.
    #[must_use]
    pub const fn is_scene_available(&self) -> bool {
        self.extruder.is_enabled()
    }

    /// Returns `true` once weights are loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.lock_models().is_some()
    }

    /// How many times weights have been loaded; at most one.
    #[must_use]
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Loads weights now instead of on the first request.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::BackendUnavailable`] or a model load error.
    pub fn load(&self) -> Result<()> {
        self.models().map(|_| ())
    }

    /// Generates a layout for `graph`.
    ///
    /// Returns one room per node up to the model capacity, in node order,
    /// with a 2D render. Randomness comes only from `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::BackendUnavailable`], a model load error, or
    /// [`LayoutError::CapacityExceeded`] under [`CapacityPolicy::Reject`].
    pub fn generate_layout<R: Rng + ?Sized>(
        &self,
        graph: &ConstraintGraph,
        rng: &mut R,
    ) -> Result<LayoutOutcome> {
        let models = self.models()?;
        let mut degradations = models.untrained.clone();

        let rooms = graph.node_count();
        let capacity = self.config.max_rooms();
        if rooms > capacity {
            match self.config.capacity {
                CapacityPolicy::Reject => {
                    return Err(LayoutError::CapacityExceeded { rooms, capacity });
                }
                CapacityPolicy::Truncate => {
                    warn!(rooms, capacity, "graph exceeds room capacity, extra rooms dropped");
                    degradations.push(Degradation::Truncated {
                        rooms,
                        placed: capacity,
                    });
                }
            }
        }

        let geometry = if graph.is_empty() {
            debug!("empty graph, nothing to place");
            Vec::new()
        } else {
            let features = FeatureTensor::from_graph(graph);
            debug!(nodes = rooms, edges = graph.edge_count(), "encoding graph");
            let embedding = models.encoder.encode(&features, &self.device)?;

            debug!(steps = models.sampler.steps(), "sampling layout");
            let layout = models.sampler.sample_layout(&embedding, rng)?;

            let geometry = self.decoder.decode(&layout, graph)?;
            debug!(rooms = geometry.len(), "decoded layout");
            geometry
        };

        let svg = render_svg(&geometry, &self.config.render);
        let mut outcome = LayoutOutcome::new(svg, geometry);
        outcome.degradations = degradations;
        Ok(outcome)
    }

    /// Generates a layout with a fresh `ChaCha8` stream seeded by `seed`.
    ///
    /// # Errors
    ///
    /// See [`generate_layout`](Self::generate_layout).
    pub fn generate_seeded(&self, graph: &ConstraintGraph, seed: u64) -> Result<LayoutOutcome> {
        self.generate_layout(graph, &mut ChaCha8Rng::seed_from_u64(seed))
    }

    /// Parses node-link JSON and generates a layout.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Graph`] for malformed input, otherwise see
    /// [`generate_layout`](Self::generate_layout).
    pub fn generate_from_json<R: Rng + ?Sized>(
        &self,
        json: &str,
        rng: &mut R,
    ) -> Result<LayoutOutcome> {
        let graph = ConstraintGraph::from_json(json)?;
        self.generate_layout(&graph, rng)
    }

    /// Generates a layout and extrudes it.
    ///
    /// A disabled 3D backend or a failed scene build only adds a
    /// degradation; the 2D result is returned regardless.
    ///
    /// # Errors
    ///
    /// See [`generate_layout`](Self::generate_layout).
    pub fn generate_with_scene<R: Rng + ?Sized>(
        &self,
        graph: &ConstraintGraph,
        rng: &mut R,
    ) -> Result<LayoutOutcome> {
        let mut outcome = self.generate_layout(graph, rng)?;

        match self.extrude(&outcome.rooms) {
            Some(asset) => {
                if asset.is_placeholder() {
                    outcome.degradations.push(Degradation::PlaceholderScene);
                }
                outcome.scene = Some(asset);
            }
            None => {
                let reason = self
                    .extruder
                    .status()
                    .reason()
                    .unwrap_or("disabled")
                    .to_string();
                outcome
                    .degradations
                    .push(Degradation::SceneUnavailable { reason });
            }
        }
        Ok(outcome)
    }

    /// Extrudes rooms into a GLB asset.
    ///
    /// Returns `None` when 3D export is disabled for the process.
    #[must_use]
    pub fn extrude(&self, rooms: &[RoomGeometry]) -> Option<GlbAsset> {
        self.extruder.extrude(rooms)
    }

    fn lock_models(&self) -> std::sync::MutexGuard<'_, Option<LoadedModels<B>>> {
        self.models.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the loaded weights, loading them on first use.
    ///
    /// The lock is held across loading so concurrent first requests wait
    /// for one load instead of racing.
    fn models(&self) -> Result<LoadedModels<B>> {
        if let Some(reason) = &self.unavailable {
            return Err(LayoutError::backend_unavailable(
                self.config.backend,
                reason.clone(),
            ));
        }

        let mut guard = self.lock_models();
        if let Some(models) = guard.as_ref() {
            return Ok(models.clone());
        }

        let models = self.load_models()?;
        self.loads.fetch_add(1, Ordering::SeqCst);
        *guard = Some(models.clone());
        Ok(models)
    }

    fn load_models(&self) -> Result<LoadedModels<B>> {
        let config = &self.config;
        let checkpoints = &config.checkpoints;
        info!(dir = %checkpoints.dir.display(), "loading layout models");

        let mut untrained = Vec::new();

        let encoder = self.restore(
            GraphEncoder::<B>::new(config.encoder, &self.device),
            &checkpoints.encoder_path(),
            "graph encoder",
            &mut untrained,
        )?;
        encoder.verify_shapes(&config.encoder)?;

        let diffusion = self.restore(
            LayoutDiffusion::<B>::new(config.diffusion, &self.device),
            &checkpoints.diffusion_path(),
            "diffusion model",
            &mut untrained,
        )?;
        diffusion.verify_shapes(&config.diffusion)?;

        if !untrained.is_empty() {
            let models = untrained
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            warn!(
                dir = %checkpoints.dir.display(),
                missing = untrained.len(),
                %models,
                "checkpoints missing, layouts come from untrained weights"
            );
        }

        let sampler = DiffusionSampler::new(
            diffusion,
            NoiseSchedule::new(&config.schedule),
            self.device.clone(),
        );

        Ok(LoadedModels {
            encoder,
            sampler,
            untrained,
        })
    }

    fn restore<M: Module<B>>(
        &self,
        model: M,
        path: &Path,
        name: &str,
        untrained: &mut Vec<Degradation>,
    ) -> Result<M> {
        match load_checkpoint::<B, M>(model.clone(), path, &self.device) {
            Ok(loaded) => {
                info!(model = name, path = %path.display(), "checkpoint loaded");
                Ok(loaded)
            }
            Err(e) if e.is_missing_checkpoint() => {
                debug!(model = name, path = %path.display(), "checkpoint not found");
                untrained.push(Degradation::UntrainedWeights {
                    model: name.to_string(),
                });
                Ok(model)
            }
            Err(e) => Err(e.into()),
        }
    }
}
