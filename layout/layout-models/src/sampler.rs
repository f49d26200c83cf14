//! Forward and reverse diffusion processes.

use burn::prelude::Backend;
use burn::tensor::{Tensor, TensorData};
use layout_types::{GraphEmbedding, LayoutVector, VALUES_PER_ROOM};
use rand::Rng;
use rand_distr::StandardNormal;
use tracing::debug;

use crate::diffusion::LayoutDiffusion;
use crate::error::{ModelError, Result};
use crate::schedule::NoiseSchedule;

/// Draws a standard normal `[rows, cols]` tensor from `rng`.
pub fn gaussian<B: Backend, R: Rng + ?Sized>(
    shape: [usize; 2],
    rng: &mut R,
    device: &B::Device,
) -> Tensor<B, 2> {
    let values: Vec<f32> = (0..shape[0] * shape[1])
        .map(|_| rng.sample(StandardNormal))
        .collect();
    Tensor::from_data(TensorData::new(values, shape), device)
}

/// Denoising diffusion sampler over a [`LayoutDiffusion`] model.
///
/// Every random draw comes from the `rng` passed in, so a seeded
/// generator makes sampling reproducible.
///
/// # Example
///
/// ```
/// use burn_ndarray::NdArray;
/// use layout_models::{DiffusionSampler, LayoutDiffusion, LayoutDiffusionConfig, NoiseSchedule, ScheduleConfig};
/// use rand::SeedableRng;
///
/// type B = NdArray<f32>;
/// let device = Default::default();
/// let model = LayoutDiffusion::<B>::new(LayoutDiffusionConfig::default(), &device);
/// let sampler = DiffusionSampler::new(model, NoiseSchedule::new(&ScheduleConfig::new(5)), device);
///
/// let condition = burn::tensor::Tensor::<B, 2>::zeros([1, 128], &Default::default());
/// let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(7);
/// let layout = sampler.sample(condition, [1, 32], &mut rng).unwrap();
/// assert_eq!(layout.dims(), [1, 32]);
/// ```
#[derive(Debug, Clone)]
pub struct DiffusionSampler<B: Backend> {
    model: LayoutDiffusion<B>,
    schedule: NoiseSchedule,
    device: B::Device,
}

impl<B: Backend> DiffusionSampler<B> {
    /// Creates a sampler.
    #[must_use]
    pub fn new(model: LayoutDiffusion<B>, schedule: NoiseSchedule, device: B::Device) -> Self {
        Self {
            model,
            schedule,
            device,
        }
    }

    /// The noise predictor.
    #[must_use]
    pub const fn model(&self) -> &LayoutDiffusion<B> {
        &self.model
    }

    /// The variance schedule.
    #[must_use]
    pub const fn schedule(&self) -> &NoiseSchedule {
        &self.schedule
    }

    /// Number of steps `T`.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.schedule.steps()
    }

    fn check_timestep(&self, timestep: usize) -> Result<()> {
        if timestep < self.steps() {
            Ok(())
        } else {
            Err(ModelError::TimestepOutOfRange {
                timestep,
                steps: self.steps(),
            })
        }
    }

    /// Closed-form forward process:
    /// `sqrt(alpha_bar_t) * x0 + sqrt(1 - alpha_bar_t) * noise`.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::TimestepOutOfRange` if `timestep >= T`.
    pub fn q_sample(
        &self,
        x0: Tensor<B, 2>,
        timestep: usize,
        noise: Tensor<B, 2>,
    ) -> Result<Tensor<B, 2>> {
        self.check_timestep(timestep)?;
        let signal = self.schedule.sqrt_alphas_cumprod()[timestep];
        let spread = self.schedule.sqrt_one_minus_alphas_cumprod()[timestep];
        Ok(x0 * signal + noise * spread)
    }

    /// Forward process with fresh noise drawn from `rng`.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::TimestepOutOfRange` if `timestep >= T`.
    pub fn q_sample_with_rng<R: Rng + ?Sized>(
        &self,
        x0: Tensor<B, 2>,
        timestep: usize,
        rng: &mut R,
    ) -> Result<Tensor<B, 2>> {
        let noise = gaussian::<B, R>(x0.dims(), rng, &self.device);
        self.q_sample(x0, timestep, noise)
    }

    /// One reverse step `x_t -> x_{t-1}`.
    ///
    /// Computes the posterior mean from the predicted noise and, except at
    /// `t = 0`, adds Gaussian noise scaled by the posterior standard
    /// deviation.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::TimestepOutOfRange` if `timestep >= T`.
    #[allow(clippy::cast_precision_loss)]
    pub fn p_sample<R: Rng + ?Sized>(
        &self,
        x: Tensor<B, 2>,
        timestep: usize,
        condition: Tensor<B, 2>,
        rng: &mut R,
    ) -> Result<Tensor<B, 2>> {
        self.check_timestep(timestep)?;
        let [batch, width] = x.dims();

        let beta = self.schedule.betas()[timestep];
        let spread = self.schedule.sqrt_one_minus_alphas_cumprod()[timestep];
        let recip = self.schedule.sqrt_recip_alphas()[timestep];

        let t = Tensor::<B, 2>::full([batch, 1], timestep as f32, &self.device);
        let predicted = self.model.forward(x.clone(), t, condition);
        let mean = (x - predicted * (beta / spread)) * recip;

        if timestep == 0 {
            return Ok(mean);
        }

        let sigma = self.schedule.posterior_variance()[timestep].sqrt();
        let noise = gaussian::<B, R>([batch, width], rng, &self.device);
        Ok(mean + noise * sigma)
    }

    /// Ancestral sampling: start from pure noise and apply
    /// [`p_sample`](Self::p_sample) for `t = T-1, ..., 0`.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::ShapeMismatch` if `condition` does not have
    /// one row per sample.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        condition: Tensor<B, 2>,
        shape: [usize; 2],
        rng: &mut R,
    ) -> Result<Tensor<B, 2>> {
        let [rows, cond_dim] = condition.dims();
        if rows != shape[0] {
            return Err(ModelError::shape_mismatch(
                "condition",
                format!("[{}, {cond_dim}]", shape[0]),
                format!("[{rows}, {cond_dim}]"),
            ));
        }

        debug!(steps = self.steps(), batch = shape[0], width = shape[1], "sampling layout");

        let mut x = gaussian::<B, R>(shape, rng, &self.device);
        for timestep in (0..self.steps()).rev() {
            x = self.p_sample(x, timestep, condition.clone(), rng)?;
        }
        Ok(x)
    }

    /// Samples one layout vector conditioned on a graph embedding.
    ///
    /// The result carries the embedding's node order and a capacity of
    /// `input_dim / 4` rooms.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::ShapeMismatch` if the embedding width differs
    /// from the model's condition width.
    pub fn sample_layout<R: Rng + ?Sized>(
        &self,
        embedding: &GraphEmbedding,
        rng: &mut R,
    ) -> Result<LayoutVector> {
        let cond_dim = self.model.condition_dim();
        if embedding.dim() != cond_dim {
            return Err(ModelError::shape_mismatch(
                "embedding",
                format!("[1, {cond_dim}]"),
                format!("[1, {}]", embedding.dim()),
            ));
        }

        let condition = Tensor::<B, 2>::from_data(
            TensorData::new(embedding.values().to_vec(), [1, cond_dim]),
            &self.device,
        );
        let width = self.model.input_dim();

        let values = self
            .sample(condition, [1, width], rng)?
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| ModelError::readback(format!("{e:?}")))?;

        Ok(LayoutVector::new(
            embedding.order().clone(),
            width / VALUES_PER_ROOM,
            values,
        )?)
    }
}
