//! Conditional noise-prediction network.

use burn::module::Module;
use burn::nn;
use burn::prelude::Backend;
use burn::tensor::activation::relu;
use burn::tensor::{Tensor, TensorData};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::gat::check_linear;

/// Configuration for the layout diffusion model.
///
/// # Example
///
/// ```
/// use layout_models::LayoutDiffusionConfig;
///
/// let config = LayoutDiffusionConfig::default();
/// assert_eq!(config.input_dim, 32);
/// assert_eq!(config.max_rooms(), 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutDiffusionConfig {
    /// Layout vector width (`4 x max rooms`).
    pub input_dim: usize,

    /// Graph embedding width.
    pub condition_dim: usize,

    /// Width of the time and condition embeddings.
    pub time_dim: usize,

    /// Hidden width of the denoising network.
    pub hidden_dim: usize,
}

impl Default for LayoutDiffusionConfig {
    fn default() -> Self {
        Self {
            input_dim: 32,
            condition_dim: 128,
            time_dim: 64,
            hidden_dim: 256,
        }
    }
}

impl LayoutDiffusionConfig {
    /// Creates a configuration for the given layout and condition widths.
    #[must_use]
    pub const fn new(input_dim: usize, condition_dim: usize) -> Self {
        Self {
            input_dim,
            condition_dim,
            time_dim: 64,
            hidden_dim: 256,
        }
    }

    /// Sets the time embedding width.
    #[must_use]
    pub const fn with_time_dim(mut self, time_dim: usize) -> Self {
        self.time_dim = time_dim;
        self
    }

    /// Sets the hidden width.
    #[must_use]
    pub const fn with_hidden_dim(mut self, hidden_dim: usize) -> Self {
        self.hidden_dim = hidden_dim;
        self
    }

    /// Number of rooms a layout vector of this width holds.
    #[must_use]
    pub const fn max_rooms(&self) -> usize {
        self.input_dim / layout_types::VALUES_PER_ROOM
    }

    /// Validates the configuration.
    ///
    /// The time embedding splits into a sine and a cosine half, each at
    /// least two wide.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.input_dim > 0
            && self.condition_dim > 0
            && self.hidden_dim > 0
            && self.time_dim >= 4
            && self.time_dim % 2 == 0
    }
}

/// Sinusoidal timestep embedding `[B, 1] -> [B, dim]`.
///
/// Frequencies are `exp(-i * ln(10000) / (dim/2 - 1))`; the sine half
/// comes first, then the cosine half.
#[allow(clippy::cast_precision_loss)]
pub fn sinusoidal_embedding<B: Backend>(timesteps: Tensor<B, 2>, dim: usize) -> Tensor<B, 2> {
    let half = dim / 2;
    let scale = 10_000_f64.ln() / (half.saturating_sub(1).max(1)) as f64;
    #[allow(clippy::cast_possible_truncation)]
    let freqs: Vec<f32> = (0..half)
        .map(|i| (-(i as f64) * scale).exp() as f32)
        .collect();

    let device = timesteps.device();
    let freqs = Tensor::<B, 2>::from_data(TensorData::new(freqs, [1, half]), &device);
    let args = timesteps.matmul(freqs);

    Tensor::cat(vec![args.clone().sin(), args.cos()], 1)
}

/// Noise predictor `f(x_t, t, c)`.
///
/// Architecture: sinusoidal time embedding -> Linear -> `ReLU`; condition
/// -> Linear -> `ReLU`; `[x, time, condition]` -> Linear -> `ReLU` ->
/// Linear -> `ReLU` -> Linear (back to the layout width).
#[derive(Debug, Module)]
pub struct LayoutDiffusion<B: Backend> {
    time_linear: nn::Linear<B>,
    cond_linear: nn::Linear<B>,
    net_in: nn::Linear<B>,
    net_hidden: nn::Linear<B>,
    net_out: nn::Linear<B>,
    time_dim: usize,
}

impl<B: Backend> LayoutDiffusion<B> {
    /// Creates a model with freshly initialized weights.
    #[must_use]
    pub fn new(config: LayoutDiffusionConfig, device: &B::Device) -> Self {
        let time = config.time_dim;
        let hidden = config.hidden_dim;

        Self {
            time_linear: nn::LinearConfig::new(time, time).init(device),
            cond_linear: nn::LinearConfig::new(config.condition_dim, time).init(device),
            net_in: nn::LinearConfig::new(config.input_dim + 2 * time, hidden).init(device),
            net_hidden: nn::LinearConfig::new(hidden, hidden).init(device),
            net_out: nn::LinearConfig::new(hidden, config.input_dim).init(device),
            time_dim: time,
        }
    }

    /// Predicts the noise in `x`.
    ///
    /// # Arguments
    ///
    /// - `x`: Noisy layouts `[batch, input_dim]`
    /// - `timesteps`: Timestep indices as floats `[batch, 1]`
    /// - `condition`: Graph embeddings `[batch, condition_dim]`
    ///
    /// # Returns
    ///
    /// Predicted noise `[batch, input_dim]`
    pub fn forward(
        &self,
        x: Tensor<B, 2>,
        timesteps: Tensor<B, 2>,
        condition: Tensor<B, 2>,
    ) -> Tensor<B, 2> {
        let t_emb = relu(
            self.time_linear
                .forward(sinusoidal_embedding(timesteps, self.time_dim)),
        );
        let c_emb = relu(self.cond_linear.forward(condition));

        let h = Tensor::cat(vec![x, t_emb, c_emb], 1);
        let h = relu(self.net_in.forward(h));
        let h = relu(self.net_hidden.forward(h));
        self.net_out.forward(h)
    }

    /// Layout vector width.
    #[must_use]
    pub fn input_dim(&self) -> usize {
        self.net_out.weight.val().dims()[1]
    }

    /// Graph embedding width.
    #[must_use]
    pub fn condition_dim(&self) -> usize {
        self.cond_linear.weight.val().dims()[0]
    }

    /// Compares every weight with `config`.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::ShapeMismatch` naming the first offending
    /// tensor.
    pub fn verify_shapes(&self, config: &LayoutDiffusionConfig) -> Result<()> {
        let time = config.time_dim;
        let hidden = config.hidden_dim;

        check_linear("time_linear", &self.time_linear, time, time)?;
        check_linear("cond_linear", &self.cond_linear, config.condition_dim, time)?;
        check_linear("net_in", &self.net_in, config.input_dim + 2 * time, hidden)?;
        check_linear("net_hidden", &self.net_hidden, hidden, hidden)?;
        check_linear("net_out", &self.net_out, hidden, config.input_dim)
    }
}
