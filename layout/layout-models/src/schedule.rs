//! Linear variance schedule and its precomputed terms.

use serde::{Deserialize, Serialize};

/// Configuration for the noise schedule.
///
/// # Example
///
/// ```
/// use layout_models::ScheduleConfig;
///
/// assert_eq!(ScheduleConfig::default().steps, 1000);
/// assert_eq!(ScheduleConfig::inference().steps, 50);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Number of diffusion steps `T`.
    pub steps: usize,

    /// First variance `beta_0`.
    pub beta_start: f64,

    /// Last variance `beta_{T-1}`.
    pub beta_end: f64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl ScheduleConfig {
    /// Creates a schedule of `steps` steps with the reference variance range.
    #[must_use]
    pub const fn new(steps: usize) -> Self {
        Self {
            steps,
            beta_start: 1.0e-4,
            beta_end: 0.02,
        }
    }

    /// Schedule used for inference: 50 steps.
    #[must_use]
    pub const fn inference() -> Self {
        Self::new(50)
    }

    /// Sets the variance range.
    #[must_use]
    pub const fn with_betas(mut self, beta_start: f64, beta_end: f64) -> Self {
        self.beta_start = beta_start;
        self.beta_end = beta_end;
        self
    }

    /// Validates the configuration.
    ///
    /// Returns `true` if there is at least one step and
    /// `0 < beta_start <= beta_end < 1`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.steps > 0
            && self.beta_start > 0.0
            && self.beta_start <= self.beta_end
            && self.beta_end < 1.0
    }
}

/// Per-step coefficients of a linear-beta diffusion process.
///
/// All vectors have one entry per step; index `t` is timestep `t`.
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseSchedule {
    betas: Vec<f32>,
    alphas: Vec<f32>,
    alphas_cumprod: Vec<f32>,
    alphas_cumprod_prev: Vec<f32>,
    sqrt_recip_alphas: Vec<f32>,
    sqrt_alphas_cumprod: Vec<f32>,
    sqrt_one_minus_alphas_cumprod: Vec<f32>,
    posterior_variance: Vec<f32>,
}

impl NoiseSchedule {
    /// Precomputes every coefficient for `config`.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn new(config: &ScheduleConfig) -> Self {
        let steps = config.steps;
        let span = config.beta_end - config.beta_start;
        let denom = steps.saturating_sub(1).max(1) as f64;

        let betas: Vec<f64> = (0..steps)
            .map(|i| config.beta_start + span * i as f64 / denom)
            .collect();
        let alphas: Vec<f64> = betas.iter().map(|beta| 1.0 - beta).collect();

        let mut alphas_cumprod = Vec::with_capacity(steps);
        let mut running = 1.0;
        for alpha in &alphas {
            running *= alpha;
            alphas_cumprod.push(running);
        }

        let alphas_cumprod_prev: Vec<f64> = std::iter::once(1.0)
            .chain(alphas_cumprod.iter().copied())
            .take(steps)
            .collect();

        let posterior_variance: Vec<f64> = (0..steps)
            .map(|t| betas[t] * (1.0 - alphas_cumprod_prev[t]) / (1.0 - alphas_cumprod[t]))
            .collect();

        let narrow = |values: &[f64]| values.iter().map(|v| *v as f32).collect::<Vec<f32>>();
        let derived = |f: fn(f64) -> f64, values: &[f64]| {
            values.iter().map(|v| f(*v) as f32).collect::<Vec<f32>>()
        };

        Self {
            sqrt_recip_alphas: derived(|a| (1.0 / a).sqrt(), &alphas),
            sqrt_alphas_cumprod: derived(f64::sqrt, &alphas_cumprod),
            sqrt_one_minus_alphas_cumprod: derived(|a| (1.0 - a).sqrt(), &alphas_cumprod),
            betas: narrow(&betas),
            alphas: narrow(&alphas),
            alphas_cumprod: narrow(&alphas_cumprod),
            alphas_cumprod_prev: narrow(&alphas_cumprod_prev),
            posterior_variance: narrow(&posterior_variance),
        }
    }

    /// Number of steps `T`.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.betas.len()
    }

    /// `beta_t`.
    #[must_use]
    pub fn betas(&self) -> &[f32] {
        &self.betas
    }

    /// `alpha_t = 1 - beta_t`.
    #[must_use]
    pub fn alphas(&self) -> &[f32] {
        &self.alphas
    }

    /// Cumulative products of the alphas.
    #[must_use]
    pub fn alphas_cumprod(&self) -> &[f32] {
        &self.alphas_cumprod
    }

    /// Cumulative products shifted by one step, starting at `1`.
    #[must_use]
    pub fn alphas_cumprod_prev(&self) -> &[f32] {
        &self.alphas_cumprod_prev
    }

    /// `sqrt(1 / alpha_t)`.
    #[must_use]
    pub fn sqrt_recip_alphas(&self) -> &[f32] {
        &self.sqrt_recip_alphas
    }

    /// `sqrt(alpha_bar_t)`.
    #[must_use]
    pub fn sqrt_alphas_cumprod(&self) -> &[f32] {
        &self.sqrt_alphas_cumprod
    }

    /// `sqrt(1 - alpha_bar_t)`.
    #[must_use]
    pub fn sqrt_one_minus_alphas_cumprod(&self) -> &[f32] {
        &self.sqrt_one_minus_alphas_cumprod
    }

    /// One-step posterior variance `beta_t (1 - alpha_bar_{t-1}) / (1 - alpha_bar_t)`.
    #[must_use]
    pub fn posterior_variance(&self) -> &[f32] {
        &self.posterior_variance
    }
}
