//! Dense graph attention layer.

use burn::module::{Module, Param};
use burn::nn;
use burn::prelude::Backend;
use burn::tensor::activation::softmax;
use burn::tensor::{Distribution, Tensor, TensorData};

use crate::error::{ModelError, Result};

/// Additive bias for non-neighbours before the attention softmax.
const MASKED: f32 = -1.0e9;

/// Negative slope of the attention score activation.
const SCORE_SLOPE: f64 = 0.2;

/// Builds the `[N, N]` additive attention mask for a graph.
///
/// Row `i` lists the sources node `i` may attend to: itself and every `j`
/// with a `[j, i]` pair in `edge_index`. Allowed entries are `0`, all
/// others [`MASKED`]. Repeated pairs collapse into one entry.
pub(crate) fn attention_mask<B: Backend>(
    node_count: usize,
    edge_index: &[[usize; 2]],
    device: &B::Device,
) -> Tensor<B, 2> {
    let mut mask = vec![MASKED; node_count * node_count];
    for i in 0..node_count {
        mask[i * node_count + i] = 0.0;
    }
    for &[source, target] in edge_index {
        if source < node_count && target < node_count {
            mask[target * node_count + source] = 0.0;
        }
    }
    Tensor::from_data(TensorData::new(mask, [node_count, node_count]), device)
}

pub(crate) fn leaky_relu<B: Backend, const D: usize>(x: Tensor<B, D>, slope: f64) -> Tensor<B, D> {
    x.clone().clamp_min(0.0) + x.clamp_max(0.0) * slope
}

pub(crate) fn elu<B: Backend, const D: usize>(x: Tensor<B, D>) -> Tensor<B, D> {
    x.clone().clamp_min(0.0) + (x.clamp_max(0.0).exp() - 1.0)
}

/// How the heads of a [`GatLayer`] are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadMerge {
    /// Heads are laid side by side: output width `heads * out_channels`.
    Concat,
    /// Heads are averaged: output width `out_channels`.
    Mean,
}

/// Graph attention message passing over a dense neighbour mask.
///
/// Node features are projected per head, scored with learned source and
/// destination attention vectors, normalized over each node's incoming
/// neighbours (itself included) and aggregated.
#[derive(Debug, Module)]
pub struct GatLayer<B: Backend> {
    lin: nn::Linear<B>,
    att_src: Param<Tensor<B, 2>>,
    att_dst: Param<Tensor<B, 2>>,
    bias: Param<Tensor<B, 1>>,
    heads: usize,
    out_channels: usize,
}

impl<B: Backend> GatLayer<B> {
    /// Creates a layer with Glorot-uniform attention vectors and a zero bias.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(
        in_channels: usize,
        out_channels: usize,
        heads: usize,
        merge: HeadMerge,
        device: &B::Device,
    ) -> Self {
        let heads = heads.max(1);
        let lin = nn::LinearConfig::new(in_channels, heads * out_channels)
            .with_bias(false)
            .init(device);

        let bound = (6.0 / (heads + out_channels) as f64).sqrt();
        let att = || {
            Param::from_tensor(Tensor::random(
                [heads, out_channels],
                Distribution::Uniform(-bound, bound),
                device,
            ))
        };

        let bias_len = match merge {
            HeadMerge::Concat => heads * out_channels,
            HeadMerge::Mean => out_channels,
        };

        Self {
            lin,
            att_src: att(),
            att_dst: att(),
            bias: Param::from_tensor(Tensor::zeros([bias_len], device)),
            heads,
            out_channels,
        }
    }

    /// Head combination, recovered from the bias width.
    ///
    /// With a single head both modes give the same result.
    fn merge(&self) -> HeadMerge {
        if self.bias.val().dims()[0] == self.out_channels {
            HeadMerge::Mean
        } else {
            HeadMerge::Concat
        }
    }

    /// Width of this layer's output rows.
    #[must_use]
    pub fn output_dim(&self) -> usize {
        match self.merge() {
            HeadMerge::Concat => self.heads * self.out_channels,
            HeadMerge::Mean => self.out_channels,
        }
    }

    /// Runs one round of message passing.
    ///
    /// # Arguments
    ///
    /// - `x`: Node features `[N, in_channels]`
    /// - `mask`: Additive neighbour mask `[N, N]` from `attention_mask`
    ///
    /// # Returns
    ///
    /// Node features `[N, output_dim]`
    pub fn forward(&self, x: Tensor<B, 2>, mask: Tensor<B, 2>) -> Tensor<B, 2> {
        let [n, _] = x.dims();
        let (heads, channels) = (self.heads, self.out_channels);

        // [H, N, C]
        let h = self
            .lin
            .forward(x)
            .reshape([n, heads, channels])
            .swap_dims(0, 1);

        let alpha_src = h
            .clone()
            .matmul(self.att_src.val().reshape([heads, channels, 1]));
        let alpha_dst = h
            .clone()
            .matmul(self.att_dst.val().reshape([heads, channels, 1]));

        // scores[h, i, j]: attention of target i to source j
        let scores = alpha_dst + alpha_src.swap_dims(1, 2);
        let scores = leaky_relu(scores, SCORE_SLOPE) + mask.unsqueeze::<3>();
        let attention = softmax(scores, 2);
        let messages = attention.matmul(h);

        let merged = match self.merge() {
            HeadMerge::Concat => messages.swap_dims(0, 1).reshape([n, heads * channels]),
            HeadMerge::Mean => messages.mean_dim(0).reshape([n, channels]),
        };

        merged + self.bias.val().unsqueeze::<2>()
    }

    /// Compares every weight with the expected layer sizing.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::ShapeMismatch` naming the first offending
    /// tensor.
    pub fn verify_shapes(
        &self,
        name: &str,
        in_channels: usize,
        out_channels: usize,
        heads: usize,
        merge: HeadMerge,
    ) -> Result<()> {
        let bias_len = match merge {
            HeadMerge::Concat => heads * out_channels,
            HeadMerge::Mean => out_channels,
        };
        check_dims(
            &format!("{name}.lin.weight"),
            self.lin.weight.val().dims(),
            [in_channels, heads * out_channels],
        )?;
        check_dims(
            &format!("{name}.att_src"),
            self.att_src.val().dims(),
            [heads, out_channels],
        )?;
        check_dims(
            &format!("{name}.att_dst"),
            self.att_dst.val().dims(),
            [heads, out_channels],
        )?;
        check_dims(&format!("{name}.bias"), self.bias.val().dims(), [bias_len])
    }
}

/// Fails with `ShapeMismatch` unless `actual == expected`.
pub(crate) fn check_dims<const D: usize>(
    name: &str,
    actual: [usize; D],
    expected: [usize; D],
) -> Result<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(ModelError::shape_mismatch(
            name,
            format!("{expected:?}"),
            format!("{actual:?}"),
        ))
    }
}

/// Checks a linear layer's weight and optional bias.
pub(crate) fn check_linear<B: Backend>(
    name: &str,
    linear: &nn::Linear<B>,
    d_input: usize,
    d_output: usize,
) -> Result<()> {
    check_dims(
        &format!("{name}.weight"),
        linear.weight.val().dims(),
        [d_input, d_output],
    )?;
    if let Some(bias) = &linear.bias {
        check_dims(&format!("{name}.bias"), bias.val().dims(), [d_output])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use burn_ndarray::NdArray;

    type TestBackend = NdArray<f32>;

    fn values<const D: usize>(tensor: Tensor<TestBackend, D>) -> Vec<f32> {
        tensor.into_data().to_vec::<f32>().unwrap_or_default()
    }

    #[test]
    fn mask_allows_self_and_incoming() {
        let device = <TestBackend as Backend>::Device::default();
        let mask = values(attention_mask::<TestBackend>(3, &[[0, 1], [1, 0]], &device));

        assert_relative_eq!(mask[0], 0.0);
        assert_relative_eq!(mask[1], 0.0);
        assert_relative_eq!(mask[3], 0.0);
        assert_relative_eq!(mask[4], 0.0);
        assert_relative_eq!(mask[8], 0.0);
        assert!(mask[2] < -1.0e8);
        assert!(mask[6] < -1.0e8);
    }

    #[test]
    fn activations() {
        let device = <TestBackend as Backend>::Device::default();
        let x = Tensor::<TestBackend, 1>::from_data(TensorData::new(vec![-1.0_f32, 2.0], [2]), &device);

        let leaky = values(leaky_relu(x.clone(), 0.2));
        assert_relative_eq!(leaky[0], -0.2, epsilon = 1e-6);
        assert_relative_eq!(leaky[1], 2.0, epsilon = 1e-6);

        let elu = values(elu(x));
        assert_relative_eq!(elu[0], (-1.0_f32).exp() - 1.0, epsilon = 1e-6);
        assert_relative_eq!(elu[1], 2.0, epsilon = 1e-6);
    }

    #[test]
    fn concat_layer_shapes() {
        let device = <TestBackend as Backend>::Device::default();
        let layer = GatLayer::<TestBackend>::new(8, 5, 4, HeadMerge::Concat, &device);
        assert_eq!(layer.output_dim(), 20);

        let x = Tensor::<TestBackend, 2>::ones([3, 8], &device);
        let mask = attention_mask::<TestBackend>(3, &[[0, 1], [1, 0], [1, 2], [2, 1]], &device);
        assert_eq!(layer.forward(x, mask).dims(), [3, 20]);
        assert!(layer.verify_shapes("gat", 8, 5, 4, HeadMerge::Concat).is_ok());
    }

    #[test]
    fn mean_layer_shapes() {
        let device = <TestBackend as Backend>::Device::default();
        let layer = GatLayer::<TestBackend>::new(20, 5, 1, HeadMerge::Mean, &device);
        assert_eq!(layer.output_dim(), 5);

        let x = Tensor::<TestBackend, 2>::ones([2, 20], &device);
        let mask = attention_mask::<TestBackend>(2, &[], &device);
        assert_eq!(layer.forward(x, mask).dims(), [2, 5]);
    }

    #[test]
    fn isolated_nodes_attend_to_themselves() {
        let device = <TestBackend as Backend>::Device::default();
        let layer = GatLayer::<TestBackend>::new(2, 3, 2, HeadMerge::Concat, &device);

        let rows = vec![1.0_f32, 0.0, 0.0, 1.0];
        let x = Tensor::<TestBackend, 2>::from_data(TensorData::new(rows, [2, 2]), &device);
        let mask = attention_mask::<TestBackend>(2, &[], &device);
        let out = values(layer.forward(x.clone(), mask));

        // With no neighbours each node's output is its own projection.
        let projected = values(layer.lin.forward(x));
        for (a, b) in out.iter().zip(&projected) {
            assert_relative_eq!(*a, *b, epsilon = 1e-5);
        }
    }

    #[test]
    fn connected_pair_matches_hand_attention() {
        let device = <TestBackend as Backend>::Device::default();
        let (heads, channels) = (2, 3);
        let layer = GatLayer::<TestBackend>::new(2, channels, heads, HeadMerge::Concat, &device);

        let rows = vec![0.5_f32, -1.0, 2.0, 0.25];
        let x = Tensor::<TestBackend, 2>::from_data(TensorData::new(rows, [2, 2]), &device);
        let mask = attention_mask::<TestBackend>(2, &[[0, 1], [1, 0]], &device);
        let out = values(layer.forward(x.clone(), mask));

        let h = values(layer.lin.forward(x));
        let att_src = values(layer.att_src.val());
        let att_dst = values(layer.att_dst.val());
        let width = heads * channels;
        let feature = |node: usize, head: usize| &h[node * width + head * channels..][..channels];
        let dot = |a: &[f32], b: &[f32]| a.iter().zip(b).map(|(a, b)| a * b).sum::<f32>();
        let leaky = |v: f32| if v > 0.0 { v } else { 0.2 * v };

        for head in 0..heads {
            let src = &att_src[head * channels..][..channels];
            let dst = &att_dst[head * channels..][..channels];
            for target in 0..2 {
                let scores: Vec<f32> = (0..2)
                    .map(|source| leaky(dot(dst, feature(target, head)) + dot(src, feature(source, head))))
                    .collect();
                let top = scores[0].max(scores[1]);
                let exp: Vec<f32> = scores.iter().map(|s| (s - top).exp()).collect();
                let weights: Vec<f32> = exp.iter().map(|e| e / (exp[0] + exp[1])).collect();

                for c in 0..channels {
                    let expected =
                        weights[0] * feature(0, head)[c] + weights[1] * feature(1, head)[c];
                    assert_relative_eq!(
                        out[target * width + head * channels + c],
                        expected,
                        epsilon = 1e-5
                    );
                }
            }
        }
    }

    #[test]
    fn verify_shapes_reports_mismatch() {
        let device = <TestBackend as Backend>::Device::default();
        let layer = GatLayer::<TestBackend>::new(8, 5, 4, HeadMerge::Concat, &device);
        let err = layer.verify_shapes("gat1", 16, 5, 4, HeadMerge::Concat);
        assert!(matches!(err, Err(ModelError::ShapeMismatch { ref name, .. }) if name == "gat1.lin.weight"));
    }
}
