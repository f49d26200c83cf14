//! Graph encoder: constraint graph features to a fixed-width embedding.

use burn::module::Module;
use burn::nn;
use burn::prelude::Backend;
use burn::tensor::activation::relu;
use burn::tensor::{Tensor, TensorData};
use layout_types::{FEATURE_DIM, FeatureTensor, GraphEmbedding};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::gat::{GatLayer, HeadMerge, attention_mask, check_linear, elu};

/// Configuration for the graph encoder.
///
/// # Example
///
/// ```
/// use layout_models::GraphEncoderConfig;
///
/// let config = GraphEncoderConfig::default();
/// assert_eq!(config.node_dim, 11);
/// assert_eq!(config.out_dim, 128);
/// assert!(config.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphEncoderConfig {
    /// Width of one node feature row.
    pub node_dim: usize,

    /// Hidden width per attention head.
    pub hidden_dim: usize,

    /// Embedding width.
    pub out_dim: usize,

    /// Attention heads in the first message-passing layer.
    pub heads: usize,

    /// Dropout probability, active only when training.
    pub dropout: f64,
}

impl Default for GraphEncoderConfig {
    fn default() -> Self {
        Self {
            node_dim: FEATURE_DIM,
            hidden_dim: 64,
            out_dim: 128,
            heads: 4,
            dropout: 0.2,
        }
    }
}

impl GraphEncoderConfig {
    /// Creates a configuration with custom hidden and output widths.
    #[must_use]
    pub const fn new(hidden_dim: usize, out_dim: usize) -> Self {
        Self {
            node_dim: FEATURE_DIM,
            hidden_dim,
            out_dim,
            heads: 4,
            dropout: 0.2,
        }
    }

    /// Sets the node feature width.
    #[must_use]
    pub const fn with_node_dim(mut self, node_dim: usize) -> Self {
        self.node_dim = node_dim;
        self
    }

    /// Sets the number of attention heads.
    #[must_use]
    pub const fn with_heads(mut self, heads: usize) -> Self {
        self.heads = heads;
        self
    }

    /// Sets the dropout probability.
    #[must_use]
    pub const fn with_dropout(mut self, dropout: f64) -> Self {
        self.dropout = dropout;
        self
    }

    /// Validates the configuration.
    ///
    /// Returns `true` if all dimensions are positive and dropout is a
    /// probability.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.node_dim > 0
            && self.hidden_dim > 0
            && self.out_dim > 0
            && self.heads > 0
            && (0.0..1.0).contains(&self.dropout)
    }
}

/// Attention-based graph encoder.
///
/// Architecture: Linear -> `ReLU` -> Dropout -> GAT (multi-head, concat)
/// -> ELU -> Dropout -> GAT (one head) -> ELU -> mean over nodes -> Linear
///
/// The mean pooling makes the embedding independent of node order and
/// count.
///
/// # Example
///
/// ```
/// use burn_ndarray::NdArray;
/// use layout_models::{GraphEncoder, GraphEncoderConfig};
/// use layout_types::{ConstraintGraph, FeatureTensor};
///
/// let device = Default::default();
/// let encoder = GraphEncoder::<NdArray<f32>>::new(GraphEncoderConfig::default(), &device);
///
/// let graph = ConstraintGraph::from_json(
///     r#"{"nodes": [{"id": "a", "type": "kitchen"}, {"id": "b", "type": "bedroom"}],
///         "links": [{"source": "a", "target": "b", "type": "near"}]}"#,
/// ).unwrap();
///
/// let embedding = encoder.encode(&FeatureTensor::from_graph(&graph), &device).unwrap();
/// assert_eq!(embedding.dim(), 128);
/// ```
#[derive(Debug, Module)]
pub struct GraphEncoder<B: Backend> {
    node_embedding: nn::Linear<B>,
    gat1: GatLayer<B>,
    gat2: GatLayer<B>,
    fc_out: nn::Linear<B>,
    dropout: nn::Dropout,
}

impl<B: Backend> GraphEncoder<B> {
    /// Creates an encoder with freshly initialized weights.
    #[must_use]
    pub fn new(config: GraphEncoderConfig, device: &B::Device) -> Self {
        let hidden = config.hidden_dim;
        let heads = config.heads.max(1);

        Self {
            node_embedding: nn::LinearConfig::new(config.node_dim, hidden).init(device),
            gat1: GatLayer::new(hidden, hidden, heads, HeadMerge::Concat, device),
            gat2: GatLayer::new(hidden * heads, hidden, 1, HeadMerge::Mean, device),
            fc_out: nn::LinearConfig::new(hidden, config.out_dim).init(device),
            dropout: nn::DropoutConfig::new(config.dropout).init(),
        }
    }

    /// Runs the forward pass.
    ///
    /// # Arguments
    ///
    /// - `x`: Node features `[N, node_dim]`, `N >= 1`
    /// - `mask`: Additive neighbour mask `[N, N]`
    ///
    /// # Returns
    ///
    /// Graph embedding `[1, out_dim]`
    pub fn forward(&self, x: Tensor<B, 2>, mask: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = relu(self.node_embedding.forward(x));

        let x = self.dropout.forward(x);
        let x = elu(self.gat1.forward(x, mask.clone()));

        let x = self.dropout.forward(x);
        let x = elu(self.gat2.forward(x, mask));

        self.fc_out.forward(x.mean_dim(0))
    }

    /// Encodes a feature tensor into a graph embedding.
    ///
    /// The embedding carries the tensor's node order.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::EmptyGraph` for a graph without nodes and
    /// `ModelError::ShapeMismatch` if the feature width does not match the
    /// encoder.
    pub fn encode(&self, features: &FeatureTensor, device: &B::Device) -> Result<GraphEmbedding> {
        let n = features.node_count();
        if n == 0 {
            return Err(ModelError::EmptyGraph);
        }

        let expected = self.node_embedding.weight.val().dims()[0];
        if features.dim() != expected {
            return Err(ModelError::shape_mismatch(
                "features",
                format!("[{n}, {expected}]"),
                format!("[{n}, {}]", features.dim()),
            ));
        }

        let x = Tensor::<B, 2>::from_data(
            TensorData::new(features.data().to_vec(), [n, features.dim()]),
            device,
        );
        let mask = attention_mask::<B>(n, features.edge_index(), device);

        let values = self
            .forward(x, mask)
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| ModelError::readback(format!("{e:?}")))?;

        Ok(GraphEmbedding::new(features.order().clone(), values))
    }

    /// Width of the produced embeddings.
    #[must_use]
    pub fn out_dim(&self) -> usize {
        self.fc_out.weight.val().dims()[1]
    }

    /// Compares every weight with `config`.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::ShapeMismatch` naming the first offending
    /// tensor.
    pub fn verify_shapes(&self, config: &GraphEncoderConfig) -> Result<()> {
        let hidden = config.hidden_dim;
        let heads = config.heads.max(1);

        check_linear("node_embedding", &self.node_embedding, config.node_dim, hidden)?;
        self.gat1
            .verify_shapes("gat1", hidden, hidden, heads, HeadMerge::Concat)?;
        self.gat2
            .verify_shapes("gat2", hidden * heads, hidden, 1, HeadMerge::Mean)?;
        check_linear("fc_out", &self.fc_out, hidden, config.out_dim)
    }
}
