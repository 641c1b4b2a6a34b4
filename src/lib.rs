//! # attrgraph
//!
//! Layer classification for neural-network attribution.
//!
//! Attribution methods explain a classifier's prediction by sending
//! relevance backward through the model's computation graph, choosing a
//! propagation rule per layer. This library provides what that choice is
//! made from: a frozen graph of classified layers and pure queries over it.
//!
//! ## Features
//!
//! - **Closed layer classification**: every node carries a [`LayerKind`]
//!   assigned once at construction, plus kernel and activation attributes.
//! - **Input reachability**: checks whether a layer reads only from model
//!   inputs, optionally looking through flatten/permute/reshape layers.
//! - **Tensor shim**: applies activation and merge layers to `burn` tensors
//!   and broadcasts values to partially known shapes.
//! - **Analyzer checks**: the model restrictions of gradient-family
//!   analyzers, evaluated over named fixture networks.
//!
//! ## Example
//!
//! ```
//! use attrgraph::prelude::*;
//!
//! let mut builder = GraphBuilder::new();
//! let x = builder.add_layer(LayerSpec::input("x"), &[]);
//! let flat = builder.add_layer(LayerSpec::pass_through("flat", PassThroughKind::Flatten), &[x]);
//! let out = builder.add_layer(LayerSpec::dense("out", ActivationKind::Softmax), &[flat]);
//! let graph = builder.build().unwrap();
//!
//! assert!(graph.is_input_reachable(out, true).unwrap());
//! assert!(graph.node(out).unwrap().is_activation(Some(ActivationKind::Softmax)));
//!
//! // Gradient analyzers refuse models that end in a softmax.
//! assert!(check_model(&graph, AnalyzerKind::Gradient).is_err());
//! assert!(check_model(&graph.without_softmax(), AnalyzerKind::Gradient).is_ok());
//! ```

pub mod analyzer;
pub mod config;
pub mod errors;
pub mod graph;
pub mod layers;
pub mod networks;
pub mod tensor;

// Re-exports for convenience
pub use config::ReachabilityConfig;
pub use errors::{GraphError, IntegrityError, ShimError};
pub use graph::{ComputationGraph, GraphBuilder, Node, NodeId};
pub use layers::{ActivationKind, LayerKind};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::analyzer::{AnalyzerKind, check_model};
    pub use crate::config::ReachabilityConfig;
    pub use crate::errors::{GraphError, IntegrityError, ShimError};
    pub use crate::graph::{
        ComputationGraph, GraphBuilder, GraphDescription, LayerSpec, ModelDescription, Node,
        NodeId,
    };
    pub use crate::layers::{
        ActivationKind, ConvKind, LayerKind, MergeKind, PassThroughKind, PoolingKind,
    };
}
