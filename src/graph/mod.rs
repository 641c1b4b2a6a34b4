//! Computation graph of classified layers and the queries over it.
//!
//! # Example
//!
//! ```
//! use attrgraph::graph::{GraphBuilder, LayerSpec};
//! use attrgraph::layers::{ActivationKind, LayerKind, PassThroughKind};
//!
//! let mut builder = GraphBuilder::new();
//! let x = builder.add_layer(LayerSpec::input("x"), &[]);
//! let r = builder.add_layer(LayerSpec::pass_through("r", PassThroughKind::Reshape), &[x]);
//! let p = builder.add_layer(LayerSpec::pass_through("p", PassThroughKind::Permute), &[r]);
//! let d = builder.add_layer(LayerSpec::dense("d", ActivationKind::Relu), &[p]);
//! let graph = builder.build().unwrap();
//!
//! assert_eq!(graph.classify(d).unwrap(), LayerKind::Dense);
//! assert!(graph.is_input_reachable(d, true).unwrap());
//! assert!(!graph.is_input_reachable(d, false).unwrap());
//! ```

mod builder;
mod core;
mod description;
mod node;
mod reachability;

pub use builder::GraphBuilder;
pub use core::{ComputationGraph, GraphId};
pub use description::{DescribedLayer, GraphDescription, LayerDescription, ModelDescription};
pub use node::{LayerSpec, Node, NodeId};
