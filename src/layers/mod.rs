//! Layer classification: kinds, activation tags and merge operations.
//!
//! These are the static attributes a graph node carries. The predicates
//! built on top of them live on [`crate::graph::Node`].

pub mod activation;
pub mod kind;
pub mod merge;

pub use activation::ActivationKind;
pub use kind::{
    ConvKind, LayerKind, PassThroughKind, PoolingKind, RegularizationKind, StructuralKind,
};
pub use merge::MergeKind;
