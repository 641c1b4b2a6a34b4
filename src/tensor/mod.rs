//! Tensor shim: applying layers to one or many tensors, and broadcasting
//! values to tensor shapes that may be partially unknown.

mod apply;
mod broadcast;

pub use apply::{Arity, TensorLayer, apply};
pub use broadcast::{TargetShape, broadcast_each, broadcast_scalar, broadcast_to_shapes};
