//! Applying layers to tensors without knowing their arity up front.

use burn::tensor::{Tensor, backend::Backend};

use crate::errors::ShimError;
use crate::layers::{ActivationKind, MergeKind};

/// Number of tensors a layer consumes per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Single,
    Multiple,
}

/// A layer that can be called on tensors.
pub trait TensorLayer<B: Backend, const D: usize> {
    fn arity(&self) -> Arity;

    /// Runs the layer, returning its outputs.
    fn forward(&self, inputs: Vec<Tensor<B, D>>) -> Result<Vec<Tensor<B, D>>, ShimError>;
}

impl<B: Backend, const D: usize> TensorLayer<B, D> for ActivationKind {
    fn arity(&self) -> Arity {
        Arity::Single
    }

    fn forward(&self, inputs: Vec<Tensor<B, D>>) -> Result<Vec<Tensor<B, D>>, ShimError> {
        match inputs.len() {
            0 => Err(ShimError::NoInputs),
            1 => Ok(inputs.into_iter().map(|t| self.apply(t)).collect()),
            given => Err(ShimError::SingleInputExpected { given }),
        }
    }
}

impl<B: Backend, const D: usize> TensorLayer<B, D> for MergeKind {
    fn arity(&self) -> Arity {
        Arity::Multiple
    }

    fn forward(&self, inputs: Vec<Tensor<B, D>>) -> Result<Vec<Tensor<B, D>>, ShimError> {
        Ok(vec![self.apply(inputs)?])
    }
}

/// Applies a layer to one or several tensors.
///
/// Several inputs are handed over as a list and only accepted by
/// multi-input layers; a single input is handed over on its own. The
/// result is always a list of outputs.
pub fn apply<B, const D: usize, L>(
    layer: &L,
    inputs: Vec<Tensor<B, D>>,
) -> Result<Vec<Tensor<B, D>>, ShimError>
where
    B: Backend,
    L: TensorLayer<B, D> + ?Sized,
{
    match inputs.len() {
        0 => Err(ShimError::NoInputs),
        1 => layer.forward(inputs),
        given => match layer.arity() {
            Arity::Multiple => layer.forward(inputs),
            Arity::Single => Err(ShimError::SingleInputExpected { given }),
        },
    }
}
