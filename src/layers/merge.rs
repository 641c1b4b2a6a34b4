//! Merge layers combining several tensors into one.

use burn::tensor::{Tensor, backend::Backend};

use crate::errors::ShimError;

/// Ways a merge layer combines its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MergeKind {
    /// Element-wise sum.
    Add,
    /// Element-wise mean.
    Average,
    /// Concatenation along the last dimension.
    Concatenate,
    /// Dot product along the last dimension (exactly two inputs).
    Dot,
    Maximum,
    Minimum,
    Multiply,
    /// First input minus second (exactly two inputs).
    Subtract,
}

impl MergeKind {
    /// Minimum number of inputs this merge accepts.
    pub fn min_inputs(&self) -> usize {
        2
    }

    /// Maximum number of inputs this merge accepts, if bounded.
    pub fn max_inputs(&self) -> Option<usize> {
        match self {
            MergeKind::Dot | MergeKind::Subtract => Some(2),
            _ => None,
        }
    }

    fn check_arity(&self, given: usize) -> Result<(), ShimError> {
        if given == 0 {
            return Err(ShimError::NoInputs);
        }
        if given < self.min_inputs() {
            return Err(ShimError::TooFewInputs {
                expected: self.min_inputs(),
                given,
            });
        }
        if let Some(expected) = self.max_inputs() {
            if given > expected {
                return Err(ShimError::TooManyInputs { expected, given });
            }
        }
        Ok(())
    }

    /// Combines the inputs into a single tensor.
    pub fn apply<B: Backend, const D: usize>(
        &self,
        inputs: Vec<Tensor<B, D>>,
    ) -> Result<Tensor<B, D>, ShimError> {
        self.check_arity(inputs.len())?;
        let count = inputs.len();
        let mut iter = inputs.into_iter();
        let Some(first) = iter.next() else {
            return Err(ShimError::NoInputs);
        };

        let merged = match self {
            MergeKind::Add => iter.fold(first, |acc, t| acc.add(t)),
            MergeKind::Average => iter.fold(first, |acc, t| acc.add(t)).div_scalar(count as f32),
            MergeKind::Maximum => iter.fold(first, |acc, t| acc.max_pair(t)),
            MergeKind::Minimum => iter.fold(first, |acc, t| acc.min_pair(t)),
            MergeKind::Multiply => iter.fold(first, |acc, t| acc.mul(t)),
            MergeKind::Subtract => iter.fold(first, |acc, t| acc.sub(t)),
            MergeKind::Dot => iter.fold(first, |acc, t| acc.mul(t)).sum_dim(D - 1),
            MergeKind::Concatenate => {
                Tensor::cat(std::iter::once(first).chain(iter).collect(), D - 1)
            }
        };
        Ok(merged)
    }
}
