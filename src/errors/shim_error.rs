//! Tensor shim error types.

use thiserror::Error;

/// Errors raised when applying layers to tensors or broadcasting values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShimError {
    #[error("No input tensors given")]
    NoInputs,

    #[error("Layer expects only a single input, got {given}")]
    SingleInputExpected { given: usize },

    #[error("Layer expects at least {expected} inputs, got {given}")]
    TooFewInputs { expected: usize, given: usize },

    #[error("Layer expects at most {expected} inputs, got {given}")]
    TooManyInputs { expected: usize, given: usize },

    #[error("Cannot broadcast shape {source_shape:?} to {target:?}")]
    IncompatibleShape {
        source_shape: Vec<usize>,
        target: Vec<usize>,
    },

    #[error("Got {sources} tensors for {targets} target shapes")]
    CountMismatch { sources: usize, targets: usize },
}
