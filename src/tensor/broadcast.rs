//! Broadcasting values to the shapes of symbolic tensors.
//!
//! Target shapes may contain unknown dimensions (typically the batch
//! axis); those are treated as 1.

use burn::tensor::{Shape, Tensor, backend::Backend};

use crate::errors::ShimError;

/// A tensor shape with possibly unknown dimensions.
pub type TargetShape<const D: usize> = [Option<usize>; D];

fn resolve<const D: usize>(target: &TargetShape<D>) -> [usize; D] {
    target.map(|dim| dim.unwrap_or(1))
}

fn broadcast_to<B: Backend, const D: usize>(
    tensor: Tensor<B, D>,
    target: &TargetShape<D>,
) -> Result<Tensor<B, D>, ShimError> {
    let source = tensor.dims();
    let target = resolve(target);
    let compatible = source
        .iter()
        .zip(target.iter())
        .all(|(s, t)| s == t || *s == 1);
    if !compatible {
        return Err(ShimError::IncompatibleShape {
            source_shape: source.to_vec(),
            target: target.to_vec(),
        });
    }
    Ok(tensor.expand(Shape::new(target)))
}

/// Broadcasts one tensor to every target shape.
pub fn broadcast_to_shapes<B: Backend, const D: usize>(
    tensor: Tensor<B, D>,
    targets: &[TargetShape<D>],
) -> Result<Vec<Tensor<B, D>>, ShimError> {
    targets
        .iter()
        .map(|target| broadcast_to(tensor.clone(), target))
        .collect()
}

/// Broadcasts each tensor to the target shape at the same position.
pub fn broadcast_each<B: Backend, const D: usize>(
    tensors: Vec<Tensor<B, D>>,
    targets: &[TargetShape<D>],
) -> Result<Vec<Tensor<B, D>>, ShimError> {
    if tensors.len() != targets.len() {
        return Err(ShimError::CountMismatch {
            sources: tensors.len(),
            targets: targets.len(),
        });
    }
    tensors
        .into_iter()
        .zip(targets.iter())
        .map(|(tensor, target)| broadcast_to(tensor, target))
        .collect()
}

/// Fills every target shape with a scalar.
pub fn broadcast_scalar<B: Backend, const D: usize>(
    value: f32,
    targets: &[TargetShape<D>],
    device: &B::Device,
) -> Vec<Tensor<B, D>> {
    targets
        .iter()
        .map(|target| Tensor::full(resolve(target), value, device))
        .collect()
}
