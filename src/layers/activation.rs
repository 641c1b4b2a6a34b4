//! Activation function tags attached to graph nodes.

use burn::tensor::{Tensor, backend::Backend};
use serde::{Deserialize, Serialize};

/// Slope of the negative part of [`ActivationKind::LeakyRelu`].
pub const LEAKY_RELU_ALPHA: f32 = 0.3;

/// Scale of the negative part of [`ActivationKind::Elu`].
pub const ELU_ALPHA: f32 = 1.0;

/// Cut-off of [`ActivationKind::ThresholdedRelu`].
pub const THRESHOLDED_RELU_THETA: f32 = 1.0;

/// Activation functions a layer can carry or be.
///
/// The serialized names follow the lower-case names model descriptions use
/// (`"relu"`, `"leakyrelu"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActivationKind {
    /// Identity: f(x) = x
    #[default]
    Linear,
    /// Rectified Linear Unit: f(x) = max(0, x)
    Relu,
    /// Exponential Linear Unit: f(x) = x for x > 0, else exp(x) - 1
    Elu,
    /// Leaky ReLU with a fixed negative slope
    LeakyRelu,
    /// Parametric ReLU (learned negative slope)
    PRelu,
    /// f(x) = x for x > theta, else 0
    ThresholdedRelu,
    /// Softmax normalization (across last dimension)
    Softmax,
    /// Sigmoid: f(x) = 1 / (1 + exp(-x))
    Sigmoid,
    /// Hyperbolic tangent
    Tanh,
    /// Gaussian Error Linear Unit
    Gelu,
}

impl ActivationKind {
    /// All activation kinds, in declaration order.
    pub const ALL: [ActivationKind; 10] = [
        ActivationKind::Linear,
        ActivationKind::Relu,
        ActivationKind::Elu,
        ActivationKind::LeakyRelu,
        ActivationKind::PRelu,
        ActivationKind::ThresholdedRelu,
        ActivationKind::Softmax,
        ActivationKind::Sigmoid,
        ActivationKind::Tanh,
        ActivationKind::Gelu,
    ];

    /// Returns the lower-case name of this activation.
    pub fn name(&self) -> &'static str {
        match self {
            ActivationKind::Linear => "linear",
            ActivationKind::Relu => "relu",
            ActivationKind::Elu => "elu",
            ActivationKind::LeakyRelu => "leakyrelu",
            ActivationKind::PRelu => "prelu",
            ActivationKind::ThresholdedRelu => "thresholdedrelu",
            ActivationKind::Softmax => "softmax",
            ActivationKind::Sigmoid => "sigmoid",
            ActivationKind::Tanh => "tanh",
            ActivationKind::Gelu => "gelu",
        }
    }

    /// Creates an ActivationKind from a name, ignoring case and underscores.
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '_')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "linear" | "none" => Some(ActivationKind::Linear),
            "relu" => Some(ActivationKind::Relu),
            "elu" => Some(ActivationKind::Elu),
            "leakyrelu" => Some(ActivationKind::LeakyRelu),
            "prelu" => Some(ActivationKind::PRelu),
            "thresholdedrelu" => Some(ActivationKind::ThresholdedRelu),
            "softmax" => Some(ActivationKind::Softmax),
            "sigmoid" => Some(ActivationKind::Sigmoid),
            "tanh" => Some(ActivationKind::Tanh),
            "gelu" => Some(ActivationKind::Gelu),
            _ => None,
        }
    }

    /// Returns true for activations that leave positive inputs unchanged
    /// and need no rule of their own: linear and ReLU.
    pub fn is_pass_through(&self) -> bool {
        matches!(self, ActivationKind::Linear | ActivationKind::Relu)
    }

    /// Applies the activation function to a tensor.
    ///
    /// Parametric ReLU is applied with its zero-initialised slope.
    pub fn apply<B: Backend, const D: usize>(&self, tensor: Tensor<B, D>) -> Tensor<B, D> {
        match self {
            ActivationKind::Linear => tensor,
            ActivationKind::Relu | ActivationKind::PRelu => {
                burn::tensor::activation::relu(tensor)
            }
            ActivationKind::Elu => {
                let mask = tensor.clone().lower_elem(0.0);
                let negative = (tensor.clone().exp() - 1.0) * ELU_ALPHA;
                tensor.mask_where(mask, negative)
            }
            ActivationKind::LeakyRelu => {
                let mask = tensor.clone().lower_elem(0.0);
                let scaled = tensor.clone() * LEAKY_RELU_ALPHA;
                tensor.mask_where(mask, scaled)
            }
            ActivationKind::ThresholdedRelu => {
                let zeros = tensor.zeros_like();
                let mask = tensor.clone().greater_elem(THRESHOLDED_RELU_THETA);
                zeros.mask_where(mask, tensor)
            }
            ActivationKind::Softmax => burn::tensor::activation::softmax(tensor, D - 1),
            ActivationKind::Sigmoid => burn::tensor::activation::sigmoid(tensor),
            ActivationKind::Tanh => burn::tensor::activation::tanh(tensor),
            ActivationKind::Gelu => burn::tensor::activation::gelu(tensor),
        }
    }
}

impl std::fmt::Display for ActivationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
