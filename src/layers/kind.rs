//! Closed classification of computation-graph nodes.
//!
//! Every node is tagged with a [`LayerKind`] once, when the graph is built.
//! Rule selection downstream matches on the tag instead of inspecting
//! framework layer classes at runtime.

use super::activation::ActivationKind;
use super::merge::MergeKind;

/// Layers that reshape or reorder data without changing its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassThroughKind {
    Flatten,
    Permute,
    Reshape,
}

/// Convolution flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConvKind {
    Conv1D,
    Conv2D,
    Conv2DTranspose,
    Conv3D,
    Conv3DTranspose,
    SeparableConv1D,
    SeparableConv2D,
    DepthwiseConv2D,
}

/// Pooling flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolingKind {
    Average,
    Max,
    GlobalAverage,
    GlobalMax,
}

impl PoolingKind {
    pub fn is_average(&self) -> bool {
        matches!(self, PoolingKind::Average | PoolingKind::GlobalAverage)
    }

    pub fn is_max(&self) -> bool {
        matches!(self, PoolingKind::Max | PoolingKind::GlobalMax)
    }
}

/// Layers that only act during training (noise, dropout, penalties).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegularizationKind {
    Dropout,
    SpatialDropout,
    AlphaDropout,
    GaussianDropout,
    GaussianNoise,
    ActivityRegularization,
}

/// Layers that crop, pad, repeat or otherwise restructure their input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructuralKind {
    Cropping,
    UpSampling,
    ZeroPadding,
    RepeatVector,
    LocallyConnected,
    Lambda,
    Masking,
}

/// Classification tag of a computation-graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// Declared model input.
    Input,
    /// Flatten, permute or reshape.
    PassThrough(PassThroughKind),
    Convolutional(ConvKind),
    Pooling(PoolingKind),
    Dense,
    /// Batch normalization.
    Normalization,
    /// Dedicated activation layer.
    Activation(ActivationKind),
    /// Layer combining several inputs.
    Merge(MergeKind),
    Embedding,
    Regularization(RegularizationKind),
    Structural(StructuralKind),
    /// A nested model used as a layer.
    Network,
    Other,
}

impl LayerKind {
    /// Maps a framework layer class name to its kind.
    ///
    /// `activation` resolves the generic `Activation` layer, which only
    /// says what it does through its attached activation function.
    /// Unknown class names map to [`LayerKind::Other`].
    pub fn from_class_name(name: &str, activation: Option<ActivationKind>) -> Self {
        use ConvKind as C;
        use LayerKind as L;
        use PoolingKind as P;
        use RegularizationKind as R;
        use StructuralKind as S;

        match name {
            "InputLayer" | "Input" => L::Input,
            "Flatten" => L::PassThrough(PassThroughKind::Flatten),
            "Permute" => L::PassThrough(PassThroughKind::Permute),
            "Reshape" => L::PassThrough(PassThroughKind::Reshape),
            "Conv1D" => L::Convolutional(C::Conv1D),
            "Conv2D" => L::Convolutional(C::Conv2D),
            "Conv2DTranspose" => L::Convolutional(C::Conv2DTranspose),
            "Conv3D" => L::Convolutional(C::Conv3D),
            "Conv3DTranspose" => L::Convolutional(C::Conv3DTranspose),
            "SeparableConv1D" => L::Convolutional(C::SeparableConv1D),
            "SeparableConv2D" => L::Convolutional(C::SeparableConv2D),
            "DepthwiseConv2D" => L::Convolutional(C::DepthwiseConv2D),
            "AveragePooling1D" | "AveragePooling2D" | "AveragePooling3D" => {
                L::Pooling(P::Average)
            }
            "MaxPooling1D" | "MaxPooling2D" | "MaxPooling3D" => L::Pooling(P::Max),
            "GlobalAveragePooling1D" | "GlobalAveragePooling2D" | "GlobalAveragePooling3D" => {
                L::Pooling(P::GlobalAverage)
            }
            "GlobalMaxPooling1D" | "GlobalMaxPooling2D" | "GlobalMaxPooling3D" => {
                L::Pooling(P::GlobalMax)
            }
            "Dense" => L::Dense,
            "BatchNormalization" => L::Normalization,
            "ReLU" => L::Activation(ActivationKind::Relu),
            "ELU" => L::Activation(ActivationKind::Elu),
            "LeakyReLU" => L::Activation(ActivationKind::LeakyRelu),
            "PReLU" => L::Activation(ActivationKind::PRelu),
            "ThresholdedReLU" => L::Activation(ActivationKind::ThresholdedRelu),
            "Softmax" => L::Activation(ActivationKind::Softmax),
            "Activation" => L::Activation(activation.unwrap_or_default()),
            "Add" => L::Merge(MergeKind::Add),
            "Average" => L::Merge(MergeKind::Average),
            "Concatenate" => L::Merge(MergeKind::Concatenate),
            "Dot" => L::Merge(MergeKind::Dot),
            "Maximum" => L::Merge(MergeKind::Maximum),
            "Minimum" => L::Merge(MergeKind::Minimum),
            "Multiply" => L::Merge(MergeKind::Multiply),
            "Subtract" => L::Merge(MergeKind::Subtract),
            "Embedding" => L::Embedding,
            "Dropout" => L::Regularization(R::Dropout),
            "SpatialDropout1D" | "SpatialDropout2D" | "SpatialDropout3D" => {
                L::Regularization(R::SpatialDropout)
            }
            "AlphaDropout" => L::Regularization(R::AlphaDropout),
            "GaussianDropout" => L::Regularization(R::GaussianDropout),
            "GaussianNoise" => L::Regularization(R::GaussianNoise),
            "ActivityRegularization" => L::Regularization(R::ActivityRegularization),
            "Cropping1D" | "Cropping2D" | "Cropping3D" => L::Structural(S::Cropping),
            "UpSampling1D" | "UpSampling2D" | "UpSampling3D" => L::Structural(S::UpSampling),
            "ZeroPadding1D" | "ZeroPadding2D" | "ZeroPadding3D" => L::Structural(S::ZeroPadding),
            "RepeatVector" => L::Structural(S::RepeatVector),
            "LocallyConnected1D" | "LocallyConnected2D" => L::Structural(S::LocallyConnected),
            "Lambda" => L::Structural(S::Lambda),
            "Masking" => L::Structural(S::Masking),
            "Model" | "Sequential" | "Functional" | "Network" => L::Network,
            _ => L::Other,
        }
    }

    pub fn is_input(&self) -> bool {
        matches!(self, LayerKind::Input)
    }

    pub fn is_pass_through(&self) -> bool {
        matches!(self, LayerKind::PassThrough(_))
    }

    pub fn is_convolutional(&self) -> bool {
        matches!(self, LayerKind::Convolutional(_))
    }

    pub fn is_pooling(&self) -> bool {
        matches!(self, LayerKind::Pooling(_))
    }

    pub fn is_average_pooling(&self) -> bool {
        matches!(self, LayerKind::Pooling(p) if p.is_average())
    }

    pub fn is_max_pooling(&self) -> bool {
        matches!(self, LayerKind::Pooling(p) if p.is_max())
    }

    /// Returns true for every kind found in convolutional networks.
    ///
    /// Depthwise convolutions, nested networks and unclassified layers are
    /// the exceptions.
    pub fn is_convnet_layer(&self) -> bool {
        !matches!(
            self,
            LayerKind::Convolutional(ConvKind::DepthwiseConv2D)
                | LayerKind::Network
                | LayerKind::Other
        )
    }

    /// Returns true for kinds an activation search may walk along without
    /// losing track of which activation feeds which layer.
    pub fn is_activation_search_safe(&self) -> bool {
        match self {
            LayerKind::Activation(_) | LayerKind::Normalization => true,
            LayerKind::PassThrough(p) => {
                matches!(p, PassThroughKind::Flatten | PassThroughKind::Reshape)
            }
            LayerKind::Merge(m) => matches!(m, MergeKind::Add),
            LayerKind::Regularization(r) => matches!(
                r,
                RegularizationKind::Dropout
                    | RegularizationKind::GaussianNoise
                    | RegularizationKind::ActivityRegularization
            ),
            _ => false,
        }
    }
}
