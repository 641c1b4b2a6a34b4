//! Node - a classified layer in the computation graph.
//!
//! A node carries the static attributes rule selection looks at: its
//! [`LayerKind`], whether it owns a learnable kernel, and the activation
//! function attached to it. Edges are stored as [`NodeId`]s.

use std::fmt;

use crate::layers::{ActivationKind, ConvKind, LayerKind, MergeKind, PassThroughKind, PoolingKind};

use super::core::GraphId;

/// Stable handle of a node inside one graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    graph: GraphId,
    index: usize,
}

impl NodeId {
    pub(crate) fn new(graph: GraphId, index: usize) -> Self {
        Self { graph, index }
    }

    /// Returns the ID of the graph this handle was issued by.
    pub fn graph(&self) -> GraphId {
        self.graph
    }

    /// Returns the arena index of the node.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}:n{}", self.graph, self.index)
    }
}

/// Attributes of a layer before it is placed in a graph.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerSpec {
    pub name: String,
    pub kind: LayerKind,
    pub has_kernel: bool,
    pub activation: Option<ActivationKind>,
}

impl LayerSpec {
    /// Creates a layer of the given kind without kernel or activation.
    pub fn new(name: impl Into<String>, kind: LayerKind) -> Self {
        Self {
            name: name.into(),
            kind,
            has_kernel: false,
            activation: None,
        }
    }

    /// Marks the layer as owning a learnable kernel.
    pub fn with_kernel(mut self) -> Self {
        self.has_kernel = true;
        self
    }

    /// Attaches an activation function.
    pub fn with_activation(mut self, activation: ActivationKind) -> Self {
        self.activation = Some(activation);
        self
    }

    pub fn input(name: impl Into<String>) -> Self {
        Self::new(name, LayerKind::Input)
    }

    /// Dense layer with kernel and activation.
    pub fn dense(name: impl Into<String>, activation: ActivationKind) -> Self {
        Self::new(name, LayerKind::Dense)
            .with_kernel()
            .with_activation(activation)
    }

    /// Convolution with kernel and activation.
    pub fn conv(name: impl Into<String>, conv: ConvKind, activation: ActivationKind) -> Self {
        Self::new(name, LayerKind::Convolutional(conv))
            .with_kernel()
            .with_activation(activation)
    }

    pub fn pooling(name: impl Into<String>, pooling: PoolingKind) -> Self {
        Self::new(name, LayerKind::Pooling(pooling))
    }

    pub fn pass_through(name: impl Into<String>, kind: PassThroughKind) -> Self {
        Self::new(name, LayerKind::PassThrough(kind))
    }

    /// Dedicated activation layer.
    pub fn activation(name: impl Into<String>, activation: ActivationKind) -> Self {
        Self::new(name, LayerKind::Activation(activation))
    }

    pub fn merge(name: impl Into<String>, merge: MergeKind) -> Self {
        Self::new(name, LayerKind::Merge(merge))
    }
}

/// A layer placed in a [`ComputationGraph`](super::ComputationGraph).
#[derive(Clone, Debug)]
pub struct Node {
    id: NodeId,
    name: String,
    kind: LayerKind,
    has_kernel: bool,
    activation: Option<ActivationKind>,
    producers: Vec<NodeId>,
    consumers: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(id: NodeId, spec: LayerSpec) -> Self {
        Self {
            id,
            name: spec.name,
            kind: spec.kind,
            has_kernel: spec.has_kernel,
            activation: spec.activation,
            producers: Vec::new(),
            consumers: Vec::new(),
        }
    }

    pub(crate) fn push_producer(&mut self, producer: NodeId) {
        self.producers.push(producer);
    }

    pub(crate) fn push_consumer(&mut self, consumer: NodeId) {
        if !self.consumers.contains(&consumer) {
            self.consumers.push(consumer);
        }
    }

    /// Moves the node and its edges to another graph ID.
    pub(crate) fn rebind(&mut self, graph: GraphId) {
        self.id = NodeId::new(graph, self.id.index);
        for id in self.producers.iter_mut().chain(self.consumers.iter_mut()) {
            *id = NodeId::new(graph, id.index);
        }
    }

    pub(crate) fn set_activation(&mut self, activation: Option<ActivationKind>) {
        self.activation = activation;
    }

    pub(crate) fn set_kind(&mut self, kind: LayerKind) {
        self.kind = kind;
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    /// Returns the producers in the order the layer consumes them.
    pub fn producers(&self) -> &[NodeId] {
        &self.producers
    }

    pub fn consumers(&self) -> &[NodeId] {
        &self.consumers
    }

    /// Returns the activation attached to the layer, if any.
    ///
    /// Dedicated activation layers report their function through
    /// [`Node::kind`] instead.
    pub fn activation(&self) -> Option<ActivationKind> {
        self.activation
    }

    pub fn has_kernel(&self) -> bool {
        self.has_kernel
    }

    pub fn is_input(&self) -> bool {
        self.kind.is_input()
    }

    pub fn is_pass_through(&self) -> bool {
        self.kind.is_pass_through()
    }

    pub fn is_convolutional(&self) -> bool {
        self.kind.is_convolutional()
    }

    pub fn is_pooling(&self) -> bool {
        self.kind.is_pooling()
    }

    pub fn is_average_pooling(&self) -> bool {
        self.kind.is_average_pooling()
    }

    pub fn is_max_pooling(&self) -> bool {
        self.kind.is_max_pooling()
    }

    pub fn is_dense(&self) -> bool {
        matches!(self.kind, LayerKind::Dense)
    }

    pub fn is_batch_normalization(&self) -> bool {
        matches!(self.kind, LayerKind::Normalization)
    }

    pub fn is_embedding(&self) -> bool {
        matches!(self.kind, LayerKind::Embedding)
    }

    pub fn is_merge(&self) -> bool {
        matches!(self.kind, LayerKind::Merge(_))
    }

    pub fn is_add(&self) -> bool {
        matches!(self.kind, LayerKind::Merge(MergeKind::Add))
    }

    /// Returns true for nested models used as a layer.
    pub fn is_network(&self) -> bool {
        matches!(self.kind, LayerKind::Network)
    }

    pub fn is_convnet_layer(&self) -> bool {
        self.kind.is_convnet_layer()
    }

    pub fn is_activation_search_safe(&self) -> bool {
        self.kind.is_activation_search_safe()
    }

    /// The activation this node applies, from either its attribute or its kind.
    fn effective_activation(&self) -> Option<ActivationKind> {
        match (self.activation, self.kind) {
            (Some(activation), _) => Some(activation),
            (None, LayerKind::Activation(activation)) => Some(activation),
            _ => None,
        }
    }

    /// Checks the node for activation semantics.
    ///
    /// With `None`, returns whether the node carries any activation at all
    /// (an attached function, or being an activation layer). With
    /// `Some(kind)`, returns whether that activation is exactly `kind`.
    pub fn is_activation(&self, kind: Option<ActivationKind>) -> bool {
        match kind {
            None => self.effective_activation().is_some(),
            Some(kind) => self.effective_activation() == Some(kind),
        }
    }

    /// Returns true if the node applies no activation, a linear one, or ReLU.
    pub fn only_pass_through_activation(&self) -> bool {
        self.effective_activation()
            .is_none_or(|activation| activation.is_pass_through())
    }
}
