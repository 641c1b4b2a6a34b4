//! ComputationGraph - the frozen, classified layer graph.
//!
//! Nodes live in an arena and point at each other through [`NodeId`]s.
//! A graph is created once by [`GraphBuilder`](super::GraphBuilder) and is
//! read-only afterwards, so every query here is a pure function of it.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::{GraphError, IntegrityError};
use crate::layers::{ActivationKind, LayerKind};

use super::node::{Node, NodeId};

/// Global counter for unique graph IDs.
static GRAPH_ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Unique identifier for a ComputationGraph.
pub type GraphId = usize;

pub(crate) fn next_graph_id() -> GraphId {
    GRAPH_ID_COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// A directed acyclic graph of classified layers.
#[derive(Clone, Debug)]
pub struct ComputationGraph {
    id: GraphId,
    nodes: Vec<Node>,
    topological_order: Vec<NodeId>,
}

impl ComputationGraph {
    /// Assembles a graph from already validated parts.
    pub(crate) fn from_parts(id: GraphId, nodes: Vec<Node>, topological_order: Vec<NodeId>) -> Self {
        Self {
            id,
            nodes,
            topological_order,
        }
    }

    /// Returns the unique ID of this graph.
    pub fn id(&self) -> GraphId {
        self.id
    }

    /// Returns the number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over all nodes in arena order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Returns the node IDs in a producers-before-consumers order.
    pub fn topological_order(&self) -> &[NodeId] {
        &self.topological_order
    }

    /// Looks up a node, rejecting handles issued by other graphs.
    pub fn node(&self, id: NodeId) -> Result<&Node, GraphError> {
        if id.graph() != self.id {
            return Err(IntegrityError::UnknownNode {
                node: id,
                graph: self.id,
            }
            .into());
        }
        self.nodes.get(id.index()).ok_or_else(|| {
            IntegrityError::UnknownNode {
                node: id,
                graph: self.id,
            }
            .into()
        })
    }

    /// Returns the ID of the first node with the given name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().find(|n| n.name() == name).map(Node::id)
    }

    /// Returns the declared input nodes.
    pub fn inputs(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.is_input())
            .map(Node::id)
            .collect()
    }

    /// Returns the nodes nothing consumes.
    pub fn outputs(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.consumers().is_empty())
            .map(Node::id)
            .collect()
    }

    /// Returns the distinct immediate producers of a node.
    pub fn producers_of(&self, id: NodeId) -> Result<BTreeSet<NodeId>, GraphError> {
        Ok(self.node(id)?.producers().iter().copied().collect())
    }

    /// Returns the distinct immediate consumers of a node.
    pub fn consumers_of(&self, id: NodeId) -> Result<BTreeSet<NodeId>, GraphError> {
        Ok(self.node(id)?.consumers().iter().copied().collect())
    }

    /// Returns the classification tag of a node.
    pub fn classify(&self, id: NodeId) -> Result<LayerKind, GraphError> {
        Ok(self.node(id)?.kind())
    }

    /// Position of a layer counted from the inputs.
    ///
    /// Not implemented; always returns [`GraphError::Unsupported`].
    pub fn layer_index_of(&self, _id: NodeId) -> Result<usize, GraphError> {
        Err(GraphError::Unsupported {
            operation: "layer_index_of",
        })
    }

    /// Returns a copy of the graph with the output softmax removed.
    ///
    /// Output nodes with an attached softmax get a linear activation instead,
    /// and trailing softmax layers become linear activation layers. The copy
    /// has its own graph ID; look nodes up again by name.
    pub fn without_softmax(&self) -> ComputationGraph {
        let id = next_graph_id();
        let mut nodes = self.nodes.clone();
        let mut stripped = 0;

        for node in nodes.iter_mut() {
            node.rebind(id);
            if !node.consumers().is_empty() {
                continue;
            }
            if node.activation() == Some(ActivationKind::Softmax) {
                node.set_activation(Some(ActivationKind::Linear));
                stripped += 1;
            }
            if node.kind() == LayerKind::Activation(ActivationKind::Softmax) {
                node.set_kind(LayerKind::Activation(ActivationKind::Linear));
                stripped += 1;
            }
        }

        log::debug!(
            "Stripped {} softmax activation(s) from graph {} into graph {}",
            stripped,
            self.id,
            id
        );

        let topological_order = self
            .topological_order
            .iter()
            .map(|n| NodeId::new(id, n.index()))
            .collect();
        ComputationGraph::from_parts(id, nodes, topological_order)
    }
}
