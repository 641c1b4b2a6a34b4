//! GraphBuilder - collects layers and edges, then validates them into a
//! [`ComputationGraph`].

use std::collections::VecDeque;

use crate::errors::{GraphError, IntegrityError};

use super::core::{ComputationGraph, GraphId, next_graph_id};
use super::node::{LayerSpec, Node, NodeId};

/// Builder for a [`ComputationGraph`].
///
/// Edges may be added in any order and may even form cycles; everything is
/// checked once in [`GraphBuilder::build`].
///
/// # Example
///
/// ```
/// use attrgraph::graph::{GraphBuilder, LayerSpec};
/// use attrgraph::layers::{ActivationKind, PassThroughKind};
///
/// let mut builder = GraphBuilder::new();
/// let x = builder.add_layer(LayerSpec::input("x"), &[]);
/// let flat = builder.add_layer(LayerSpec::pass_through("flat", PassThroughKind::Flatten), &[x]);
/// let out = builder.add_layer(LayerSpec::dense("out", ActivationKind::Relu), &[flat]);
/// let graph = builder.build().unwrap();
///
/// assert!(graph.is_input_reachable(out, true).unwrap());
/// ```
#[derive(Debug)]
pub struct GraphBuilder {
    id: GraphId,
    layers: Vec<LayerSpec>,
    edges: Vec<(NodeId, NodeId)>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            id: next_graph_id(),
            layers: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Adds a layer without edges, returning its handle.
    pub fn add(&mut self, spec: LayerSpec) -> NodeId {
        let id = NodeId::new(self.id, self.layers.len());
        self.layers.push(spec);
        id
    }

    /// Records that `consumer` reads the output of `producer`.
    ///
    /// Producers are kept in the order they are connected.
    pub fn connect(&mut self, consumer: NodeId, producer: NodeId) {
        self.edges.push((consumer, producer));
    }

    /// Adds a layer fed by the given producers.
    pub fn add_layer(&mut self, spec: LayerSpec, producers: &[NodeId]) -> NodeId {
        let id = self.add(spec);
        for producer in producers {
            self.connect(id, *producer);
        }
        id
    }

    fn owns(&self, id: NodeId) -> bool {
        id.graph() == self.id && id.index() < self.layers.len()
    }

    /// Validates the collected layers and freezes them into a graph.
    ///
    /// Fails with an integrity error on handles from other builders, on
    /// producers that do not exist, and on cycles.
    pub fn build(self) -> Result<ComputationGraph, GraphError> {
        for &(consumer, producer) in &self.edges {
            if !self.owns(consumer) {
                return Err(IntegrityError::UnknownNode {
                    node: consumer,
                    graph: self.id,
                }
                .into());
            }
            if !self.owns(producer) {
                return Err(IntegrityError::DanglingProducer { consumer, producer }.into());
            }
        }

        let id = self.id;
        let mut nodes: Vec<Node> = self
            .layers
            .into_iter()
            .enumerate()
            .map(|(index, spec)| Node::new(NodeId::new(id, index), spec))
            .collect();

        for &(consumer, producer) in &self.edges {
            nodes[consumer.index()].push_producer(producer);
            nodes[producer.index()].push_consumer(consumer);
        }

        let topological_order = topological_sort(&nodes)?;

        for node in nodes.iter() {
            if node.producers().is_empty() && !node.is_input() {
                log::warn!(
                    "Layer '{}' has no producers but is not an input; it is never input reachable",
                    node.name()
                );
            }
        }

        log::debug!(
            "Built graph {} with {} nodes and {} edges",
            id,
            nodes.len(),
            self.edges.len()
        );

        Ok(ComputationGraph::from_parts(id, nodes, topological_order))
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Orders the nodes producers-first, rejecting cycles.
fn topological_sort(nodes: &[Node]) -> Result<Vec<NodeId>, GraphError> {
    let mut pending: Vec<usize> = nodes.iter().map(|n| n.producers().len()).collect();
    let mut ready: VecDeque<usize> = pending
        .iter()
        .enumerate()
        .filter(|(_, count)| **count == 0)
        .map(|(index, _)| index)
        .collect();
    let mut order = Vec::with_capacity(nodes.len());

    while let Some(index) = ready.pop_front() {
        let node = &nodes[index];
        order.push(node.id());
        for consumer in node.consumers() {
            let edges = nodes[consumer.index()]
                .producers()
                .iter()
                .filter(|p| **p == node.id())
                .count();
            pending[consumer.index()] -= edges;
            if pending[consumer.index()] == 0 {
                ready.push_back(consumer.index());
            }
        }
    }

    if order.len() < nodes.len() {
        let cyclic: Vec<String> = nodes
            .iter()
            .zip(pending.iter())
            .filter(|(_, count)| **count > 0)
            .map(|(node, _)| node.name().to_string())
            .collect();
        return Err(IntegrityError::Cycle { nodes: cyclic }.into());
    }

    Ok(order)
}
