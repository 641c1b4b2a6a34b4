//! Input-reachability walk.
//!
//! A node is input reachable when every producer it (transitively) reads
//! from is a declared input. Flatten, permute and reshape layers do not
//! change what the data means, so the walk can look through them to the
//! layers that feed them.

use std::collections::{BTreeSet, HashSet, VecDeque};

use crate::config::ReachabilityConfig;
use crate::errors::GraphError;

use super::core::ComputationGraph;
use super::node::NodeId;

impl ComputationGraph {
    /// Returns the nodes the walk from `id` settles on.
    ///
    /// Starts from the producers of `id` and, when seeing through, replaces
    /// every pass-through node by its own producers until none is left. A
    /// pass-through node without producers cannot be expanded and stays in
    /// the result.
    pub fn input_origins(
        &self,
        id: NodeId,
        see_through_pass_through: bool,
    ) -> Result<BTreeSet<NodeId>, GraphError> {
        self.walk_origins(id, see_through_pass_through, false)
    }

    fn walk_origins(
        &self,
        id: NodeId,
        see_through_pass_through: bool,
        verbose: bool,
    ) -> Result<BTreeSet<NodeId>, GraphError> {
        let node = self.node(id)?;

        let mut settled = BTreeSet::new();
        let mut expanded = HashSet::new();
        let mut frontier: VecDeque<NodeId> = node.producers().iter().copied().collect();

        while let Some(current) = frontier.pop_front() {
            let producer = self.node(current)?;
            let expandable = see_through_pass_through
                && producer.is_pass_through()
                && !producer.producers().is_empty();

            if !expandable {
                settled.insert(current);
                continue;
            }
            if !expanded.insert(current) {
                continue;
            }
            if verbose {
                log::trace!(
                    "Seeing through '{}' ({} producers)",
                    producer.name(),
                    producer.producers().len()
                );
            }
            frontier.extend(producer.producers().iter().copied());
        }

        Ok(settled)
    }

    /// Checks whether the input lineage of `id` ends only at input nodes.
    ///
    /// An input node is reachable by definition. Any other node without
    /// producers is not, and neither is a node whose lineage runs into a
    /// pass-through chain with nothing feeding it.
    pub fn is_input_reachable(
        &self,
        id: NodeId,
        see_through_pass_through: bool,
    ) -> Result<bool, GraphError> {
        let config = ReachabilityConfig::new().see_through_pass_through(see_through_pass_through);
        self.is_input_reachable_with(id, &config)
    }

    /// Same as [`ComputationGraph::is_input_reachable`], driven by a config.
    pub fn is_input_reachable_with(
        &self,
        id: NodeId,
        config: &ReachabilityConfig,
    ) -> Result<bool, GraphError> {
        let node = self.node(id)?;
        if node.is_input() {
            return Ok(true);
        }

        let origins = self.walk_origins(id, config.see_through_pass_through, config.verbose)?;
        let mut reachable = !origins.is_empty();
        for origin in &origins {
            if !self.node(*origin)?.is_input() {
                reachable = false;
                break;
            }
        }

        if config.verbose {
            log::debug!(
                "Layer '{}': {} origin(s), input reachable = {}",
                node.name(),
                origins.len(),
                reachable
            );
        }
        Ok(reachable)
    }

    /// Returns every input-reachable node, in arena order.
    pub fn input_reachable_nodes(
        &self,
        config: &ReachabilityConfig,
    ) -> Result<Vec<NodeId>, GraphError> {
        let mut reachable = Vec::new();
        for node in self.nodes() {
            if self.is_input_reachable_with(node.id(), config)? {
                reachable.push(node.id());
            }
        }
        Ok(reachable)
    }
}
