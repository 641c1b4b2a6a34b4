//! Graph-related error types.

use thiserror::Error;

use crate::graph::NodeId;

/// Violations of the well-formedness invariant of a computation graph.
///
/// These indicate a bug in whatever constructed the graph, never a
/// transient condition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    #[error("Node {node} does not belong to graph {graph}")]
    UnknownNode { node: NodeId, graph: usize },

    #[error("Node {consumer} references missing producer {producer}")]
    DanglingProducer { consumer: NodeId, producer: NodeId },

    #[error("Graph contains a cycle through nodes {nodes:?}")]
    Cycle { nodes: Vec<String> },
}

/// Errors that can occur while building or querying a computation graph.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Graph integrity violated: {0}")]
    Integrity(#[from] IntegrityError),

    #[error("Operation not implemented: {operation}")]
    Unsupported { operation: &'static str },

    #[error("Invalid model description: {message}")]
    Description { message: String },

    #[error("Invalid fixture pattern: {0}")]
    Pattern(#[from] globset::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{analyzer} model check failed ({check}) at layers {nodes:?}")]
    ModelCheck {
        analyzer: String,
        check: String,
        nodes: Vec<String>,
    },
}

impl GraphError {
    /// Returns true if this error signals a malformed graph.
    pub fn is_integrity(&self) -> bool {
        matches!(self, GraphError::Integrity(_))
    }
}
