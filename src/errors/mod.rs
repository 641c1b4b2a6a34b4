//! Error types for graph classification and the tensor shim.

mod graph_error;
mod shim_error;

pub use graph_error::{GraphError, IntegrityError};
pub use shim_error::ShimError;
