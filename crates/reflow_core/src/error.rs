//! Reflow error types

use thiserror::Error;

use crate::node::NodeId;

/// Errors raised by reflow components
///
/// The reconciliation engine never surfaces these to its caller; it logs them
/// and degrades to a no-op for the affected nodes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReflowError {
    /// The surface has no node with this id
    #[error("Unknown node: {0:?}")]
    UnknownNode(NodeId),

    /// The animation driver refused a request
    #[error("Animation request rejected: {0}")]
    DriverRejected(String),

    /// Configuration could not be parsed or is invalid
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for reflow operations
pub type Result<T> = std::result::Result<T, ReflowError>;
