//! Error types for tree mutations.

use crate::types::NodeId;
use thiserror::Error;

/// Reasons a proposed change to the mind map was rejected.
///
/// Every variant leaves the map untouched; the message is shown to the user
/// in the status bar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// A referenced node does not exist in the map
    #[error("Node {0} does not exist")]
    MissingNode(NodeId),

    /// A node cannot be connected to itself
    #[error("Node {0} cannot be connected to itself")]
    SelfLoop(NodeId),

    /// The target already has a parent; a node may only have one
    #[error("Node {child} already has a parent ({parent})")]
    AlreadyHasParent {
        /// Node that would receive a second parent
        child: NodeId,
        /// Its current parent
        parent: NodeId,
    },

    /// The connection would make a node its own ancestor
    #[error("Connecting {parent} to {child} would create a cycle")]
    WouldCreateCycle {
        /// Proposed parent
        parent: NodeId,
        /// Proposed child
        child: NodeId,
    },
}
