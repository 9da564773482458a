//! Execution error types (§7, the subset owned by this crate).

use thiserror::Error;
use weft_core::NodeId;

use crate::status::{NodeStatus, RunStatus};

/// Errors raised while tracking or transitioning [`crate::Run`] and
/// [`crate::NodeResult`] state.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// A run-status transition is not valid from the current status.
    #[error("invalid run transition from {from} to {to}")]
    InvalidRunTransition {
        /// Current run status.
        from: RunStatus,
        /// Attempted target run status.
        to: RunStatus,
    },

    /// A node-status transition is not valid from the current status.
    #[error("invalid node transition from {from} to {to}")]
    InvalidNodeTransition {
        /// Current node status.
        from: NodeStatus,
        /// Attempted target node status.
        to: NodeStatus,
    },

    /// A node result was requested for a node that is not part of the run.
    #[error("node not found in run: {0}")]
    NodeNotFound(NodeId),

    /// A [`crate::NodeResult`] that had already reached a terminal status was
    /// written to again (§3 "write-once once it reaches a terminal status").
    #[error("node result for {0} is already terminal")]
    AlreadyTerminal(NodeId),
}
