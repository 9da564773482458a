//! Valid state-machine transitions for [`RunStatus`] and [`NodeStatus`] (§3, §5).

use crate::error::ExecutionError;
use crate::status::{NodeStatus, RunStatus};

/// Returns `true` if `from -> to` is a legal run-status transition.
#[must_use]
pub fn can_transition_run(from: RunStatus, to: RunStatus) -> bool {
    matches!(
        (from, to),
        (RunStatus::Pending, RunStatus::Running)
            | (RunStatus::Running, RunStatus::Succeeded)
            | (RunStatus::Running, RunStatus::Failed)
            | (RunStatus::Running, RunStatus::Cancelled)
    )
}

/// Validate a run-status transition, returning an error if illegal.
pub fn validate_run_transition(from: RunStatus, to: RunStatus) -> Result<(), ExecutionError> {
    if can_transition_run(from, to) {
        Ok(())
    } else {
        Err(ExecutionError::InvalidRunTransition { from, to })
    }
}

/// Returns `true` if `from -> to` is a legal node-status transition.
///
/// A node reaches `Skipped` straight from `Pending` — it is never dispatched
/// (§4.4 "the coordinator marks it Skipped without dispatch"). A node reaches
/// `Cancelled` only from `Running` — it was in flight when cancellation fired
/// and did not return within the grace period (§5).
#[must_use]
pub fn can_transition_node(from: NodeStatus, to: NodeStatus) -> bool {
    matches!(
        (from, to),
        (NodeStatus::Pending, NodeStatus::Running)
            | (NodeStatus::Pending, NodeStatus::Skipped)
            | (NodeStatus::Running, NodeStatus::Succeeded)
            | (NodeStatus::Running, NodeStatus::Failed)
            | (NodeStatus::Running, NodeStatus::Cancelled)
    )
}

/// Validate a node-status transition, returning an error if illegal.
pub fn validate_node_transition(from: NodeStatus, to: NodeStatus) -> Result<(), ExecutionError> {
    if can_transition_node(from, to) {
        Ok(())
    } else {
        Err(ExecutionError::InvalidNodeTransition { from, to })
    }
}
