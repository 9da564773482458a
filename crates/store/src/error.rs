//! Store Adapter error types (§4.8, §7).

use weft_core::{NodeId, RunId};

/// Errors from a [`crate::StoreAdapter`] implementation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    /// `UpdateRun`/`CreateNodeResult` referenced a run that does not exist.
    #[error("run not found: {0}")]
    RunNotFound(RunId),

    /// `ListNodeResults`/a node-scoped write referenced a node result that
    /// does not exist on the run.
    #[error("node result not found: run {run_id}, node {node_id}")]
    NodeResultNotFound {
        /// The run being queried.
        run_id: RunId,
        /// The node being queried.
        node_id: NodeId,
    },

    /// `CreateRun` was called with a run ID that already exists.
    #[error("run already exists: {0}")]
    RunAlreadyExists(RunId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_not_found_display() {
        let id = RunId::nil();
        let err = StoreError::RunNotFound(id);
        assert!(err.to_string().starts_with("run not found"));
    }

    #[test]
    fn node_result_not_found_display() {
        let err = StoreError::NodeResultNotFound {
            run_id: RunId::nil(),
            node_id: NodeId::new("fetch"),
        };
        assert!(err.to_string().contains("fetch"));
    }
}
