//! The run-scoped context passed to every [`crate::Handler::execute`] call.

use tokio_util::sync::CancellationToken;
use weft_core::{NodeId, RunId, WorkflowId};

use crate::error::HandlerError;

/// A cancellation-bearing execution context (§6 "a cancellation-bearing
/// context carrying the run deadline").
///
/// `#[non_exhaustive]` so new fields (e.g. a logger or metrics hook) can be
/// added without breaking handler implementations outside this workspace.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct HandlerContext {
    run_id: RunId,
    workflow_id: WorkflowId,
    node_id: NodeId,
    cancellation: CancellationToken,
}

impl HandlerContext {
    /// Build a context for one node dispatch.
    #[must_use]
    pub fn new(
        run_id: RunId,
        workflow_id: WorkflowId,
        node_id: NodeId,
        cancellation: CancellationToken,
    ) -> Self {
        Self {
            run_id,
            workflow_id,
            node_id,
            cancellation,
        }
    }

    /// The run this dispatch belongs to.
    #[must_use]
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// The workflow this run was started from.
    #[must_use]
    pub fn workflow_id(&self) -> WorkflowId {
        self.workflow_id
    }

    /// The node being dispatched.
    #[must_use]
    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    /// The cancellation signal for this dispatch. Handlers that perform
    /// long-running work should poll this (or race it against their I/O)
    /// and return promptly once it fires (§5 "Cancellation semantics").
    #[must_use]
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Convenience check: returns [`HandlerError::Cancelled`] if this
    /// dispatch has been cancelled.
    pub fn check_cancelled(&self) -> Result<(), HandlerError> {
        if self.cancellation.is_cancelled() {
            return Err(HandlerError::Cancelled);
        }
        Ok(())
    }
}
