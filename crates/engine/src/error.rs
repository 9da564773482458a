//! Engine-level errors (§7), the taxonomy surfaced to callers of
//! [`crate::Engine`].

use weft_core::RunId;

/// Errors from the Run Manager (§7).
///
/// *HandlerError*, *Timeout*, *Transport*, and *PluginCrashed* are not
/// represented here — they are local to a node and recorded on its
/// [`weft_execution::NodeResult`] rather than surfaced through `Execute`
/// (§7 "errors are local to the node where they occur").
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Structural validation failed before any dispatch occurred (§4.2).
    #[error("invalid workflow: {0}")]
    InvalidWorkflow(#[from] weft_workflow::WorkflowError),

    /// A node's type failed to resolve against the registry (§4.2 step 2).
    #[error("invalid workflow: {0}")]
    UnresolvableNodeType(#[from] weft_registry::RegistryError),

    /// `Get`/`Cancel` was called with a run ID that does not exist.
    #[error("run not found: {0}")]
    RunNotFound(RunId),

    /// The store adapter failed in a way that could not be retried
    /// in-memory (§7 "Persistence").
    #[error(transparent)]
    Store(#[from] weft_store::StoreError),
}

impl EngineError {
    /// Returns `true` for the *InvalidWorkflow* error kind (§7), which the
    /// Run Manager surfaces synchronously without starting a run.
    #[must_use]
    pub fn is_invalid_workflow(&self) -> bool {
        matches!(
            self,
            Self::InvalidWorkflow(_) | Self::UnresolvableNodeType(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_workflow_classification() {
        let err: EngineError = weft_workflow::WorkflowError::CyclicGraph.into();
        assert!(err.is_invalid_workflow());
    }

    #[test]
    fn run_not_found_display() {
        let err = EngineError::RunNotFound(RunId::nil());
        assert!(err.to_string().starts_with("run not found"));
    }
}
