//! The coordinator's in-flight view of one run's [`weft_execution::NodeResult`]s.
//!
//! Distinct from the persisted [`weft_execution::Run`] record: this is the
//! working copy the Run Manager mutates turn by turn before writing through
//! to the store adapter (§4.5, §4.8).

use std::collections::HashMap;

use weft_core::{NodeId, PortMap};
use weft_execution::{NodeResult, NodeStatus};

/// In-memory scratchpad of node results for one run, consulted by the Input
/// Assembler (§4.6) and the Dispatch Pool coordinator (§4.5).
#[derive(Debug, Default)]
pub struct RunState {
    results: HashMap<NodeId, NodeResult>,
}

impl RunState {
    /// Record (or overwrite) a node's result.
    pub fn record(&mut self, result: NodeResult) {
        self.results.insert(result.node_id.clone(), result);
    }

    /// The node's current result, if any has been recorded.
    #[must_use]
    pub fn get(&self, node_id: &NodeId) -> Option<&NodeResult> {
        self.results.get(node_id)
    }

    /// The output map of `node_id`, if it has reached `Succeeded`.
    ///
    /// Predecessors that failed, were skipped, or haven't run yet
    /// contribute no outputs (§4.6 "their absence is not an error").
    #[must_use]
    pub fn succeeded_output(&self, node_id: &NodeId) -> Option<&PortMap> {
        let result = self.results.get(node_id)?;
        if result.status != NodeStatus::Succeeded {
            return None;
        }
        result.output.as_ref()
    }

    /// All recorded results, for final Run assembly.
    #[must_use]
    pub fn into_results(self) -> HashMap<NodeId, NodeResult> {
        self.results
    }

    /// Borrow the recorded results, e.g. to compute the run's final status.
    #[must_use]
    pub fn results(&self) -> &HashMap<NodeId, NodeResult> {
        &self.results
    }

    /// Number of results recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether no results have been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
