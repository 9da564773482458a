//! [`Run`] and [`NodeResult`]: the two persistent records of one execution (§3).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use weft_core::{NodeId, PortMap, RunId, WorkflowId};

use crate::error::ExecutionError;
use crate::status::{NodeStatus, RunStatus};
use crate::transition::{validate_node_transition, validate_run_transition};

/// A node's reason for failing, distinct from its handler error message (§7).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The node's own handler returned an error within its deadline.
    HandlerError,
    /// The node or the whole run exceeded its deadline.
    Timeout,
    /// The node was never dispatched because an upstream node failed and
    /// the run's error policy is `stop`.
    UpstreamFailed,
}

/// The terminal outcome of one node's dispatch within one [`Run`] (§3).
///
/// At most one `NodeResult` exists per `(Run, Node)` pair, and once it
/// reaches a terminal [`NodeStatus`] it is write-once: [`NodeResult::transition_to`]
/// rejects any further transition attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeResult {
    /// The node this result belongs to.
    pub node_id: NodeId,
    /// Current status.
    pub status: NodeStatus,
    /// When the node was dispatched to a worker.
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    /// When the node reached a terminal status.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// The handler's output map, present only on `Succeeded`.
    #[serde(default)]
    pub output: Option<PortMap>,
    /// The failure reason, present only on `Failed` or `Cancelled`.
    #[serde(default)]
    pub error_kind: Option<ErrorKind>,
    /// The failure message, present only on `Failed` or `Cancelled`.
    #[serde(default)]
    pub error_message: Option<String>,
}

impl NodeResult {
    /// Create a fresh, `Pending` result for `node_id`.
    #[must_use]
    pub fn new(node_id: NodeId) -> Self {
        Self {
            node_id,
            status: NodeStatus::Pending,
            started_at: None,
            completed_at: None,
            output: None,
            error_kind: None,
            error_message: None,
        }
    }

    /// Duration between dispatch and completion, if both timestamps are set.
    #[must_use]
    pub fn duration(&self) -> Option<chrono::Duration> {
        Some(self.completed_at? - self.started_at?)
    }

    /// Move the node to `Running`, recording the dispatch timestamp.
    pub fn start(&mut self) -> Result<(), ExecutionError> {
        validate_node_transition(self.status, NodeStatus::Running)?;
        self.status = NodeStatus::Running;
        self.started_at = Some(Utc::now());
        Ok(())
    }

    /// Move the node to `Succeeded`, recording `output`.
    pub fn succeed(&mut self, output: PortMap) -> Result<(), ExecutionError> {
        self.transition_to(NodeStatus::Succeeded)?;
        self.output = Some(output);
        Ok(())
    }

    /// Move the node to `Failed`, recording the failure reason.
    pub fn fail(&mut self, kind: ErrorKind, message: impl Into<String>) -> Result<(), ExecutionError> {
        self.transition_to(NodeStatus::Failed)?;
        self.error_kind = Some(kind);
        self.error_message = Some(message.into());
        Ok(())
    }

    /// Move the node to `Skipped` directly from `Pending` (§4.4).
    pub fn skip(&mut self, reason: impl Into<String>) -> Result<(), ExecutionError> {
        self.transition_to(NodeStatus::Skipped)?;
        self.error_kind = Some(ErrorKind::UpstreamFailed);
        self.error_message = Some(reason.into());
        Ok(())
    }

    /// Move an in-flight node to `Cancelled` after the grace period lapses (§5).
    pub fn cancel(&mut self, message: impl Into<String>) -> Result<(), ExecutionError> {
        self.transition_to(NodeStatus::Cancelled)?;
        self.error_message = Some(message.into());
        Ok(())
    }

    /// Validate and apply a raw status transition, stamping `completed_at`
    /// when the destination is terminal.
    fn transition_to(&mut self, to: NodeStatus) -> Result<(), ExecutionError> {
        if self.status.is_terminal() {
            return Err(ExecutionError::AlreadyTerminal(self.node_id.clone()));
        }
        validate_node_transition(self.status, to)?;
        self.status = to;
        if to.is_terminal() {
            self.completed_at = Some(Utc::now());
        }
        Ok(())
    }
}

/// One execution of a workflow: identity, status, and every [`NodeResult`]
/// produced so far (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    /// Fresh ID allocated for this dispatch.
    pub run_id: RunId,
    /// The workflow being executed.
    pub workflow_id: WorkflowId,
    /// Current run status.
    pub status: RunStatus,
    /// When the run was created, in status `Pending`.
    pub created_at: DateTime<Utc>,
    /// When the run transitioned to `Running`.
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    /// When the run reached a terminal status.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// Merge of trigger parameters and engine-supplied context, scoped to
    /// this run (§3 "run-scoped variables").
    #[serde(default)]
    pub variables: PortMap,
    /// Every `NodeResult` produced so far, keyed by node ID.
    #[serde(default)]
    pub node_results: HashMap<NodeId, NodeResult>,
}

impl Run {
    /// Create a fresh run in status `Pending` for `workflow_id`.
    #[must_use]
    pub fn new(run_id: RunId, workflow_id: WorkflowId, variables: PortMap) -> Self {
        Self {
            run_id,
            workflow_id,
            status: RunStatus::Pending,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            variables,
            node_results: HashMap::new(),
        }
    }

    /// Move the run to `to`, stamping timestamps as appropriate.
    pub fn transition_to(&mut self, to: RunStatus) -> Result<(), ExecutionError> {
        validate_run_transition(self.status, to)?;
        self.status = to;
        if to == RunStatus::Running && self.started_at.is_none() {
            self.started_at = Some(Utc::now());
        }
        if to.is_terminal() {
            self.completed_at = Some(Utc::now());
        }
        Ok(())
    }

    /// Insert or overwrite a node's result (coordinator-owned, §4.5).
    pub fn set_node_result(&mut self, result: NodeResult) {
        self.node_results.insert(result.node_id.clone(), result);
    }

    /// Look up a node's result by ID.
    #[must_use]
    pub fn node_result(&self, node_id: &NodeId) -> Option<&NodeResult> {
        self.node_results.get(node_id)
    }

    /// Returns `true` if every known node result is terminal.
    #[must_use]
    pub fn all_nodes_terminal(&self) -> bool {
        self.node_results.values().all(|r| r.status.is_terminal())
    }

    /// The first node result with status `Failed`, in insertion-unordered
    /// iteration (callers needing a deterministic "first" should track
    /// ordering themselves; the Run Manager surfaces this via its own
    /// completion-order bookkeeping, §6 "Run record").
    #[must_use]
    pub fn first_failed(&self) -> Option<&NodeResult> {
        self.node_results.values().find(|r| r.status == NodeStatus::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str) -> NodeId {
        NodeId::new(name)
    }

    #[test]
    fn new_run_is_pending() {
        let run = Run::new(RunId::v4(), WorkflowId::v4(), PortMap::new());
        assert_eq!(run.status, RunStatus::Pending);
        assert!(run.started_at.is_none());
        assert!(run.node_results.is_empty());
    }

    #[test]
    fn run_transition_to_running_stamps_started_at() {
        let mut run = Run::new(RunId::v4(), WorkflowId::v4(), PortMap::new());
        run.transition_to(RunStatus::Running).unwrap();
        assert!(run.started_at.is_some());
        assert!(run.completed_at.is_none());
    }

    #[test]
    fn run_transition_to_terminal_stamps_completed_at() {
        let mut run = Run::new(RunId::v4(), WorkflowId::v4(), PortMap::new());
        run.transition_to(RunStatus::Running).unwrap();
        run.transition_to(RunStatus::Succeeded).unwrap();
        assert!(run.completed_at.is_some());
    }

    #[test]
    fn run_invalid_transition_rejected() {
        let mut run = Run::new(RunId::v4(), WorkflowId::v4(), PortMap::new());
        let err = run.transition_to(RunStatus::Succeeded).unwrap_err();
        assert!(matches!(err, ExecutionError::InvalidRunTransition { .. }));
    }

    #[test]
    fn node_result_lifecycle_success() {
        let mut result = NodeResult::new(node("fetch"));
        result.start().unwrap();
        assert_eq!(result.status, NodeStatus::Running);
        let mut output = PortMap::new();
        output.insert("n".into(), 1.into());
        result.succeed(output.clone()).unwrap();
        assert_eq!(result.status, NodeStatus::Succeeded);
        assert_eq!(result.output, Some(output));
        assert!(result.completed_at.is_some());
    }

    #[test]
    fn node_result_lifecycle_failure() {
        let mut result = NodeResult::new(node("fetch"));
        result.start().unwrap();
        result.fail(ErrorKind::HandlerError, "connection refused").unwrap();
        assert_eq!(result.status, NodeStatus::Failed);
        assert_eq!(result.error_message.as_deref(), Some("connection refused"));
    }

    #[test]
    fn node_result_skip_from_pending() {
        let mut result = NodeResult::new(node("c"));
        result.skip("upstream-failed").unwrap();
        assert_eq!(result.status, NodeStatus::Skipped);
        assert_eq!(result.error_kind, Some(ErrorKind::UpstreamFailed));
    }

    #[test]
    fn node_result_cancel_from_running() {
        let mut result = NodeResult::new(node("sleeper"));
        result.start().unwrap();
        result.cancel("grace period elapsed").unwrap();
        assert_eq!(result.status, NodeStatus::Cancelled);
    }

    #[test]
    fn node_result_is_write_once_once_terminal() {
        let mut result = NodeResult::new(node("fetch"));
        result.start().unwrap();
        result.succeed(PortMap::new()).unwrap();
        let err = result.fail(ErrorKind::HandlerError, "too late").unwrap_err();
        assert!(matches!(err, ExecutionError::AlreadyTerminal(_)));
    }

    #[test]
    fn duration_requires_both_timestamps() {
        let mut result = NodeResult::new(node("fetch"));
        assert!(result.duration().is_none());
        result.start().unwrap();
        assert!(result.duration().is_none());
        result.succeed(PortMap::new()).unwrap();
        assert!(result.duration().unwrap() >= chrono::Duration::zero());
    }

    #[test]
    fn run_all_nodes_terminal_and_first_failed() {
        let mut run = Run::new(RunId::v4(), WorkflowId::v4(), PortMap::new());
        let mut a = NodeResult::new(node("a"));
        a.start().unwrap();
        a.succeed(PortMap::new()).unwrap();
        run.set_node_result(a);
        assert!(run.all_nodes_terminal());
        let mut b = NodeResult::new(node("b"));
        b.start().unwrap();
        b.fail(ErrorKind::HandlerError, "boom").unwrap();
        run.set_node_result(b);
        assert!(run.all_nodes_terminal());
        assert_eq!(run.first_failed().unwrap().node_id, node("b"));
    }

    #[test]
    fn serde_roundtrip() {
        let mut run = Run::new(RunId::v4(), WorkflowId::v4(), PortMap::new());
        let mut result = NodeResult::new(node("a"));
        result.start().unwrap();
        result.succeed(PortMap::new()).unwrap();
        run.set_node_result(result);
        let json = serde_json::to_string(&run).unwrap();
        let back: Run = serde_json::from_str(&json).unwrap();
        assert_eq!(back.run_id, run.run_id);
        assert_eq!(back.node_results.len(), 1);
    }
}
