//! Workflow-level run settings (§3 Workflow "settings block", §6 config knobs).

use std::time::Duration;

/// How the Dependency Scheduler reacts to a failed node (§4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// On the first `Failed` node, skip every other still-remaining node.
    #[default]
    Stop,
    /// Skip only the transitive downstream cone of a failed node; let
    /// independent branches run to completion.
    Continue,
}

/// Per-workflow settings consulted by the Dispatch Pool and Scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSettings {
    parallelism: usize,
    timeout: Option<Duration>,
    error_policy: ErrorPolicy,
}

impl WorkflowSettings {
    /// Construct settings, clamping `parallelism` to a minimum of 1 per §4.5.
    #[must_use]
    pub fn new(parallelism: usize, timeout: Option<Duration>, error_policy: ErrorPolicy) -> Self {
        Self {
            parallelism: parallelism.max(1),
            timeout,
            error_policy,
        }
    }

    /// The upper bound on concurrently-`Running` nodes within one run.
    #[must_use]
    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    /// The workflow-level timeout, if any (nests with the per-node and
    /// caller-context deadlines, composing by minimum — §5).
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// The failure propagation policy.
    #[must_use]
    pub fn error_policy(&self) -> ErrorPolicy {
        self.error_policy
    }
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self::new(5, None, ErrorPolicy::default())
    }
}
