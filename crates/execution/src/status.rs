//! Status enums for [`crate::Run`] and [`crate::NodeResult`] (§3).

use serde::{Deserialize, Serialize};

/// The overall status of one workflow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Created but not yet dispatched.
    Pending,
    /// At least one node has been dispatched.
    Running,
    /// Every node reached `Succeeded` or policy-permitted `Skipped`.
    Succeeded,
    /// At least one node `Failed` under a policy that made the run fail (§7).
    Failed,
    /// Cooperative cancellation ran to completion (§5).
    Cancelled,
}

impl RunStatus {
    /// Returns `true` if the run has reached a final state.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Cancelled)
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Running => write!(f, "running"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// The status of one node within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    /// Not yet dispatched; waiting on predecessors or the worker pool.
    Pending,
    /// Dispatched; the handler is executing.
    Running,
    /// The handler returned successfully within its deadline.
    Succeeded,
    /// The handler returned an error, or its deadline expired.
    Failed,
    /// Never dispatched because an upstream failure or cancellation made
    /// dispatch moot (§4.4).
    Skipped,
    /// Was `Running` when cancellation fired and did not return within
    /// `GraceTimeout` (§5).
    Cancelled,
}

impl NodeStatus {
    /// Returns `true` if the node result is final and write-once (§3).
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending | Self::Running)
    }

    /// Returns `true` if this status counts as a successful contribution of
    /// outputs to dependents (§4.6 "Predecessors whose status is not
    /// Succeeded contribute no outputs").
    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

impl std::fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Running => write!(f, "running"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
            Self::Skipped => write!(f, "skipped"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_terminal_states() {
        assert!(RunStatus::Succeeded.is_terminal());
        assert!(RunStatus::Failed.is_terminal());
        assert!(RunStatus::Cancelled.is_terminal());
        assert!(!RunStatus::Pending.is_terminal());
        assert!(!RunStatus::Running.is_terminal());
    }

    #[test]
    fn node_terminal_states() {
        assert!(NodeStatus::Succeeded.is_terminal());
        assert!(NodeStatus::Failed.is_terminal());
        assert!(NodeStatus::Skipped.is_terminal());
        assert!(NodeStatus::Cancelled.is_terminal());
        assert!(!NodeStatus::Pending.is_terminal());
        assert!(!NodeStatus::Running.is_terminal());
    }

    #[test]
    fn node_is_success_only_for_succeeded() {
        assert!(NodeStatus::Succeeded.is_success());
        assert!(!NodeStatus::Skipped.is_success());
        assert!(!NodeStatus::Failed.is_success());
    }

    #[test]
    fn display_formatting() {
        assert_eq!(RunStatus::Succeeded.to_string(), "succeeded");
        assert_eq!(NodeStatus::Skipped.to_string(), "skipped");
    }

    #[test]
    fn serde_rename_snake_case() {
        let json = serde_json::to_string(&RunStatus::Succeeded).unwrap();
        assert_eq!(json, "\"succeeded\"");
        let json = serde_json::to_string(&NodeStatus::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
    }

    #[test]
    fn serde_roundtrip() {
        for status in [
            NodeStatus::Pending,
            NodeStatus::Running,
            NodeStatus::Succeeded,
            NodeStatus::Failed,
            NodeStatus::Skipped,
            NodeStatus::Cancelled,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            let back: NodeStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(status, back);
        }
    }
}
