//! A directed edge between two nodes (§3 "Edge").

use weft_core::NodeId;

/// "Target may consume source's output."
///
/// Multiple edges between the same pair of nodes are allowed as long as
/// their named ports differ — `Edge` derives `PartialEq` so duplicate-port
/// edges can be rejected by callers that care, but this crate does not
/// enforce that itself (the design leaves it to tooling, §4.2 rationale).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    from: NodeId,
    to: NodeId,
    source_output: Option<String>,
    target_input: Option<String>,
}

impl Edge {
    /// An edge with no named ports — the default output/input binding
    /// applies (§4.6 step 3, default output name `output`).
    #[must_use]
    pub fn new(from: NodeId, to: NodeId) -> Self {
        Self {
            from,
            to,
            source_output: None,
            target_input: None,
        }
    }

    /// Bind a specific `(sourcePort, targetInput)` pair (§4.6 step 4).
    #[must_use]
    pub fn with_ports(mut self, source_output: impl Into<String>, target_input: impl Into<String>) -> Self {
        self.source_output = Some(source_output.into());
        self.target_input = Some(target_input.into());
        self
    }

    /// The upstream node.
    #[must_use]
    pub fn from(&self) -> &NodeId {
        &self.from
    }

    /// The downstream node.
    #[must_use]
    pub fn to(&self) -> &NodeId {
        &self.to
    }

    /// The named output port on the source, if bound explicitly.
    #[must_use]
    pub fn source_output(&self) -> Option<&str> {
        self.source_output.as_deref()
    }

    /// The named input port on the target, if bound explicitly.
    #[must_use]
    pub fn target_input(&self) -> Option<&str> {
        self.target_input.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_edge_has_no_named_ports() {
        let edge = Edge::new(NodeId::new("a"), NodeId::new("b"));
        assert_eq!(edge.source_output(), None);
        assert_eq!(edge.target_input(), None);
    }

    #[test]
    fn with_ports_binds_both_names() {
        let edge = Edge::new(NodeId::new("a"), NodeId::new("b")).with_ports("status", "http_status");
        assert_eq!(edge.source_output(), Some("status"));
        assert_eq!(edge.target_input(), Some("http_status"));
    }
}
