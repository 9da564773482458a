//! A single node within a workflow definition (§3 "Node (in a workflow)").

use weft_core::{NodeId, NodeTypeId, PortMap};

/// One computational step in a workflow.
///
/// `dependencies` is an explicit ordering hint, separate from (and unioned
/// with) the edges that reference this node as a target — see §4.2's "mixed
/// edge/dependency expression" note. It also fixes the merge order the Input
/// Assembler uses when overlaying predecessor outputs (§4.6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDefinition {
    id: NodeId,
    type_id: NodeTypeId,
    config: PortMap,
    dependencies: Vec<NodeId>,
}

impl NodeDefinition {
    /// Create a node with no static config and no explicit dependencies.
    #[must_use]
    pub fn new(id: NodeId, type_id: NodeTypeId) -> Self {
        Self {
            id,
            type_id,
            config: PortMap::new(),
            dependencies: Vec::new(),
        }
    }

    /// Attach static configuration, replacing any already set.
    #[must_use]
    pub fn with_config(mut self, config: PortMap) -> Self {
        self.config = config;
        self
    }

    /// Declare explicit predecessors, in the order the Input Assembler
    /// should merge their outputs.
    #[must_use]
    pub fn with_dependencies(mut self, dependencies: Vec<NodeId>) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// This node's ID, unique within its workflow.
    #[must_use]
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    /// The node type this node is an instance of.
    #[must_use]
    pub fn type_id(&self) -> &NodeTypeId {
        &self.type_id
    }

    /// Static configuration, owned by the handler's own schema.
    #[must_use]
    pub fn config(&self) -> &PortMap {
        &self.config
    }

    /// Explicitly declared predecessors (a subset, possibly empty, of the
    /// effective predecessor set once edges are unioned in).
    #[must_use]
    pub fn dependencies(&self) -> &[NodeId] {
        &self.dependencies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn type_id(s: &str) -> NodeTypeId {
        NodeTypeId::parse(s).unwrap()
    }

    #[test]
    fn new_node_has_empty_config_and_dependencies() {
        let node = NodeDefinition::new(NodeId::new("a"), type_id("http_request"));
        assert!(node.config().is_empty());
        assert!(node.dependencies().is_empty());
    }

    #[test]
    fn with_config_overrides() {
        let node = NodeDefinition::new(NodeId::new("a"), type_id("logger"))
            .with_config(json!({"message": "hi"}).as_object().unwrap().clone());
        assert_eq!(node.config().get("message").unwrap(), "hi");
    }

    #[test]
    fn with_dependencies_preserves_order() {
        let node = NodeDefinition::new(NodeId::new("c"), type_id("validator"))
            .with_dependencies(vec![NodeId::new("a"), NodeId::new("b")]);
        assert_eq!(
            node.dependencies(),
            &[NodeId::new("a"), NodeId::new("b")]
        );
    }
}
