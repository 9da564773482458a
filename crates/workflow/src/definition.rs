//! The top-level workflow definition (§3 "Workflow (definition)").

use weft_core::WorkflowId;

use crate::edge::Edge;
use crate::node::NodeDefinition;
use crate::settings::WorkflowSettings;

/// A versioned, named DAG of nodes and edges plus its run settings.
///
/// Read-only for the lifetime of any `Run` built from it (§3 Ownership) —
/// nothing in this crate or `weft-engine` ever mutates a `WorkflowDefinition`
/// in place; a new version is a new value.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowDefinition {
    id: WorkflowId,
    version: semver::Version,
    name: String,
    nodes: Vec<NodeDefinition>,
    edges: Vec<Edge>,
    settings: WorkflowSettings,
}

impl WorkflowDefinition {
    /// Build a definition from its nodes and edges, with default settings.
    #[must_use]
    pub fn new(
        id: WorkflowId,
        version: semver::Version,
        name: impl Into<String>,
        nodes: Vec<NodeDefinition>,
        edges: Vec<Edge>,
    ) -> Self {
        Self {
            id,
            version,
            name: name.into(),
            nodes,
            edges,
            settings: WorkflowSettings::default(),
        }
    }

    /// Override the default settings.
    #[must_use]
    pub fn with_settings(mut self, settings: WorkflowSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Stable identity of this workflow, independent of `version`.
    #[must_use]
    pub fn id(&self) -> WorkflowId {
        self.id
    }

    /// The version of this particular definition.
    #[must_use]
    pub fn version(&self) -> &semver::Version {
        &self.version
    }

    /// The workflow's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All nodes, in declaration order.
    #[must_use]
    pub fn nodes(&self) -> &[NodeDefinition] {
        &self.nodes
    }

    /// All edges, in declaration order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Run settings (parallelism, timeout, error policy).
    #[must_use]
    pub fn settings(&self) -> &WorkflowSettings {
        &self.settings
    }
}
