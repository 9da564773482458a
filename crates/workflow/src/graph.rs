//! Structural validation and the DAG built from a [`WorkflowDefinition`].

use std::collections::HashMap;

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use weft_core::NodeId;

use crate::definition::WorkflowDefinition;
use crate::error::WorkflowError;

/// The validated DAG underlying one [`WorkflowDefinition`] (§4.2, §4.4).
///
/// Predecessor and successor sets are the union of each node's declared
/// `dependencies` and the workflow's `edges`, per §4.2's rationale and §9's
/// "mixed edge/dependency expression" note. Predecessor order — the order
/// the Input Assembler merges outputs in (§4.6) — is dependency-list order
/// first, then any edge-only predecessors in edge-declaration order.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    order: Vec<NodeId>,
    predecessors: HashMap<NodeId, Vec<NodeId>>,
    successors: HashMap<NodeId, Vec<NodeId>>,
}

impl DependencyGraph {
    /// Validate a workflow's structure and build its dependency graph.
    ///
    /// Checks, in order: every node ID is unique (§4.2 implied by "every
    /// edge endpoint must reference an existing node"), every edge and
    /// declared dependency references a node that exists, and the resulting
    /// graph is acyclic (Kahn-style reduction via [`petgraph::algo::toposort`]).
    pub fn build(workflow: &WorkflowDefinition) -> Result<Self, WorkflowError> {
        if workflow.nodes().is_empty() {
            return Err(WorkflowError::Empty);
        }

        let mut index_of: HashMap<NodeId, NodeIndex> = HashMap::new();
        let mut graph: DiGraph<NodeId, ()> = DiGraph::new();
        let mut predecessors: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        let mut successors: HashMap<NodeId, Vec<NodeId>> = HashMap::new();

        for node in workflow.nodes() {
            if index_of.contains_key(node.id()) {
                return Err(WorkflowError::DuplicateNode(node.id().clone()));
            }
            let idx = graph.add_node(node.id().clone());
            index_of.insert(node.id().clone(), idx);
            predecessors.insert(node.id().clone(), Vec::new());
            successors.insert(node.id().clone(), Vec::new());
        }

        let mut link = |graph: &mut DiGraph<NodeId, ()>,
                        predecessors: &mut HashMap<NodeId, Vec<NodeId>>,
                        successors: &mut HashMap<NodeId, Vec<NodeId>>,
                        from: &NodeId,
                        to: &NodeId|
         -> Result<(), WorkflowError> {
            let from_idx = *index_of
                .get(from)
                .ok_or_else(|| WorkflowError::UnknownNode(from.clone()))?;
            let to_idx = *index_of
                .get(to)
                .ok_or_else(|| WorkflowError::UnknownNode(to.clone()))?;
            graph.update_edge(from_idx, to_idx, ());

            let preds = predecessors.get_mut(to).expect("node indexed above");
            if !preds.contains(from) {
                preds.push(from.clone());
            }
            let succs = successors.get_mut(from).expect("node indexed above");
            if !succs.contains(to) {
                succs.push(to.clone());
            }
            Ok(())
        };

        for node in workflow.nodes() {
            for dep in node.dependencies() {
                link(&mut graph, &mut predecessors, &mut successors, dep, node.id())?;
            }
        }
        for edge in workflow.edges() {
            link(&mut graph, &mut predecessors, &mut successors, edge.from(), edge.to())?;
        }

        if toposort(&graph, None).is_err() {
            return Err(WorkflowError::CyclicGraph);
        }

        let order = workflow.nodes().iter().map(|n| n.id().clone()).collect();

        Ok(Self {
            order,
            predecessors,
            successors,
        })
    }

    /// Every node ID, in workflow declaration order.
    #[must_use]
    pub fn node_ids(&self) -> &[NodeId] {
        &self.order
    }

    /// Number of nodes in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.order.len()
    }

    /// Whether a node ID exists in this graph.
    #[must_use]
    pub fn contains(&self, id: &NodeId) -> bool {
        self.predecessors.contains_key(id)
    }

    /// Effective predecessors of `id`, in Input Assembler merge order.
    #[must_use]
    pub fn predecessors(&self, id: &NodeId) -> &[NodeId] {
        self.predecessors.get(id).map_or(&[], Vec::as_slice)
    }

    /// Effective successors of `id` (reverse index for scheduler fan-out).
    #[must_use]
    pub fn successors(&self, id: &NodeId) -> &[NodeId] {
        self.successors.get(id).map_or(&[], Vec::as_slice)
    }

    /// Count of unsatisfied predecessors at the start of a run: the
    /// Scheduler's initial `predCount[n]` (§4.4).
    #[must_use]
    pub fn predecessor_count(&self, id: &NodeId) -> usize {
        self.predecessors(id).len()
    }
}
