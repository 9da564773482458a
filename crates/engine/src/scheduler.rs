//! The Dependency Scheduler (§4.4): tracks which nodes are ready to dispatch
//! and propagates completion through the dependency graph.

use std::collections::{HashMap, HashSet, VecDeque};

use weft_core::NodeId;
use weft_execution::NodeStatus;
use weft_workflow::{DependencyGraph, ErrorPolicy};

/// Nodes that changed state as a side effect of [`Scheduler::complete`].
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SchedulerUpdate {
    /// Nodes whose last unresolved predecessor just succeeded.
    pub newly_ready: Vec<NodeId>,
    /// Nodes that will never be dispatched because an upstream failure (or
    /// a run-level stop) made dispatch moot (§4.4).
    pub newly_skipped: Vec<NodeId>,
}

/// Tracks `predCount`/`ready`/`successors` for one run (§4.4).
///
/// Owned exclusively by the run's coordinator; workers never touch this
/// structure directly, only exchange completion messages with the
/// coordinator (§5 "Shared resource policy").
pub struct Scheduler {
    graph: DependencyGraph,
    pred_count: HashMap<NodeId, usize>,
    remaining: HashSet<NodeId>,
    ready: VecDeque<NodeId>,
    policy: ErrorPolicy,
    stopped: bool,
}

impl Scheduler {
    /// Build a scheduler over `graph`, seeding `ready` with every node that
    /// starts with zero unresolved predecessors.
    ///
    /// Takes ownership of `graph` rather than borrowing it, so the
    /// coordinator can hold its own copy for the Input Assembler without a
    /// lifetime tying the two together (`DependencyGraph` is cheap to
    /// clone).
    #[must_use]
    pub fn new(graph: DependencyGraph, policy: ErrorPolicy) -> Self {
        let mut pred_count = HashMap::new();
        let mut remaining = HashSet::new();
        let mut ready = VecDeque::new();

        for id in graph.node_ids() {
            let count = graph.predecessor_count(id);
            pred_count.insert(id.clone(), count);
            remaining.insert(id.clone());
            if count == 0 {
                ready.push_back(id.clone());
            }
        }

        Self {
            graph,
            pred_count,
            remaining,
            ready,
            policy,
            stopped: false,
        }
    }

    /// Dequeue the next ready node, FIFO by enqueue time. Returns `None` if
    /// the ready set is empty, or if a `stop`-policy failure has halted the
    /// run (§4.4, §8 invariant 7).
    pub fn pop_ready(&mut self) -> Option<NodeId> {
        if self.stopped {
            return None;
        }
        self.ready.pop_front()
    }

    /// Returns `true` once every node has reached a terminal status.
    #[must_use]
    pub fn is_drained(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Returns `true` if no node is ready to dispatch and the run cannot
    /// make further progress without an in-flight completion (§4.4
    /// "Termination").
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.ready.is_empty()
    }

    /// Force every still-outstanding node to `Skipped` and stop admitting
    /// new dispatches, independent of any single node's completion (§5
    /// "All non-started nodes transition to Skipped ... Run terminates
    /// with status Cancelled").
    pub fn cancel_remaining(&mut self) -> SchedulerUpdate {
        let mut update = SchedulerUpdate::default();
        self.stop_all(&mut update);
        update
    }

    /// Record that `node_id` reached a terminal `status`, propagating the
    /// effect to its successors.
    pub fn complete(&mut self, node_id: &NodeId, status: NodeStatus) -> SchedulerUpdate {
        self.remaining.remove(node_id);
        let mut update = SchedulerUpdate::default();

        match status {
            NodeStatus::Succeeded => self.resolve_successors(node_id, &mut update),
            NodeStatus::Failed if self.policy == ErrorPolicy::Stop => self.stop_all(&mut update),
            NodeStatus::Cancelled => self.stop_all(&mut update),
            NodeStatus::Failed => self.skip_transitive(node_id, &mut update),
            NodeStatus::Pending | NodeStatus::Running | NodeStatus::Skipped => {}
        }

        update
    }

    fn resolve_successors(&mut self, node_id: &NodeId, update: &mut SchedulerUpdate) {
        for successor in self.graph.successors(node_id) {
            if let Some(count) = self.pred_count.get_mut(successor) {
                *count -= 1;
                if *count == 0 {
                    self.ready.push_back(successor.clone());
                    update.newly_ready.push(successor.clone());
                }
            }
        }
    }

    /// `stop`-policy failure (or any cancellation): every node not yet
    /// terminal is skipped and the ready queue is drained (§4.4).
    fn stop_all(&mut self, update: &mut SchedulerUpdate) {
        self.stopped = true;
        let skipped: Vec<NodeId> = self.remaining.drain().collect();
        update.newly_skipped.extend(skipped);
        self.ready.clear();
    }

    /// `continue`-policy failure: only nodes transitively downstream of the
    /// failed node are skipped; independent branches are left alone (§4.4).
    fn skip_transitive(&mut self, node_id: &NodeId, update: &mut SchedulerUpdate) {
        let mut frontier = VecDeque::new();
        frontier.push_back(node_id.clone());

        while let Some(current) = frontier.pop_front() {
            for successor in self.graph.successors(&current) {
                if self.remaining.remove(successor) {
                    self.ready.retain(|queued| queued != successor);
                    update.newly_skipped.push(successor.clone());
                    frontier.push_back(successor.clone());
                }
            }
        }
    }
}
