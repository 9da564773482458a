//! The per-run coordinator loop: owns the Scheduler, the in-flight
//! [`RunState`], and the Run record, and is the sole mutator of all three
//! (§5 "Shared resource policy").

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::{Id, JoinSet};
use tokio_util::sync::CancellationToken;
use weft_core::{NodeId, PortMap};
use weft_execution::{NodeStatus, Run, RunStatus};
use weft_registry::Handler;
use weft_store::StoreAdapter;
use weft_telemetry::{RunEvent, TelemetryService};
use weft_workflow::{DependencyGraph, WorkflowDefinition};

use crate::assembler::assemble_inputs;
use crate::dispatch::NodeTask;
use crate::run_state::RunState;
use crate::scheduler::Scheduler;

/// Everything one run's coordinator needs, gathered once in
/// [`crate::Engine::execute`] before the run is spawned.
pub struct Coordinator {
    pub(crate) run: Run,
    pub(crate) workflow: Arc<WorkflowDefinition>,
    pub(crate) graph: DependencyGraph,
    pub(crate) handlers: HashMap<NodeId, Arc<dyn Handler>>,
    pub(crate) params: PortMap,
    pub(crate) store: Arc<dyn StoreAdapter>,
    pub(crate) telemetry: Arc<dyn TelemetryService>,
    pub(crate) cancellation: CancellationToken,
    pub(crate) parallelism: usize,
    pub(crate) grace_timeout: Duration,
    pub(crate) deadline: Option<Instant>,
}

impl Coordinator {
    /// Drive this run to a terminal status, persisting along the way.
    pub async fn run(mut self) {
        let run_id = self.run.run_id;
        let workflow_id = self.workflow.id();
        let started = Instant::now();

        if self.run.transition_to(RunStatus::Running).is_ok() {
            self.telemetry.metrics().counter("runs_started_total").inc();
            self.telemetry
                .event_bus()
                .emit(RunEvent::Started { run_id, workflow_id });
        }
        self.persist_run().await;

        let error_policy = self.workflow.settings().error_policy();
        let mut scheduler = Scheduler::new(self.graph.clone(), error_policy);
        let mut state = RunState::default();
        let mut in_flight: JoinSet<NodeStatusOutcome> = JoinSet::new();
        let mut in_flight_ids: HashMap<Id, NodeId> = HashMap::new();
        let mut cancelling = false;

        loop {
            if self.cancellation.is_cancelled() && !cancelling {
                cancelling = true;
                let update = scheduler.cancel_remaining();
                // `cancel_remaining` skips every node still in `remaining`,
                // which includes nodes currently in flight. Only nodes that
                // were never dispatched are "non-started" (§5); in-flight
                // ones are left to resolve via their own completion or the
                // grace-period reap below.
                let dispatched: std::collections::HashSet<NodeId> = in_flight_ids.values().cloned().collect();
                let not_started = update
                    .newly_skipped
                    .into_iter()
                    .filter(|id| !dispatched.contains(id))
                    .collect();
                self.skip_nodes(&mut state, not_started).await;
            }

            if !cancelling {
                self.fill_ready(&mut scheduler, &mut state, &mut in_flight, &mut in_flight_ids);
            }

            if in_flight.is_empty() {
                break;
            }

            let joined = if cancelling {
                match tokio::time::timeout(self.grace_timeout, in_flight.join_next_with_id()).await {
                    Ok(joined) => joined,
                    Err(_elapsed) => {
                        self.reap_grace_period(&mut in_flight, &mut in_flight_ids, &mut scheduler, &mut state)
                            .await;
                        continue;
                    }
                }
            } else {
                in_flight.join_next_with_id().await
            };

            let Some(joined) = joined else { continue };
            match joined {
                Ok((id, outcome)) => {
                    in_flight_ids.remove(&id);
                    self.complete_node(&mut scheduler, &mut state, outcome).await;
                }
                Err(join_error) => {
                    in_flight_ids.remove(&join_error.id());
                }
            }
        }

        let final_status = self.final_status(&state, cancelling);
        let _ = self.run.transition_to(final_status);
        self.persist_run().await;
        self.emit_final(final_status, started.elapsed());
    }

    fn fill_ready(
        &mut self,
        scheduler: &mut Scheduler,
        state: &mut RunState,
        in_flight: &mut JoinSet<NodeStatusOutcome>,
        in_flight_ids: &mut HashMap<Id, NodeId>,
    ) {
        while in_flight.len() < self.parallelism.max(1) {
            let Some(node_id) = scheduler.pop_ready() else {
                break;
            };
            let Some(node) = self.workflow.nodes().iter().find(|n| n.id() == &node_id) else {
                continue;
            };
            let Some(handler) = self.handlers.get(&node_id).cloned() else {
                continue;
            };
            let inputs = assemble_inputs(&self.workflow, &self.graph, node, &self.params, state);

            self.telemetry.event_bus().emit(RunEvent::NodeStarted {
                run_id: self.run.run_id,
                node_id: node_id.clone(),
            });

            let task = NodeTask {
                node_id: node_id.clone(),
                handler,
                inputs,
                run_id: self.run.run_id,
                workflow_id: self.workflow.id(),
                cancellation: self.cancellation.child_token(),
                deadline: self.remaining_deadline(),
            };

            let abort_handle = in_flight.spawn(async move { NodeStatusOutcome(task.run().await) });
            in_flight_ids.insert(abort_handle.id(), node_id);
        }
    }

    fn remaining_deadline(&self) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(Instant::now()))
    }

    async fn complete_node(&mut self, scheduler: &mut Scheduler, state: &mut RunState, outcome: NodeStatusOutcome) {
        let result = outcome.0;
        let status = result.status;

        match status {
            NodeStatus::Succeeded => {
                self.telemetry.metrics().counter("nodes_succeeded_total").inc();
                if let Some(duration) = result.duration() {
                    self.telemetry.event_bus().emit(RunEvent::NodeCompleted {
                        run_id: self.run.run_id,
                        node_id: result.node_id.clone(),
                        duration: duration.to_std().unwrap_or_default(),
                    });
                }
            }
            NodeStatus::Failed | NodeStatus::Cancelled => {
                self.telemetry.metrics().counter("nodes_failed_total").inc();
                self.telemetry.event_bus().emit(RunEvent::NodeFailed {
                    run_id: self.run.run_id,
                    node_id: result.node_id.clone(),
                    error: result.error_message.clone().unwrap_or_default(),
                });
            }
            NodeStatus::Pending | NodeStatus::Running | NodeStatus::Skipped => {}
        }

        let node_id = result.node_id.clone();
        self.run.set_node_result(result.clone());
        let _ = self.store.create_node_result(self.run.run_id, result.clone()).await;
        state.record(result);

        let update = scheduler.complete(&node_id, status);
        self.skip_nodes(state, update.newly_skipped).await;
    }

    async fn skip_nodes(&mut self, state: &mut RunState, node_ids: Vec<NodeId>) {
        for node_id in node_ids {
            if state.get(&node_id).is_some() {
                continue;
            }
            let mut result = weft_execution::NodeResult::new(node_id.clone());
            let reason = if self.cancellation.is_cancelled() {
                "run was cancelled"
            } else {
                "upstream node failed"
            };
            if result.skip(reason).is_ok() {
                self.run.set_node_result(result.clone());
                let _ = self.store.create_node_result(self.run.run_id, result.clone()).await;
                state.record(result);
            }
        }
    }

    async fn reap_grace_period(
        &mut self,
        in_flight: &mut JoinSet<NodeStatusOutcome>,
        in_flight_ids: &mut HashMap<Id, NodeId>,
        scheduler: &mut Scheduler,
        state: &mut RunState,
    ) {
        in_flight.abort_all();
        let leaked: Vec<NodeId> = in_flight_ids.drain().map(|(_, node_id)| node_id).collect();
        while in_flight.join_next().await.is_some() {}

        for node_id in leaked {
            let mut result = weft_execution::NodeResult::new(node_id.clone());
            if result.start().is_ok() && result.cancel("grace period elapsed, handler leaked").is_ok() {
                self.telemetry.metrics().counter("nodes_leaked_total").inc();
                let status = result.status;
                self.run.set_node_result(result.clone());
                let _ = self.store.create_node_result(self.run.run_id, result.clone()).await;
                state.record(result);
                let update = scheduler.complete(&node_id, status);
                self.skip_nodes(state, update.newly_skipped).await;
            }
        }
    }

    fn final_status(&self, state: &RunState, cancelled: bool) -> RunStatus {
        if cancelled {
            return RunStatus::Cancelled;
        }
        let any_failed = state.results().values().any(|r| r.status == NodeStatus::Failed);
        if any_failed {
            RunStatus::Failed
        } else {
            RunStatus::Succeeded
        }
    }

    async fn persist_run(&self) {
        if let Err(error) = self.store.update_run(self.run.clone()).await {
            tracing::warn!(run_id = %self.run.run_id, %error, "failed to persist run state");
        }
    }

    fn emit_final(&self, status: RunStatus, duration: Duration) {
        match status {
            RunStatus::Succeeded => {
                self.telemetry.metrics().counter("runs_succeeded_total").inc();
                self.telemetry.event_bus().emit(RunEvent::Completed {
                    run_id: self.run.run_id,
                    duration,
                });
            }
            RunStatus::Failed => {
                self.telemetry.metrics().counter("runs_failed_total").inc();
                let error = self
                    .run
                    .first_failed()
                    .and_then(|r| r.error_message.clone())
                    .unwrap_or_default();
                self.telemetry
                    .event_bus()
                    .emit(RunEvent::Failed { run_id: self.run.run_id, error });
            }
            RunStatus::Cancelled => {
                self.telemetry.metrics().counter("runs_cancelled_total").inc();
                self.telemetry
                    .event_bus()
                    .emit(RunEvent::Cancelled { run_id: self.run.run_id });
            }
            RunStatus::Pending | RunStatus::Running => {}
        }
        self.telemetry
            .metrics()
            .histogram("run_duration_seconds")
            .observe(duration.as_secs_f64());
    }
}

/// Newtype so the `JoinSet` item type doesn't collide with an inherent
/// `impl` elsewhere in the crate.
struct NodeStatusOutcome(weft_execution::NodeResult);
