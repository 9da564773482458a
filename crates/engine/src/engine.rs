//! The Run Manager (§4.3): the public entry point that validates a workflow,
//! starts a run, and lets callers observe or cancel it.

use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;
use tokio_util::sync::CancellationToken;
use weft_core::{PortMap, RunId};
use weft_execution::Run;
use weft_registry::NodeTypeRegistry;
use weft_store::StoreAdapter;
use weft_telemetry::TelemetryService;
use weft_workflow::{DependencyGraph, WorkflowDefinition};

use crate::config::EngineConfig;
use crate::coordinator::Coordinator;
use crate::error::EngineError;

/// The Run Manager: the single object an embedder holds (§4.3).
///
/// Cheap to clone — every field is an `Arc` or a `DashMap` wrapped in one,
/// so handing a `Engine` to multiple callers shares one registry, one store,
/// and one set of in-flight cancellation tokens.
#[derive(Clone)]
pub struct Engine {
    registry: Arc<NodeTypeRegistry>,
    store: Arc<dyn StoreAdapter>,
    telemetry: Arc<dyn TelemetryService>,
    config: EngineConfig,
    cancellations: Arc<DashMap<RunId, CancellationToken>>,
}

impl Engine {
    /// Build an engine over an already-populated registry, store, and
    /// telemetry service.
    #[must_use]
    pub fn new(
        registry: Arc<NodeTypeRegistry>,
        store: Arc<dyn StoreAdapter>,
        telemetry: Arc<dyn TelemetryService>,
        config: EngineConfig,
    ) -> Self {
        Self {
            registry,
            store,
            telemetry,
            config,
            cancellations: Arc::new(DashMap::new()),
        }
    }

    /// Bind `type_id` to `factory` on this engine's registry (§6
    /// "RegisterNodeType"). Node-providing modules call this during
    /// initialization, before any workflow referencing the type is run.
    pub fn register_node_type(
        &self,
        type_id: weft_core::NodeTypeId,
        factory: Arc<dyn weft_registry::HandlerFactory>,
    ) -> Result<(), weft_registry::RegistryError> {
        self.registry.register(type_id, factory)
    }

    /// Validate `workflow`, start a run, and return its ID immediately.
    ///
    /// Validation (§4.2) and handler resolution happen synchronously, before
    /// this call returns: a cyclic graph, a dangling edge, or an unresolvable
    /// node type fails here rather than surfacing later as a node error
    /// (§7 "errors are local to the node" does not apply to structural
    /// problems). The run itself — dispatch, scheduling, persistence of node
    /// results — proceeds on a spawned task.
    pub async fn execute(
        &self,
        workflow: Arc<WorkflowDefinition>,
        params: PortMap,
    ) -> Result<RunId, EngineError> {
        self.start_run(workflow, params, None).await
    }

    /// Like [`Engine::execute`], but bounds the whole run by `deadline`
    /// (a caller-supplied wall-clock instant, composed with the workflow's
    /// own timeout at dispatch time — §5).
    pub async fn execute_with_deadline(
        &self,
        workflow: Arc<WorkflowDefinition>,
        params: PortMap,
        deadline: Instant,
    ) -> Result<RunId, EngineError> {
        self.start_run(workflow, params, Some(deadline)).await
    }

    async fn start_run(
        &self,
        workflow: Arc<WorkflowDefinition>,
        params: PortMap,
        deadline: Option<Instant>,
    ) -> Result<RunId, EngineError> {
        let graph = DependencyGraph::build(&workflow)?;
        // Pool size is the workflow's own setting (§4.5), capped by the
        // engine-wide `Parallelism` knob (§6) so one run can't claim more
        // concurrent dispatch than the embedder has budgeted for.
        let workflow_parallelism = workflow.settings().parallelism().min(self.config.parallelism);
        // Three nested deadlines compose by minimum (§5): the caller's
        // deadline and the workflow's own settings-level timeout, anchored to
        // now. A workflow with no timeout and no caller deadline runs
        // unbounded.
        let workflow_deadline = workflow.settings().timeout().map(|timeout| Instant::now() + timeout);
        let deadline = [deadline, workflow_deadline].into_iter().flatten().min();

        let mut handlers = std::collections::HashMap::new();
        for node in workflow.nodes() {
            let handler = self.registry.resolve(node.type_id(), node.config())?;
            handlers.insert(node.id().clone(), handler);
        }

        let run_id = RunId::v4();
        let run = Run::new(run_id, workflow.id(), params.clone());
        self.store.create_run(run.clone()).await?;

        let cancellation = CancellationToken::new();
        self.cancellations.insert(run_id, cancellation.clone());

        let coordinator = Coordinator {
            run,
            workflow,
            graph,
            handlers,
            params,
            store: self.store.clone(),
            telemetry: self.telemetry.clone(),
            cancellation,
            parallelism: workflow_parallelism,
            grace_timeout: self.config.grace_timeout,
            deadline,
        };

        let cancellations = self.cancellations.clone();
        tokio::spawn(async move {
            coordinator.run().await;
            cancellations.remove(&run_id);
        });

        Ok(run_id)
    }

    /// Fetch a run's current snapshot (§6 "Get").
    pub async fn get(&self, run_id: RunId) -> Result<Run, EngineError> {
        self.store
            .get_run(run_id)
            .await?
            .ok_or(EngineError::RunNotFound(run_id))
    }

    /// Request cooperative cancellation of a run (§6 "Cancel", §5).
    ///
    /// Returns once the cancellation signal has been sent, not once the run
    /// has actually reached `Cancelled` — callers that need to know when the
    /// run is terminal should poll [`Engine::get`].
    pub fn cancel(&self, run_id: RunId) -> Result<(), EngineError> {
        match self.cancellations.get(&run_id) {
            Some(token) => {
                token.cancel();
                Ok(())
            }
            None => Err(EngineError::RunNotFound(run_id)),
        }
    }
}
