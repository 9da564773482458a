//! An in-memory [`StoreAdapter`], the engine's default backend (§4.8).

use async_trait::async_trait;
use dashmap::DashMap;
use weft_core::RunId;
use weft_execution::{NodeResult, Run};

use crate::adapter::StoreAdapter;
use crate::error::StoreError;

/// A [`StoreAdapter`] backed by a [`DashMap`], with no durability across
/// process restarts. Suitable for tests and for deployments that accept
/// losing in-flight runs on crash.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    runs: DashMap<RunId, Run>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StoreAdapter for InMemoryStore {
    async fn create_run(&self, run: Run) -> Result<(), StoreError> {
        if self.runs.contains_key(&run.run_id) {
            return Err(StoreError::RunAlreadyExists(run.run_id));
        }
        self.runs.insert(run.run_id, run);
        Ok(())
    }

    async fn update_run(&self, run: Run) -> Result<(), StoreError> {
        if !self.runs.contains_key(&run.run_id) {
            return Err(StoreError::RunNotFound(run.run_id));
        }
        self.runs.insert(run.run_id, run);
        Ok(())
    }

    async fn get_run(&self, run_id: RunId) -> Result<Option<Run>, StoreError> {
        Ok(self.runs.get(&run_id).map(|entry| entry.clone()))
    }

    async fn create_node_result(&self, run_id: RunId, result: NodeResult) -> Result<(), StoreError> {
        let mut run = self
            .runs
            .get_mut(&run_id)
            .ok_or(StoreError::RunNotFound(run_id))?;
        run.node_results.entry(result.node_id.clone()).or_insert(result);
        Ok(())
    }

    async fn list_node_results(&self, run_id: RunId) -> Result<Vec<NodeResult>, StoreError> {
        let run = self.runs.get(&run_id).ok_or(StoreError::RunNotFound(run_id))?;
        Ok(run.node_results.values().cloned().collect())
    }
}
