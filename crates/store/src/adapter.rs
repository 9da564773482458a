//! The Store Adapter contract (§4.8): persistence of Runs and NodeResults.

use async_trait::async_trait;
use weft_core::RunId;
use weft_execution::{NodeResult, Run};

use crate::error::StoreError;

/// Persists [`Run`] and [`NodeResult`] records.
///
/// `CreateNodeResult` is idempotent on `(run_id, node_id)` (§4.8): a retried
/// write for a result already on record is a no-op rather than an error, so
/// the coordinator can retry a persistence failure without double-writing.
#[async_trait]
pub trait StoreAdapter: Send + Sync {
    /// Persist a newly created run, in status `Pending`. Fails if a run with
    /// this ID is already on record.
    async fn create_run(&self, run: Run) -> Result<(), StoreError>;

    /// Persist the current state of an existing run (status, timestamps,
    /// variables). Overwrites the prior record in full.
    async fn update_run(&self, run: Run) -> Result<(), StoreError>;

    /// Fetch a run snapshot, including every `NodeResult` recorded so far.
    async fn get_run(&self, run_id: RunId) -> Result<Option<Run>, StoreError>;

    /// Append a node result to a run, idempotent on `(run_id, node_id)`.
    async fn create_node_result(&self, run_id: RunId, result: NodeResult) -> Result<(), StoreError>;

    /// List every node result recorded for a run, for recovery and
    /// inspection.
    async fn list_node_results(&self, run_id: RunId) -> Result<Vec<NodeResult>, StoreError>;
}
