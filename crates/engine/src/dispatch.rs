//! The Dispatch Pool (§4.5): bounded worker tasks that assemble inputs,
//! resolve a handler, and run it under a composed deadline.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use weft_core::{NodeId, PortMap, RunId, WorkflowId};
use weft_execution::{ErrorKind, NodeResult};
use weft_registry::{Handler, HandlerContext, HandlerError};

/// One node dispatch, bundled so it can be moved into a spawned task.
///
/// Builds the complete [`NodeResult`] itself and hands it back to the
/// coordinator, so "NodeResult written before the Scheduler is notified"
/// holds by construction rather than by a separate synchronization step
/// (§4.5).
pub struct NodeTask {
    /// The node being dispatched.
    pub node_id: NodeId,
    /// The resolved handler instance for this node's type.
    pub handler: Arc<dyn Handler>,
    /// The merged inputs from the Input Assembler (§4.6).
    pub inputs: PortMap,
    /// The run this dispatch belongs to.
    pub run_id: RunId,
    /// The workflow this run was started from.
    pub workflow_id: WorkflowId,
    /// Fires when the run is cancelled or the coordinator's grace period
    /// for this node lapses.
    pub cancellation: CancellationToken,
    /// `min(node timeout, remaining run timeout, remaining caller deadline)`
    /// (§4.5 step 4). `None` means no deadline applies.
    pub deadline: Option<Duration>,
}

impl NodeTask {
    /// Run this node to completion (or until its deadline/cancellation
    /// fires) and return the terminal [`NodeResult`].
    pub async fn run(self) -> NodeResult {
        let mut result = NodeResult::new(self.node_id.clone());
        result.start().expect("fresh NodeResult is always Pending");

        let ctx = HandlerContext::new(
            self.run_id,
            self.workflow_id,
            self.node_id.clone(),
            self.cancellation.clone(),
        );

        let outcome = match self.deadline {
            Some(deadline) => match tokio::time::timeout(deadline, self.handler.execute(&ctx, self.inputs)).await {
                Ok(handler_outcome) => handler_outcome,
                Err(_elapsed) => {
                    self.cancellation.cancel();
                    Err(HandlerError::Cancelled)
                }
            },
            None => self.handler.execute(&ctx, self.inputs).await,
        };

        apply_outcome(&mut result, outcome, self.deadline.is_some());
        result
    }
}

fn apply_outcome(result: &mut NodeResult, outcome: Result<PortMap, HandlerError>, had_deadline: bool) {
    let apply = match outcome {
        Ok(output) => result.succeed(output),
        Err(HandlerError::Cancelled) if had_deadline => {
            result.fail(ErrorKind::Timeout, "node exceeded its deadline")
        }
        Err(HandlerError::Cancelled) => result.cancel("execution was cancelled"),
        Err(HandlerError::Failed(message)) => result.fail(ErrorKind::HandlerError, message),
    };
    apply.expect("a freshly-started NodeResult accepts exactly one terminal transition");
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use weft_execution::NodeStatus;

    struct EchoHandler;

    #[async_trait]
    impl Handler for EchoHandler {
        async fn execute(&self, _ctx: &HandlerContext, inputs: PortMap) -> Result<PortMap, HandlerError> {
            Ok(inputs)
        }
    }

    struct FailingHandler;

    #[async_trait]
    impl Handler for FailingHandler {
        async fn execute(&self, _ctx: &HandlerContext, _inputs: PortMap) -> Result<PortMap, HandlerError> {
            Err(HandlerError::failed("handler blew up"))
        }
    }

    struct SleepingHandler(Duration);

    #[async_trait]
    impl Handler for SleepingHandler {
        async fn execute(&self, _ctx: &HandlerContext, inputs: PortMap) -> Result<PortMap, HandlerError> {
            tokio::time::sleep(self.0).await;
            Ok(inputs)
        }
    }

    fn task(handler: Arc<dyn Handler>, deadline: Option<Duration>) -> NodeTask {
        NodeTask {
            node_id: NodeId::new("a"),
            handler,
            inputs: PortMap::new(),
            run_id: RunId::v4(),
            workflow_id: WorkflowId::v4(),
            cancellation: CancellationToken::new(),
            deadline,
        }
    }

    #[tokio::test]
    async fn successful_handler_produces_succeeded_result() {
        let result = task(Arc::new(EchoHandler), None).run().await;
        assert_eq!(result.status, NodeStatus::Succeeded);
    }

    #[tokio::test]
    async fn failing_handler_produces_failed_result_with_handler_error_kind() {
        let result = task(Arc::new(FailingHandler), None).run().await;
        assert_eq!(result.status, NodeStatus::Failed);
        assert_eq!(result.error_kind, Some(ErrorKind::HandlerError));
        assert_eq!(result.error_message.as_deref(), Some("handler blew up"));
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_elapsed_produces_timeout_failure() {
        let result = task(
            Arc::new(SleepingHandler(Duration::from_secs(10))),
            Some(Duration::from_millis(50)),
        )
        .run()
        .await;
        assert_eq!(result.status, NodeStatus::Failed);
        assert_eq!(result.error_kind, Some(ErrorKind::Timeout));
    }

    #[tokio::test]
    async fn cancellation_without_deadline_produces_cancelled_result() {
        struct CancelAwareHandler;

        #[async_trait]
        impl Handler for CancelAwareHandler {
            async fn execute(&self, ctx: &HandlerContext, _inputs: PortMap) -> Result<PortMap, HandlerError> {
                ctx.check_cancelled()?;
                Ok(PortMap::new())
            }
        }

        let mut node_task = task(Arc::new(CancelAwareHandler), None);
        node_task.cancellation.cancel();
        let result = node_task.run().await;
        assert_eq!(result.status, NodeStatus::Cancelled);
    }
}
