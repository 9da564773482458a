//! The handler contract (§6) and the factory that constructs handler instances (§4.1).

use std::sync::Arc;

use async_trait::async_trait;
use weft_core::PortMap;

use crate::context::HandlerContext;
use crate::error::{HandlerError, RegistryError};

/// The effectful object a [`HandlerFactory`] returns: one node type's
/// runtime behavior, shared identically by in-process and plugin-backed
/// node types (§4.7 "The engine treats both identically").
#[async_trait]
pub trait Handler: Send + Sync {
    /// Run one node dispatch to completion.
    ///
    /// `inputs` is the Input Assembler's merged map (§4.6); the returned map
    /// becomes the node's output, available to dependents under the
    /// `{node_id}_{output_name}` namespace (§4.6 step 3). Side effects are
    /// permitted; the engine does not assume idempotence (§6).
    async fn execute(&self, ctx: &HandlerContext, inputs: PortMap) -> Result<PortMap, HandlerError>;
}

/// Constructs a [`Handler`] instance from a node's static configuration
/// (§3 "Handler", §4.1 "Resolve").
///
/// Implementations should validate `config` eagerly and return
/// [`RegistryError::InvalidConfig`] before any dispatch occurs, rather than
/// deferring the failure into `Handler::execute` (§4.2 step 2 "so invalid
/// configs fail fast, before any side effects").
pub trait HandlerFactory: Send + Sync {
    /// Build a handler instance bound to `config`.
    fn create(&self, config: &PortMap) -> Result<Arc<dyn Handler>, RegistryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_util::sync::CancellationToken;
    use weft_core::{NodeId, RunId, WorkflowId};

    struct EchoHandler;

    #[async_trait]
    impl Handler for EchoHandler {
        async fn execute(&self, _ctx: &HandlerContext, inputs: PortMap) -> Result<PortMap, HandlerError> {
            Ok(inputs)
        }
    }

    struct EchoFactory;

    impl HandlerFactory for EchoFactory {
        fn create(&self, _config: &PortMap) -> Result<Arc<dyn Handler>, RegistryError> {
            Ok(Arc::new(EchoHandler))
        }
    }

    #[tokio::test]
    async fn factory_built_handler_echoes_inputs() {
        let factory = EchoFactory;
        let handler = factory.create(&PortMap::new()).unwrap();
        let ctx = HandlerContext::new(
            RunId::v4(),
            WorkflowId::v4(),
            NodeId::new("a"),
            CancellationToken::new(),
        );
        let mut inputs = PortMap::new();
        inputs.insert("n".into(), 1.into());
        let outputs = handler.execute(&ctx, inputs.clone()).await.unwrap();
        assert_eq!(outputs, inputs);
    }
}
