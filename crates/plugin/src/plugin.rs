//! The Plugin Bridge: an injectable [`PluginTransport`] plus the lifecycle
//! state machine that governs one plugin-backed node type (§4.7).
//!
//! The real RPC transport (process spawn, handshake cookie, wire codec) is
//! out of scope here; [`PluginTransport`] is the seam the engine dispatches
//! through, so a test transport can stand in without spawning a process.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use weft_core::{NodeTypeId, PortMap};
use weft_registry::{Handler, HandlerContext, HandlerError};

use crate::error::PluginError;

/// The lifecycle of one plugin-backed node type's out-of-process connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginLifecycleState {
    /// No connection has been attempted.
    Unloaded,
    /// A connection attempt (handshake) is in progress.
    Loading,
    /// Connected and able to serve calls.
    Ready,
    /// Shutting down; no new calls should be issued.
    Draining,
}

/// Returns `true` if `from -> to` is a legal lifecycle transition.
#[must_use]
pub fn can_transition(from: PluginLifecycleState, to: PluginLifecycleState) -> bool {
    use PluginLifecycleState::{Draining, Loading, Ready, Unloaded};
    matches!(
        (from, to),
        (Unloaded, Loading) | (Loading, Ready) | (Ready, Draining) | (Draining, Unloaded)
    )
}

/// The transport a [`PluginBridge`] drives: connect once, call many times,
/// shut down once. Implementations own the actual wire protocol.
#[async_trait]
pub trait PluginTransport: Send + Sync {
    /// Perform the handshake for `type_id`.
    async fn connect(&self, type_id: &NodeTypeId) -> Result<(), PluginError>;

    /// Invoke the plugin's handler for one node dispatch.
    async fn call(
        &self,
        type_id: &NodeTypeId,
        ctx: &HandlerContext,
        inputs: PortMap,
    ) -> Result<PortMap, PluginError>;

    /// Release the connection.
    async fn shutdown(&self, type_id: &NodeTypeId) -> Result<(), PluginError>;
}

/// Adapts a [`PluginTransport`] into a [`Handler`], lazily connecting on the
/// first dispatch and serializing lifecycle transitions behind an async
/// mutex so concurrent first-dispatches don't double-connect.
pub struct PluginBridge {
    type_id: NodeTypeId,
    transport: Arc<dyn PluginTransport>,
    state: Mutex<PluginLifecycleState>,
}

impl PluginBridge {
    /// Build a bridge for `type_id` over `transport`, starting `Unloaded`.
    #[must_use]
    pub fn new(type_id: NodeTypeId, transport: Arc<dyn PluginTransport>) -> Self {
        Self {
            type_id,
            transport,
            state: Mutex::new(PluginLifecycleState::Unloaded),
        }
    }

    /// The current lifecycle state.
    pub async fn state(&self) -> PluginLifecycleState {
        *self.state.lock().await
    }

    /// Connect if not already `Ready`. Idempotent: a second caller observing
    /// `Ready` returns immediately.
    pub async fn ensure_ready(&self) -> Result<(), PluginError> {
        let mut state = self.state.lock().await;
        match *state {
            PluginLifecycleState::Ready => Ok(()),
            PluginLifecycleState::Unloaded => {
                *state = PluginLifecycleState::Loading;
                self.transport.connect(&self.type_id).await?;
                *state = PluginLifecycleState::Ready;
                Ok(())
            }
            PluginLifecycleState::Loading | PluginLifecycleState::Draining => {
                Err(PluginError::transport(
                    self.type_id.clone(),
                    format!("cannot dispatch while bridge is {:?}", *state),
                ))
            }
        }
    }

    /// Shut the bridge down, releasing the transport's connection.
    pub async fn drain(&self) -> Result<(), PluginError> {
        let mut state = self.state.lock().await;
        if *state != PluginLifecycleState::Ready {
            return Ok(());
        }
        *state = PluginLifecycleState::Draining;
        self.transport.shutdown(&self.type_id).await?;
        *state = PluginLifecycleState::Unloaded;
        Ok(())
    }
}

#[async_trait]
impl Handler for PluginBridge {
    async fn execute(&self, ctx: &HandlerContext, inputs: PortMap) -> Result<PortMap, HandlerError> {
        self.ensure_ready()
            .await
            .map_err(|e| HandlerError::failed(e.to_string()))?;
        self.transport
            .call(&self.type_id, ctx, inputs)
            .await
            .map_err(|e| match e {
                PluginError::Handler(handler_err) => handler_err,
                other => HandlerError::failed(other.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_util::sync::CancellationToken;
    use weft_core::{NodeId, RunId, WorkflowId};

    struct EchoTransport {
        connected: std::sync::atomic::AtomicUsize,
    }

    #[async_trait]
    impl PluginTransport for EchoTransport {
        async fn connect(&self, _type_id: &NodeTypeId) -> Result<(), PluginError> {
            self.connected.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(())
        }

        async fn call(
            &self,
            _type_id: &NodeTypeId,
            _ctx: &HandlerContext,
            inputs: PortMap,
        ) -> Result<PortMap, PluginError> {
            Ok(inputs)
        }

        async fn shutdown(&self, _type_id: &NodeTypeId) -> Result<(), PluginError> {
            Ok(())
        }
    }

    fn ctx() -> HandlerContext {
        HandlerContext::new(
            RunId::v4(),
            WorkflowId::v4(),
            NodeId::new("slack_post"),
            CancellationToken::new(),
        )
    }

    #[test]
    fn lifecycle_transitions() {
        use PluginLifecycleState::{Draining, Loading, Ready, Unloaded};
        assert!(can_transition(Unloaded, Loading));
        assert!(can_transition(Loading, Ready));
        assert!(can_transition(Ready, Draining));
        assert!(can_transition(Draining, Unloaded));
        assert!(!can_transition(Unloaded, Ready));
        assert!(!can_transition(Ready, Loading));
    }

    #[tokio::test]
    async fn bridge_connects_lazily_once() {
        let transport = Arc::new(EchoTransport {
            connected: std::sync::atomic::AtomicUsize::new(0),
        });
        let bridge = PluginBridge::new(NodeTypeId::parse("slack").unwrap(), transport.clone());
        assert_eq!(bridge.state().await, PluginLifecycleState::Unloaded);

        let mut inputs = PortMap::new();
        inputs.insert("text".into(), "hi".into());
        let outputs = bridge.execute(&ctx(), inputs.clone()).await.unwrap();
        assert_eq!(outputs, inputs);
        assert_eq!(bridge.state().await, PluginLifecycleState::Ready);
        assert_eq!(transport.connected.load(std::sync::atomic::Ordering::SeqCst), 1);

        bridge.execute(&ctx(), PortMap::new()).await.unwrap();
        assert_eq!(transport.connected.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn drain_releases_and_resets_to_unloaded() {
        let transport = Arc::new(EchoTransport {
            connected: std::sync::atomic::AtomicUsize::new(0),
        });
        let bridge = PluginBridge::new(NodeTypeId::parse("slack").unwrap(), transport);
        bridge.ensure_ready().await.unwrap();
        bridge.drain().await.unwrap();
        assert_eq!(bridge.state().await, PluginLifecycleState::Unloaded);
    }

    #[tokio::test]
    async fn transport_call_failure_maps_to_handler_error_failed() {
        struct FailingTransport;

        #[async_trait]
        impl PluginTransport for FailingTransport {
            async fn connect(&self, _type_id: &NodeTypeId) -> Result<(), PluginError> {
                Ok(())
            }

            async fn call(
                &self,
                type_id: &NodeTypeId,
                _ctx: &HandlerContext,
                _inputs: PortMap,
            ) -> Result<PortMap, PluginError> {
                Err(PluginError::PluginCrashed(type_id.clone()))
            }

            async fn shutdown(&self, _type_id: &NodeTypeId) -> Result<(), PluginError> {
                Ok(())
            }
        }

        let bridge = PluginBridge::new(NodeTypeId::parse("slack").unwrap(), Arc::new(FailingTransport));
        let err = bridge.execute(&ctx(), PortMap::new()).await.unwrap_err();
        assert!(matches!(err, HandlerError::Failed(_)));
    }
}
