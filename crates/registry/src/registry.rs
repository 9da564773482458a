//! The process-wide Node Type Registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use weft_core::NodeTypeId;

use crate::error::RegistryError;
use crate::handler::HandlerFactory;

/// Maps node-type IDs to their [`HandlerFactory`] (§4.1).
///
/// Registrations happen once at process initialization; after that the
/// registry is read-only and safe to share behind an `Arc` across every
/// worker in the Dispatch Pool (§4.1 "must be safe to read concurrently; it
/// need not support unregistration"). There is exactly one registry in this
/// engine — plugin-backed node types register through it via the same
/// [`HandlerFactory`] contract as in-process ones (§9).
///
/// ```
/// use std::sync::Arc;
/// use weft_registry::{Handler, HandlerContext, HandlerError, HandlerFactory, NodeTypeRegistry, RegistryError};
/// use weft_core::{NodeTypeId, PortMap};
///
/// struct NoopHandler;
/// #[async_trait::async_trait]
/// impl Handler for NoopHandler {
///     async fn execute(&self, _ctx: &HandlerContext, _inputs: PortMap) -> Result<PortMap, HandlerError> {
///         Ok(PortMap::new())
///     }
/// }
///
/// struct NoopFactory;
/// impl HandlerFactory for NoopFactory {
///     fn create(&self, _config: &PortMap) -> Result<Arc<dyn Handler>, RegistryError> {
///         Ok(Arc::new(NoopHandler))
///     }
/// }
///
/// let registry = NodeTypeRegistry::new();
/// registry.register(NodeTypeId::parse("noop").unwrap(), Arc::new(NoopFactory)).unwrap();
/// assert!(registry.contains(&NodeTypeId::parse("noop").unwrap()));
/// ```
pub struct NodeTypeRegistry {
    factories: RwLock<HashMap<NodeTypeId, Arc<dyn HandlerFactory>>>,
}

impl NodeTypeRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: RwLock::new(HashMap::new()),
        }
    }

    /// Bind `type_id` to `factory`. Fails if the ID is already taken.
    pub fn register(
        &self,
        type_id: NodeTypeId,
        factory: Arc<dyn HandlerFactory>,
    ) -> Result<(), RegistryError> {
        let mut factories = self.factories.write();
        if factories.contains_key(&type_id) {
            return Err(RegistryError::AlreadyRegistered(type_id));
        }
        factories.insert(type_id, factory);
        Ok(())
    }

    /// Construct a handler instance for `type_id`, validating `config`
    /// against the bound factory (§4.1 "Resolve").
    pub fn resolve(
        &self,
        type_id: &NodeTypeId,
        config: &weft_core::PortMap,
    ) -> Result<Arc<dyn crate::handler::Handler>, RegistryError> {
        let factory = self
            .factories
            .read()
            .get(type_id)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownType(type_id.clone()))?;
        factory.create(config)
    }

    /// Whether `type_id` has a bound factory.
    #[must_use]
    pub fn contains(&self, type_id: &NodeTypeId) -> bool {
        self.factories.read().contains_key(type_id)
    }

    /// All registered type IDs, for tooling (§4.1 "List").
    #[must_use]
    pub fn list(&self) -> Vec<NodeTypeId> {
        self.factories.read().keys().cloned().collect()
    }

    /// Number of registered node types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.read().len()
    }

    /// Whether no node types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.read().is_empty()
    }
}

impl Default for NodeTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NodeTypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeTypeRegistry")
            .field("count", &self.len())
            .field("types", &self.list())
            .finish()
    }
}
