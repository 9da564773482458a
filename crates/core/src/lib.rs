//! # Weft Core
//!
//! Shared identifiers and value types for the Weft workflow engine. This
//! crate has no engine logic of its own: it exists so that `weft-workflow`,
//! `weft-registry`, `weft-execution`, `weft-plugin`, `weft-store`,
//! `weft-telemetry` and `weft-engine` share one definition of "what a node ID
//! is" instead of each re-deriving it.
//!
//! ## Key components
//!
//! - **Identifiers**: [`WorkflowId`], [`RunId`], [`NodeId`] — UUID-backed,
//!   generated by the engine.
//! - **Type keys**: [`NodeTypeId`] — a normalized string key naming a
//!   registered node type, e.g. `http_request`.
//! - **Value types**: [`PortMap`], the JSON-compatible map used at every
//!   handler input/output boundary.
//!
//! ```rust
//! use weft_core::{WorkflowId, RunId, NodeId};
//!
//! let workflow_id = WorkflowId::v4();
//! let run_id = RunId::v4();
//! let node_id = NodeId::new("fetch_page");
//! ```

mod id;
mod key;
mod value;

pub use id::{NodeId, RunId, WorkflowId};
pub use key::{NodeTypeId, NodeTypeKeyError};
pub use value::PortMap;

/// Common prelude for Weft crates.
pub mod prelude {
    pub use super::{NodeId, NodeTypeId, NodeTypeKeyError, PortMap, RunId, WorkflowId};
}
