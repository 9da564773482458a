//! # Weft Registry
//!
//! The Node Type Registry (§4.1): maps node-type IDs to handler factories,
//! and the [`Handler`] contract every node type — in-process or plugin-backed
//! (see `weft-plugin`) — implements (§6 "Handler contract").

mod context;
mod error;
mod handler;
mod registry;

pub use context::HandlerContext;
pub use error::{HandlerError, RegistryError};
pub use handler::{Handler, HandlerFactory};
pub use registry::NodeTypeRegistry;
