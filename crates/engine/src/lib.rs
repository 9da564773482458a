#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Weft Engine
//!
//! The Run Manager (§4.3): validates a [`weft_workflow::WorkflowDefinition`],
//! drives it to completion through the Dependency Scheduler (§4.4) and
//! Dispatch Pool (§4.5), and exposes `Execute`/`Get`/`Cancel` to embedders
//! (§6).
//!
//! Everything except [`Engine`], [`EngineConfig`], [`StoreBackend`], and
//! [`EngineError`] is an implementation detail of one run's coordinator and
//! is not part of this crate's public surface.

mod assembler;
mod config;
mod coordinator;
mod dispatch;
mod engine;
mod error;
mod run_state;
mod scheduler;

pub use config::{EngineConfig, StoreBackend};
pub use engine::Engine;
pub use error::EngineError;
