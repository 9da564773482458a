#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Weft Telemetry
//!
//! Event bus and metrics for the Weft workflow engine (§10.1).
//!
//! - [`EventBus`] — broadcast-based distribution of [`RunEvent`]s
//! - [`TelemetryService`] — pluggable facade bundling the bus and a [`MetricsRegistry`]
//! - [`NoopTelemetry`] — the default in-memory implementation
//!
//! Events are projections, not the source of truth — the run's store adapter
//! (`weft-store`) is authoritative.

pub mod event;
pub mod metrics;
pub mod service;

pub use event::{EventBus, EventSubscriber, RunEvent};
pub use metrics::{Counter, Gauge, Histogram, MetricsRegistry, NoopMetricsRegistry};
pub use service::{NoopTelemetry, TelemetryService};
