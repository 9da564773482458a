//! Telemetry service trait and implementations.
//!
//! [`TelemetryService`] is the facade the engine depends on for both
//! instrumentation hooks (§4.3 "surfaced through an instrumentation hook")
//! and event emission; it bundles the [`EventBus`] and [`MetricsRegistry`].

use std::sync::Arc;

use crate::event::EventBus;
use crate::metrics::MetricsRegistry;

/// Telemetry service facade, shared via `Arc<dyn TelemetryService>` across
/// the engine.
pub trait TelemetryService: Send + Sync {
    /// Access the event bus for emitting and subscribing to run events.
    fn event_bus(&self) -> &EventBus;

    /// Access the metrics registry for recording metrics.
    fn metrics(&self) -> &MetricsRegistry;
}

/// The default telemetry service: in-memory event bus and metrics, no
/// external exporter. Nothing is persisted across process restarts.
///
/// ```
/// use weft_telemetry::{NoopTelemetry, TelemetryService};
///
/// let telemetry = NoopTelemetry::new();
/// let counter = telemetry.metrics().counter("test");
/// counter.inc();
/// assert_eq!(counter.get(), 1);
/// ```
pub struct NoopTelemetry {
    event_bus: EventBus,
    metrics: MetricsRegistry,
}

impl NoopTelemetry {
    /// Create a new telemetry service with a default-sized event bus.
    #[must_use]
    pub fn new() -> Self {
        Self {
            event_bus: EventBus::new(128),
            metrics: MetricsRegistry::new(),
        }
    }

    /// Create as an `Arc<dyn TelemetryService>` for dependency injection.
    #[must_use]
    pub fn arc() -> Arc<dyn TelemetryService> {
        Arc::new(Self::new())
    }
}

impl Default for NoopTelemetry {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryService for NoopTelemetry {
    fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::RunEvent;
    use weft_core::{RunId, WorkflowId};

    #[test]
    fn noop_telemetry_does_not_panic() {
        let telemetry = NoopTelemetry::new();
        telemetry.event_bus().emit(RunEvent::Started {
            run_id: RunId::v4(),
            workflow_id: WorkflowId::v4(),
        });
        telemetry.metrics().counter("test").inc();
        telemetry.metrics().gauge("active").set(5);
        telemetry.metrics().histogram("duration").observe(1.23);
    }

    #[test]
    fn noop_telemetry_arc_is_object_safe() {
        let t: Arc<dyn TelemetryService> = NoopTelemetry::arc();
        t.metrics().counter("x").inc();
    }
}
