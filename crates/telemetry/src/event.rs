//! Event bus for run lifecycle events (§10.1).
//!
//! Uses [`tokio::sync::broadcast`] for fan-out delivery to multiple
//! subscribers. Events are fire-and-forget projections — dropping them is
//! acceptable; the run's store adapter (`weft-store`) is the source of truth.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use weft_core::{NodeId, RunId, WorkflowId};

/// A run lifecycle event, emitted by the engine as a run progresses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum RunEvent {
    /// A run has started (transitioned `Pending` -> `Running`).
    Started {
        /// The run.
        run_id: RunId,
        /// The workflow being run.
        workflow_id: WorkflowId,
    },
    /// A node has been dispatched.
    NodeStarted {
        /// The run.
        run_id: RunId,
        /// The node.
        node_id: NodeId,
    },
    /// A node's handler returned successfully.
    NodeCompleted {
        /// The run.
        run_id: RunId,
        /// The node.
        node_id: NodeId,
        /// How long the node took.
        duration: Duration,
    },
    /// A node's handler returned an error, or its deadline expired.
    NodeFailed {
        /// The run.
        run_id: RunId,
        /// The node.
        node_id: NodeId,
        /// Error description.
        error: String,
    },
    /// A run completed successfully.
    Completed {
        /// The run.
        run_id: RunId,
        /// Total run duration.
        duration: Duration,
    },
    /// A run failed.
    Failed {
        /// The run.
        run_id: RunId,
        /// The first failed node's error message (§6 "Run record").
        error: String,
    },
    /// A run was cancelled.
    Cancelled {
        /// The run.
        run_id: RunId,
    },
}

/// Broadcast-based event bus.
///
/// Delivers events to all active subscribers. If no subscribers are
/// listening, events are silently dropped.
///
/// ```
/// use weft_telemetry::{EventBus, RunEvent};
/// use weft_core::{RunId, WorkflowId};
///
/// let bus = EventBus::new(64);
/// let mut sub = bus.subscribe();
///
/// bus.emit(RunEvent::Started {
///     run_id: RunId::v4(),
///     workflow_id: WorkflowId::v4(),
/// });
///
/// assert_eq!(bus.total_emitted(), 1);
/// ```
pub struct EventBus {
    sender: broadcast::Sender<RunEvent>,
    emitted: AtomicU64,
}

impl EventBus {
    /// Create a new event bus with the given channel capacity.
    ///
    /// When the channel is full, the oldest events are dropped (lagging
    /// subscribers will see their next `recv` skip ahead).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            emitted: AtomicU64::new(0),
        }
    }

    /// Emit an event to all subscribers. Returns silently if none are active.
    pub fn emit(&self, event: RunEvent) {
        self.emitted.fetch_add(1, Ordering::Relaxed);
        let _ = self.sender.send(event);
    }

    /// Subscribe to events.
    pub fn subscribe(&self) -> EventSubscriber {
        EventSubscriber {
            receiver: self.sender.subscribe(),
        }
    }

    /// Total number of events emitted since creation.
    #[must_use]
    pub fn total_emitted(&self) -> u64 {
        self.emitted.load(Ordering::Relaxed)
    }

    /// Number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Subscription handle for receiving events from the [`EventBus`].
pub struct EventSubscriber {
    receiver: broadcast::Receiver<RunEvent>,
}

impl EventSubscriber {
    /// Receive the next event, waiting asynchronously. Returns `None` once
    /// the bus is dropped.
    pub async fn recv(&mut self) -> Option<RunEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Try to receive an event without blocking.
    pub fn try_recv(&mut self) -> Option<RunEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_without_subscribers_does_not_panic() {
        let bus = EventBus::new(16);
        bus.emit(RunEvent::Started {
            run_id: RunId::v4(),
            workflow_id: WorkflowId::v4(),
        });
        assert_eq!(bus.total_emitted(), 1);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn subscriber_receives_via_try_recv() {
        let bus = EventBus::new(16);
        let mut sub = bus.subscribe();
        let run_id = RunId::v4();

        bus.emit(RunEvent::Cancelled { run_id });

        let event = sub.try_recv().expect("should receive event");
        assert_eq!(event, RunEvent::Cancelled { run_id });
    }

    #[tokio::test]
    async fn subscriber_receives_via_recv() {
        let bus = EventBus::new(16);
        let mut sub = bus.subscribe();
        let run_id = RunId::v4();

        bus.emit(RunEvent::Completed {
            run_id,
            duration: Duration::from_secs(5),
        });

        let event = sub.recv().await.expect("should receive event");
        match event {
            RunEvent::Completed { run_id: got, duration } => {
                assert_eq!(got, run_id);
                assert_eq!(duration, Duration::from_secs(5));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn multiple_subscribers_each_get_a_copy() {
        let bus = EventBus::new(16);
        let mut sub1 = bus.subscribe();
        let mut sub2 = bus.subscribe();

        bus.emit(RunEvent::Started {
            run_id: RunId::v4(),
            workflow_id: WorkflowId::v4(),
        });

        assert!(sub1.try_recv().is_some());
        assert!(sub2.try_recv().is_some());
    }

    #[test]
    fn subscriber_count_tracks_active_subscriptions() {
        let bus = EventBus::new(16);
        assert_eq!(bus.subscriber_count(), 0);

        let sub1 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        let _sub2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        drop(sub1);
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[test]
    fn run_event_serialization_roundtrip() {
        let run_id = RunId::v4();
        let events = vec![
            RunEvent::Started {
                run_id,
                workflow_id: WorkflowId::v4(),
            },
            RunEvent::Completed {
                run_id,
                duration: Duration::from_millis(1500),
            },
            RunEvent::Failed {
                run_id,
                error: "timeout".into(),
            },
            RunEvent::Cancelled { run_id },
        ];

        for event in events {
            let json = serde_json::to_string(&event).expect("serialize");
            let roundtrip: RunEvent = serde_json::from_str(&json).expect("deserialize");
            assert_eq!(event, roundtrip);
        }
    }
}
