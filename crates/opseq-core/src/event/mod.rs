//! Synchronous fan-out of lifecycle events to registered observers.
//! Observers run in registration order on the calling thread — their
//! latency counts against the operation, and a panic inside one is
//! caught and logged rather than propagated.

use chrono::{DateTime, Utc};
use opseq_domain::{OperationId, OperationType};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum Event {
    OperationStarted { id: OperationId, name: String, op_type: OperationType, at: DateTime<Utc> },
    OperationCompleted { id: OperationId, name: String, op_type: OperationType, at: DateTime<Utc> },
    OperationFailed { id: OperationId, name: String, op_type: OperationType, at: DateTime<Utc>, error: String },
    OperationSkipped { id: OperationId, name: String, op_type: OperationType, at: DateTime<Utc>, reason: String },
    OperationRolledBack { id: OperationId, name: String, op_type: OperationType, at: DateTime<Utc> },
    OperationRetrying { id: OperationId, name: String, op_type: OperationType, at: DateTime<Utc>, attempt: u32, error: String },
}

pub trait EventObserver: Send + Sync {
    fn on_event(&self, event: &Event);
}

#[derive(Default)]
pub struct EventBus {
    observers: Vec<Arc<dyn EventObserver>>,
}

impl EventBus {
    pub fn new() -> Self {
        EventBus::default()
    }

    pub fn register(&mut self, observer: Arc<dyn EventObserver>) {
        self.observers.push(observer);
    }

    pub fn publish(&self, event: Event) {
        for observer in &self.observers {
            let observer = observer.clone();
            let event_ref = &event;
            let result = catch_unwind(AssertUnwindSafe(|| observer.on_event(event_ref)));
            if result.is_err() {
                log::error!("event observer panicked handling {event_ref:?}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingObserver(Arc<AtomicUsize>);
    impl EventObserver for CountingObserver {
        fn on_event(&self, _event: &Event) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct PanickingObserver;
    impl EventObserver for PanickingObserver {
        fn on_event(&self, _event: &Event) {
            panic!("boom");
        }
    }

    #[test]
    fn observers_run_in_order_and_panics_are_isolated() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut bus = EventBus::new();
        bus.register(Arc::new(PanickingObserver));
        bus.register(Arc::new(CountingObserver(counter.clone())));

        bus.publish(Event::OperationCompleted {
            id: OperationId::new_id(1),
            name: "x".into(),
            op_type: OperationType::Sync,
            at: Utc::now(),
        });

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
