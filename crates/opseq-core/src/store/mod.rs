//! `OperationStore` is the one port the engine depends on for
//! persistence. It doubles as a distributed mutex via
//! `begin_exclusive`: the concrete backend an operator wires in is
//! explicitly out of scope here, so the only implementation shipped is
//! `InMemoryOperationStore`, used for the demo CLI, fake mode, and
//! every scenario test.

pub mod memory;

use crate::errors::EngineError;
use chrono::{DateTime, Utc};
use opseq_domain::{ActorRef, ErrorRecord, OperationId, OperationRecord, OperationState, OperationType};

pub use memory::InMemoryOperationStore;

/// Held for the duration of a single Runner invocation. Release is
/// guaranteed on drop, so a panicking handle never leaks the lock.
pub struct LockHandle {
    name: String,
    release: Box<dyn FnOnce(&str) + Send>,
}

impl LockHandle {
    pub fn new(name: impl Into<String>, release: impl FnOnce(&str) + Send + 'static) -> Self {
        LockHandle { name: name.into(), release: Box::new(release) }
    }
}

impl Drop for LockHandle {
    fn drop(&mut self) {
        let release = std::mem::replace(&mut self.release, Box::new(|_| {}));
        release(&self.name);
    }
}

pub enum LockOutcome {
    Acquired(LockHandle),
    Busy,
}

pub trait OperationStore: Send + Sync {
    /// Acquires the advisory lock for `name` without waiting; returns
    /// `Busy` immediately if another runner already holds it.
    fn begin_exclusive(&self, name: &str) -> LockOutcome;

    fn insert_pending(&self, id: OperationId, name: &str, op_type: OperationType, actor: ActorRef, executed_at: DateTime<Utc>) -> Result<OperationRecord, EngineError>;

    fn transition(&self, id: &OperationId, new_state: OperationState, at: DateTime<Utc>, skip_reason: Option<String>) -> Result<(), EngineError>;

    fn record_error(&self, error: ErrorRecord) -> Result<(), EngineError>;

    /// `None` if the name has never had a Completed row (or only
    /// Idempotent re-runs, which don't suppress future runs).
    fn last_completion(&self, name: &str) -> Option<OperationRecord>;

    /// Names with no Completed row and `not_before <= now`, in
    /// ascending lexicographic order.
    fn pending_names(&self, now: DateTime<Utc>) -> Vec<String>;

    fn get(&self, id: &OperationId) -> Option<OperationRecord>;

    fn errors_for(&self, id: &OperationId) -> Vec<ErrorRecord>;

    fn all_records(&self) -> Vec<OperationRecord>;
}
