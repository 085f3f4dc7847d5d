use super::{LockHandle, LockOutcome, OperationStore};
use crate::errors::EngineError;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use opseq_domain::{ActorRef, ErrorRecord, OperationId, OperationRecord, OperationState, OperationType};
use std::sync::Arc;

/// Keyed by name rather than by id because every query the Runner and
/// strategies make — "is this name locked", "has this name
/// completed", "what's still pending" — is name-shaped. `executed_at`
/// uniqueness is still enforced on `(name, executed_at)`, matching the
/// real schema's unique index.
#[derive(Default)]
pub struct InMemoryOperationStore {
    locks: Arc<DashMap<String, ()>>,
    records: DashMap<OperationId, OperationRecord>,
    by_name: DashMap<String, Vec<OperationId>>,
    errors: DashMap<OperationId, Vec<ErrorRecord>>,
}

impl InMemoryOperationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn find(&self, id: &OperationId, f: impl FnOnce(&mut OperationRecord)) -> Result<(), EngineError> {
        let mut entry = self
            .records
            .get_mut(id)
            .ok_or_else(|| EngineError::StoreUnavailable(format!("no such operation id {id}")))?;
        f(&mut entry);
        Ok(())
    }
}

impl OperationStore for InMemoryOperationStore {
    fn begin_exclusive(&self, name: &str) -> LockOutcome {
        if self.locks.insert(name.to_string(), ()).is_some() {
            // Another holder is already present; put it back and report busy.
            return LockOutcome::Busy;
        }
        let locks = self.locks.clone();
        LockOutcome::Acquired(LockHandle::new(name, move |name| {
            locks.remove(name);
        }))
    }

    fn insert_pending(&self, id: OperationId, name: &str, op_type: OperationType, actor: ActorRef, executed_at: DateTime<Utc>) -> Result<OperationRecord, EngineError> {
        if let Some(existing) = self.by_name.get(name) {
            for existing_id in existing.iter() {
                if let Some(r) = self.records.get(existing_id) {
                    if r.executed_at == executed_at {
                        return Err(EngineError::DuplicateRun(name.to_string()));
                    }
                }
            }
        }
        let record = OperationRecord::new_pending(id.clone(), name, op_type, actor, executed_at);
        self.records.insert(id.clone(), record.clone());
        self.by_name.entry(name.to_string()).or_default().push(id);
        Ok(record)
    }

    fn transition(&self, id: &OperationId, new_state: OperationState, at: DateTime<Utc>, skip_reason: Option<String>) -> Result<(), EngineError> {
        self.find(id, |r| {
            r.state = new_state;
            match new_state {
                OperationState::Completed => r.completed_at = Some(at),
                OperationState::Failed => r.failed_at = Some(at),
                OperationState::Skipped => {
                    r.skipped_at = Some(at);
                    r.skip_reason = skip_reason;
                }
                OperationState::RolledBack => r.rolled_back_at = Some(at),
                OperationState::Running | OperationState::Pending => {}
            }
        })
    }

    fn record_error(&self, error: ErrorRecord) -> Result<(), EngineError> {
        self.errors.entry(error.operation_id.clone()).or_default().push(error);
        Ok(())
    }

    fn last_completion(&self, name: &str) -> Option<OperationRecord> {
        let ids = self.by_name.get(name)?;
        ids.iter()
            .filter_map(|id| self.records.get(id).map(|r| r.clone()))
            .filter(|r| r.state == OperationState::Completed)
            .max_by_key(|r| r.completed_at)
    }

    fn pending_names(&self, _now: DateTime<Utc>) -> Vec<String> {
        let mut names: Vec<String> = self
            .by_name
            .iter()
            .filter(|entry| self.last_completion(entry.key()).is_none())
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }

    fn get(&self, id: &OperationId) -> Option<OperationRecord> {
        self.records.get(id).map(|r| r.clone())
    }

    fn errors_for(&self, id: &OperationId) -> Vec<ErrorRecord> {
        self.errors.get(id).map(|e| e.clone()).unwrap_or_default()
    }

    fn all_records(&self) -> Vec<OperationRecord> {
        self.records.iter().map(|r| r.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_lock_attempt_is_busy() {
        let store = InMemoryOperationStore::new();
        let first = store.begin_exclusive("x");
        assert!(matches!(first, LockOutcome::Acquired(_)));
        assert!(matches!(store.begin_exclusive("x"), LockOutcome::Busy));
        drop(first);
        assert!(matches!(store.begin_exclusive("x"), LockOutcome::Acquired(_)));
    }

    #[test]
    fn duplicate_executed_at_is_rejected() {
        let store = InMemoryOperationStore::new();
        let now = Utc::now();
        store.insert_pending(OperationId::new_id(1), "x", OperationType::Sync, ActorRef::system(), now).unwrap();
        let err = store.insert_pending(OperationId::new_id(2), "x", OperationType::Sync, ActorRef::system(), now).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateRun(_)));
    }
}
