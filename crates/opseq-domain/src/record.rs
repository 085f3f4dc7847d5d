use crate::{ActorRef, OperationId, OperationState, OperationType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The persisted row for a single operation run. Created by the Runner
/// the moment a Pending row is written (before guard evaluation),
/// mutated only by the Runner holding the advisory lock for `name`,
/// and never deleted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationRecord {
    pub id: OperationId,
    pub name: String,
    pub op_type: OperationType,
    pub state: OperationState,
    pub actor: ActorRef,
    pub executed_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub failed_at: Option<DateTime<Utc>>,
    pub skipped_at: Option<DateTime<Utc>>,
    pub rolled_back_at: Option<DateTime<Utc>>,
    pub skip_reason: Option<String>,
}

impl OperationRecord {
    pub fn new_pending(id: OperationId, name: impl Into<String>, op_type: OperationType, actor: ActorRef, executed_at: DateTime<Utc>) -> Self {
        OperationRecord {
            id,
            name: name.into(),
            op_type,
            state: OperationState::Pending,
            actor,
            executed_at,
            completed_at: None,
            failed_at: None,
            skipped_at: None,
            rolled_back_at: None,
            skip_reason: None,
        }
    }

    /// Checks the invariants from the data model: exactly one terminal
    /// timestamp once the state has left Pending/Running, and every
    /// terminal timestamp is at or after `executed_at`.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.state.is_terminal() {
            let terminal_stamps = [self.completed_at, self.failed_at, self.skipped_at];
            let set = terminal_stamps.iter().filter(|t| t.is_some()).count();
            if set != 1 {
                return Err(format!("operation {} ({:?}) must have exactly one terminal timestamp, has {}", self.name, self.state, set));
            }
            for stamp in terminal_stamps.into_iter().flatten().chain(self.rolled_back_at) {
                if stamp < self.executed_at {
                    return Err(format!("operation {} has a terminal timestamp before executed_at", self.name));
                }
            }
        }
        Ok(())
    }
}

/// One row per failed attempt. Cascade-deletes with its owning
/// operation (enforced by the store, not by this crate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub operation_id: OperationId,
    pub exception: String,
    pub message: String,
    pub trace: String,
    pub context: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}
