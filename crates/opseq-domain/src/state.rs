use serde::{Deserialize, Serialize};

/// `Pending -> Running -> {Completed, Failed, Skipped}`, with
/// `Failed -> RolledBack` as the one terminal-to-terminal edge. The
/// Runner is the only writer of this field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationState {
    Pending,
    Running,
    Completed,
    Failed,
    Skipped,
    RolledBack,
}

impl OperationState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OperationState::Pending | OperationState::Running)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationState::Pending => "pending",
            OperationState::Running => "running",
            OperationState::Completed => "completed",
            OperationState::Failed => "failed",
            OperationState::Skipped => "skipped",
            OperationState::RolledBack => "rolled_back",
        }
    }
}
