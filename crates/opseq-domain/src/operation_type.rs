use serde::{Deserialize, Serialize};

/// The strategy an operation is declared against. Distinct from
/// `CapabilityFlags`: a descriptor's type says which strategy is
/// expected to drive it, capabilities say what it can do once driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    Sync,
    Async,
    Batch,
    Chain,
    DependencyGraph,
    Scheduled,
    AllowedToFailBatch,
    TransactionalBatch,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Sync => "sync",
            OperationType::Async => "async",
            OperationType::Batch => "batch",
            OperationType::Chain => "chain",
            OperationType::DependencyGraph => "dependency_graph",
            OperationType::Scheduled => "scheduled",
            OperationType::AllowedToFailBatch => "allowed_to_fail_batch",
            OperationType::TransactionalBatch => "transactional_batch",
        }
    }
}
