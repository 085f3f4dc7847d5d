use serde::{Deserialize, Serialize};

/// Capability bits on a descriptor. These are orthogonal to
/// `OperationType` — a `Scheduled`-typed operation may or may not be
/// `Rollbackable`, and a plain `Sync` operation may still be flagged
/// `Idempotent`. Keeping them as a bit set rather than folding them into
/// the type tag lets a descriptor carry any combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CapabilityFlags {
    /// Carries a compensating rollback callback.
    pub rollbackable: bool,
    /// A failure of this operation does not abort the enclosing batch.
    pub allowed_to_fail: bool,
    /// Re-running a Completed operation by this name is not an error;
    /// the at-most-one-completion invariant is waived.
    pub idempotent: bool,
    /// Carries a `not_before` timestamp that gates dispatch.
    pub scheduled: bool,
    /// Carries one or more `depends_on` edges.
    pub has_dependencies: bool,
    /// Carries a predicate the guard chain must evaluate before running.
    pub conditional_execution: bool,
}

impl CapabilityFlags {
    pub const NONE: CapabilityFlags = CapabilityFlags {
        rollbackable: false,
        allowed_to_fail: false,
        idempotent: false,
        scheduled: false,
        has_dependencies: false,
        conditional_execution: false,
    };

    pub fn rollbackable() -> Self {
        CapabilityFlags { rollbackable: true, ..Self::NONE }
    }

    pub fn allowed_to_fail() -> Self {
        CapabilityFlags { allowed_to_fail: true, ..Self::NONE }
    }

    pub fn with_rollbackable(mut self, v: bool) -> Self {
        self.rollbackable = v;
        self
    }

    pub fn with_allowed_to_fail(mut self, v: bool) -> Self {
        self.allowed_to_fail = v;
        self
    }

    pub fn with_idempotent(mut self, v: bool) -> Self {
        self.idempotent = v;
        self
    }
}
