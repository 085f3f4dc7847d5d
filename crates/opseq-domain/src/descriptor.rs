use crate::{CapabilityFlags, DomainError, OperationType, RetryPolicy};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const MAX_NAME_LEN: usize = 255;

/// The static, serializable half of an operation descriptor: name,
/// type, dependency edges, scheduling, and retry knobs. The
/// non-serializable half — the handle and rollback callbacks — lives
/// on `opseq_core::OperationDescriptor`, which wraps one of these plus
/// `Arc<dyn OperationHandle>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationSpec {
    pub name: String,
    pub op_type: OperationType,
    pub depends_on: BTreeSet<String>,
    pub not_before: Option<DateTime<Utc>>,
    pub retry: RetryPolicy,
    pub capabilities: CapabilityFlags,
    pub timeout_ms: Option<u64>,
}

impl OperationSpec {
    pub fn new(name: impl Into<String>, op_type: OperationType) -> Result<Self, DomainError> {
        let name = name.into();
        if name.is_empty() {
            return Err(DomainError::EmptyName);
        }
        if name.len() > MAX_NAME_LEN {
            return Err(DomainError::NameTooLong(name));
        }
        Ok(OperationSpec {
            name,
            op_type,
            depends_on: BTreeSet::new(),
            not_before: None,
            retry: RetryPolicy::default(),
            capabilities: CapabilityFlags::NONE,
            timeout_ms: None,
        })
    }

    pub fn with_depends_on(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.depends_on = names.into_iter().map(Into::into).collect();
        self.capabilities.has_dependencies = !self.depends_on.is_empty();
        self
    }

    pub fn with_not_before(mut self, at: DateTime<Utc>) -> Self {
        self.not_before = Some(at);
        self.capabilities.scheduled = true;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_capabilities(mut self, capabilities: CapabilityFlags) -> Self {
        let scheduled = self.capabilities.scheduled;
        let has_deps = self.capabilities.has_dependencies;
        self.capabilities = capabilities;
        self.capabilities.scheduled |= scheduled;
        self.capabilities.has_dependencies |= has_deps;
        self
    }

    pub fn with_timeout_ms(mut self, ms: u64) -> Self {
        self.timeout_ms = Some(ms);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_oversized_names() {
        assert!(matches!(OperationSpec::new("", OperationType::Sync), Err(DomainError::EmptyName)));
        let long = "x".repeat(256);
        assert!(matches!(OperationSpec::new(long, OperationType::Sync), Err(DomainError::NameTooLong(_))));
    }

    #[test]
    fn depends_on_sets_has_dependencies_flag() {
        let spec = OperationSpec::new("b", OperationType::Sync).unwrap().with_depends_on(["a"]);
        assert!(spec.capabilities.has_dependencies);
    }
}
