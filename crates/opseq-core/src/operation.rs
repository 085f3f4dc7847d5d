use crate::guard::{FailurePolicy, GuardChain, Verdict};
use crate::handle::{OperationHandle, RollbackHandle};
use opseq_domain::OperationSpec;
use std::sync::Arc;

/// The full, dispatchable operation: the serializable `OperationSpec`
/// plus the behavior the spec can't carry. Built once by the caller
/// and handed to the Orchestrator as a set.
#[derive(Clone)]
pub struct OperationDescriptor {
    pub spec: OperationSpec,
    pub handle: Arc<dyn OperationHandle>,
    pub rollback: Option<Arc<dyn RollbackHandle>>,
    pub guards: Option<Arc<GuardChain>>,
    pub guard_failure_policy: Option<FailurePolicy>,
}

impl OperationDescriptor {
    pub fn new(spec: OperationSpec, handle: Arc<dyn OperationHandle>) -> Self {
        OperationDescriptor { spec, handle, rollback: None, guards: None, guard_failure_policy: None }
    }

    pub fn with_rollback(mut self, rollback: Arc<dyn RollbackHandle>) -> Self {
        self.rollback = Some(rollback);
        self.spec.capabilities.rollbackable = true;
        self
    }

    pub fn with_guards(mut self, guards: GuardChain) -> Self {
        self.guard_failure_policy = Some(guards.on_deny);
        self.guards = Some(Arc::new(guards));
        self
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn evaluate_guards(&self) -> Option<Verdict> {
        self.guards.as_ref().map(|chain| chain.evaluate())
    }
}
