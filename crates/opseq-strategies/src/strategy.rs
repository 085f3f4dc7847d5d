use crate::report::RunReport;
use opseq_core::{CancellationToken, OperationDescriptor, Plan, Runner};
use opseq_domain::ActorRef;
use std::collections::HashMap;

/// Converts a resolved plan into concrete Runner invocations. Every
/// strategy shares the same abort rule: a hard failure (not flagged
/// `AllowedToFail`) stops dispatch of the remainder of the plan.
pub trait Strategy: Send + Sync {
    fn execute(&self, plan: &Plan, descriptors: &HashMap<String, OperationDescriptor>, runner: &Runner, actor: &ActorRef, cancellation: &CancellationToken) -> RunReport;
}

pub(crate) fn is_hard_failure(descriptor: &OperationDescriptor, outcome: &opseq_core::RunOutcome) -> bool {
    matches!(outcome, opseq_core::RunOutcome::Failed(_)) && !descriptor.spec.capabilities.allowed_to_fail
}
