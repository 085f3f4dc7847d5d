use crate::batch::run_wave_parallel;
use crate::report::RunReport;
use crate::strategy::Strategy;
use opseq_core::{CancellationToken, OperationDescriptor, Plan, Runner};
use opseq_domain::ActorRef;
use std::collections::HashMap;

/// Identical wave scheduling to `Batch`; named separately because an
/// operator choosing this strategy is making an explicit statement
/// that failures in this plan are expected and shouldn't page anyone —
/// the abort rule itself (hard failure unless `AllowedToFail`) is
/// already uniform across every strategy.
pub struct AllowedToFailBatch {
    pub parallelism: usize,
}

impl AllowedToFailBatch {
    pub fn new(parallelism: usize) -> Self {
        AllowedToFailBatch { parallelism: parallelism.max(1) }
    }
}

impl Strategy for AllowedToFailBatch {
    fn execute(&self, plan: &Plan, descriptors: &HashMap<String, OperationDescriptor>, runner: &Runner, actor: &ActorRef, cancellation: &CancellationToken) -> RunReport {
        run_wave_parallel(self.parallelism, plan, descriptors, runner, actor, cancellation)
    }
}
