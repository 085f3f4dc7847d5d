use crate::batch::run_wave_parallel;
use crate::report::RunReport;
use crate::strategy::Strategy;
use opseq_core::{CancellationToken, OperationDescriptor, Plan, Runner};
use opseq_domain::ActorRef;
use std::collections::HashMap;

/// Wave-parallel, same as `Batch`, but logs the resolver's own wave
/// composition so the caller can see the dependency-aware schedule it
/// is actually getting rather than an opaque concurrency policy.
pub struct DependencyGraph {
    pub parallelism: usize,
}

impl DependencyGraph {
    pub fn new(parallelism: usize) -> Self {
        DependencyGraph { parallelism: parallelism.max(1) }
    }
}

impl Strategy for DependencyGraph {
    fn execute(&self, plan: &Plan, descriptors: &HashMap<String, OperationDescriptor>, runner: &Runner, actor: &ActorRef, cancellation: &CancellationToken) -> RunReport {
        for (i, wave) in plan.waves.iter().enumerate() {
            log::debug!("wave {i}: {:?}", wave.0);
        }
        run_wave_parallel(self.parallelism, plan, descriptors, runner, actor, cancellation)
    }
}
