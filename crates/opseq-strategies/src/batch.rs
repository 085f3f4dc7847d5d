use crate::report::RunReport;
use crate::strategy::{is_hard_failure, Strategy};
use opseq_core::{CancellationToken, OperationDescriptor, Plan, Runner};
use opseq_domain::ActorRef;
use rayon::prelude::*;
use std::collections::HashMap;

/// Dispatches every descriptor within a wave concurrently, bounded by
/// `parallelism` worker threads; waves themselves are barrier-synced —
/// wave `k+1` never starts until every descriptor in wave `k` has
/// finished (or the wave aborted).
pub struct Batch {
    pub parallelism: usize,
}

impl Batch {
    pub fn new(parallelism: usize) -> Self {
        Batch { parallelism: parallelism.max(1) }
    }
}

impl Strategy for Batch {
    fn execute(&self, plan: &Plan, descriptors: &HashMap<String, OperationDescriptor>, runner: &Runner, actor: &ActorRef, cancellation: &CancellationToken) -> RunReport {
        run_wave_parallel(self.parallelism, plan, descriptors, runner, actor, cancellation)
    }
}

/// Shared by `Batch`, `AllowedToFailBatch`, and `DependencyGraph` — all
/// three execute a plan the same way; they differ only in what a
/// descriptor's own `AllowedToFail` flag means relative to the
/// strategy's *name*, not in how waves are scheduled.
pub(crate) fn run_wave_parallel(parallelism: usize, plan: &Plan, descriptors: &HashMap<String, OperationDescriptor>, runner: &Runner, actor: &ActorRef, cancellation: &CancellationToken) -> RunReport {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(parallelism.max(1))
        .build()
        .expect("thread pool with a positive thread count always builds");

    let mut report = RunReport::default();
    for wave in &plan.waves {
        if cancellation.is_cancelled() {
            report.aborted = true;
            return report;
        }
        let results: Vec<(String, bool, Result<opseq_core::RunOutcome, String>)> = pool.install(|| {
            wave.0
                .par_iter()
                .map(|name| {
                    let descriptor = &descriptors[name];
                    let outcome = runner.run_one(descriptor, actor.clone(), cancellation).map_err(|e| e.to_string());
                    (name.clone(), descriptor.spec.capabilities.allowed_to_fail, outcome)
                })
                .collect()
        });

        let mut hard_failure_in_wave = false;
        for (name, allowed_to_fail, outcome) in results {
            match outcome {
                Ok(outcome) => {
                    let descriptor = &descriptors[&name];
                    if is_hard_failure(descriptor, &outcome) {
                        hard_failure_in_wave = true;
                    }
                    report.record(&name, allowed_to_fail, &outcome);
                }
                Err(e) => {
                    log::error!("store error running {name}: {e}");
                    hard_failure_in_wave = true;
                }
            }
        }
        if hard_failure_in_wave {
            report.aborted = true;
            return report;
        }
    }
    report
}
