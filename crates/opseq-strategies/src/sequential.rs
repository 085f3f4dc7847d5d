use crate::report::RunReport;
use crate::strategy::{is_hard_failure, Strategy};
use opseq_core::{CancellationToken, OperationDescriptor, Plan, Runner};
use opseq_domain::ActorRef;
use std::collections::HashMap;

/// Runs every descriptor to completion, one at a time, in the plan's
/// wave-then-name order. The first hard failure aborts the rest.
pub struct Sequential;

impl Strategy for Sequential {
    fn execute(&self, plan: &Plan, descriptors: &HashMap<String, OperationDescriptor>, runner: &Runner, actor: &ActorRef, cancellation: &CancellationToken) -> RunReport {
        let mut report = RunReport::default();
        for wave in &plan.waves {
            for name in &wave.0 {
                if cancellation.is_cancelled() {
                    report.aborted = true;
                    return report;
                }
                let descriptor = &descriptors[name];
                let outcome = match runner.run_one(descriptor, actor.clone(), cancellation) {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        log::error!("store error running {name}: {e}");
                        report.aborted = true;
                        return report;
                    }
                };
                let hard = is_hard_failure(descriptor, &outcome);
                report.record(name, descriptor.spec.capabilities.allowed_to_fail, &outcome);
                if hard {
                    report.aborted = true;
                    return report;
                }
            }
        }
        report
    }
}
