use crate::report::RunReport;
use crate::strategy::{is_hard_failure, Strategy};
use opseq_core::{CancellationToken, Clock, OperationDescriptor, Plan, Runner};
use opseq_domain::ActorRef;
use std::collections::HashMap;
use std::sync::Arc;

/// Like `Sequential`, except a descriptor carrying `not_before` is
/// gated on the clock first. In blocking mode the worker sleeps until
/// `not_before`; in non-blocking mode it's deferred and left Pending
/// for a future `process` invocation to pick up — no row is written
/// for a deferred operation.
pub struct Scheduled {
    pub clock: Arc<dyn Clock>,
    pub blocking: bool,
}

impl Scheduled {
    pub fn new(clock: Arc<dyn Clock>, blocking: bool) -> Self {
        Scheduled { clock, blocking }
    }
}

impl Strategy for Scheduled {
    fn execute(&self, plan: &Plan, descriptors: &HashMap<String, OperationDescriptor>, runner: &Runner, actor: &ActorRef, cancellation: &CancellationToken) -> RunReport {
        let mut report = RunReport::default();
        for wave in &plan.waves {
            for name in &wave.0 {
                if cancellation.is_cancelled() {
                    report.aborted = true;
                    return report;
                }
                let descriptor = &descriptors[name];
                if let Some(not_before) = descriptor.spec.not_before {
                    let now = self.clock.now_utc();
                    if now < not_before {
                        if self.blocking {
                            let wait = (not_before - now).to_std().unwrap_or_default();
                            std::thread::sleep(wait);
                        } else {
                            report.deferred.push(name.clone());
                            continue;
                        }
                    }
                }
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
