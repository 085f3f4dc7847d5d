use crate::report::RunReport;
use crate::strategy::Strategy;
use opseq_core::{CancellationToken, OperationDescriptor, Plan, RunOutcome, Runner};
use opseq_domain::{ActorRef, OperationRecord};
use std::collections::HashMap;

/// Wraps the whole plan in one logical transaction: any Failed
/// operation — `AllowedToFail` or not, since a batch that can't fully
/// commit has nothing sensible to partially keep — aborts the
/// remainder and rolls back every previously Completed operation in
/// this run, in reverse execution order. Dispatch is sequential
/// because there is exactly one enclosing transaction to reason about.
///
/// The currently-running descriptor itself is run with the Runner's
/// self-rollback suppressed (`run_one_in_transaction`), so a Failed
/// outcome here always means the op is still sitting in `Failed` —
/// never already self-compensated — and the batch is the only thing
/// that ever rolls it, and its previously-committed siblings, back.
pub struct TransactionalBatch;

impl Strategy for TransactionalBatch {
    fn execute(&self, plan: &Plan, descriptors: &HashMap<String, OperationDescriptor>, runner: &Runner, actor: &ActorRef, cancellation: &CancellationToken) -> RunReport {
        let mut report = RunReport::default();
        let mut completed_in_order: Vec<(&OperationDescriptor, OperationRecord)> = Vec::new();
        let mut abort_reason: Option<String> = None;

        'outer: for wave in &plan.waves {
            for name in &wave.0 {
                if cancellation.is_cancelled() {
                    abort_reason = Some("cancelled".to_string());
                    break 'outer;
                }
                let descriptor = &descriptors[name];
                let outcome = match runner.run_one_in_transaction(descriptor, actor.clone(), cancellation) {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        abort_reason = Some(e.to_string());
                        break 'outer;
                    }
                };
                match &outcome {
                    RunOutcome::Completed(record) => completed_in_order.push((descriptor, record.clone())),
                    RunOutcome::Failed(_) => {
                        report.record(name, false, &outcome);
                        abort_reason = Some(format!("{name} failed"));
                        break 'outer;
                    }
                    _ => {}
                }
                report.record(name, descriptor.spec.capabilities.allowed_to_fail, &outcome);
            }
        }

        if let Some(reason) = abort_reason {
            log::warn!("transactional batch aborting: {reason}");
            report.aborted = true;
            for (descriptor, record) in completed_in_order.into_iter().rev() {
                match runner.compensate(&record, descriptor, cancellation) {
                    Ok(_) => report.rolled_back.push(descriptor.name().to_string()),
                    Err(e) => log::error!("rollback of {} failed: {e}", descriptor.name()),
                }
            }
            // The operations that committed before the abort are no
            // longer "completed" from the caller's point of view.
            report.completed.retain(|n| !report.rolled_back.contains(n));
        }

        report
    }
}
