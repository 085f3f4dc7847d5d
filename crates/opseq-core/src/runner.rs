//! The per-operation state machine:
//! `New -> Locked -> Guarded -> Running -> {Completed, Failed, Skipped}
//! [-> RolledBack]`. One `Runner` is shared (behind `Arc`) by every
//! worker thread a strategy spins up; all of its state is either
//! immutable or lives behind the store's own interior mutability.

use crate::cancellation::CancellationToken;
use crate::clock::Clock;
use crate::errors::{EngineError, OperationError};
use crate::event::{Event, EventBus};
use crate::fake::RunnerMode;
use crate::guard::{FailurePolicy, Verdict};
use crate::handle::OperationContext;
use crate::identity::IdGenerator;
use crate::operation::OperationDescriptor;
use crate::retry::backoff_with_jitter;
use crate::store::{LockOutcome, OperationStore};
use opseq_domain::{ActorRef, ErrorRecord, OperationId, OperationRecord, OperationState};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum RunOutcome {
    Completed(OperationRecord),
    Failed(OperationRecord),
    Skipped(OperationRecord),
    RolledBack(OperationRecord),
    /// The advisory lock was held by another runner; no row was
    /// written by this run.
    SkippedBusy,
    /// A Completed row already existed (and the operation is not
    /// `Idempotent`); no new row was written.
    AlreadyCompleted(OperationRecord),
}

pub struct Runner {
    store: Arc<dyn OperationStore>,
    clock: Arc<dyn Clock>,
    id_gen: Arc<IdGenerator>,
    events: Arc<EventBus>,
    mode: RunnerMode,
}

impl Runner {
    pub fn new(store: Arc<dyn OperationStore>, clock: Arc<dyn Clock>, id_gen: Arc<IdGenerator>, events: Arc<EventBus>, mode: RunnerMode) -> Self {
        Runner { store, clock, id_gen, events, mode }
    }

    /// Runs one descriptor to a terminal outcome. If the operation
    /// exhausts retries and is `Rollbackable`, its own rollback
    /// callback is invoked in place (terminal `RolledBack` instead of
    /// `Failed`).
    pub fn run_one(&self, descriptor: &OperationDescriptor, actor: ActorRef, cancellation: &CancellationToken) -> Result<RunOutcome, EngineError> {
        self.run_one_impl(descriptor, actor, cancellation, true)
    }

    /// Runs one descriptor without the terminal self-rollback: used by
    /// `TransactionalBatch`, where a failing descriptor must surface as
    /// `Failed` so the batch can decide what to compensate, rather than
    /// rolling itself back before the batch even sees the outcome.
    pub fn run_one_in_transaction(&self, descriptor: &OperationDescriptor, actor: ActorRef, cancellation: &CancellationToken) -> Result<RunOutcome, EngineError> {
        self.run_one_impl(descriptor, actor, cancellation, false)
    }

    fn run_one_impl(&self, descriptor: &OperationDescriptor, actor: ActorRef, cancellation: &CancellationToken, self_rollback: bool) -> Result<RunOutcome, EngineError> {
        if let RunnerMode::Recording(recorder) = &self.mode {
            recorder.record(descriptor.spec.op_type, descriptor.name());
            let synthetic = OperationRecord::new_pending(self.id_gen.next(self.clock.as_ref()), descriptor.name(), descriptor.spec.op_type, actor, self.clock.now_utc());
            return Ok(RunOutcome::Completed(synthetic));
        }

        let name = descriptor.name().to_string();

        let lock = match self.store.begin_exclusive(&name) {
            LockOutcome::Busy => {
                log::debug!("operation {name} busy, skipping this run");
                return Ok(RunOutcome::SkippedBusy);
            }
            LockOutcome::Acquired(lock) => lock,
        };

        if !descriptor.spec.capabilities.idempotent {
            if let Some(existing) = self.store.last_completion(&name) {
                log::debug!("operation {name} already completed, not idempotent, skipping");
                drop(lock);
                return Ok(RunOutcome::AlreadyCompleted(existing));
            }
        }

        let id = self.id_gen.next(self.clock.as_ref());
        let executed_at = self.clock.now_utc();
        let mut record = self.store.insert_pending(id.clone(), &name, descriptor.spec.op_type, actor, executed_at)?;
        self.store.transition(&id, OperationState::Running, executed_at, None)?;
        self.events.publish(Event::OperationStarted { id: id.clone(), name: name.clone(), op_type: descriptor.spec.op_type, at: executed_at });
        log::info!("operation {name} started");

        if let Some(verdict) = descriptor.evaluate_guards() {
            if let Verdict::Deny { reason } = verdict {
                let at = self.clock.now_utc();
                let outcome = self.deny(&id, &mut record, &name, descriptor, reason, at)?;
                drop(lock);
                return Ok(outcome);
            }
        }

        let outcome = self.execute_with_retries(&id, &mut record, &name, descriptor, cancellation, self_rollback)?;
        drop(lock);
        Ok(outcome)
    }

    fn deny(&self, id: &OperationId, record: &mut OperationRecord, name: &str, descriptor: &OperationDescriptor, reason: String, at: chrono::DateTime<chrono::Utc>) -> Result<RunOutcome, EngineError> {
        let policy = descriptor.guard_failure_policy.unwrap_or(FailurePolicy::Skip);
        match policy {
            FailurePolicy::Skip => {
                self.store.transition(id, OperationState::Skipped, at, Some(reason.clone()))?;
                record.state = OperationState::Skipped;
                record.skipped_at = Some(at);
                record.skip_reason = Some(reason.clone());
                self.events.publish(Event::OperationSkipped { id: id.clone(), name: name.to_string(), op_type: descriptor.spec.op_type, at, reason: reason.clone() });
                log::warn!("operation {name} skipped by guard: {reason}");
                Ok(RunOutcome::Skipped(record.clone()))
            }
            FailurePolicy::Fail => {
                let error = OperationError::GuardDenied(reason.clone());
                self.store.record_error(ErrorRecord { operation_id: id.clone(), exception: error.kind_name().to_string(), message: error.to_string(), trace: format!("{error:?}"), context: None, created_at: at })?;
                self.store.transition(id, OperationState::Failed, at, None)?;
                record.state = OperationState::Failed;
                record.failed_at = Some(at);
                self.events.publish(Event::OperationFailed { id: id.clone(), name: name.to_string(), op_type: descriptor.spec.op_type, at, error: error.to_string() });
                log::error!("operation {name} failed by guard: {reason}");
                Ok(RunOutcome::Failed(record.clone()))
            }
        }
    }

    fn execute_with_retries(&self, id: &OperationId, record: &mut OperationRecord, name: &str, descriptor: &OperationDescriptor, cancellation: &CancellationToken, self_rollback: bool) -> Result<RunOutcome, EngineError> {
        let policy = descriptor.spec.retry;
        let mut final_error: Option<OperationError> = None;

        for attempt in 1..=policy.max_attempts.max(1) {
            if cancellation.is_cancelled() {
                final_error = Some(OperationError::Cancelled);
                break;
            }
            let ctx = OperationContext { attempt, cancellation: cancellation.clone() };
            match descriptor.handle.run(&ctx) {
                Ok(()) => {
                    let at = self.clock.now_utc();
                    self.store.transition(id, OperationState::Completed, at, None)?;
                    record.state = OperationState::Completed;
                    record.completed_at = Some(at);
                    self.events.publish(Event::OperationCompleted { id: id.clone(), name: name.to_string(), op_type: descriptor.spec.op_type, at });
                    log::info!("operation {name} completed on attempt {attempt}");
                    return Ok(RunOutcome::Completed(record.clone()));
                }
                Err(OperationError::SkipOperation(reason)) => {
                    let at = self.clock.now_utc();
                    self.store.transition(id, OperationState::Skipped, at, Some(reason.clone()))?;
                    record.state = OperationState::Skipped;
                    record.skipped_at = Some(at);
                    record.skip_reason = Some(reason.clone());
                    self.events.publish(Event::OperationSkipped { id: id.clone(), name: name.to_string(), op_type: descriptor.spec.op_type, at, reason: reason.clone() });
                    log::warn!("operation {name} skipped itself: {reason}");
                    return Ok(RunOutcome::Skipped(record.clone()));
                }
                Err(err) => {
                    let at = self.clock.now_utc();
                    self.store.record_error(ErrorRecord { operation_id: id.clone(), exception: err.kind_name().to_string(), message: err.to_string(), trace: format!("{err:?}"), context: None, created_at: at })?;
                    if err.is_retriable() && attempt < policy.max_attempts.max(1) {
                        self.events.publish(Event::OperationRetrying { id: id.clone(), name: name.to_string(), op_type: descriptor.spec.op_type, at, attempt, error: err.to_string() });
                        log::warn!("operation {name} attempt {attempt} failed, retrying: {err}");
                        std::thread::sleep(backoff_with_jitter(&policy, attempt - 1));
                        continue;
                    }
                    final_error = Some(err);
                    break;
                }
            }
        }

        let error = final_error.expect("loop only exits with a recorded error or an early return");
        let at = self.clock.now_utc();
        self.store.transition(id, OperationState::Failed, at, None)?;
        record.state = OperationState::Failed;
        record.failed_at = Some(at);
        self.events.publish(Event::OperationFailed { id: id.clone(), name: name.to_string(), op_type: descriptor.spec.op_type, at, error: error.to_string() });
        log::error!("operation {name} failed terminally: {error}");

        if self_rollback && descriptor.spec.capabilities.rollbackable && !matches!(error, OperationError::Cancelled) {
            if let Some(rollback) = &descriptor.rollback {
                let ctx = OperationContext { attempt: 1, cancellation: cancellation.clone() };
                if rollback.rollback(&ctx).is_ok() {
                    let at = self.clock.now_utc();
                    self.store.transition(id, OperationState::RolledBack, at, None)?;
                    record.state = OperationState::RolledBack;
                    record.rolled_back_at = Some(at);
                    self.events.publish(Event::OperationRolledBack { id: id.clone(), name: name.to_string(), op_type: descriptor.spec.op_type, at });
                    log::warn!("operation {name} rolled back after terminal failure");
                    return Ok(RunOutcome::RolledBack(record.clone()));
                }
            }
        }

        Ok(RunOutcome::Failed(record.clone()))
    }

    /// Compensates an *already-Completed* sibling as part of a
    /// transactional batch's rollback, as opposed to `execute_with_retries`'s
    /// post-failure rollback of the operation that just failed itself.
    /// Rollbackable descriptors get their callback invoked exactly once;
    /// non-rollbackable ones are compensated store-only (the record is
    /// marked RolledBack with no callback to run).
    pub fn compensate(&self, record: &OperationRecord, descriptor: &OperationDescriptor, cancellation: &CancellationToken) -> Result<RunOutcome, EngineError> {
        if let Some(rollback) = &descriptor.rollback {
            let ctx = OperationContext { attempt: 1, cancellation: cancellation.clone() };
            rollback.rollback(&ctx).map_err(|e| EngineError::StoreUnavailable(format!("rollback of {} failed: {e}", descriptor.name())))?;
        }
        let at = self.clock.now_utc();
        self.store.transition(&record.id, OperationState::RolledBack, at, None)?;
        let mut updated = record.clone();
        updated.state = OperationState::RolledBack;
        updated.rolled_back_at = Some(at);
        self.events.publish(Event::OperationRolledBack { id: record.id.clone(), name: descriptor.name().to_string(), op_type: descriptor.spec.op_type, at });
        log::warn!("operation {} compensated (transactional abort)", descriptor.name());
        Ok(RunOutcome::RolledBack(updated))
    }
}
