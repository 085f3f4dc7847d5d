//! End-to-end scenarios for the orchestration engine, each exercising
//! one property from the engine's testable-properties list through
//! the public `Orchestrator`/`Strategy` surface rather than the
//! Runner's internals directly.

use opseq_core::guard::{Combinator, FailurePolicy as GuardFailurePolicy, GuardChain};
use opseq_core::{handle_fn, rollback_fn, EventBus, IdGenerator, InMemoryOperationStore, OperationDescriptor, OperationError, OperationStore, RunnerMode, SystemClock};
use opseq_domain::{ActorRef, CapabilityFlags, OperationSpec, OperationState, OperationType, PrimaryKeyKind, RetryPolicy};
use opseq_strategies::{AllowedToFailBatch, Orchestrator, Sequential, TransactionalBatch};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

fn orchestrator() -> (Orchestrator, Arc<InMemoryOperationStore>) {
    let store = Arc::new(InMemoryOperationStore::new());
    let clock = Arc::new(SystemClock);
    let id_gen = Arc::new(IdGenerator::new(PrimaryKeyKind::Id));
    let events = Arc::new(EventBus::new());
    (Orchestrator::new(store.clone(), clock, id_gen, events, RunnerMode::Real), store)
}

fn noop(name: &'static str) -> OperationSpec {
    OperationSpec::new(name, OperationType::Sync).unwrap()
}

// S1 — sequential chain A -> B -> C completes in order.
#[test]
fn s1_sequential_chain_completes_in_executed_order() {
    let (orchestrator, store) = orchestrator();
    let a = OperationDescriptor::new(noop("A"), handle_fn(|_ctx| Ok(())));
    let b = OperationDescriptor::new(noop("B").with_depends_on(["A"]), handle_fn(|_ctx| Ok(())));
    let c = OperationDescriptor::new(noop("C").with_depends_on(["B"]), handle_fn(|_ctx| Ok(())));

    let report = orchestrator.run(vec![a, b, c], &Sequential, ActorRef::system()).unwrap();

    assert_eq!(report.completed, vec!["A", "B", "C"]);
    let a_rec = store.last_completion("A").unwrap();
    let b_rec = store.last_completion("B").unwrap();
    let c_rec = store.last_completion("C").unwrap();
    assert!(a_rec.completed_at.unwrap() <= b_rec.executed_at);
    assert!(b_rec.completed_at.unwrap() <= c_rec.executed_at);
}

// S2 — a two-cycle is rejected before any row is written.
#[test]
fn s2_cycle_is_rejected_with_no_rows_written() {
    let (orchestrator, store) = orchestrator();
    let a = OperationDescriptor::new(noop("A").with_depends_on(["B"]), handle_fn(|_ctx| Ok(())));
    let b = OperationDescriptor::new(noop("B").with_depends_on(["A"]), handle_fn(|_ctx| Ok(())));

    let err = orchestrator.run(vec![a, b], &Sequential, ActorRef::system()).unwrap_err();

    assert!(matches!(err, opseq_core::EngineError::CircularDependency(_)));
    assert!(store.all_records().is_empty());
}

// S3 — two orchestrators racing on the same descriptor and the same
// store produce exactly one Completed row; the loser writes nothing.
#[test]
fn s3_multi_host_race_yields_exactly_one_completion() {
    let store = Arc::new(InMemoryOperationStore::new());
    let clock = Arc::new(SystemClock);
    let events = Arc::new(EventBus::new());

    let make_descriptor = || OperationDescriptor::new(noop("X"), handle_fn(|_ctx| Ok(())));

    let o1 = Orchestrator::new(store.clone(), clock.clone(), Arc::new(IdGenerator::new(PrimaryKeyKind::Id)), events.clone(), RunnerMode::Real);
    let o2 = Orchestrator::new(store.clone(), clock, Arc::new(IdGenerator::new(PrimaryKeyKind::Id)), events, RunnerMode::Real);

    let barrier = Arc::new(std::sync::Barrier::new(2));
    let b1 = barrier.clone();
    let b2 = barrier.clone();

    let t1 = std::thread::spawn(move || {
        b1.wait();
        o1.run(vec![make_descriptor()], &Sequential, ActorRef::system())
    });
    let t2 = std::thread::spawn(move || {
        b2.wait();
        o2.run(vec![make_descriptor()], &Sequential, ActorRef::system())
    });

    let r1 = t1.join().unwrap().unwrap();
    let r2 = t2.join().unwrap().unwrap();

    let total_completed = r1.completed.len() + r2.completed.len();
    assert_eq!(total_completed, 1, "exactly one racer should complete X");
    let completed_rows: Vec<_> = store.all_records().into_iter().filter(|r| r.state == OperationState::Completed).collect();
    assert_eq!(completed_rows.len(), 1);
}

// S4 — a descriptor that fails transiently twice then succeeds ends
// up Completed with two recorded TransientIO errors.
#[test]
fn s4_retry_then_succeed_records_two_transient_errors() {
    let (orchestrator, store) = orchestrator();
    let attempts = Arc::new(AtomicU32::new(0));
    let attempts_in_handle = attempts.clone();

    let retry = RetryPolicy { max_attempts: 3, initial_backoff_ms: 1, backoff_multiplier: 1.0, max_backoff_ms: 1 };
    let r = OperationDescriptor::new(
        noop("R").with_retry(retry),
        handle_fn(move |_ctx| {
            let attempt = attempts_in_handle.fetch_add(1, Ordering::SeqCst);
            if attempt < 2 {
                Err(OperationError::TransientIo("not yet".to_string()))
            } else {
                Ok(())
            }
        }),
    );

    let report = orchestrator.run(vec![r], &Sequential, ActorRef::system()).unwrap();

    assert_eq!(report.completed, vec!["R"]);
    let record = store.last_completion("R").unwrap();
    let errors = store.errors_for(&record.id);
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| e.exception == "TransientIO"));
}

// S5 — within one wave, a failing AllowedToFail descriptor doesn't
// stop its sibling from completing, and the overall run succeeds.
#[test]
fn s5_allowed_to_fail_in_batch_lets_the_plan_succeed() {
    let (orchestrator, _store) = orchestrator();
    let p = OperationDescriptor::new(
        noop("P").with_capabilities(CapabilityFlags::allowed_to_fail()),
        handle_fn(|_ctx| Err(OperationError::OperationFailedIntentionally("P always fails".to_string()))),
    );
    let q = OperationDescriptor::new(noop("Q"), handle_fn(|_ctx| Ok(())));

    let report = orchestrator.run(vec![p, q], &AllowedToFailBatch::new(2), ActorRef::system()).unwrap();

    assert_eq!(report.completed, vec!["Q"]);
    assert_eq!(report.failed_allowed, vec!["P"]);
    assert!(report.failed_hard.is_empty());
    assert_eq!(report.exit_code(), 0);
}

// S6 — under TransactionalBatch, I3 failing rolls back I2 then I1 in
// reverse order; each rollback callback fires exactly once.
#[test]
fn s6_transactional_rollback_runs_in_reverse_order() {
    let (orchestrator, _store) = orchestrator();
    let rollback_order = Arc::new(std::sync::Mutex::new(Vec::new()));

    let make_rollbackable = |name: &'static str, order: Arc<std::sync::Mutex<Vec<&'static str>>>| {
        OperationDescriptor::new(noop(name).with_capabilities(CapabilityFlags::rollbackable()), handle_fn(|_ctx| Ok(())))
            .with_rollback(rollback_fn(move |_ctx| {
                order.lock().unwrap().push(name);
                Ok(())
            }))
    };

    let i1 = make_rollbackable("I1", rollback_order.clone());
    let i2 = make_rollbackable("I2", rollback_order.clone());
    let i3 = OperationDescriptor::new(noop("I3"), handle_fn(|_ctx| Err(OperationError::OperationFailedIntentionally("I3 always fails".to_string()))));

    let report = orchestrator.run(vec![i1, i2, i3], &TransactionalBatch, ActorRef::system()).unwrap();

    assert_eq!(report.rolled_back, vec!["I2", "I1"]);
    assert_eq!(report.failed_hard, vec!["I3"]);
    assert!(report.completed.is_empty());
    assert_eq!(*rollback_order.lock().unwrap(), vec!["I2", "I1"]);
}

// S6b — the failing descriptor is itself Rollbackable. It must still
// land as Failed (its own rollback callback must never run) while I1
// and I2 are compensated in reverse order; the Runner's per-op
// self-rollback would otherwise swallow the abort signal.
#[test]
fn s6b_transactional_rollback_aborts_even_when_failing_op_is_rollbackable() {
    let (orchestrator, store) = orchestrator();
    let rollback_order = Arc::new(std::sync::Mutex::new(Vec::new()));
    let i3_rollback_calls = Arc::new(AtomicU32::new(0));

    let make_rollbackable = |name: &'static str, order: Arc<std::sync::Mutex<Vec<&'static str>>>| {
        OperationDescriptor::new(noop(name).with_capabilities(CapabilityFlags::rollbackable()), handle_fn(|_ctx| Ok(())))
            .with_rollback(rollback_fn(move |_ctx| {
                order.lock().unwrap().push(name);
                Ok(())
            }))
    };

    let i1 = make_rollbackable("I1", rollback_order.clone());
    let i2 = make_rollbackable("I2", rollback_order.clone());
    let i3_calls = i3_rollback_calls.clone();
    let i3 = OperationDescriptor::new(noop("I3").with_capabilities(CapabilityFlags::rollbackable()), handle_fn(|_ctx| Err(OperationError::OperationFailedIntentionally("I3 always fails".to_string()))))
        .with_rollback(rollback_fn(move |_ctx| {
            i3_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }));

    let report = orchestrator.run(vec![i1, i2, i3], &TransactionalBatch, ActorRef::system()).unwrap();

    assert_eq!(report.rolled_back, vec!["I2", "I1"]);
    assert_eq!(report.failed_hard, vec!["I3"]);
    assert!(report.completed.is_empty());
    assert_eq!(*rollback_order.lock().unwrap(), vec!["I2", "I1"]);
    assert_eq!(i3_rollback_calls.load(Ordering::SeqCst), 0, "I3's own rollback must never run; only its siblings are compensated");
    let i3_row = store.all_records().into_iter().find(|r| r.name == "I3").unwrap();
    assert_eq!(i3_row.state, OperationState::Failed);
}

// Guard isolation: a deny-under-skip guard writes exactly one Skipped
// row and no error rows.
#[test]
fn guard_denial_under_skip_writes_one_skipped_row_and_no_errors() {
    let (orchestrator, store) = orchestrator();
    let guards = GuardChain::new(Combinator::And, GuardFailurePolicy::Skip).push(Box::new(opseq_core::guard::CustomGuard::new("maintenance_window", "inside maintenance window", || false)));
    let d = OperationDescriptor::new(noop("M"), handle_fn(|_ctx| Ok(()))).with_guards(guards);

    let report = orchestrator.run(vec![d], &Sequential, ActorRef::system()).unwrap();

    assert_eq!(report.skipped, vec!["M"]);
    let rows: Vec<_> = store.all_records().into_iter().filter(|r| r.name == "M").collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].state, OperationState::Skipped);
    assert!(store.errors_for(&rows[0].id).is_empty());
}
