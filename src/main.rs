//! Demonstrates the engine end to end: load `EngineConfig` from the
//! environment, build a small migration-style plan where one
//! operation is guarded by an environment check and a later one fails,
//! then run it under `TransactionalBatch` and show the previously
//! committed operations getting rolled back.

use opseq_core::guard::{Combinator, EnvironmentGuard, FailurePolicy, GuardChain};
use opseq_core::{handle_fn, rollback_fn, EventBus, IdGenerator, OperationDescriptor, OperationError};
use opseq_domain::{ActorRef, CapabilityFlags, OperationSpec, OperationType};
use opseq_strategies::{Orchestrator, TransactionalBatch};
use opseq_rust::config::EngineConfig;
use std::sync::Arc;

fn main() {
    env_logger::init();

    let config = match EngineConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            std::process::exit(2);
        }
    };
    println!("loaded config: primary_key_type={:?} parallelism={}", config.primary_key_type, config.parallelism);

    let create_schema = OperationSpec::new("create_schema", OperationType::TransactionalBatch)
        .unwrap()
        .with_capabilities(CapabilityFlags::rollbackable());
    let seed_data = OperationSpec::new("seed_data", OperationType::TransactionalBatch)
        .unwrap()
        .with_depends_on(["create_schema"])
        .with_capabilities(CapabilityFlags::rollbackable());
    let apply_guarded_migration = OperationSpec::new("apply_guarded_migration", OperationType::TransactionalBatch)
        .unwrap()
        .with_depends_on(["seed_data"]);

    let guards = GuardChain::new(Combinator::And, FailurePolicy::Fail).push(Box::new(EnvironmentGuard::new("OPSEQ_DEMO_ENV", ["staging", "production"])));

    let descriptors = vec![
        OperationDescriptor::new(create_schema, handle_fn(|_ctx| {
            log::info!("creating schema");
            Ok(())
        }))
        .with_rollback(rollback_fn(|_ctx| {
            log::info!("dropping schema");
            Ok(())
        })),
        OperationDescriptor::new(seed_data, handle_fn(|_ctx| {
            log::info!("seeding data");
            Ok(())
        }))
        .with_rollback(rollback_fn(|_ctx| {
            log::info!("deleting seed data");
            Ok(())
        })),
        OperationDescriptor::new(apply_guarded_migration, handle_fn(|_ctx| Err(OperationError::OperationFailedIntentionally("unreachable without OPSEQ_DEMO_ENV set".to_string())))).with_guards(guards),
    ];

    let store = Arc::new(opseq_core::InMemoryOperationStore::new());
    let clock = Arc::new(opseq_core::SystemClock);
    let id_gen = Arc::new(IdGenerator::new(config.primary_key_type));
    let events = Arc::new(EventBus::new());

    let orchestrator = Orchestrator::new(store, clock, id_gen, events, opseq_core::RunnerMode::Real);
    let report = orchestrator.run(descriptors, &TransactionalBatch, ActorRef::system()).expect("resolver accepts this acyclic plan");

    println!("{}", serde_json::to_string_pretty(&report).expect("RunReport always serializes"));
    std::process::exit(report.exit_code());
}
