//! Thin demonstration binary for the orchestration engine. Wires an
//! `InMemoryOperationStore` to a handful of sample descriptors and
//! drives them through one of the execution strategies, printing the
//! resulting `RunReport`. A real deployment would swap the in-memory
//! store for a relational one and load descriptors from its own
//! config, not from this file.

use clap::{Parser, Subcommand, ValueEnum};
use opseq_core::{
    handle_fn, rollback_fn, CancellationToken, EventBus, IdGenerator, OperationDescriptor, OperationError, OperationStore, Runner, RunnerMode, SystemClock,
};
use opseq_domain::{ActorRef, CapabilityFlags, OperationSpec, OperationType, PrimaryKeyKind, RetryPolicy};
use opseq_strategies::{AllowedToFailBatch, Batch, DependencyGraph, Orchestrator, Scheduled, Sequential, Strategy, TransactionalBatch};
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "opseq-cli", about = "Demo driver for the deployment operation sequencer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the bundled sample plan to completion.
    Process {
        #[arg(long, value_enum, default_value_t = StrategyKind::Sequential)]
        strategy: StrategyKind,
        #[arg(long, default_value_t = 4)]
        parallelism: usize,
    },
    /// Print the state of every operation the store has ever seen.
    Status,
    /// Re-run the rollback callback for a named, previously-Completed operation.
    Rollback { name: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyKind {
    Sequential,
    Batch,
    AllowedToFailBatch,
    DependencyGraph,
    TransactionalBatch,
    Scheduled,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let store = Arc::new(opseq_core::InMemoryOperationStore::new());
    let clock = Arc::new(SystemClock);
    let id_gen = Arc::new(IdGenerator::new(PrimaryKeyKind::Ulid));
    let events = Arc::new(EventBus::new());
    let actor = ActorRef::new("cli", "demo");

    match cli.command {
        Command::Process { strategy, parallelism } => run_process(store, clock, id_gen, events, actor, strategy, parallelism),
        Command::Status => run_status(store.as_ref()),
        Command::Rollback { name } => run_rollback(store, clock, id_gen, events, &name),
    }
}

/// `provision_network -> launch_instances -> configure_dns`, plus one
/// `best_effort_cache_warm` operation flagged `allowed_to_fail` so a
/// non-essential step can't sink the whole run.
fn sample_descriptors() -> Vec<OperationDescriptor> {
    let provision = OperationSpec::new("provision_network", OperationType::Sync).unwrap();
    let launch = OperationSpec::new("launch_instances", OperationType::Sync)
        .unwrap()
        .with_depends_on(["provision_network"])
        .with_retry(RetryPolicy { max_attempts: 3, initial_backoff_ms: 100, backoff_multiplier: 2.0, max_backoff_ms: 2_000 });
    let dns = OperationSpec::new("configure_dns", OperationType::Sync)
        .unwrap()
        .with_depends_on(["launch_instances"])
        .with_capabilities(CapabilityFlags::rollbackable());
    let cache_warm = OperationSpec::new("best_effort_cache_warm", OperationType::Sync)
        .unwrap()
        .with_depends_on(["launch_instances"])
        .with_capabilities(CapabilityFlags::allowed_to_fail());

    vec![
        OperationDescriptor::new(provision, handle_fn(|_ctx| {
            log::info!("provisioning network");
            Ok(())
        })),
        OperationDescriptor::new(launch, handle_fn(|_ctx| {
            log::info!("launching instances");
            Ok(())
        })),
        OperationDescriptor::new(dns, handle_fn(|_ctx| {
            log::info!("configuring dns");
            Ok(())
        }))
        .with_rollback(rollback_fn(|_ctx| {
            log::info!("tearing down dns records");
            Ok(())
        })),
        OperationDescriptor::new(cache_warm, handle_fn(|_ctx| {
            log::warn!("cache warm endpoint unreachable, continuing");
            Err(OperationError::TransientIo("cache endpoint unreachable".to_string()))
        })),
    ]
}

fn strategy_for(kind: StrategyKind, parallelism: usize, clock: Arc<dyn opseq_core::Clock>) -> Box<dyn Strategy> {
    match kind {
        StrategyKind::Sequential => Box::new(Sequential),
        StrategyKind::Batch => Box::new(Batch::new(parallelism)),
        StrategyKind::AllowedToFailBatch => Box::new(AllowedToFailBatch::new(parallelism)),
        StrategyKind::DependencyGraph => Box::new(DependencyGraph::new(parallelism)),
        StrategyKind::TransactionalBatch => Box::new(TransactionalBatch),
        StrategyKind::Scheduled => Box::new(Scheduled::new(clock, false)),
    }
}

fn run_process(store: Arc<dyn OperationStore>, clock: Arc<dyn opseq_core::Clock>, id_gen: Arc<IdGenerator>, events: Arc<EventBus>, actor: ActorRef, kind: StrategyKind, parallelism: usize) -> ExitCode {
    let orchestrator = Orchestrator::new(store, clock.clone(), id_gen, events, RunnerMode::Real);
    let strategy = strategy_for(kind, parallelism, clock);
    match orchestrator.run(sample_descriptors(), strategy.as_ref(), actor) {
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report).expect("RunReport always serializes"));
            ExitCode::from(report.exit_code() as u8)
        }
        Err(e) => {
            eprintln!("run aborted before completion: {e}");
            ExitCode::from(2)
        }
    }
}

fn run_status(store: &dyn OperationStore) -> ExitCode {
    for record in store.all_records() {
        println!("{:<28} {:<12} executed_at={}", record.name, record.state.as_str(), record.executed_at);
    }
    ExitCode::SUCCESS
}

fn run_rollback(store: Arc<dyn OperationStore>, clock: Arc<dyn opseq_core::Clock>, id_gen: Arc<IdGenerator>, events: Arc<EventBus>, name: &str) -> ExitCode {
    let descriptors = sample_descriptors();
    let Some(descriptor) = descriptors.iter().find(|d| d.name() == name) else {
        eprintln!("no such operation: {name}");
        return ExitCode::from(2);
    };
    let Some(record) = store.last_completion(name) else {
        eprintln!("{name} has no completed run to roll back");
        return ExitCode::from(2);
    };
    let runner = Runner::new(store, clock, id_gen, events, RunnerMode::Real);
    match runner.compensate(&record, descriptor, &CancellationToken::new()) {
        Ok(outcome) => {
            println!("rolled back: {outcome:?}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("rollback failed: {e}");
            ExitCode::from(3)
        }
    }
}
