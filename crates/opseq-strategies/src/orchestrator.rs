use crate::report::RunReport;
use crate::strategy::Strategy;
use opseq_core::{resolve, CancellationToken, Clock, EngineError, EventBus, IdGenerator, OperationDescriptor, OperationStore, Runner, RunnerMode};
use opseq_domain::ActorRef;
use std::sync::Arc;

/// Top-level entry point: given `{operations, strategy}`, asks the
/// resolver for a plan and hands it to the strategy along with a
/// shared Runner. One Orchestrator owns one cancellation token for its
/// lifetime — cancelling it stops any strategy currently driving a run.
pub struct Orchestrator {
    runner: Arc<Runner>,
    cancellation: CancellationToken,
}

impl Orchestrator {
    pub fn new(store: Arc<dyn OperationStore>, clock: Arc<dyn Clock>, id_gen: Arc<IdGenerator>, events: Arc<EventBus>, mode: RunnerMode) -> Self {
        Orchestrator { runner: Arc::new(Runner::new(store, clock, id_gen, events, mode)), cancellation: CancellationToken::new() }
    }

    pub fn cancellation(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    pub fn run(&self, operations: Vec<OperationDescriptor>, strategy: &dyn Strategy, actor: ActorRef) -> Result<RunReport, EngineError> {
        let plan = resolve(&operations)?;
        let descriptors = operations.into_iter().map(|d| (d.name().to_string(), d)).collect();
        Ok(strategy.execute(&plan, &descriptors, &self.runner, &actor, &self.cancellation))
    }
}
