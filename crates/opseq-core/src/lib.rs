//! The orchestration engine core: the Runner state machine, the guard
//! chain, the dependency resolver, the retry controller, the event
//! bus, and the `OperationStore` port (plus its in-memory
//! implementation — the concrete relational backend is out of scope
//! here, see `DESIGN.md`).
//!
//! `opseq-domain` supplies the plain data shapes (`OperationSpec`,
//! `OperationRecord`, ...); this crate wraps them in behavior.

pub mod cancellation;
pub mod clock;
pub mod constants;
pub mod errors;
pub mod event;
pub mod fake;
pub mod guard;
pub mod handle;
pub mod identity;
pub mod operation;
pub mod resolver;
pub mod retry;
pub mod runner;
pub mod store;

pub use cancellation::CancellationToken;
pub use clock::{Clock, SystemClock};
pub use errors::{EngineError, OperationError};
pub use event::{Event, EventBus, EventObserver};
pub use fake::{DispatchRecord, Recorder, RunnerMode};
pub use guard::{Combinator, FailurePolicy, Guard, GuardChain, Verdict};
pub use handle::{handle_fn, rollback_fn, OperationContext, OperationHandle, RollbackHandle};
pub use identity::IdGenerator;
pub use operation::OperationDescriptor;
pub use resolver::{resolve, Plan, Wave};
pub use runner::{RunOutcome, Runner};
pub use store::{InMemoryOperationStore, LockHandle, LockOutcome, OperationStore};
