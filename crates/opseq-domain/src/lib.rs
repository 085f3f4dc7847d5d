//! Pure value types shared by the orchestration engine: operation
//! identity, the persisted record shapes, and the small set of domain
//! errors that arise from malformed descriptors. Nothing in this crate
//! talks to a store, a clock, or a guard — see `opseq-core` for the
//! engine that gives these types behavior.

pub mod actor;
pub mod capability;
pub mod descriptor;
pub mod error;
pub mod operation_type;
pub mod primary_key;
pub mod record;
pub mod retry_policy;
pub mod state;

pub use actor::ActorRef;
pub use capability::CapabilityFlags;
pub use descriptor::OperationSpec;
pub use error::DomainError;
pub use operation_type::OperationType;
pub use primary_key::{OperationId, PrimaryKeyKind};
pub use record::{ErrorRecord, OperationRecord};
pub use retry_policy::RetryPolicy;
pub use state::OperationState;
