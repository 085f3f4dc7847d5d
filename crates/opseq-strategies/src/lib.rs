//! The six concrete execution strategies and the `Orchestrator` that
//! drives them. `opseq-core` supplies the Runner, resolver, and store
//! port this crate composes; nothing here touches a store directly.

pub mod allowed_to_fail_batch;
pub mod batch;
pub mod dependency_graph;
pub mod orchestrator;
pub mod report;
pub mod scheduled;
pub mod sequential;
pub mod strategy;
pub mod transactional_batch;

pub use allowed_to_fail_batch::AllowedToFailBatch;
pub use batch::Batch;
pub use dependency_graph::DependencyGraph;
pub use orchestrator::Orchestrator;
pub use report::RunReport;
pub use scheduled::Scheduled;
pub use sequential::Sequential;
pub use strategy::Strategy;
pub use transactional_batch::TransactionalBatch;
