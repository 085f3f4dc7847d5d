//! The operation contract. A descriptor wraps one `OperationHandle` and
//! optionally one `RollbackHandle`; the Runner owns invoking them and
//! never inspects what they do.

use crate::cancellation::CancellationToken;
use crate::errors::OperationError;
use std::sync::Arc;

/// Per-attempt context handed to a running operation. Cheap to clone;
/// handles are expected to read `cancellation` periodically during
/// long-running work rather than poll a shared flag of their own.
#[derive(Clone)]
pub struct OperationContext {
    pub attempt: u32,
    pub cancellation: CancellationToken,
}

pub trait OperationHandle: Send + Sync {
    fn run(&self, ctx: &OperationContext) -> Result<(), OperationError>;
}

pub trait RollbackHandle: Send + Sync {
    fn rollback(&self, ctx: &OperationContext) -> Result<(), OperationError>;
}

/// Adapts a plain closure to `OperationHandle`, for descriptors built
/// in tests or by the demo CLI rather than by a dedicated type.
pub struct FnHandle<F>(pub F)
where
    F: Fn(&OperationContext) -> Result<(), OperationError> + Send + Sync;

impl<F> OperationHandle for FnHandle<F>
where
    F: Fn(&OperationContext) -> Result<(), OperationError> + Send + Sync,
{
    fn run(&self, ctx: &OperationContext) -> Result<(), OperationError> {
        (self.0)(ctx)
    }
}

pub struct FnRollback<F>(pub F)
where
    F: Fn(&OperationContext) -> Result<(), OperationError> + Send + Sync;

impl<F> RollbackHandle for FnRollback<F>
where
    F: Fn(&OperationContext) -> Result<(), OperationError> + Send + Sync,
{
    fn rollback(&self, ctx: &OperationContext) -> Result<(), OperationError> {
        (self.0)(ctx)
    }
}

pub fn handle_fn<F>(f: F) -> Arc<dyn OperationHandle>
where
    F: Fn(&OperationContext) -> Result<(), OperationError> + Send + Sync + 'static,
{
    Arc::new(FnHandle(f))
}

pub fn rollback_fn<F>(f: F) -> Arc<dyn RollbackHandle>
where
    F: Fn(&OperationContext) -> Result<(), OperationError> + Send + Sync + 'static,
{
    Arc::new(FnRollback(f))
}
