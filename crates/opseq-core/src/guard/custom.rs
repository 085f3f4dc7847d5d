use super::Guard;

/// Wraps an arbitrary predicate supplied by the caller, for gating
/// logic the engine has no built-in vocabulary for (feature flags,
/// maintenance windows, business-hour checks).
pub struct CustomGuard<F>
where
    F: Fn() -> bool + Send + Sync,
{
    name: String,
    predicate: F,
    reason: String,
}

impl<F> CustomGuard<F>
where
    F: Fn() -> bool + Send + Sync,
{
    pub fn new(name: impl Into<String>, reason: impl Into<String>, predicate: F) -> Self {
        CustomGuard { name: name.into(), predicate, reason: reason.into() }
    }
}

impl<F> Guard for CustomGuard<F>
where
    F: Fn() -> bool + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn should_execute(&self) -> bool {
        (self.predicate)()
    }

    fn reason(&self) -> String {
        self.reason.clone()
    }
}
