use super::Guard;

/// Matches a named environment variable against an allow-list of
/// values, e.g. gating on `APP_ENV=production`.
pub struct EnvironmentGuard {
    var: String,
    allowed: Vec<String>,
    current: Option<String>,
}

impl EnvironmentGuard {
    pub fn new(var: impl Into<String>, allowed: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let var = var.into();
        let current = std::env::var(&var).ok();
        EnvironmentGuard { var, allowed: allowed.into_iter().map(Into::into).collect(), current }
    }

    pub fn with_current(var: impl Into<String>, allowed: impl IntoIterator<Item = impl Into<String>>, current: Option<String>) -> Self {
        EnvironmentGuard { var: var.into(), allowed: allowed.into_iter().map(Into::into).collect(), current }
    }
}

impl Guard for EnvironmentGuard {
    fn name(&self) -> &str {
        "environment"
    }

    fn should_execute(&self) -> bool {
        self.allowed.is_empty()
            || self.current.as_ref().is_some_and(|c| self.allowed.iter().any(|a| a == c))
    }

    fn reason(&self) -> String {
        format!("{}={:?} not in allowed list {:?}", self.var, self.current, self.allowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_current_value() {
        let g = EnvironmentGuard::with_current("APP_ENV", ["production"], Some("production".into()));
        assert!(g.should_execute());
        let g = EnvironmentGuard::with_current("APP_ENV", ["production"], Some("staging".into()));
        assert!(!g.should_execute());
    }

    #[test]
    fn unset_variable_with_nonempty_list_denies() {
        let g = EnvironmentGuard::with_current("APP_ENV", ["production"], None);
        assert!(!g.should_execute());
    }
}
