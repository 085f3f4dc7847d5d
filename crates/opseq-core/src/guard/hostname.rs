use super::Guard;

/// Matches the current host's name against an allow-list with exact,
/// case-sensitive comparison. An empty list always passes.
pub struct HostnameGuard {
    allowed: Vec<String>,
    current: String,
}

impl HostnameGuard {
    pub fn new(allowed: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let current = hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_default();
        HostnameGuard { allowed: allowed.into_iter().map(Into::into).collect(), current }
    }

    /// For tests that need to pin the "current host" without touching
    /// the real one.
    pub fn with_current(allowed: impl IntoIterator<Item = impl Into<String>>, current: impl Into<String>) -> Self {
        HostnameGuard { allowed: allowed.into_iter().map(Into::into).collect(), current: current.into() }
    }
}

impl Guard for HostnameGuard {
    fn name(&self) -> &str {
        "hostname"
    }

    fn should_execute(&self) -> bool {
        self.allowed.is_empty() || self.allowed.iter().any(|h| h == &self.current)
    }

    fn reason(&self) -> String {
        format!("host {:?} not in allowed list {:?}", self.current, self.allowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_allow_list_passes() {
        let g = HostnameGuard::with_current(Vec::<String>::new(), "box-1");
        assert!(g.should_execute());
    }

    #[test]
    fn exact_case_sensitive_match() {
        let g = HostnameGuard::with_current(["box-1"], "box-1");
        assert!(g.should_execute());
        let g = HostnameGuard::with_current(["Box-1"], "box-1");
        assert!(!g.should_execute());
    }
}
