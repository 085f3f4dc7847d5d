//! Gating predicates evaluated between lock acquisition and dispatch.
//! A chain evaluates its guards under a combinator (default AND) and
//! produces a single verdict; the Runner turns a non-`Allow` verdict
//! into a Skipped or Failed row according to the operation's
//! `FailurePolicy`.

pub mod custom;
pub mod environment;
pub mod hostname;
pub mod ip_address;

pub use custom::CustomGuard;
pub use environment::EnvironmentGuard;
pub use hostname::HostnameGuard;
pub use ip_address::IpAddressGuard;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    And,
    Or,
}

impl Default for Combinator {
    fn default() -> Self {
        Combinator::And
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    Skip,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Deny { reason: String },
}

pub trait Guard: Send + Sync {
    fn name(&self) -> &str;
    fn should_execute(&self) -> bool;
    fn reason(&self) -> String;
}

pub struct GuardChain {
    guards: Vec<Box<dyn Guard>>,
    combinator: Combinator,
    pub on_deny: FailurePolicy,
}

impl GuardChain {
    pub fn new(combinator: Combinator, on_deny: FailurePolicy) -> Self {
        GuardChain { guards: Vec::new(), combinator, on_deny }
    }

    pub fn push(mut self, guard: Box<dyn Guard>) -> Self {
        self.guards.push(guard);
        self
    }

    /// An empty chain always allows — there is nothing to gate on.
    pub fn evaluate(&self) -> Verdict {
        if self.guards.is_empty() {
            return Verdict::Allow;
        }
        match self.combinator {
            Combinator::And => {
                for g in &self.guards {
                    if !g.should_execute() {
                        return Verdict::Deny { reason: format!("{}: {}", g.name(), g.reason()) };
                    }
                }
                Verdict::Allow
            }
            Combinator::Or => {
                let mut reasons = Vec::new();
                for g in &self.guards {
                    if g.should_execute() {
                        return Verdict::Allow;
                    }
                    reasons.push(format!("{}: {}", g.name(), g.reason()));
                }
                Verdict::Deny { reason: reasons.join("; ") }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysDeny(&'static str);
    impl Guard for AlwaysDeny {
        fn name(&self) -> &str {
            self.0
        }
        fn should_execute(&self) -> bool {
            false
        }
        fn reason(&self) -> String {
            "denied by test".into()
        }
    }

    struct AlwaysAllow(&'static str);
    impl Guard for AlwaysAllow {
        fn name(&self) -> &str {
            self.0
        }
        fn should_execute(&self) -> bool {
            true
        }
        fn reason(&self) -> String {
            "allowed by test".into()
        }
    }

    #[test]
    fn empty_chain_allows() {
        let chain = GuardChain::new(Combinator::And, FailurePolicy::Skip);
        assert_eq!(chain.evaluate(), Verdict::Allow);
    }

    #[test]
    fn and_requires_all_to_pass() {
        let chain = GuardChain::new(Combinator::And, FailurePolicy::Skip)
            .push(Box::new(AlwaysAllow("a")))
            .push(Box::new(AlwaysDeny("b")));
        assert!(matches!(chain.evaluate(), Verdict::Deny { .. }));
    }

    #[test]
    fn or_requires_one_to_pass() {
        let chain = GuardChain::new(Combinator::Or, FailurePolicy::Skip)
            .push(Box::new(AlwaysDeny("a")))
            .push(Box::new(AlwaysAllow("b")));
        assert_eq!(chain.evaluate(), Verdict::Allow);
    }
}
