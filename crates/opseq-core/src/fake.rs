//! Fake/record mode, re-architected from a process-global switch into
//! an explicit construction-time choice: a Runner built with
//! `RunnerMode::Recording` never touches the store or invokes a
//! handle, it just appends to a `Recorder`. A Runner built with
//! `RunnerMode::Real` is indistinguishable from one with no test
//! affordances at all.

use opseq_domain::OperationType;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRecord {
    pub class: OperationType,
    pub name: String,
}

#[derive(Default)]
pub struct Recorder {
    dispatches: Mutex<Vec<DispatchRecord>>,
}

impl Recorder {
    pub fn new() -> Self {
        Recorder::default()
    }

    pub fn record(&self, class: OperationType, name: impl Into<String>) {
        self.dispatches.lock().unwrap().push(DispatchRecord { class, name: name.into() });
    }

    pub fn count(&self, predicate: impl Fn(&DispatchRecord) -> bool) -> usize {
        self.dispatches.lock().unwrap().iter().filter(|d| predicate(d)).count()
    }

    pub fn all(&self) -> Vec<DispatchRecord> {
        self.dispatches.lock().unwrap().clone()
    }
}

#[derive(Clone)]
pub enum RunnerMode {
    Real,
    Recording(std::sync::Arc<Recorder>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_counts_match_predicate() {
        let recorder = Recorder::new();
        recorder.record(OperationType::Sync, "a");
        recorder.record(OperationType::Batch, "b");
        assert_eq!(recorder.count(|d| d.class == OperationType::Sync), 1);
        assert_eq!(recorder.count(|_| true), 2);
    }
}
