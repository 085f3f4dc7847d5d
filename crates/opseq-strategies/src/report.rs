use opseq_core::RunOutcome;
use serde::Serialize;

/// Accumulates per-operation outcomes across a run. The CLI maps this
/// straight to an exit code: any `failed_hard` entry means exit 1.
#[derive(Debug, Default, Clone, Serialize)]
pub struct RunReport {
    pub completed: Vec<String>,
    pub failed_hard: Vec<String>,
    pub failed_allowed: Vec<String>,
    pub skipped: Vec<String>,
    pub rolled_back: Vec<String>,
    pub already_completed: Vec<String>,
    pub busy: Vec<String>,
    pub deferred: Vec<String>,
    pub aborted: bool,
}

impl RunReport {
    pub fn record(&mut self, name: &str, allowed_to_fail: bool, outcome: &RunOutcome) {
        match outcome {
            RunOutcome::Completed(_) => self.completed.push(name.to_string()),
            RunOutcome::Failed(_) => {
                if allowed_to_fail {
                    self.failed_allowed.push(name.to_string());
                } else {
                    self.failed_hard.push(name.to_string());
                }
            }
            RunOutcome::Skipped(_) => self.skipped.push(name.to_string()),
            RunOutcome::RolledBack(_) => self.rolled_back.push(name.to_string()),
            RunOutcome::AlreadyCompleted(_) => self.already_completed.push(name.to_string()),
            RunOutcome::SkippedBusy => self.busy.push(name.to_string()),
        }
    }

    pub fn merge(&mut self, other: RunReport) {
        self.completed.extend(other.completed);
        self.failed_hard.extend(other.failed_hard);
        self.failed_allowed.extend(other.failed_allowed);
        self.skipped.extend(other.skipped);
        self.rolled_back.extend(other.rolled_back);
        self.already_completed.extend(other.already_completed);
        self.busy.extend(other.busy);
        self.deferred.extend(other.deferred);
        self.aborted |= other.aborted;
    }

    /// `0` success, `1` at least one hard failure. Configuration and
    /// store-unavailable errors surface as `Err(EngineError)` from
    /// `Orchestrator::run` before a `RunReport` ever exists, and map to
    /// exit codes 2/3 at the CLI boundary.
    pub fn exit_code(&self) -> i32 {
        if self.failed_hard.is_empty() {
            0
        } else {
            1
        }
    }
}
