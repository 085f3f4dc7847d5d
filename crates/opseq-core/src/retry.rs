//! Backoff computation. Classification of which `OperationError` kinds
//! are retriable lives on the error type itself
//! (`OperationError::is_retriable`); this module only does the timing.

use opseq_domain::RetryPolicy;
use rand::Rng;
use std::time::Duration;

/// `min(initial * multiplier^k, max)`, then jittered by a uniform
/// factor in `[0.5, 1.5]`. Jitter spreads out retries from operations
/// that failed in lockstep (e.g. a downstream outage) instead of
/// having them all retry at once.
pub fn backoff_with_jitter(policy: &RetryPolicy, retry_index: u32) -> Duration {
    let base_ms = policy.backoff_ms(retry_index);
    let jitter = rand::thread_rng().gen_range(0.5..=1.5);
    Duration::from_millis((base_ms as f64 * jitter).round() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jittered_backoff_stays_within_bounds() {
        let policy = RetryPolicy { max_attempts: 3, initial_backoff_ms: 100, backoff_multiplier: 2.0, max_backoff_ms: 10_000 };
        for _ in 0..50 {
            let d = backoff_with_jitter(&policy, 1);
            assert!(d.as_millis() >= 100 && d.as_millis() <= 300, "{:?}", d);
        }
    }
}
