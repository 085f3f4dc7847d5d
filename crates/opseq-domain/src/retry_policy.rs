use serde::{Deserialize, Serialize};

/// Backoff is `min(initial * multiplier^k, max)` for zero-based retry
/// index `k`, then jittered by a uniform factor in `[0.5, 1.5]` by the
/// caller (jitter needs an rng, which this crate deliberately doesn't
/// carry).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub backoff_multiplier: f64,
    pub max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 1,
            initial_backoff_ms: 200,
            backoff_multiplier: 2.0,
            max_backoff_ms: 30_000,
        }
    }
}

impl RetryPolicy {
    pub fn backoff_ms(&self, retry_index: u32) -> u64 {
        let scaled = self.initial_backoff_ms as f64 * self.backoff_multiplier.powi(retry_index as i32);
        scaled.min(self.max_backoff_ms as f64).round() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_grows_then_caps() {
        let p = RetryPolicy { max_attempts: 5, initial_backoff_ms: 100, backoff_multiplier: 2.0, max_backoff_ms: 300 };
        assert_eq!(p.backoff_ms(0), 100);
        assert_eq!(p.backoff_ms(1), 200);
        assert_eq!(p.backoff_ms(2), 300); // would be 400, capped
    }
}
