//! Wall-clock and monotonic time, behind a trait so scenario tests
//! (S3's simultaneous start, S4's retry timing) can control time
//! without sleeping for real.

use chrono::{DateTime, Utc};
use std::time::Instant;

pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;
    fn monotonic(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn monotonic(&self) -> Instant {
        Instant::now()
    }
}

#[cfg(test)]
pub mod test_support {
    use super::*;
    use std::sync::Mutex;

    /// A clock that advances only when told to, for deterministic
    /// backoff and ordering assertions.
    pub struct FixedClock {
        now: Mutex<DateTime<Utc>>,
        start: Instant,
    }

    impl FixedClock {
        pub fn at(now: DateTime<Utc>) -> Self {
            FixedClock { now: Mutex::new(now), start: Instant::now() }
        }

        pub fn advance(&self, d: chrono::Duration) {
            let mut guard = self.now.lock().unwrap();
            *guard = *guard + d;
        }
    }

    impl Clock for FixedClock {
        fn now_utc(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }

        fn monotonic(&self) -> Instant {
            self.start
        }
    }
}
