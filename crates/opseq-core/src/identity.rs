//! Produces the primary key for a freshly inserted Pending row,
//! honoring whichever `PrimaryKeyKind` the store is configured for.

use crate::clock::Clock;
use opseq_domain::{OperationId, PrimaryKeyKind};
use rand::RngCore;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct IdGenerator {
    kind: PrimaryKeyKind,
    counter: AtomicU64,
}

impl IdGenerator {
    pub fn new(kind: PrimaryKeyKind) -> Self {
        IdGenerator { kind, counter: AtomicU64::new(1) }
    }

    pub fn next(&self, clock: &dyn Clock) -> OperationId {
        match self.kind {
            PrimaryKeyKind::Id => OperationId::new_id(self.counter.fetch_add(1, Ordering::SeqCst)),
            PrimaryKeyKind::Uuid => OperationId::new_uuid(),
            PrimaryKeyKind::Ulid => {
                let unix_ms = clock.now_utc().timestamp_millis().max(0) as u64;
                let mut rng = rand::thread_rng();
                let hi = rng.next_u64() as u128;
                let lo = rng.next_u64() as u128;
                let random = (hi << 64) | lo;
                OperationId::new_ulid(unix_ms, random)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;

    #[test]
    fn id_kind_increments() {
        let gen = IdGenerator::new(PrimaryKeyKind::Id);
        let clock = SystemClock;
        let a = gen.next(&clock);
        let b = gen.next(&clock);
        assert_ne!(a, b);
    }
}
