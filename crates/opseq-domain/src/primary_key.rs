//! The operation primary key is pluggable: deployments configured with
//! `primary_key_type = id` get a plain auto-increment counter, `uuid`
//! gets a random v4 UUID, and `ulid` gets a 26-character, lexicographically
//! sortable id (48-bit millisecond timestamp + 80 bits of randomness,
//! Crockford base32 encoded) so that ordering by id also orders by
//! creation time.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

const CROCKFORD_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryKeyKind {
    Id,
    Uuid,
    Ulid,
}

/// A generated operation identifier. Regardless of `PrimaryKeyKind` the
/// value is rendered as a string for storage and display, but the
/// variant is preserved so the store can round-trip the configured key
/// shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum OperationId {
    Id(u64),
    Uuid(Uuid),
    Ulid(String),
}

impl OperationId {
    pub fn new_id(counter: u64) -> Self {
        OperationId::Id(counter)
    }

    pub fn new_uuid() -> Self {
        OperationId::Uuid(Uuid::new_v4())
    }

    /// `unix_ms` and `random` are supplied by the caller (the clock and
    /// rng live in `opseq-core`) so this module stays free of any
    /// ambient time or randomness source.
    pub fn new_ulid(unix_ms: u64, random: u128) -> Self {
        OperationId::Ulid(encode_ulid(unix_ms, random))
    }

    pub fn kind(&self) -> PrimaryKeyKind {
        match self {
            OperationId::Id(_) => PrimaryKeyKind::Id,
            OperationId::Uuid(_) => PrimaryKeyKind::Uuid,
            OperationId::Ulid(_) => PrimaryKeyKind::Ulid,
        }
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationId::Id(v) => write!(f, "{v}"),
            OperationId::Uuid(v) => write!(f, "{v}"),
            OperationId::Ulid(v) => write!(f, "{v}"),
        }
    }
}

fn encode_ulid(unix_ms: u64, random: u128) -> String {
    // 48 bits of timestamp, 80 bits of randomness: 128 bits total,
    // encoded 5 bits at a time into 26 Crockford base32 characters.
    let mut bits: u128 = (unix_ms as u128 & 0xFFFF_FFFF_FFFF) << 80;
    bits |= random & ((1u128 << 80) - 1);

    let mut out = [0u8; 26];
    for (i, slot) in out.iter_mut().enumerate() {
        let shift = 125 - i * 5;
        let idx = ((bits >> shift) & 0b1_1111) as usize;
        *slot = CROCKFORD_ALPHABET[idx];
    }
    // SAFETY: every byte comes from CROCKFORD_ALPHABET, which is ASCII.
    String::from_utf8(out.to_vec()).expect("crockford alphabet is ascii")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ulid_is_26_chars_and_sortable_by_timestamp() {
        let early = OperationId::new_ulid(1_000, 0);
        let late = OperationId::new_ulid(2_000, 0);
        let OperationId::Ulid(early) = early else { panic!() };
        let OperationId::Ulid(late) = late else { panic!() };
        assert_eq!(early.len(), 26);
        assert!(early < late);
    }

    #[test]
    fn id_and_uuid_display_without_wrapper() {
        assert_eq!(OperationId::new_id(7).to_string(), "7");
        assert_eq!(OperationId::new_uuid().kind(), PrimaryKeyKind::Uuid);
    }
}
