//! Record identifiers and the allocation contract.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a professor record.
///
/// Assigned by the allocator on creation, immutable afterwards. Serialized
/// as a plain JSON integer so documents stay compatible with any other
/// consumer of the collection.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl core::fmt::Display for RecordId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<RecordId> for i64 {
    fn from(value: RecordId) -> Self {
        value.0
    }
}

impl FromStr for RecordId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = i64::from_str(s)
            .map_err(|e| DomainError::invalid_id(format!("RecordId: {e}")))?;
        Ok(Self(value))
    }
}

/// Compute the next record id from the highest id assigned so far.
///
/// Contract: `max + 1` when a maximum is known, `1` for an empty collection.
/// A collection whose records carry no readable id reports `None` and also
/// falls back to `1`.
///
/// Callers must feed this the *high-water mark* of assigned ids, not merely
/// the maximum still present in the collection; that is what keeps ids
/// strictly increasing and never reused across deletes. Storage backends
/// are responsible for claiming the returned id atomically.
pub fn next_record_id(high_water: Option<RecordId>) -> RecordId {
    match high_water {
        Some(max) => RecordId::new(max.as_i64() + 1),
        None => RecordId::new(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_collection_allocates_one() {
        assert_eq!(next_record_id(None), RecordId::new(1));
    }

    #[test]
    fn allocation_is_max_plus_one() {
        assert_eq!(next_record_id(Some(RecordId::new(2))), RecordId::new(3));
        assert_eq!(next_record_id(Some(RecordId::new(41))), RecordId::new(42));
    }

    #[test]
    fn record_id_parses_from_path_segment() {
        let id: RecordId = "17".parse().unwrap();
        assert_eq!(id, RecordId::new(17));
        assert!("seventeen".parse::<RecordId>().is_err());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: allocation is strictly increasing over any high-water mark.
            #[test]
            fn allocation_strictly_increases(max in 0i64..i64::MAX - 1) {
                let next = next_record_id(Some(RecordId::new(max)));
                prop_assert!(next.as_i64() > max);
            }

            /// Property: feeding each allocation back as the new high-water mark
            /// yields consecutive ids with no reuse.
            #[test]
            fn repeated_allocation_is_consecutive(start in 0i64..1_000_000, steps in 1usize..64) {
                let mut high_water = Some(RecordId::new(start));
                let mut previous = start;
                for _ in 0..steps {
                    let next = next_record_id(high_water);
                    prop_assert_eq!(next.as_i64(), previous + 1);
                    previous = next.as_i64();
                    high_water = Some(next);
                }
            }
        }
    }
}
