//! Capacity snapshot and guard outcome types.

use serde::{Deserialize, Serialize};

/// A timestamped upper bound on permissible exposure, read from an external
/// oracle. The guard only reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacitySnapshot {
    pub capacity: u128,
    /// Unix seconds the oracle observed `capacity`.
    pub as_of: u64,
}

impl CapacitySnapshot {
    /// Whether the snapshot is older than `max_age` at `now`. `max_age == 0`
    /// disables the check.
    #[must_use]
    pub fn is_stale(&self, now: u64, max_age: u64) -> bool {
        max_age > 0 && now > self.as_of.saturating_add(max_age)
    }
}

/// Where a max-issuable figure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaxIssuableSource {
    /// The injected policy answered.
    Policy,
    /// The policy was absent or failed; the fixed haircut was applied.
    Fallback,
}

/// Result of a passing issuance check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuanceHeadroom {
    pub max_issuable: u128,
    pub outstanding: u128,
    pub requested: u128,
    /// Headroom left once `requested` is admitted.
    pub remaining: u128,
    pub source: MaxIssuableSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staleness_boundary() {
        let snap = CapacitySnapshot {
            capacity: 1,
            as_of: 1_000,
        };
        assert!(!snap.is_stale(1_100, 100));
        assert!(snap.is_stale(1_101, 100));
    }

    #[test]
    fn zero_max_age_disables_check() {
        let snap = CapacitySnapshot {
            capacity: 1,
            as_of: 0,
        };
        assert!(!snap.is_stale(u64::MAX, 0));
    }

    #[test]
    fn saturating_window() {
        let snap = CapacitySnapshot {
            capacity: 1,
            as_of: u64::MAX - 1,
        };
        assert!(!snap.is_stale(u64::MAX, 10));
    }
}
