//! Capacity oracle interface.

use std::sync::{Arc, PoisonError, RwLock};

use riskswap_types::{CapacitySnapshot, Result, RiskswapError};

/// Read-only source of capacity snapshots.
pub trait CapacityOracle {
    /// The most recent snapshot the oracle holds.
    ///
    /// # Errors
    /// [`RiskswapError::CapacityOracleUnavailable`] if no snapshot can be read.
    fn latest_capacity(&self) -> Result<CapacitySnapshot>;
}

impl<T: CapacityOracle + ?Sized> CapacityOracle for Arc<T> {
    fn latest_capacity(&self) -> Result<CapacitySnapshot> {
        (**self).latest_capacity()
    }
}

impl<T: CapacityOracle + ?Sized> CapacityOracle for Box<T> {
    fn latest_capacity(&self) -> Result<CapacitySnapshot> {
        (**self).latest_capacity()
    }
}

/// In-memory oracle fed by an operator or a test.
///
/// Shared through an `Arc` so the feeder can publish while a controller
/// reads.
#[derive(Debug, Default)]
pub struct StaticCapacityOracle {
    snapshot: RwLock<Option<CapacitySnapshot>>,
}

impl StaticCapacityOracle {
    #[must_use]
    pub fn new(capacity: u128, as_of: u64) -> Self {
        Self {
            snapshot: RwLock::new(Some(CapacitySnapshot { capacity, as_of })),
        }
    }

    /// An oracle that has never published.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Publish a new snapshot.
    pub fn publish(&self, capacity: u128, as_of: u64) {
        let mut guard = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(CapacitySnapshot { capacity, as_of });
    }
}

impl CapacityOracle for StaticCapacityOracle {
    fn latest_capacity(&self) -> Result<CapacitySnapshot> {
        let guard = self.snapshot.read().unwrap_or_else(PoisonError::into_inner);
        (*guard).ok_or_else(|| RiskswapError::CapacityOracleUnavailable {
            reason: "no capacity snapshot published".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_oracle_unavailable() {
        let err = StaticCapacityOracle::empty().latest_capacity().unwrap_err();
        assert!(matches!(err, RiskswapError::CapacityOracleUnavailable { .. }));
    }

    #[test]
    fn publish_replaces_snapshot() {
        let oracle = Arc::new(StaticCapacityOracle::new(100, 1));
        let reader: Box<dyn CapacityOracle> = Box::new(Arc::clone(&oracle));
        assert_eq!(reader.latest_capacity().unwrap().capacity, 100);

        oracle.publish(250, 2);
        let snap = reader.latest_capacity().unwrap();
        assert_eq!((snap.capacity, snap.as_of), (250, 2));
    }
}
