//! Outstanding-exposure book for the controller.
//!
//! The guard only reads. This book owns the outstanding total and is the
//! one place it changes: [`commit`](ExposureBook::commit) after a passing
//! check, [`release`](ExposureBook::release) when a swap settles or is
//! cancelled.

use std::fmt;

use riskswap_capacity::{CapacityGuard, CapacityOracle};
use riskswap_types::{IssuanceHeadroom, Result};

pub struct ExposureBook {
    guard: CapacityGuard,
    oracle: Box<dyn CapacityOracle>,
    outstanding: u128,
}

impl fmt::Debug for ExposureBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExposureBook")
            .field("guard", &self.guard)
            .field("outstanding", &self.outstanding)
            .finish_non_exhaustive()
    }
}

impl ExposureBook {
    #[must_use]
    pub fn new(guard: CapacityGuard, oracle: Box<dyn CapacityOracle>) -> Self {
        Self {
            guard,
            oracle,
            outstanding: 0,
        }
    }

    #[must_use]
    pub fn outstanding(&self) -> u128 {
        self.outstanding
    }

    /// Check `requested` against the oracle's latest snapshot. Does not
    /// change the outstanding total.
    pub fn admit(&self, requested: u128, now: u64) -> Result<IssuanceHeadroom> {
        self.guard
            .check_against_oracle(self.oracle.as_ref(), self.outstanding, requested, now)
    }

    /// Record admitted exposure.
    pub fn commit(&mut self, amount: u128) {
        self.outstanding = self.outstanding.saturating_add(amount);
    }

    /// Remove exposure that is no longer live.
    pub fn release(&mut self, amount: u128) {
        self.outstanding = self.outstanding.saturating_sub(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use riskswap_capacity::StaticCapacityOracle;
    use riskswap_types::{CapacityConfig, RiskswapError};

    const NOW: u64 = 1_700_000_000;

    fn book(capacity: u128) -> ExposureBook {
        ExposureBook::new(
            CapacityGuard::new(CapacityConfig::default()),
            Box::new(StaticCapacityOracle::new(capacity, NOW)),
        )
    }

    #[test]
    fn admit_does_not_mutate() {
        let book = book(1_000);
        book.admit(950, NOW).unwrap();
        assert_eq!(book.outstanding(), 0);
    }

    #[test]
    fn commit_then_release() {
        let mut book = book(1_000);
        book.commit(900);
        let err = book.admit(51, NOW).unwrap_err();
        assert!(matches!(err, RiskswapError::IssuanceCapExceeded { available: 50, .. }));
        book.release(900);
        assert_eq!(book.outstanding(), 0);
        assert!(book.admit(950, NOW).is_ok());
    }

    #[test]
    fn release_saturates() {
        let mut book = book(1_000);
        book.commit(10);
        book.release(20);
        assert_eq!(book.outstanding(), 0);
    }
}
