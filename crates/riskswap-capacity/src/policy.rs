//! Max-issuable policy interface and the fixed haircut.

use riskswap_types::{Result, constants};

/// Maps a capacity to the most exposure that may be outstanding against it.
///
/// Implementations are typically backed by an external risk-parameter
/// service. An `Err` tells the guard to fall back to the fixed haircut.
pub trait CapacityPolicy {
    fn max_issuable(&self, capacity: u128) -> Result<u128>;
}

impl<F> CapacityPolicy for F
where
    F: Fn(u128) -> Result<u128>,
{
    fn max_issuable(&self, capacity: u128) -> Result<u128> {
        self(capacity)
    }
}

/// `floor(capacity * bps / 10000)` without a 256-bit intermediate.
///
/// `bps` above 10000 saturates rather than wrapping.
#[must_use]
pub fn haircut(capacity: u128, bps: u64) -> u128 {
    let denom = u128::from(constants::BPS_DENOMINATOR);
    let bps = u128::from(bps);
    (capacity / denom)
        .saturating_mul(bps)
        .saturating_add((capacity % denom) * bps / denom)
}

/// A fixed-percentage policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HaircutPolicy {
    pub bps: u64,
}

impl HaircutPolicy {
    #[must_use]
    pub fn new(bps: u64) -> Self {
        Self { bps }
    }
}

impl Default for HaircutPolicy {
    fn default() -> Self {
        Self::new(constants::FALLBACK_HAIRCUT_BPS)
    }
}

impl CapacityPolicy for HaircutPolicy {
    fn max_issuable(&self, capacity: u128) -> Result<u128> {
        Ok(haircut(capacity, self.bps))
    }
}
