//! Capacity guard: staleness gate, max-issuable resolution, cap check.

use std::fmt;

use riskswap_types::{
    CapacityConfig, CapacitySnapshot, IssuanceHeadroom, MaxIssuableSource, Result, RiskswapError,
};

use crate::{CapacityOracle, CapacityPolicy, policy::haircut};

/// Hard gate on new exposure.
pub struct CapacityGuard {
    config: CapacityConfig,
    policy: Option<Box<dyn CapacityPolicy>>,
}

impl fmt::Debug for CapacityGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapacityGuard")
            .field("config", &self.config)
            .field("has_policy", &self.policy.is_some())
            .finish()
    }
}

impl CapacityGuard {
    /// A guard with no policy collaborator; every lookup uses the fallback
    /// haircut.
    #[must_use]
    pub fn new(config: CapacityConfig) -> Self {
        Self {
            config,
            policy: None,
        }
    }

    #[must_use]
    pub fn with_policy(config: CapacityConfig, policy: Box<dyn CapacityPolicy>) -> Self {
        Self {
            config,
            policy: Some(policy),
        }
    }

    #[must_use]
    pub fn config(&self) -> &CapacityConfig {
        &self.config
    }

    /// Max issuable against `capacity`, with no staleness gate.
    ///
    /// Asks the policy first. If there is none, or it fails, applies
    /// `capacity * fallback_haircut_bps / 10000`.
    pub fn get_max_issuable(&self, capacity: u128) -> (u128, MaxIssuableSource) {
        let Some(policy) = &self.policy else {
            return (self.fallback(capacity), MaxIssuableSource::Fallback);
        };
        match policy.max_issuable(capacity) {
            Ok(max) => (max, MaxIssuableSource::Policy),
            Err(err) => {
                let max = self.fallback(capacity);
                tracing::warn!(
                    capacity,
                    fallback = max,
                    haircut_bps = self.config.fallback_haircut_bps,
                    error = %err,
                    "Capacity policy unavailable, applying fallback haircut"
                );
                (max, MaxIssuableSource::Fallback)
            }
        }
    }

    fn fallback(&self, capacity: u128) -> u128 {
        haircut(capacity, self.config.fallback_haircut_bps)
    }

    /// Decide whether `requested` more exposure fits under the cap.
    ///
    /// `total_outstanding + requested == max_issuable` is admitted.
    ///
    /// # Errors
    /// - [`RiskswapError::StaleCapacityData`] if the snapshot is older than
    ///   `max_age_seconds`, whatever the request size.
    /// - [`RiskswapError::IssuanceCapExceeded`] if the request does not fit.
    pub fn check_issuance_cap(
        &self,
        snapshot: &CapacitySnapshot,
        total_outstanding: u128,
        requested: u128,
        now: u64,
    ) -> Result<IssuanceHeadroom> {
        let max_age = self.config.max_age_seconds;
        if snapshot.is_stale(now, max_age) {
            tracing::warn!(as_of = snapshot.as_of, now, max_age, "Capacity snapshot stale");
            return Err(RiskswapError::StaleCapacityData {
                as_of: snapshot.as_of,
                now,
                max_age,
            });
        }

        let (max_issuable, source) = self.get_max_issuable(snapshot.capacity);
        let available = max_issuable.saturating_sub(total_outstanding);
        let within_cap = total_outstanding
            .checked_add(requested)
            .is_some_and(|total| total <= max_issuable);
        if !within_cap {
            tracing::warn!(
                requested,
                available,
                outstanding = total_outstanding,
                max_issuable,
                "Issuance cap exceeded"
            );
            return Err(RiskswapError::IssuanceCapExceeded {
                requested,
                available,
                outstanding: total_outstanding,
            });
        }

        Ok(IssuanceHeadroom {
            max_issuable,
            outstanding: total_outstanding,
            requested,
            remaining: available.saturating_sub(requested),
            source,
        })
    }

    /// [`check_issuance_cap`](Self::check_issuance_cap) against the oracle's
    /// latest snapshot.
    pub fn check_against_oracle(
        &self,
        oracle: &dyn CapacityOracle,
        total_outstanding: u128,
        requested: u128,
        now: u64,
    ) -> Result<IssuanceHeadroom> {
        let snapshot = oracle.latest_capacity()?;
        self.check_issuance_cap(&snapshot, total_outstanding, requested, now)
    }
}
