//! Configuration types for the lifecycle controller and capacity guard.

use serde::{Deserialize, Serialize};

use crate::{Address, Hash32, RiskswapError, constants};

/// Quote verification settings held by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteConfig {
    /// The only identity whose quotes are accepted.
    pub trusted_signer: Address,
    /// Maximum quote age in seconds (inclusive).
    #[serde(default = "default_stale_seconds")]
    pub stale_seconds: u64,
    /// If set, quotes must carry exactly this `modelIdHash`.
    #[serde(default)]
    pub pinned_model_hash: Option<Hash32>,
}

fn default_stale_seconds() -> u64 {
    constants::DEFAULT_QUOTE_STALE_SECONDS
}

impl QuoteConfig {
    #[must_use]
    pub fn new(trusted_signer: Address) -> Self {
        Self {
            trusted_signer,
            stale_seconds: constants::DEFAULT_QUOTE_STALE_SECONDS,
            pinned_model_hash: None,
        }
    }
}

/// Capacity guard settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityConfig {
    /// Maximum snapshot age in seconds. `0` disables the staleness gate.
    pub max_age_seconds: u64,
    /// Haircut applied when the max-issuable policy is unavailable.
    pub fallback_haircut_bps: u64,
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self {
            max_age_seconds: constants::DEFAULT_CAPACITY_MAX_AGE_SECONDS,
            fallback_haircut_bps: constants::FALLBACK_HAIRCUT_BPS,
        }
    }
}

/// Top-level controller configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    pub quote: QuoteConfig,
    /// When present, proposals are admitted through the capacity guard.
    #[serde(default)]
    pub capacity: Option<CapacityConfig>,
}

impl ControllerConfig {
    #[must_use]
    pub fn new(trusted_signer: Address) -> Self {
        Self {
            quote: QuoteConfig::new(trusted_signer),
            capacity: None,
        }
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| RiskswapError::Configuration(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// # Errors
    /// [`RiskswapError::Configuration`] if the signer is zero or the haircut
    /// is outside `1..=10000`.
    pub fn validate(&self) -> crate::Result<()> {
        if self.quote.trusted_signer.is_zero() {
            return Err(RiskswapError::Configuration(
                "trusted signer must not be the zero address".to_string(),
            ));
        }
        if let Some(cap) = &self.capacity {
            if !(1..=constants::BPS_DENOMINATOR).contains(&cap.fallback_haircut_bps) {
                return Err(RiskswapError::Configuration(format!(
                    "fallback haircut {} bps outside 1..={}",
                    cap.fallback_haircut_bps,
                    constants::BPS_DENOMINATOR
                )));
            }
        }
        Ok(())
    }
}
