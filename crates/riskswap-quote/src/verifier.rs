//! Quote acceptance: provenance, freshness, binding.
//!
//! Checks run in a fixed order and the first failure wins:
//! 1. the recovered signer equals the trusted signer (`BadSignature`)
//! 2. `now - asOf <= stale_seconds` (`QuoteStale`)
//! 3. the quote is bound to the expected portfolio, and to the pinned model
//!    if one is configured (`QuoteMismatch`)
//!
//! There is no partial success: a quote either yields a [`VerifiedQuote`]
//! or an error.

use riskswap_types::{
    Address, Hash32, PortfolioId, QuoteConfig, QuoteSignature, Result, RiskQuotePayload,
    RiskswapError,
};

use crate::{digest, signature};

/// A quote that passed every check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedQuote {
    pub digest: Hash32,
    pub signer: Address,
    /// Age in seconds at verification time.
    pub age: u64,
}

/// Verifies risk quotes against one trusted signer and staleness window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteVerifier {
    trusted_signer: Address,
    stale_seconds: u64,
    pinned_model_hash: Option<Hash32>,
}

impl QuoteVerifier {
    #[must_use]
    pub fn new(trusted_signer: Address, stale_seconds: u64) -> Self {
        Self {
            trusted_signer,
            stale_seconds,
            pinned_model_hash: None,
        }
    }

    #[must_use]
    pub fn from_config(config: &QuoteConfig) -> Self {
        Self {
            trusted_signer: config.trusted_signer,
            stale_seconds: config.stale_seconds,
            pinned_model_hash: config.pinned_model_hash,
        }
    }

    /// Require quotes to come from exactly this model version.
    #[must_use]
    pub fn with_pinned_model(mut self, model_id_hash: Hash32) -> Self {
        self.pinned_model_hash = Some(model_id_hash);
        self
    }

    #[must_use]
    pub fn trusted_signer(&self) -> Address {
        self.trusted_signer
    }

    #[must_use]
    pub fn stale_seconds(&self) -> u64 {
        self.stale_seconds
    }

    /// Replace the trusted signer, returning the previous one.
    pub fn set_trusted_signer(&mut self, signer: Address) -> Address {
        std::mem::replace(&mut self.trusted_signer, signer)
    }

    /// Run all checks for a quote that will settle a swap on `expected_portfolio`.
    pub fn check(
        &self,
        payload: &RiskQuotePayload,
        sig: &QuoteSignature,
        expected_portfolio: &PortfolioId,
        now: u64,
    ) -> Result<VerifiedQuote> {
        let result = self.run_checks(payload, sig, expected_portfolio, now);
        if let Err(err) = &result {
            tracing::warn!(
                portfolio = %payload.portfolio_id.short(),
                as_of = payload.as_of,
                now,
                error = %err,
                "Quote rejected"
            );
        }
        result
    }

    fn run_checks(
        &self,
        payload: &RiskQuotePayload,
        sig: &QuoteSignature,
        expected_portfolio: &PortfolioId,
        now: u64,
    ) -> Result<VerifiedQuote> {
        // 1. Provenance
        let d = digest::digest(payload);
        let signer = signature::recover_signer(&d, sig)?;
        if signer != self.trusted_signer {
            return Err(RiskswapError::BadSignature {
                reason: format!(
                    "signer {signer} is not the trusted signer {}",
                    self.trusted_signer
                ),
            });
        }

        // 2. Freshness (a future-dated quote has no defined age)
        let age = payload
            .age_at(now)
            .filter(|age| *age <= self.stale_seconds)
            .ok_or(RiskswapError::QuoteStale {
                as_of: payload.as_of,
                now,
                stale_seconds: self.stale_seconds,
            })?;

        // 3. Binding
        if payload.portfolio_id != *expected_portfolio {
            return Err(RiskswapError::QuoteMismatch {
                reason: format!(
                    "quote portfolio {} does not match {}",
                    payload.portfolio_id, expected_portfolio
                ),
            });
        }
        if let Some(pinned) = &self.pinned_model_hash {
            if payload.model_id_hash != *pinned {
                return Err(RiskswapError::QuoteMismatch {
                    reason: format!(
                        "model 0x{} is not the pinned model 0x{}",
                        hex::encode(payload.model_id_hash),
                        hex::encode(pinned)
                    ),
                });
            }
        }

        Ok(VerifiedQuote {
            digest: d,
            signer,
            age,
        })
    }
}

/// Boolean form of [`QuoteVerifier::check`] for callers that only need a
/// yes/no answer.
#[must_use]
pub fn verify_quote(
    payload: &RiskQuotePayload,
    sig: &QuoteSignature,
    expected_signer: Address,
    now: u64,
    stale_seconds: u64,
    expected_portfolio: &PortfolioId,
) -> bool {
    QuoteVerifier::new(expected_signer, stale_seconds)
        .check(payload, sig, expected_portfolio, now)
        .is_ok()
}
