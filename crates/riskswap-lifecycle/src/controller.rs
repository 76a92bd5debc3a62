//! The swap lifecycle controller.
//!
//! Owns every swap, the trusted-signer configuration, the optional exposure
//! book and the ordered event log. Each operation checks everything first,
//! then mutates:
//!
//! 1. capability (`Unauthorized`)
//! 2. swap existence and state (`SwapNotFound`, `InvalidSwapState`,
//!    `AlreadySettled`)
//! 3. operation-specific inputs: quote, time window, capacity
//! 4. state change, exposure update, event, log line

use std::collections::HashMap;

use riskswap_capacity::{CapacityGuard, CapacityOracle, CapacityPolicy};
use riskswap_quote::QuoteVerifier;
use riskswap_settlement::{compute_pnl, settlement_window};
use riskswap_types::{
    Address, ControllerConfig, QuoteSignature, Result, RiskQuotePayload, RiskswapError,
    SettlementRecord, Swap, SwapEvent, SwapId, SwapProposal, SwapStatus, time::format_ts,
};

use crate::{ExposureBook, Permissions, RoleTable};

/// Single-writer swap state machine.
#[derive(Debug)]
pub struct SwapController<P: Permissions = RoleTable> {
    config: ControllerConfig,
    verifier: QuoteVerifier,
    permissions: P,
    exposure: Option<ExposureBook>,
    swaps: HashMap<SwapId, Swap>,
    events: Vec<SwapEvent>,
}

impl<P: Permissions> SwapController<P> {
    /// Build a controller from validated configuration.
    ///
    /// # Errors
    /// [`RiskswapError::Configuration`] if `config` fails validation.
    pub fn new(config: ControllerConfig, permissions: P) -> Result<Self> {
        config.validate()?;
        let verifier = QuoteVerifier::from_config(&config.quote);
        tracing::info!(
            trusted_signer = %verifier.trusted_signer(),
            stale_seconds = verifier.stale_seconds(),
            capacity_gated = config.capacity.is_some(),
            "Swap controller initialized"
        );
        Ok(Self {
            config,
            verifier,
            permissions,
            exposure: None,
            swaps: HashMap::new(),
            events: Vec::new(),
        })
    }

    /// Gate proposals on issuance capacity read from `oracle`.
    ///
    /// Uses the configured [`CapacityConfig`](riskswap_types::CapacityConfig),
    /// or its defaults when none was given.
    #[must_use]
    pub fn with_capacity(
        mut self,
        oracle: Box<dyn CapacityOracle>,
        policy: Option<Box<dyn CapacityPolicy>>,
    ) -> Self {
        let capacity_config = self.config.capacity.unwrap_or_default();
        self.config.capacity = Some(capacity_config);
        let guard = match policy {
            Some(policy) => CapacityGuard::with_policy(capacity_config, policy),
            None => CapacityGuard::new(capacity_config),
        };
        self.exposure = Some(ExposureBook::new(guard, oracle));
        self
    }

    // -----------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------

    #[must_use]
    pub fn swap(&self, swap_id: &SwapId) -> Option<&Swap> {
        self.swaps.get(swap_id)
    }

    #[must_use]
    pub fn swap_count(&self) -> usize {
        self.swaps.len()
    }

    #[must_use]
    pub fn trusted_signer(&self) -> Address {
        self.verifier.trusted_signer()
    }

    /// Outstanding notional admitted through the capacity guard. Zero when
    /// the controller is not capacity-gated.
    #[must_use]
    pub fn total_outstanding(&self) -> u128 {
        self.exposure.as_ref().map_or(0, ExposureBook::outstanding)
    }

    #[must_use]
    pub fn permissions(&self) -> &P {
        &self.permissions
    }

    pub fn permissions_mut(&mut self) -> &mut P {
        &mut self.permissions
    }

    /// Events recorded since the last drain, oldest first.
    #[must_use]
    pub fn pending_events(&self) -> &[SwapEvent] {
        &self.events
    }

    /// Hand recorded events to an indexer and clear the log.
    pub fn drain_events(&mut self) -> Vec<SwapEvent> {
        std::mem::take(&mut self.events)
    }

    // -----------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------

    /// Record a new swap in `Proposed`.
    ///
    /// # Errors
    /// - [`RiskswapError::Unauthorized`] unless `caller` is a broker.
    /// - [`RiskswapError::InvalidProposal`] if the terms are malformed.
    /// - [`RiskswapError::DuplicateSwap`] if identical terms were proposed before.
    /// - Capacity errors when capacity-gated.
    pub fn propose(&mut self, caller: Address, proposal: &SwapProposal, now: u64) -> Result<SwapId> {
        self.require_broker(&caller)?;
        proposal.validate()?;

        let swap_id = proposal.swap_id();
        if self.swaps.contains_key(&swap_id) {
            return Err(RiskswapError::DuplicateSwap(swap_id));
        }

        let notional = proposal.protection_buyer.notional;
        if let Some(book) = &self.exposure {
            book.admit(notional, now)?;
        }

        // --- all checks passed ---
        if let Some(book) = &mut self.exposure {
            book.commit(notional);
        }
        self.swaps
            .insert(swap_id, Swap::from_proposal(proposal, caller));
        self.events.push(SwapEvent::Proposed {
            swap_id,
            proposer: caller,
            terms: *proposal,
        });

        tracing::info!(
            swap_id = %swap_id,
            portfolio = %proposal.portfolio_id.short(),
            proposer = %caller,
            notional,
            "Swap proposed"
        );
        Ok(swap_id)
    }

    /// `Proposed → Active`.
    ///
    /// # Errors
    /// - [`RiskswapError::Unauthorized`] unless `caller` is a broker or admin.
    /// - [`RiskswapError::InvalidSwapState`] unless the swap is `Proposed`.
    /// - [`RiskswapError::OutOfRangeParameter`] if `now >= maturity`.
    pub fn activate(&mut self, caller: Address, swap_id: &SwapId, now: u64) -> Result<()> {
        self.require_operator(&caller)?;
        let swap = self.lookup(swap_id)?;
        swap.require_status(SwapStatus::Proposed)?;
        let maturity = swap.maturity();
        if now >= maturity {
            return Err(RiskswapError::OutOfRangeParameter {
                name: "activation_time",
                value: now.into(),
                min: 0,
                max: u128::from(maturity) - 1,
            });
        }

        // --- all checks passed ---
        self.lookup_mut(swap_id)?.mark_active()?;
        self.events.push(SwapEvent::Activated {
            swap_id: *swap_id,
            at: now,
        });

        tracing::info!(swap_id = %swap_id, at = %format_ts(now), "Swap activated");
        Ok(())
    }

    /// `Active → Settled`, consuming one verified quote.
    ///
    /// Anyone may submit; the quote's signature is the authority.
    ///
    /// # Errors
    /// - [`RiskswapError::InvalidSwapState`] unless the swap is `Active`;
    ///   [`RiskswapError::AlreadySettled`] if it already settled.
    /// - Quote errors: `BadSignature`, `QuoteStale`, `QuoteMismatch`.
    /// - [`RiskswapError::OutOfRangeParameter`] if `now < start` or the
    ///   quote's spread is out of range.
    pub fn settle(
        &mut self,
        swap_id: &SwapId,
        payload: &RiskQuotePayload,
        signature: &QuoteSignature,
        now: u64,
    ) -> Result<SettlementRecord> {
        let swap = self.lookup(swap_id)?;
        swap.require_status(SwapStatus::Active)?;

        let quote = self
            .verifier
            .check(payload, signature, &swap.portfolio_id, now)?;
        let window = settlement_window(swap.start(), swap.maturity(), now)?;
        let pnl = compute_pnl(
            payload.spread_bps,
            swap.fixed_spread_bps(),
            swap.notional(),
            window.elapsed_days,
            window.tenor_days,
        )?;
        let record = SettlementRecord {
            pnl,
            quote_digest: quote.digest,
            fair_spread_bps: payload.spread_bps,
            elapsed_days: window.elapsed_days,
            tenor_days: window.tenor_days,
            settled_at: now,
        };
        let notional = swap.notional();

        // --- all checks passed ---
        self.lookup_mut(swap_id)?.mark_settled(record)?;
        if let Some(book) = &mut self.exposure {
            book.release(notional);
        }
        self.events.push(SwapEvent::Settled {
            swap_id: *swap_id,
            pnl,
            quote_digest: quote.digest,
            at: now,
        });

        tracing::info!(
            swap_id = %swap_id,
            pnl,
            fair_bps = payload.spread_bps,
            elapsed_days = window.elapsed_days,
            tenor_days = window.tenor_days,
            quote_digest = %hex::encode(quote.digest),
            at = %format_ts(now),
            "Swap settled"
        );
        Ok(record)
    }

    /// `Proposed → Cancelled`, releasing admitted exposure.
    ///
    /// # Errors
    /// - [`RiskswapError::Unauthorized`] unless `caller` is a broker or admin.
    /// - [`RiskswapError::InvalidSwapState`] unless the swap is `Proposed`.
    pub fn cancel(&mut self, caller: Address, swap_id: &SwapId, now: u64) -> Result<()> {
        self.require_operator(&caller)?;
        let swap = self.lookup(swap_id)?;
        swap.require_status(SwapStatus::Proposed)?;
        let notional = swap.notional();

        // --- all checks passed ---
        self.lookup_mut(swap_id)?.mark_cancelled()?;
        if let Some(book) = &mut self.exposure {
            book.release(notional);
        }
        self.events.push(SwapEvent::Cancelled {
            swap_id: *swap_id,
            at: now,
        });

        tracing::info!(swap_id = %swap_id, by = %caller, "Swap cancelled");
        Ok(())
    }

    /// Replace the trusted quote signer. Returns the previous signer.
    ///
    /// Swaps already settled keep the quote they consumed; only future
    /// settlements are affected.
    ///
    /// # Errors
    /// - [`RiskswapError::Unauthorized`] unless `caller` is the admin.
    /// - [`RiskswapError::Configuration`] if `signer` is the zero address.
    pub fn set_trusted_signer(&mut self, caller: Address, signer: Address) -> Result<Address> {
        if !self.permissions.is_admin(&caller) {
            return Err(RiskswapError::Unauthorized {
                caller,
                capability: "admin",
            });
        }
        if signer.is_zero() {
            return Err(RiskswapError::Configuration(
                "trusted signer must not be the zero address".to_string(),
            ));
        }

        let previous = self.verifier.set_trusted_signer(signer);
        self.config.quote.trusted_signer = signer;
        self.events.push(SwapEvent::TrustedSignerUpdated {
            previous,
            current: signer,
        });

        tracing::info!(previous = %previous, current = %signer, "Trusted signer updated");
        Ok(previous)
    }

    // -----------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------

    fn lookup(&self, swap_id: &SwapId) -> Result<&Swap> {
        self.swaps
            .get(swap_id)
            .ok_or(RiskswapError::SwapNotFound(*swap_id))
    }

    fn lookup_mut(&mut self, swap_id: &SwapId) -> Result<&mut Swap> {
        self.swaps
            .get_mut(swap_id)
            .ok_or(RiskswapError::SwapNotFound(*swap_id))
    }

    fn require_broker(&self, caller: &Address) -> Result<()> {
        if self.permissions.is_broker(caller) {
            Ok(())
        } else {
            Err(RiskswapError::Unauthorized {
                caller: *caller,
                capability: "broker",
            })
        }
    }

    fn require_operator(&self, caller: &Address) -> Result<()> {
        if self.permissions.is_broker(caller) || self.permissions.is_admin(caller) {
            Ok(())
        } else {
            Err(RiskswapError::Unauthorized {
                caller: *caller,
                capability: "broker or admin",
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use riskswap_quote::QuoteSigner;
    use riskswap_types::{PortfolioId, constants::SECONDS_PER_DAY as DAY};

    const T: u64 = 1_700_000_000;
    const ADMIN: Address = Address([0xad; 20]);
    const BROKER: Address = Address([0xb0; 20]);
    const PID: PortfolioId = PortfolioId([0x11; 32]);

    fn controller(signer: &QuoteSigner) -> SwapController {
        let roles = RoleTable::new(ADMIN).with_broker(BROKER);
        SwapController::new(ControllerConfig::new(signer.address()), roles).unwrap()
    }

    fn proposal() -> SwapProposal {
        SwapProposal::dummy(PID, 1_000_000, 80, T, T + 30 * DAY)
    }

    fn quote(signer: &QuoteSigner, as_of: u64, spread_bps: u16) -> (RiskQuotePayload, QuoteSignature) {
        let payload = RiskQuotePayload::dummy(PID, as_of, spread_bps);
        let (_, sig) = signer.sign_quote(&payload).unwrap();
        (payload, sig)
    }

    fn active(ctl: &mut SwapController) -> SwapId {
        let id = ctl.propose(BROKER, &proposal(), T).unwrap();
        ctl.activate(BROKER, &id, T).unwrap();
        id
    }

    #[test]
    fn propose_requires_broker() {
        let signer = QuoteSigner::random();
        let mut ctl = controller(&signer);
        let err = ctl.propose(ADMIN, &proposal(), T).unwrap_err();
        assert!(matches!(err, RiskswapError::Unauthorized { capability: "broker", .. }));
        assert_eq!(ctl.swap_count(), 0);
        assert!(ctl.pending_events().is_empty());
    }

    #[test]
    fn propose_records_swap_and_event() {
        let signer = QuoteSigner::random();
        let mut ctl = controller(&signer);
        let id = ctl.propose(BROKER, &proposal(), T).unwrap();
        assert_eq!(id, proposal().swap_id());

        let swap = ctl.swap(&id).unwrap();
        assert_eq!(swap.status, SwapStatus::Proposed);
        assert_eq!(swap.proposer, BROKER);

        let events = ctl.drain_events();
        assert!(matches!(
            &events[..],
            [SwapEvent::Proposed { swap_id, terms, .. }] if *swap_id == id && *terms == proposal()
        ));
        assert!(ctl.pending_events().is_empty());
    }

    #[test]
    fn duplicate_terms_rejected() {
        let signer = QuoteSigner::random();
        let mut ctl = controller(&signer);
        let id = ctl.propose(BROKER, &proposal(), T).unwrap();
        let err = ctl.propose(BROKER, &proposal(), T + 1).unwrap_err();
        assert!(matches!(err, RiskswapError::DuplicateSwap(dup) if dup == id));
        assert_eq!(ctl.swap_count(), 1);
    }

    #[test]
    fn malformed_proposal_rejected() {
        let signer = QuoteSigner::random();
        let mut ctl = controller(&signer);
        let mut p = proposal();
        p.protection_buyer.notional = 0;
        let err = ctl.propose(BROKER, &p, T).unwrap_err();
        assert!(matches!(err, RiskswapError::InvalidProposal { .. }));
    }

    #[test]
    fn activate_after_maturity_rejected() {
        let signer = QuoteSigner::random();
        let mut ctl = controller(&signer);
        let id = ctl.propose(BROKER, &proposal(), T).unwrap();
        let err = ctl.activate(BROKER, &id, T + 30 * DAY).unwrap_err();
        assert!(matches!(err, RiskswapError::OutOfRangeParameter { name: "activation_time", .. }));
        assert_eq!(ctl.swap(&id).unwrap().status, SwapStatus::Proposed);

        // one second before maturity is still allowed
        ctl.activate(BROKER, &id, T + 30 * DAY - 1).unwrap();
    }

    #[test]
    fn activate_before_start_allowed() {
        let signer = QuoteSigner::random();
        let mut ctl = controller(&signer);
        let id = ctl.propose(BROKER, &proposal(), T - DAY).unwrap();
        ctl.activate(BROKER, &id, T - DAY).unwrap();
        assert_eq!(ctl.swap(&id).unwrap().status, SwapStatus::Active);
    }

    #[test]
    fn unknown_swap() {
        let signer = QuoteSigner::random();
        let mut ctl = controller(&signer);
        let missing = SwapId([7; 32]);
        let err = ctl.activate(BROKER, &missing, T).unwrap_err();
        assert!(matches!(err, RiskswapError::SwapNotFound(id) if id == missing));
    }

    #[test]
    fn stranger_cannot_activate() {
        let signer = QuoteSigner::random();
        let mut ctl = controller(&signer);
        let id = ctl.propose(BROKER, &proposal(), T).unwrap();
        let err = ctl.activate(Address([9; 20]), &id, T).unwrap_err();
        assert!(matches!(err, RiskswapError::Unauthorized { .. }));
        ctl.activate(ADMIN, &id, T).unwrap();
    }

    #[test]
    fn settle_mid_life() {
        let signer = QuoteSigner::random();
        let mut ctl = controller(&signer);
        let id = active(&mut ctl);
        let now = T + 29 * DAY;
        let (payload, sig) = quote(&signer, now, 100);

        let record = ctl.settle(&id, &payload, &sig, now).unwrap();
        assert_eq!(record.pnl, 1_933);
        assert_eq!((record.elapsed_days, record.tenor_days), (29, 30));
        assert_eq!(record.quote_digest, riskswap_quote::digest(&payload));

        let swap = ctl.swap(&id).unwrap();
        assert_eq!(swap.status, SwapStatus::Settled);
        assert_eq!(swap.settlement, Some(record));
    }

    #[test]
    fn settle_before_start_rejected() {
        let signer = QuoteSigner::random();
        let mut ctl = controller(&signer);
        let id = ctl.propose(BROKER, &proposal(), T - DAY).unwrap();
        ctl.activate(BROKER, &id, T - DAY).unwrap();

        let (payload, sig) = quote(&signer, T - 1, 100);
        let err = ctl.settle(&id, &payload, &sig, T - 1).unwrap_err();
        assert!(matches!(err, RiskswapError::OutOfRangeParameter { name: "settlement_time", .. }));
        assert_eq!(ctl.swap(&id).unwrap().status, SwapStatus::Active);
    }

    #[test]
    fn failed_settle_leaves_no_trace() {
        let signer = QuoteSigner::random();
        let mut ctl = controller(&signer);
        let id = active(&mut ctl);
        ctl.drain_events();

        let (payload, sig) = quote(&QuoteSigner::random(), T + DAY, 100);
        let err = ctl.settle(&id, &payload, &sig, T + DAY).unwrap_err();
        assert!(matches!(err, RiskswapError::BadSignature { .. }));
        let swap = ctl.swap(&id).unwrap();
        assert_eq!(swap.status, SwapStatus::Active);
        assert!(swap.settlement.is_none());
        assert!(ctl.pending_events().is_empty());
    }

    #[test]
    fn quote_for_other_portfolio_rejected() {
        let signer = QuoteSigner::random();
        let mut ctl = controller(&signer);
        let id = active(&mut ctl);
        let payload = RiskQuotePayload::dummy(PortfolioId([0x22; 32]), T + DAY, 100);
        let (_, sig) = signer.sign_quote(&payload).unwrap();
        let err = ctl.settle(&id, &payload, &sig, T + DAY).unwrap_err();
        assert!(matches!(err, RiskswapError::QuoteMismatch { .. }));
    }

    #[test]
    fn cancel_only_from_proposed() {
        let signer = QuoteSigner::random();
        let mut ctl = controller(&signer);
        let id = ctl.propose(BROKER, &proposal(), T).unwrap();
        ctl.cancel(BROKER, &id, T).unwrap();
        assert_eq!(ctl.swap(&id).unwrap().status, SwapStatus::Cancelled);

        let err = ctl.activate(BROKER, &id, T).unwrap_err();
        assert!(matches!(
            err,
            RiskswapError::InvalidSwapState { actual: SwapStatus::Cancelled, .. }
        ));

        let mut p = proposal();
        p.correlation_bps = 3_000;
        let live = ctl.propose(BROKER, &p, T).unwrap();
        ctl.activate(BROKER, &live, T).unwrap();
        assert!(ctl.cancel(BROKER, &live, T).is_err());
    }

    #[test]
    fn signer_rotation_is_admin_only() {
        let old = QuoteSigner::random();
        let new = QuoteSigner::random();
        let mut ctl = controller(&old);

        let err = ctl.set_trusted_signer(BROKER, new.address()).unwrap_err();
        assert!(matches!(err, RiskswapError::Unauthorized { capability: "admin", .. }));
        let err = ctl.set_trusted_signer(ADMIN, Address::ZERO).unwrap_err();
        assert!(matches!(err, RiskswapError::Configuration(_)));
        assert_eq!(ctl.trusted_signer(), old.address());

        assert_eq!(ctl.set_trusted_signer(ADMIN, new.address()).unwrap(), old.address());
        assert_eq!(ctl.trusted_signer(), new.address());
        assert!(matches!(
            ctl.drain_events().last(),
            Some(SwapEvent::TrustedSignerUpdated { .. })
        ));

        let id = active(&mut ctl);
        let (payload, sig) = quote(&old, T + DAY, 100);
        assert!(ctl.settle(&id, &payload, &sig, T + DAY).is_err());
        let (payload, sig) = quote(&new, T + DAY, 100);
        assert!(ctl.settle(&id, &payload, &sig, T + DAY).is_ok());
    }

    #[test]
    fn invalid_config_rejected() {
        let err = SwapController::new(ControllerConfig::new(Address::ZERO), RoleTable::new(ADMIN))
            .unwrap_err();
        assert!(matches!(err, RiskswapError::Configuration(_)));
    }

    #[test]
    fn ungated_controller_has_no_outstanding() {
        let signer = QuoteSigner::random();
        let mut ctl = controller(&signer);
        ctl.propose(BROKER, &proposal(), T).unwrap();
        assert_eq!(ctl.total_outstanding(), 0);
    }
}
