//! Swap model and its lifecycle state machine.
//!
//! ## State Machine
//!
//! ```text
//!   ┌──────────┐  activate  ┌────────┐  settle(quote)  ┌─────────┐
//!   │ PROPOSED ├───────────▶│ ACTIVE ├────────────────▶│ SETTLED │
//!   └────┬─────┘            └────────┘                 └─────────┘
//!        │ cancel
//!        ▼
//!   ┌───────────┐
//!   │ CANCELLED │
//!   └───────────┘
//! ```
//!
//! Transitions are monotonic: no state is skipped and none is reversible.
//! `SETTLED` is reached exactly once, by consuming exactly one verified quote.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    Address, Hash32, PortfolioId, RiskswapError, SwapId, constants,
    hash::{word_address, word_u16, word_u64, word_u128},
};

/// Lifecycle state of a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapStatus {
    /// Terms recorded; not yet live.
    Proposed,
    /// Live; awaiting a verified quote.
    Active,
    /// Settled against one quote. **Terminal.**
    Settled,
    /// Withdrawn before activation. **Terminal.**
    Cancelled,
}

impl SwapStatus {
    /// Can a swap in this state move to `target`?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Proposed, Self::Active | Self::Cancelled) | (Self::Active, Self::Settled)
        )
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Settled | Self::Cancelled)
    }
}

impl fmt::Display for SwapStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Proposed => write!(f, "PROPOSED"),
            Self::Active => write!(f, "ACTIVE"),
            Self::Settled => write!(f, "SETTLED"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

// ---------------------------------------------------------------------------
// Legs and proposals
// ---------------------------------------------------------------------------

/// One side of a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapLeg {
    pub counterparty: Address,
    /// Notional in the smallest currency unit.
    pub notional: u128,
    /// Contracted (fixed) spread, basis points.
    pub spread_bps: u16,
    /// Effective start, unix seconds.
    pub start: u64,
    /// Maturity, unix seconds. Must be after `start`.
    pub maturity: u64,
}

impl SwapLeg {
    fn encode_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&word_address(self.counterparty.as_bytes()));
        out.extend_from_slice(&word_u128(self.notional));
        out.extend_from_slice(&word_u16(self.spread_bps));
        out.extend_from_slice(&word_u64(self.start));
        out.extend_from_slice(&word_u64(self.maturity));
    }

    fn check(&self, side: &str) -> crate::Result<()> {
        let invalid = |reason: String| Err(RiskswapError::InvalidProposal { reason });
        if self.counterparty.is_zero() {
            return invalid(format!("{side} counterparty is the zero address"));
        }
        if self.notional == 0 {
            return invalid(format!("{side} notional must be non-zero"));
        }
        if !(constants::MIN_SPREAD_BPS..=constants::MAX_SPREAD_BPS).contains(&self.spread_bps) {
            return invalid(format!(
                "{side} spread {} bps outside {}..={}",
                self.spread_bps,
                constants::MIN_SPREAD_BPS,
                constants::MAX_SPREAD_BPS
            ));
        }
        if self.maturity <= self.start {
            return invalid(format!(
                "{side} maturity {} not after start {}",
                self.maturity, self.start
            ));
        }
        Ok(())
    }
}

/// Proposal input: the full terms of a swap before it has an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapProposal {
    pub portfolio_id: PortfolioId,
    pub protection_buyer: SwapLeg,
    pub protection_seller: SwapLeg,
    pub correlation_bps: u16,
}

impl SwapProposal {
    /// Fixed-width canonical encoding of the terms (32-byte words, field order).
    #[must_use]
    pub fn canonical_encoding(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(32 * 12);
        out.extend_from_slice(self.portfolio_id.as_bytes());
        self.protection_buyer.encode_into(&mut out);
        self.protection_seller.encode_into(&mut out);
        out.extend_from_slice(&word_u16(self.correlation_bps));
        out
    }

    /// The deterministic id these terms would be assigned.
    #[must_use]
    pub fn swap_id(&self) -> SwapId {
        SwapId::derive(&self.canonical_encoding())
    }

    /// Basic well-formedness. Range checks that depend on the settlement
    /// time are repeated by the settlement calculator.
    ///
    /// # Errors
    /// Returns [`RiskswapError::InvalidProposal`] describing the first failure.
    pub fn validate(&self) -> crate::Result<()> {
        let invalid = |reason: String| Err(RiskswapError::InvalidProposal { reason });
        if self.portfolio_id.0 == [0u8; 32] {
            return invalid("portfolio id is zero".to_string());
        }
        self.protection_buyer.check("protection buyer")?;
        self.protection_seller.check("protection seller")?;

        let (buyer, seller) = (&self.protection_buyer, &self.protection_seller);
        if buyer.counterparty == seller.counterparty {
            return invalid("buyer and seller are the same counterparty".to_string());
        }
        if buyer.start != seller.start || buyer.maturity != seller.maturity {
            return invalid("legs disagree on start/maturity".to_string());
        }
        if self.correlation_bps > constants::MAX_CORRELATION_BPS {
            return invalid(format!(
                "correlation {} bps exceeds {}",
                self.correlation_bps,
                constants::MAX_CORRELATION_BPS
            ));
        }
        let tenor_days = (buyer.maturity - buyer.start).div_ceil(constants::SECONDS_PER_DAY);
        if tenor_days > constants::MAX_TENOR_DAYS {
            return invalid(format!(
                "tenor {tenor_days} days exceeds {}",
                constants::MAX_TENOR_DAYS
            ));
        }
        Ok(())
    }
}

/// Dummy proposal for testing. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl SwapProposal {
    /// Mirrored legs with the same notional, spread and dates.
    pub fn dummy(
        portfolio_id: PortfolioId,
        notional: u128,
        spread_bps: u16,
        start: u64,
        maturity: u64,
    ) -> Self {
        let leg = |byte: u8| SwapLeg {
            counterparty: Address([byte; 20]),
            notional,
            spread_bps,
            start,
            maturity,
        };
        Self {
            portfolio_id,
            protection_buyer: leg(0xb1),
            protection_seller: leg(0x5e),
            correlation_bps: 2_500,
        }
    }
}

// ---------------------------------------------------------------------------
// Swap
// ---------------------------------------------------------------------------

/// What settlement recorded against a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementRecord {
    /// Signed profit/loss in the smallest currency unit.
    pub pnl: i128,
    /// Digest of the quote that was consumed.
    pub quote_digest: Hash32,
    /// The quote's fair spread.
    pub fair_spread_bps: u16,
    pub elapsed_days: u64,
    pub tenor_days: u64,
    /// Unix seconds at settlement.
    pub settled_at: u64,
}

/// A swap and its persisted state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swap {
    pub id: SwapId,
    pub portfolio_id: PortfolioId,
    pub protection_buyer: SwapLeg,
    pub protection_seller: SwapLeg,
    pub correlation_bps: u16,
    pub status: SwapStatus,
    /// The broker that proposed it.
    pub proposer: Address,
    /// Present once `status == Settled`.
    pub settlement: Option<SettlementRecord>,
}

impl Swap {
    /// A new swap in `Proposed` from validated terms.
    #[must_use]
    pub fn from_proposal(proposal: &SwapProposal, proposer: Address) -> Self {
        Self {
            id: proposal.swap_id(),
            portfolio_id: proposal.portfolio_id,
            protection_buyer: proposal.protection_buyer,
            protection_seller: proposal.protection_seller,
            correlation_bps: proposal.correlation_bps,
            status: SwapStatus::Proposed,
            proposer,
            settlement: None,
        }
    }

    #[must_use]
    pub fn start(&self) -> u64 {
        self.protection_buyer.start
    }

    #[must_use]
    pub fn maturity(&self) -> u64 {
        self.protection_buyer.maturity
    }

    /// Notional the settlement formula applies to (the protection buyer's).
    #[must_use]
    pub fn notional(&self) -> u128 {
        self.protection_buyer.notional
    }

    /// Contracted spread paid by the protection buyer.
    #[must_use]
    pub fn fixed_spread_bps(&self) -> u16 {
        self.protection_buyer.spread_bps
    }

    /// Fail unless the swap is currently in `expected`.
    ///
    /// # Errors
    /// [`RiskswapError::AlreadySettled`] if the swap is settled, otherwise
    /// [`RiskswapError::InvalidSwapState`].
    pub fn require_status(&self, expected: SwapStatus) -> crate::Result<()> {
        if self.status == expected {
            return Ok(());
        }
        if self.status == SwapStatus::Settled {
            return Err(RiskswapError::AlreadySettled(self.id));
        }
        Err(RiskswapError::InvalidSwapState {
            swap_id: self.id,
            expected,
            actual: self.status,
        })
    }

    fn transition(&mut self, from: SwapStatus, to: SwapStatus) -> crate::Result<()> {
        self.require_status(from)?;
        debug_assert!(from.can_transition_to(to));
        self.status = to;
        Ok(())
    }

    /// `Proposed → Active`.
    pub fn mark_active(&mut self) -> crate::Result<()> {
        self.transition(SwapStatus::Proposed, SwapStatus::Active)
    }

    /// `Proposed → Cancelled`.
    pub fn mark_cancelled(&mut self) -> crate::Result<()> {
        self.transition(SwapStatus::Proposed, SwapStatus::Cancelled)
    }

    /// `Active → Settled`, recording the settlement.
    pub fn mark_settled(&mut self, record: SettlementRecord) -> crate::Result<()> {
        self.transition(SwapStatus::Active, SwapStatus::Settled)?;
        self.settlement = Some(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: u64 = 1_700_000_000;
    const DAY: u64 = constants::SECONDS_PER_DAY;

    fn proposal() -> SwapProposal {
        SwapProposal::dummy(PortfolioId([0x11; 32]), 1_000_000, 80, T, T + 30 * DAY)
    }

    fn record() -> SettlementRecord {
        SettlementRecord {
            pnl: 1,
            quote_digest: [0u8; 32],
            fair_spread_bps: 100,
            elapsed_days: 1,
            tenor_days: 30,
            settled_at: T + DAY,
        }
    }

    #[test]
    fn state_transitions_valid() {
        assert!(SwapStatus::Proposed.can_transition_to(SwapStatus::Active));
        assert!(SwapStatus::Proposed.can_transition_to(SwapStatus::Cancelled));
        assert!(SwapStatus::Active.can_transition_to(SwapStatus::Settled));
    }

    #[test]
    fn state_transitions_invalid() {
        assert!(!SwapStatus::Proposed.can_transition_to(SwapStatus::Settled));
        assert!(!SwapStatus::Active.can_transition_to(SwapStatus::Proposed));
        assert!(!SwapStatus::Active.can_transition_to(SwapStatus::Cancelled));
        assert!(!SwapStatus::Settled.can_transition_to(SwapStatus::Active));
        assert!(!SwapStatus::Settled.can_transition_to(SwapStatus::Settled));
        assert!(!SwapStatus::Cancelled.can_transition_to(SwapStatus::Active));
    }

    #[test]
    fn valid_proposal_passes() {
        assert!(proposal().validate().is_ok());
    }

    #[test]
    fn zero_notional_rejected() {
        let mut p = proposal();
        p.protection_seller.notional = 0;
        let err = p.validate().unwrap_err();
        assert!(matches!(err, RiskswapError::InvalidProposal { .. }));
    }

    #[test]
    fn maturity_must_follow_start() {
        let mut p = proposal();
        p.protection_buyer.maturity = T;
        p.protection_seller.maturity = T;
        assert!(p.validate().is_err());
    }

    #[test]
    fn legs_must_share_dates() {
        let mut p = proposal();
        p.protection_seller.maturity += 1;
        assert!(p.validate().is_err());
    }

    #[test]
    fn spread_bounds_checked() {
        let mut p = proposal();
        p.protection_buyer.spread_bps = 0;
        assert!(p.validate().is_err());
        p.protection_buyer.spread_bps = 10_001;
        assert!(p.validate().is_err());
        p.protection_buyer.spread_bps = 10_000;
        assert!(p.validate().is_ok());
    }

    #[test]
    fn overlong_tenor_rejected() {
        let mut p = proposal();
        let maturity = T + 36_501 * DAY;
        p.protection_buyer.maturity = maturity;
        p.protection_seller.maturity = maturity;
        assert!(p.validate().is_err());
    }

    #[test]
    fn self_swap_rejected() {
        let mut p = proposal();
        p.protection_seller.counterparty = p.protection_buyer.counterparty;
        assert!(p.validate().is_err());
    }

    #[test]
    fn swap_id_changes_with_any_term() {
        let base = proposal().swap_id();
        let mut p = proposal();
        p.correlation_bps += 1;
        assert_ne!(base, p.swap_id());
        let mut p = proposal();
        p.protection_seller.notional += 1;
        assert_ne!(base, p.swap_id());
        assert_eq!(base, proposal().swap_id());
    }

    #[test]
    fn canonical_encoding_is_fixed_width() {
        assert_eq!(proposal().canonical_encoding().len(), 32 * 12);
    }

    #[test]
    fn lifecycle_happy_path() {
        let mut swap = Swap::from_proposal(&proposal(), Address([9; 20]));
        assert_eq!(swap.status, SwapStatus::Proposed);
        swap.mark_active().unwrap();
        swap.mark_settled(record()).unwrap();
        assert_eq!(swap.status, SwapStatus::Settled);
        assert_eq!(swap.settlement.unwrap().pnl, 1);
    }

    #[test]
    fn settle_from_proposed_is_invalid_state() {
        let mut swap = Swap::from_proposal(&proposal(), Address([9; 20]));
        let err = swap.mark_settled(record()).unwrap_err();
        assert!(matches!(
            err,
            RiskswapError::InvalidSwapState {
                expected: SwapStatus::Active,
                actual: SwapStatus::Proposed,
                ..
            }
        ));
        assert_eq!(swap.status, SwapStatus::Proposed);
        assert!(swap.settlement.is_none());
    }

    #[test]
    fn double_settle_reports_already_settled() {
        let mut swap = Swap::from_proposal(&proposal(), Address([9; 20]));
        swap.mark_active().unwrap();
        swap.mark_settled(record()).unwrap();
        let err = swap.mark_settled(record()).unwrap_err();
        assert!(matches!(err, RiskswapError::AlreadySettled(id) if id == swap.id));
    }

    #[test]
    fn cancelled_cannot_activate() {
        let mut swap = Swap::from_proposal(&proposal(), Address([9; 20]));
        swap.mark_cancelled().unwrap();
        assert!(swap.status.is_terminal());
        assert!(swap.mark_active().is_err());
    }

    #[test]
    fn serde_roundtrip() {
        let swap = Swap::from_proposal(&proposal(), Address([9; 20]));
        let json = serde_json::to_string(&swap).unwrap();
        let back: Swap = serde_json::from_str(&json).unwrap();
        assert_eq!(swap, back);
    }
}
