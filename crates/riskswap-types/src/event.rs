//! Notifications emitted by the lifecycle controller for external indexers.

use serde::{Deserialize, Serialize};

use crate::{Address, Hash32, SwapId, SwapProposal};

/// An ordered lifecycle notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapEvent {
    /// A swap was proposed. Carries the assigned id and full terms.
    Proposed {
        swap_id: SwapId,
        proposer: Address,
        terms: SwapProposal,
    },
    Activated { swap_id: SwapId, at: u64 },
    /// A swap was settled against one quote.
    Settled {
        swap_id: SwapId,
        pnl: i128,
        quote_digest: Hash32,
        at: u64,
    },
    Cancelled { swap_id: SwapId, at: u64 },
    /// The trusted quote signer was replaced.
    TrustedSignerUpdated { previous: Address, current: Address },
}

impl SwapEvent {
    /// The swap this event concerns, if any.
    #[must_use]
    pub fn swap_id(&self) -> Option<SwapId> {
        match self {
            Self::Proposed { swap_id, .. }
            | Self::Activated { swap_id, .. }
            | Self::Settled { swap_id, .. }
            | Self::Cancelled { swap_id, .. } => Some(*swap_id),
            Self::TrustedSignerUpdated { .. } => None,
        }
    }
}
