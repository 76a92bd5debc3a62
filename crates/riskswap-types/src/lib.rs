//! # riskswap-types
//!
//! Shared types, errors, and configuration for the **riskswap** quote
//! verification and settlement core.
//!
//! This crate is the leaf dependency of the workspace. Every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`PortfolioId`], [`SwapId`], [`Address`], [`Hash32`]
//! - **Quote model**: [`RiskQuotePayload`], [`RiskScore`], [`QuoteSignature`]
//! - **Swap model**: [`Swap`], [`SwapLeg`], [`SwapProposal`], [`SwapStatus`], [`SettlementRecord`]
//! - **Capacity model**: [`CapacitySnapshot`], [`IssuanceHeadroom`]
//! - **Events**: [`SwapEvent`]
//! - **Configuration**: [`ControllerConfig`], [`QuoteConfig`], [`CapacityConfig`]
//! - **Errors**: [`RiskswapError`] with `RS_ERR_` prefix codes
//! - **Constants**: bounds, defaults and domain separators

pub mod capacity;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod hash;
pub mod ids;
pub mod quote;
pub mod swap;
pub mod time;

pub use capacity::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use hash::{Hash32, keccak256};
pub use ids::*;
pub use quote::*;
pub use swap::*;

// Constants are accessed via `riskswap_types::constants::FOO`
// (not re-exported to avoid name collisions).
