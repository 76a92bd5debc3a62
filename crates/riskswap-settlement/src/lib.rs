//! # riskswap-settlement
//!
//! **Settlement Calculator**: a pure fixed-point function from
//! `(fair spread, fixed spread, notional, elapsed days, tenor days)` to a
//! signed profit/loss amount, plus the day-count derivation that turns swap
//! timestamps into calculator inputs.
//!
//! ## Formula
//!
//! ```text
//! delta_bps = fair_spread_bps - fixed_spread_bps          (signed)
//! pnl       = round_half_up(delta_bps * notional * elapsed_days,
//!                           10_000 * tenor_days)
//! ```
//!
//! Rounding is half-up and symmetric around zero: the magnitude is rounded
//! and the sign reapplied, so `-0.5` rounds to `-1`, never to `0`.
//!
//! All arithmetic is integer and checked. Every replica computes the same
//! result from the same inputs, or the same error.

pub mod days;
pub mod pnl;

pub use days::{SettlementWindow, settlement_window};
pub use pnl::{compute_pnl, round_half_up};
