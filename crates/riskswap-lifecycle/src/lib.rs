//! # riskswap-lifecycle
//!
//! **Swap Lifecycle Controller**: proposes, activates and settles swaps,
//! consuming exactly one verified quote per settlement.
//!
//! ## State Machine
//!
//! ```text
//! propose ─▶ PROPOSED ─activate─▶ ACTIVE ─settle(quote)─▶ SETTLED
//!               │
//!               └─cancel─▶ CANCELLED
//! ```
//!
//! ## Guarantees
//!
//! - Every precondition is evaluated before any mutation. A failed call
//!   leaves swaps, the outstanding total and the event log untouched.
//! - A swap settles at most once. The second attempt fails with
//!   `AlreadySettled`.
//! - Time is an explicit argument. Replaying the same calls with the same
//!   `now` values reproduces the same state and events.
//!
//! ## Time Windows
//!
//! `activate` requires `now < maturity`; `settle` requires `now >= start`.

pub mod controller;
pub mod exposure;
pub mod permissions;

pub use controller::SwapController;
pub use exposure::ExposureBook;
pub use permissions::{Permissions, RoleTable};
