//! # riskswap-capacity
//!
//! **Capacity Guard**: decides whether new exposure may be admitted against
//! a timestamped capacity snapshot read from an external oracle.
//!
//! ## Check Order
//!
//! ```text
//! snapshot ─▶ stale?  ──yes──▶ StaleCapacityData
//!               │ no
//!               ▼
//!        policy.max_issuable(capacity) ──err/absent──▶ capacity * haircut
//!               │
//!               ▼
//!   outstanding + requested > max? ──yes──▶ IssuanceCapExceeded
//!               │ no
//!               ▼
//!        IssuanceHeadroom
//! ```
//!
//! The guard only reads. Callers own the outstanding total and update it
//! after a check passes.

pub mod guard;
pub mod oracle;
pub mod policy;

pub use guard::CapacityGuard;
pub use oracle::{CapacityOracle, StaticCapacityOracle};
pub use policy::{CapacityPolicy, HaircutPolicy, haircut};
