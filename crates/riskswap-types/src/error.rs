//! Error types for the riskswap core.
//!
//! All errors use the `RS_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Quote verification errors
//! - 2xx: Swap lifecycle errors
//! - 3xx: Settlement arithmetic errors
//! - 4xx: Capacity guard errors
//! - 9xx: General / internal errors
//!
//! Every error is deterministic and non-retryable without changing the input.

use thiserror::Error;

use crate::{Address, SwapId, SwapStatus};

/// Central error enum for all riskswap operations.
#[derive(Debug, Error)]
pub enum RiskswapError {
    // =================================================================
    // Quote Errors (1xx)
    // =================================================================
    /// The signature is malformed or was not produced by the trusted signer.
    #[error("RS_ERR_100: Bad signature: {reason}")]
    BadSignature { reason: String },

    /// The quote's `asOf` falls outside the staleness window.
    #[error("RS_ERR_101: Quote stale: asOf {as_of}, now {now}, window {stale_seconds}s")]
    QuoteStale {
        as_of: u64,
        now: u64,
        stale_seconds: u64,
    },

    /// The quote is bound to a different portfolio or model than expected.
    #[error("RS_ERR_102: Quote mismatch: {reason}")]
    QuoteMismatch { reason: String },

    // =================================================================
    // Swap Lifecycle Errors (2xx)
    // =================================================================
    /// No swap with this id exists.
    #[error("RS_ERR_200: Swap not found: {0}")]
    SwapNotFound(SwapId),

    /// A transition was attempted from the wrong state.
    #[error("RS_ERR_201: Invalid swap state for {swap_id}: expected {expected}, got {actual}")]
    InvalidSwapState {
        swap_id: SwapId,
        expected: SwapStatus,
        actual: SwapStatus,
    },

    /// The swap has already been settled (at-most-once settlement).
    #[error("RS_ERR_202: Swap already settled: {0}")]
    AlreadySettled(SwapId),

    /// A swap with identical terms already exists.
    #[error("RS_ERR_203: Duplicate swap proposal: {0}")]
    DuplicateSwap(SwapId),

    /// The proposal failed basic well-formedness checks.
    #[error("RS_ERR_204: Invalid proposal: {reason}")]
    InvalidProposal { reason: String },

    /// The caller lacks the capability required for this operation.
    #[error("RS_ERR_205: Unauthorized: {caller} lacks {capability}")]
    Unauthorized {
        caller: Address,
        capability: &'static str,
    },

    // =================================================================
    // Settlement Errors (3xx)
    // =================================================================
    /// A settlement input lies outside its permitted range.
    #[error("RS_ERR_300: Parameter out of range: {name}={value} (allowed {min}..={max})")]
    OutOfRangeParameter {
        name: &'static str,
        value: u128,
        min: u128,
        max: u128,
    },

    /// Fixed-point arithmetic overflowed its integer width.
    #[error("RS_ERR_301: Arithmetic overflow in {context}")]
    ArithmeticOverflow { context: &'static str },

    // =================================================================
    // Capacity Errors (4xx)
    // =================================================================
    /// The capacity snapshot is older than the caller's trust window.
    #[error("RS_ERR_400: Stale capacity data: asOf {as_of}, now {now}, max age {max_age}s")]
    StaleCapacityData { as_of: u64, now: u64, max_age: u64 },

    /// Admitting the request would exceed the max-issuable amount.
    #[error(
        "RS_ERR_401: Issuance cap exceeded: requested {requested}, available {available}, outstanding {outstanding}"
    )]
    IssuanceCapExceeded {
        requested: u128,
        available: u128,
        outstanding: u128,
    },

    /// The max-issuable policy collaborator could not answer.
    #[error("RS_ERR_402: Capacity policy unavailable: {reason}")]
    CapacityPolicyUnavailable { reason: String },

    /// The capacity oracle could not produce a snapshot.
    #[error("RS_ERR_403: Capacity oracle unavailable: {reason}")]
    CapacityOracleUnavailable { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("RS_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("RS_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, missing fields, etc.).
    #[error("RS_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, RiskswapError>;

impl From<serde_json::Error> for RiskswapError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
