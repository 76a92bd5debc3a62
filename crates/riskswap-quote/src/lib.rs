//! # riskswap-quote
//!
//! **Quote Digest & Signature Verifier**: canonicalizes a risk-quote
//! payload into a fixed-size hash, recovers the signer of an attached
//! signature, and decides whether a quote may be consumed.
//!
//! ## Verification Flow
//!
//! ```text
//! payload ─▶ digest() ─▶ personal_sign_hash() ─▶ recover_signer(sig)
//!                                                      │
//!          QuoteVerifier::check(): signer == trusted ◀─┘
//!                                  now - asOf <= stale
//!                                  portfolio / model bound
//! ```
//!
//! The EIP-191 prefix is applied exactly once, inside
//! [`personal_sign_hash`]. Producers sign with [`QuoteSigner`], which goes
//! through the same function.

pub mod digest;
pub mod signature;
pub mod signer;
pub mod verifier;

pub use digest::{canonical_json, digest, encode_payload, features_hash, model_id_hash};
pub use signature::{personal_sign_hash, recover_signer};
pub use signer::QuoteSigner;
pub use verifier::{QuoteVerifier, verify_quote};
