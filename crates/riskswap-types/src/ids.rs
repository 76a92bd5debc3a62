//! Identifiers used throughout riskswap.
//!
//! All identifiers are fixed-width byte strings so that they hash with a
//! single, unambiguous encoding. Swap identifiers are derived from content
//! (see [`SwapId::derive`]); portfolio identifiers and addresses are supplied
//! by external systems.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Hash32, RiskswapError, keccak256};

/// Decode a `0x`-optional hex string into exactly `N` bytes.
fn decode_fixed<const N: usize>(s: &str, what: &str) -> crate::Result<[u8; N]> {
    let raw = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(raw)
        .map_err(|e| RiskswapError::Serialization(format!("{what}: invalid hex: {e}")))?;
    bytes.try_into().map_err(|b: Vec<u8>| {
        RiskswapError::Serialization(format!("{what}: expected {N} bytes, got {}", b.len()))
    })
}

// ---------------------------------------------------------------------------
// PortfolioId
// ---------------------------------------------------------------------------

/// Opaque 32-byte portfolio identifier, stable per portfolio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct PortfolioId(pub [u8; 32]);

impl PortfolioId {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl FromStr for PortfolioId {
    type Err = RiskswapError;

    fn from_str(s: &str) -> crate::Result<Self> {
        decode_fixed(s, "portfolio id").map(Self)
    }
}

impl fmt::Display for PortfolioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

// ---------------------------------------------------------------------------
// SwapId
// ---------------------------------------------------------------------------

/// Content-derived swap identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct SwapId(pub Hash32);

impl SwapId {
    /// Deterministic `SwapId` from the canonical encoding of a proposal.
    ///
    /// Identical proposal terms always produce the same id; the controller
    /// rejects the second such proposal as a duplicate.
    #[must_use]
    pub fn derive(canonical_terms: &[u8]) -> Self {
        let mut preimage =
            Vec::with_capacity(crate::constants::SWAP_ID_DOMAIN.len() + canonical_terms.len());
        preimage.extend_from_slice(crate::constants::SWAP_ID_DOMAIN);
        preimage.extend_from_slice(canonical_terms);
        Self(keccak256(preimage))
    }

    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for SwapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "swap:{}", hex::encode(&self.0[..8]))
    }
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A 20-byte account identity: counterparties, brokers, quote signers.
///
/// Derived from a secp256k1 public key as the last 20 bytes of
/// `keccak256(uncompressed_pubkey[1..])`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The all-zero address. Never a valid signer or counterparty.
    pub const ZERO: Self = Self([0u8; 20]);

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Address of an uncompressed SEC1 public key body (64 bytes, no `0x04` tag).
    #[must_use]
    pub fn from_public_key_body(body: &[u8; 64]) -> Self {
        let hash = keccak256(body);
        let mut out = [0u8; 20];
        out.copy_from_slice(&hash[12..]);
        Self(out)
    }

    /// EIP-55 mixed-case checksum encoding.
    #[must_use]
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = keccak256(lower.as_bytes());
        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = (hash[i / 2] >> (if i % 2 == 0 { 4 } else { 0 })) & 0x0f;
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl FromStr for Address {
    type Err = RiskswapError;

    fn from_str(s: &str) -> crate::Result<Self> {
        decode_fixed(s, "address").map(Self)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
