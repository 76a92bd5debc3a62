//! Signed risk quote model.
//!
//! A [`RiskQuotePayload`] is the content an off-chain pricing model signs.
//! It is an immutable value that exists only transiently as a verification
//! input: it binds a risk score and fair spread to one portfolio, one
//! evaluation time, one model version and one feature set.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Hash32, PortfolioId, RiskswapError, constants};

// ---------------------------------------------------------------------------
// RiskScore
// ---------------------------------------------------------------------------

/// Model-internal risk score, carried as a 256-bit big-endian word.
///
/// The core never interprets the score; it only hashes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RiskScore(pub [u8; 32]);

impl RiskScore {
    #[must_use]
    pub fn from_u128(value: u128) -> Self {
        let mut word = [0u8; 32];
        word[16..].copy_from_slice(&value.to_be_bytes());
        Self(word)
    }

    /// The score as `u128`, if it fits.
    #[must_use]
    pub fn to_u128(&self) -> Option<u128> {
        if self.0[..16].iter().any(|b| *b != 0) {
            return None;
        }
        let mut low = [0u8; 16];
        low.copy_from_slice(&self.0[16..]);
        Some(u128::from_be_bytes(low))
    }
}

impl fmt::Display for RiskScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_u128() {
            Some(v) => write!(f, "{v}"),
            None => write!(f, "0x{}", hex::encode(self.0)),
        }
    }
}

// ---------------------------------------------------------------------------
// RiskQuotePayload
// ---------------------------------------------------------------------------

/// The seven canonical fields of a signed risk quote, in digest order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskQuotePayload {
    /// Portfolio the quote was evaluated for.
    pub portfolio_id: PortfolioId,
    /// Unix seconds at which the model evaluated this quote.
    pub as_of: u64,
    /// Opaque model score.
    pub risk_score: RiskScore,
    /// Correlation assumption, basis points.
    pub correlation_bps: u16,
    /// Fair spread, basis points. Consumed as the settlement fair spread.
    pub spread_bps: u16,
    /// `keccak256(model_id)`.
    pub model_id_hash: Hash32,
    /// `keccak256(canonical_json(features))`.
    pub features_hash: Hash32,
}

impl RiskQuotePayload {
    /// Age of the quote at `now`, or `None` if it is dated in the future.
    #[must_use]
    pub fn age_at(&self, now: u64) -> Option<u64> {
        now.checked_sub(self.as_of)
    }
}

/// Dummy payload for testing. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl RiskQuotePayload {
    pub fn dummy(portfolio_id: PortfolioId, as_of: u64, spread_bps: u16) -> Self {
        Self {
            portfolio_id,
            as_of,
            risk_score: RiskScore::from_u128(123_456_789),
            correlation_bps: 2_500,
            spread_bps,
            model_id_hash: crate::keccak256(b"xgb-v0-stub"),
            features_hash: [0x22; 32],
        }
    }
}

// ---------------------------------------------------------------------------
// QuoteSignature
// ---------------------------------------------------------------------------

/// A 65-byte `r || s || v` ECDSA signature over the personally-signed digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuoteSignature(pub [u8; constants::SIGNATURE_LEN]);

impl QuoteSignature {
    /// Build from raw bytes.
    ///
    /// # Errors
    /// Returns [`RiskswapError::BadSignature`] if `bytes` is not exactly 65 bytes.
    pub fn from_slice(bytes: &[u8]) -> crate::Result<Self> {
        let arr: [u8; constants::SIGNATURE_LEN] =
            bytes
                .try_into()
                .map_err(|_| RiskswapError::BadSignature {
                    reason: format!(
                        "expected {} bytes, got {}",
                        constants::SIGNATURE_LEN,
                        bytes.len()
                    ),
                })?;
        Ok(Self(arr))
    }

    /// Parse a `0x`-optional hex string.
    pub fn from_hex(s: &str) -> crate::Result<Self> {
        let raw = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(raw).map_err(|e| RiskswapError::BadSignature {
            reason: format!("invalid hex: {e}"),
        })?;
        Self::from_slice(&bytes)
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// The 64-byte `r || s` part.
    #[must_use]
    pub fn rs(&self) -> &[u8] {
        &self.0[..64]
    }

    /// The recovery indicator byte.
    #[must_use]
    pub fn v(&self) -> u8 {
        self.0[64]
    }
}

impl fmt::Debug for QuoteSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuoteSignature({})", self.to_hex())
    }
}

impl Serialize for QuoteSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for QuoteSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_score_u128_roundtrip() {
        let s = RiskScore::from_u128(u128::MAX);
        assert_eq!(s.to_u128(), Some(u128::MAX));
        assert_eq!(s.0[..16], [0u8; 16]);
    }

    #[test]
    fn risk_score_wide_value_has_no_u128() {
        let mut word = [0u8; 32];
        word[0] = 1;
        let s = RiskScore(word);
        assert_eq!(s.to_u128(), None);
        assert!(s.to_string().starts_with("0x01"));
    }

    #[test]
    fn age_handles_future_quotes() {
        let p = RiskQuotePayload::dummy(PortfolioId([1; 32]), 100, 100);
        assert_eq!(p.age_at(150), Some(50));
        assert_eq!(p.age_at(100), Some(0));
        assert_eq!(p.age_at(99), None);
    }

    #[test]
    fn signature_length_enforced() {
        assert!(QuoteSignature::from_slice(&[0u8; 65]).is_ok());
        let err = QuoteSignature::from_slice(&[0u8; 64]).unwrap_err();
        assert!(matches!(err, RiskswapError::BadSignature { .. }));
        assert!(QuoteSignature::from_slice(&[0u8; 66]).is_err());
    }

    #[test]
    fn signature_hex_roundtrip() {
        let mut raw = [0xabu8; 65];
        raw[64] = 27;
        let sig = QuoteSignature(raw);
        let back = QuoteSignature::from_hex(&sig.to_hex()).unwrap();
        assert_eq!(sig, back);
        assert_eq!(back.v(), 27);
        assert_eq!(back.rs().len(), 64);
    }

    #[test]
    fn payload_serde_uses_camel_case() {
        let p = RiskQuotePayload::dummy(PortfolioId([1; 32]), 1_700_000_000, 150);
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"asOf\":1700000000"));
        assert!(json.contains("\"spreadBps\":150"));
        let back: RiskQuotePayload = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }

    #[test]
    fn signature_serde_roundtrip() {
        let sig = QuoteSignature([7u8; 65]);
        let json = serde_json::to_string(&sig).unwrap();
        let back: QuoteSignature = serde_json::from_str(&json).unwrap();
        assert_eq!(sig, back);
    }
}
