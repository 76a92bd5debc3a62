//! Quote signer used by off-chain pricing services.
//!
//! Produces 65-byte `r || s || v` signatures (`v ∈ {27, 28}`, low `s`) over
//! the personally-signed digest, the format [`crate::recover_signer`] accepts.

use std::fmt;

use k256::ecdsa::SigningKey;
use riskswap_types::{Address, Hash32, QuoteSignature, Result, RiskQuotePayload, RiskswapError};

use crate::{digest, signature};

/// A secp256k1 key that signs risk quotes.
pub struct QuoteSigner {
    key: SigningKey,
    address: Address,
}

impl QuoteSigner {
    /// Load a signer from a 32-byte secret scalar.
    ///
    /// # Errors
    /// [`RiskswapError::Configuration`] if the bytes are not exactly 32 bytes
    /// encoding a non-zero scalar below the curve order.
    pub fn from_secret_bytes(secret: &[u8]) -> Result<Self> {
        if secret.len() != 32 {
            return Err(RiskswapError::Configuration(format!(
                "signing key must be 32 bytes, got {}",
                secret.len()
            )));
        }
        let key = SigningKey::from_slice(secret)
            .map_err(|e| RiskswapError::Configuration(format!("invalid signing key: {e}")))?;
        Self::from_key(key)
    }

    /// Load a signer from a `0x`-optional hex secret.
    pub fn from_hex(secret_hex: &str) -> Result<Self> {
        let raw = secret_hex.strip_prefix("0x").unwrap_or(secret_hex);
        let bytes = hex::decode(raw)
            .map_err(|e| RiskswapError::Configuration(format!("invalid signing key hex: {e}")))?;
        Self::from_secret_bytes(&bytes)
    }

    fn from_key(key: SigningKey) -> Result<Self> {
        let address = signature::address_of_key(key.verifying_key())?;
        Ok(Self { key, address })
    }

    /// The address quotes signed by this key recover to.
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// Sign a canonical quote digest (the EIP-191 prefix is applied here).
    pub fn sign_digest(&self, digest: &Hash32) -> Result<QuoteSignature> {
        self.sign_prehash(&signature::personal_sign_hash(digest))
    }

    /// Digest and sign a payload.
    pub fn sign_quote(&self, payload: &RiskQuotePayload) -> Result<(Hash32, QuoteSignature)> {
        let d = digest::digest(payload);
        let sig = self.sign_digest(&d)?;
        tracing::debug!(
            signer = %self.address,
            portfolio = %payload.portfolio_id.short(),
            as_of = payload.as_of,
            digest = %hex::encode(d),
            "Quote signed"
        );
        Ok((d, sig))
    }

    /// Sign a 32-byte prehash as-is, without any prefix.
    pub(crate) fn sign_prehash(&self, prehash: &Hash32) -> Result<QuoteSignature> {
        let (sig, recovery_id) = self
            .key
            .sign_prehash_recoverable(prehash)
            .map_err(|e| RiskswapError::Internal(format!("signing failed: {e}")))?;
        let mut out = [0u8; 65];
        out[..64].copy_from_slice(&sig.to_bytes());
        out[64] = 27 + recovery_id.to_byte();
        Ok(QuoteSignature(out))
    }
}

/// Random signer for testing. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl QuoteSigner {
    pub fn random() -> Self {
        let key = SigningKey::random(&mut rand::rngs::OsRng);
        Self::from_key(key).expect("fresh key has a valid address")
    }
}

impl fmt::Debug for QuoteSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuoteSigner")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
