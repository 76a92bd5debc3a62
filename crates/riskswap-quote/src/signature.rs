//! EIP-191 personal-sign hashing and secp256k1 signer recovery.

use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use riskswap_types::{
    Address, Hash32, QuoteSignature, Result, RiskswapError, constants, keccak256,
};

/// `n / 2` for secp256k1. Signatures with `s` above this are malleable
/// twins of a low-`s` signature and are refused.
const SECP256K1_HALF_ORDER: [u8; 32] = [
    0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0x5d, 0x57, 0x6e, 0x73, 0x57, 0xa4, 0x50, 0x1d, 0xdf, 0xe9, 0x2f, 0x46, 0x68, 0x1b, 0x20, 0xa0,
];

fn bad(reason: impl Into<String>) -> RiskswapError {
    RiskswapError::BadSignature {
        reason: reason.into(),
    }
}

/// `keccak256("\x19Ethereum Signed Message:\n32" || digest)`.
///
/// This is the only place the prefix is applied. Signing and recovery both
/// call it exactly once.
#[must_use]
pub fn personal_sign_hash(digest: &Hash32) -> Hash32 {
    let mut msg = Vec::with_capacity(constants::PERSONAL_SIGN_PREFIX.len() + digest.len());
    msg.extend_from_slice(constants::PERSONAL_SIGN_PREFIX);
    msg.extend_from_slice(digest);
    keccak256(msg)
}

/// The account address of a secp256k1 public key.
pub fn address_of_key(key: &VerifyingKey) -> Result<Address> {
    let point = key.to_encoded_point(false);
    let body: &[u8; 64] = point
        .as_bytes()
        .get(1..)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| RiskswapError::Internal("uncompressed point is not 65 bytes".into()))?;
    Ok(Address::from_public_key_body(body))
}

/// Recover the address that produced `signature` over the personally-signed
/// form of `digest`.
///
/// # Errors
/// [`RiskswapError::BadSignature`] when the recovery indicator is not one of
/// 0, 1, 27, 28; when `r` or `s` is zero or not below the curve order; when
/// `s` is in the upper half of the order; or when no valid key recovers.
pub fn recover_signer(digest: &Hash32, signature: &QuoteSignature) -> Result<Address> {
    let v = match signature.v() {
        v @ (27 | 28) => v - 27,
        v @ (0 | 1) => v,
        other => return Err(bad(format!("invalid recovery indicator {other}"))),
    };
    let recovery_id =
        RecoveryId::from_byte(v).ok_or_else(|| bad(format!("invalid recovery id {v}")))?;

    if signature.rs()[32..] > SECP256K1_HALF_ORDER[..] {
        return Err(bad("s is in the upper half of the curve order"));
    }
    let sig = Signature::from_slice(signature.rs()).map_err(|e| bad(format!("r/s: {e}")))?;

    let prehash = personal_sign_hash(digest);
    let key = VerifyingKey::recover_from_prehash(&prehash, &sig, recovery_id)
        .map_err(|e| bad(format!("recovery failed: {e}")))?;

    let address = address_of_key(&key)?;
    if address.is_zero() {
        return Err(bad("recovered the zero address"));
    }
    Ok(address)
}
