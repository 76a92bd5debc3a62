//! Keccak-256 hashing shared by quote digests and swap identifiers.

use sha3::{Digest, Keccak256};

/// A 32-byte hash value.
pub type Hash32 = [u8; 32];

/// Keccak-256 (the pre-standard SHA-3 variant used by Ethereum) over `data`.
#[must_use]
pub fn keccak256(data: impl AsRef<[u8]>) -> Hash32 {
    let mut hasher = Keccak256::new();
    hasher.update(data.as_ref());
    hasher.finalize().into()
}

// ---------------------------------------------------------------------------
// Fixed-width 32-byte words (Solidity `abi.encode` layout)
// ---------------------------------------------------------------------------

/// Left-pad an unsigned integer to a 32-byte big-endian word.
#[must_use]
pub fn word_u128(value: u128) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[16..].copy_from_slice(&value.to_be_bytes());
    word
}

/// Left-pad a `u64` to a 32-byte big-endian word.
#[must_use]
pub fn word_u64(value: u64) -> [u8; 32] {
    word_u128(u128::from(value))
}

/// Left-pad a `u16` to a 32-byte big-endian word.
#[must_use]
pub fn word_u16(value: u16) -> [u8; 32] {
    word_u128(u128::from(value))
}

/// Left-pad a 20-byte address to a 32-byte word.
#[must_use]
pub fn word_address(address: &[u8; 20]) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address);
    word
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_are_left_padded_big_endian() {
        let w = word_u16(0x0102);
        assert_eq!(w[30..], [0x01, 0x02]);
        assert!(w[..30].iter().all(|b| *b == 0));
        assert_eq!(word_u64(1)[31], 1);
        assert_eq!(word_address(&[0xff; 20])[..12], [0u8; 12]);
    }

    #[test]
    fn empty_input_vector() {
        assert_eq!(
            hex::encode(keccak256([])),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn differs_from_sha3_256() {
        // NIST SHA3-256("") starts with a7ffc6f8; Keccak-256 must not.
        assert!(!hex::encode(keccak256(b"")).starts_with("a7ffc6f8"));
    }
}
