//! System-wide constants for the riskswap core.

/// One basis point denominator: 10_000 bps = 100%.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Smallest spread accepted by the settlement calculator.
pub const MIN_SPREAD_BPS: u16 = 1;

/// Largest spread accepted by the settlement calculator.
pub const MAX_SPREAD_BPS: u16 = 10_000;

/// Largest correlation assumption a swap may be struck under.
pub const MAX_CORRELATION_BPS: u16 = 10_000;

/// Longest tenor the settlement calculator accepts (100 years).
pub const MAX_TENOR_DAYS: u64 = 36_500;

/// Seconds per settlement day.
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Default maximum age of a signed risk quote, in seconds.
pub const DEFAULT_QUOTE_STALE_SECONDS: u64 = 3_600;

/// Default maximum age of a capacity snapshot, in seconds.
pub const DEFAULT_CAPACITY_MAX_AGE_SECONDS: u64 = 86_400;

/// Haircut applied to capacity when the max-issuable policy is unavailable.
pub const FALLBACK_HAIRCUT_BPS: u64 = 9_500;

/// EIP-191 prefix for a 32-byte personally-signed message.
pub const PERSONAL_SIGN_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// Domain separator for deterministic swap identifiers.
pub const SWAP_ID_DOMAIN: &[u8] = b"riskswap:swap_id:v1:";

/// Length of an `r || s || v` ECDSA signature.
pub const SIGNATURE_LEN: usize = 65;
