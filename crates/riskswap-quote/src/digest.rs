//! Canonical quote digest.
//!
//! The digest is `keccak256(abi.encode(bytes32 portfolioId, uint64 asOf,
//! uint256 riskScore, uint16 correlationBps, uint16 spreadBps,
//! bytes32 modelIdHash, bytes32 featuresHash))`: seven 32-byte big-endian
//! words in field order. Every field occupies a fixed slot, so no two
//! distinct payloads share an encoding.

use std::io;

use riskswap_types::{
    Hash32, RiskQuotePayload, RiskswapError, keccak256,
    hash::{word_u16, word_u64},
};
use serde::Serialize;
use serde_json::ser::Formatter;

/// Length of the encoded payload: seven 32-byte words.
pub const ENCODED_PAYLOAD_LEN: usize = 7 * 32;

/// ABI-encode the seven payload fields.
#[must_use]
pub fn encode_payload(payload: &RiskQuotePayload) -> [u8; ENCODED_PAYLOAD_LEN] {
    let words: [[u8; 32]; 7] = [
        payload.portfolio_id.0,
        word_u64(payload.as_of),
        payload.risk_score.0,
        word_u16(payload.correlation_bps),
        word_u16(payload.spread_bps),
        payload.model_id_hash,
        payload.features_hash,
    ];
    let mut out = [0u8; ENCODED_PAYLOAD_LEN];
    for (slot, word) in out.chunks_exact_mut(32).zip(words.iter()) {
        slot.copy_from_slice(word);
    }
    out
}

/// The canonical digest a quote signer signs (before the EIP-191 prefix).
#[must_use]
pub fn digest(payload: &RiskQuotePayload) -> Hash32 {
    keccak256(encode_payload(payload))
}

/// `keccak256(utf8(model_id))`.
#[must_use]
pub fn model_id_hash(model_id: &str) -> Hash32 {
    keccak256(model_id.as_bytes())
}

/// `keccak256` of the canonical JSON form of a feature set: object keys
/// sorted, no insignificant whitespace, every character outside printable
/// ASCII written as a lowercase `\uXXXX` escape (surrogate pairs above the
/// BMP).
///
/// Only the hash is bound into the quote; the features themselves never
/// travel with it.
pub fn features_hash(features: &serde_json::Value) -> riskswap_types::Result<Hash32> {
    Ok(keccak256(canonical_json(features)?))
}

/// The canonical byte form hashed by [`features_hash`].
pub fn canonical_json(value: &serde_json::Value) -> riskswap_types::Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut out, AsciiFormatter);
    sorted(value)
        .serialize(&mut ser)
        .map_err(|e| RiskswapError::Serialization(format!("features: {e}")))?;
    Ok(out)
}

/// Compact output with string contents kept to printable ASCII.
struct AsciiFormatter;

impl Formatter for AsciiFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (i, c) in fragment.char_indices() {
            if (' '..='~').contains(&c) {
                continue;
            }
            writer.write_all(&fragment.as_bytes()[start..i])?;
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units).iter().copied() {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = i + c.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[start..])
    }
}

/// Rebuild `value` with every object's keys inserted in sorted order, so the
/// result is canonical whether or not serde_json's `preserve_order` is on.
fn sorted(value: &serde_json::Value) -> serde_json::Value {
    use serde_json::Value;
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), sorted(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}
