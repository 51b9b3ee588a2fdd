//! Reference-id synthesis for sources that do not assign one.
//!
//! Bank exports mark an unassigned reference as `"0"` (sometimes padded to
//! the column width, so any all-zero string counts). For those rows we derive
//! a stable id from the transaction content itself, so re-importing the same
//! statement maps onto the same ids and the downstream ledger can upsert
//! instead of duplicating.

use chrono::NaiveDate;
use sha2::{Digest, Sha256};

/// True when the trimmed source field carries no real reference: `"0"`, a
/// zero-padded run of `'0'`s, or nothing at all.
pub fn is_placeholder_ref(raw: &str) -> bool {
    raw.trim().chars().all(|c| c == '0')
}

/// Derive a reference id from transaction content: SHA-256 over
/// `"{ISO date}:{amount}:{narration}"`, hex-encoded (64 chars).
///
/// Deterministic by construction. Two genuinely distinct zero-reference
/// transactions collide only if they share date, amount, and narration.
pub fn synthesize_ref_id(date: NaiveDate, amount: f64, narration: &str) -> String {
    let input = format!("{}:{}:{}", date, amount, narration.trim());
    let digest = Sha256::digest(input.as_bytes());
    hex::encode(digest)
}
