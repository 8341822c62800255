//! Block digest computation.
//!
//! Every digest is SHA-256 rendered as 64 lowercase hex characters. Integers
//! are always encoded with their decimal `Display` form, which does not depend
//! on locale, so a digest computed while mining matches one recomputed during
//! validation on any machine.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// How a block's fields are laid out before hashing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HashScheme {
    /// `index || timestamp || data || prev_hash || nonce` with no separators.
    #[default]
    Concat,
    /// Each field preceded by its byte length as a big-endian u64.
    LengthPrefixed,
}

/// Digest of a block's fields using the plain concatenation scheme.
pub fn digest(index: u64, timestamp: &str, data: &str, prev_hash: &str, nonce: u64) -> String {
    digest_with(HashScheme::Concat, index, timestamp, data, prev_hash, nonce)
}

pub fn digest_with(
    scheme: HashScheme,
    index: u64,
    timestamp: &str,
    data: &str,
    prev_hash: &str,
    nonce: u64,
) -> String {
    let index = index.to_string();
    let nonce = nonce.to_string();
    let fields: [&[u8]; 5] = [
        index.as_bytes(),
        timestamp.as_bytes(),
        data.as_bytes(),
        prev_hash.as_bytes(),
        nonce.as_bytes(),
    ];

    let mut hasher = Sha256::new();
    for field in fields {
        if scheme == HashScheme::LengthPrefixed {
            hasher.update((field.len() as u64).to_be_bytes());
        }
        hasher.update(field);
    }
    hex::encode(hasher.finalize())
}
