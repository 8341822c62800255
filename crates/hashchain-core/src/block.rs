use crate::clock::Clock;
use crate::constants::{GENESIS_DATA, GENESIS_PREV_HASH};
use crate::hash::{digest_with, HashScheme};
use serde::{Deserialize, Serialize};

/// Block fields before a proof-of-work nonce has been found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockDraft {
    pub index: u64,
    pub timestamp: String,
    pub data: String,
    pub prev_hash: String,
}

impl BlockDraft {
    pub fn new(
        index: u64,
        data: impl Into<String>,
        prev_hash: impl Into<String>,
        clock: &dyn Clock,
    ) -> Self {
        Self {
            index,
            timestamp: clock.now(),
            data: data.into(),
            prev_hash: prev_hash.into(),
        }
    }

    /// Index 0, the fixed genesis payload and an empty previous hash.
    pub fn genesis(clock: &dyn Clock) -> Self {
        Self::new(0, GENESIS_DATA, GENESIS_PREV_HASH, clock)
    }

    /// Hash these fields with the given nonce.
    pub fn hash_with(&self, scheme: HashScheme, nonce: u64) -> String {
        digest_with(
            scheme,
            self.index,
            &self.timestamp,
            &self.data,
            &self.prev_hash,
            nonce,
        )
    }

    /// Seal the draft with a winning nonce and its hash.
    pub(crate) fn seal(self, nonce: u64, hash: String) -> Block {
        Block {
            index: self.index,
            timestamp: self.timestamp,
            data: self.data,
            prev_hash: self.prev_hash,
            hash,
            nonce,
        }
    }
}

/// A mined block. Fields are read-only once the block exists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    index: u64,
    timestamp: String,
    data: String,
    prev_hash: String,
    hash: String,
    nonce: u64,
}

impl Block {
    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn prev_hash(&self) -> &str {
        &self.prev_hash
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Recompute the digest from the stored fields, ignoring the stored hash.
    pub fn compute_hash(&self, scheme: HashScheme) -> String {
        digest_with(
            scheme,
            self.index,
            &self.timestamp,
            &self.data,
            &self.prev_hash,
            self.nonce,
        )
    }

    #[cfg(test)]
    pub(crate) fn data_mut(&mut self) -> &mut String {
        &mut self.data
    }
}
