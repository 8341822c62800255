use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("a chain needs at least a genesis block")]
    Empty,
    #[error("tip block index {0} leaves no room for another block")]
    IndexExhausted(u64),
    #[error("chain failed verification: {0}")]
    Invalid(#[from] ValidationError),
}

/// First integrity violation found while walking a chain.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("block {index}: prev_hash {found} does not match predecessor hash {expected}")]
    BrokenLink {
        index: u64,
        expected: String,
        found: String,
    },
    #[error("block {index}: stored hash {stored} does not match recomputed {computed}")]
    HashMismatch {
        index: u64,
        stored: String,
        computed: String,
    },
    #[error("block {index}: hash {hash} has fewer than {difficulty} leading zeros")]
    InsufficientWork {
        index: u64,
        difficulty: u32,
        hash: String,
    },
    #[error("block at position {position} has index {found}, expected {expected}")]
    IndexGap {
        position: usize,
        expected: u64,
        found: u64,
    },
    #[error("genesis block is malformed: {reason}")]
    BadGenesis { reason: &'static str },
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MiningError {
    #[error("no nonce found up to {last_nonce}")]
    Exhausted { last_nonce: u64 },
    #[error("mining cancelled after nonce {last_nonce}")]
    Cancelled { last_nonce: u64 },
}

impl MiningError {
    /// Last nonce tried, so a caller can resume the search after it.
    pub fn last_nonce(&self) -> u64 {
        match self {
            MiningError::Exhausted { last_nonce } | MiningError::Cancelled { last_nonce } => {
                *last_nonce
            }
        }
    }
}
