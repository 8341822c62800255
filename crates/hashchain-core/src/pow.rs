//! Sequential proof-of-work search.
//!
//! A hash meets difficulty `d` when its hex form starts with `d` `'0'`
//! characters. The search starts from nonce 0 and increments before each
//! attempt, so the first nonce tried is 1.

use crate::block::{Block, BlockDraft};
use crate::error::MiningError;
use crate::hash::HashScheme;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

pub fn count_leading_zero_hex(hash: &str) -> u32 {
    hash.bytes().take_while(|b| *b == b'0').count() as u32
}

pub fn meets_difficulty(hash: &str, difficulty: u32) -> bool {
    count_leading_zero_hex(hash) >= difficulty
}

/// Mine the draft by incrementing the nonce until its hash meets `difficulty`.
/// Blocks the calling thread until a nonce is found.
pub fn mine(draft: BlockDraft, difficulty: u32, scheme: HashScheme) -> Block {
    let mut nonce = 0u64;
    loop {
        nonce = nonce.wrapping_add(1);
        let hash = draft.hash_with(scheme, nonce);
        if meets_difficulty(&hash, difficulty) {
            info!(
                "Mined block {} with nonce {} and hash {}",
                draft.index, nonce, hash
            );
            return draft.seal(nonce, hash);
        }
    }
}

/// Try at most `max_attempts` nonces after `start`.
///
/// On [`MiningError::Exhausted`] the search can be resumed by passing
/// `err.last_nonce()` as the next `start`.
pub fn mine_bounded(
    draft: &BlockDraft,
    difficulty: u32,
    scheme: HashScheme,
    start: u64,
    max_attempts: u64,
) -> Result<Block, MiningError> {
    let mut attempts = 0u64;
    search(
        draft,
        difficulty,
        scheme,
        start,
        || {
            attempts += 1;
            attempts <= max_attempts
        },
        |last_nonce| MiningError::Exhausted { last_nonce },
    )
}

/// Like [`mine`], but gives up once `cancel` is set.
pub fn mine_interruptible(
    draft: &BlockDraft,
    difficulty: u32,
    scheme: HashScheme,
    cancel: &AtomicBool,
) -> Result<Block, MiningError> {
    search(
        draft,
        difficulty,
        scheme,
        0,
        || !cancel.load(Ordering::Relaxed),
        |last_nonce| MiningError::Cancelled { last_nonce },
    )
}

fn search(
    draft: &BlockDraft,
    difficulty: u32,
    scheme: HashScheme,
    start: u64,
    mut keep_going: impl FnMut() -> bool,
    stopped: fn(u64) -> MiningError,
) -> Result<Block, MiningError> {
    let mut nonce = start;
    while keep_going() {
        // Never wrap back to nonce 0.
        let Some(next) = nonce.checked_add(1) else {
            return Err(MiningError::Exhausted { last_nonce: nonce });
        };
        nonce = next;
        let hash = draft.hash_with(scheme, nonce);
        if meets_difficulty(&hash, difficulty) {
            info!(
                "Mined block {} with nonce {} and hash {}",
                draft.index, nonce, hash
            );
            return Ok(draft.clone().seal(nonce, hash));
        }
    }
    Err(stopped(nonce))
}
