use crate::block::{Block, BlockDraft};
use crate::hash::HashScheme;
use crate::pow::{self, meets_difficulty};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MiningStrategy {
    /// Single-threaded search; always finds the smallest winning nonce.
    #[default]
    Sequential,
    /// Nonce space split across the rayon pool; first hit wins.
    Parallel,
}

pub fn mine_with(
    strategy: MiningStrategy,
    draft: BlockDraft,
    difficulty: u32,
    scheme: HashScheme,
) -> Block {
    match strategy {
        MiningStrategy::Sequential => pow::mine(draft, difficulty, scheme),
        MiningStrategy::Parallel => mine_parallel(draft, difficulty, scheme),
    }
}

/// Mines a block by searching nonces in parallel until its hash has at least
/// `difficulty` leading zero hex characters.
///
/// `find_any` yields a single nonce, so exactly one (nonce, hash) pair is
/// sealed into the block even when several workers hit a solution.
pub fn mine_parallel(draft: BlockDraft, difficulty: u32, scheme: HashScheme) -> Block {
    let found = (1u64..u64::MAX)
        .into_par_iter()
        .find_any(|nonce| meets_difficulty(&draft.hash_with(scheme, *nonce), difficulty))
        .expect("nonce space exhausted (practically impossible)");

    let hash = draft.hash_with(scheme, found);

    info!(
        "Mined block {} with nonce {} and hash {}",
        draft.index, found, hash
    );

    draft.seal(found, hash)
}
