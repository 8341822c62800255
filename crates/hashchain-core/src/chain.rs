use crate::block::{Block, BlockDraft};
use crate::clock::{Clock, SystemClock};
use crate::constants::{DEFAULT_DIFFICULTY, GENESIS_PREV_HASH};
use crate::error::{ChainError, ValidationError};
use crate::hash::HashScheme;
use crate::mine::{mine_with, MiningStrategy};
use crate::pow::meets_difficulty;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Parameters fixed for the lifetime of a chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    pub difficulty: u32,
    pub scheme: HashScheme,
    pub strategy: MiningStrategy,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DIFFICULTY)
    }
}

impl ChainConfig {
    pub fn new(difficulty: u32) -> Self {
        Self {
            difficulty,
            scheme: HashScheme::default(),
            strategy: MiningStrategy::default(),
        }
    }

    pub fn with_scheme(mut self, scheme: HashScheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_strategy(mut self, strategy: MiningStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// Append-only sequence of mined blocks rooted at a genesis block.
///
/// The chain is never empty: every constructor either mines a genesis block
/// or rejects an empty block list.
#[derive(Debug)]
pub struct Chain<C: Clock = SystemClock> {
    blocks: Vec<Block>,
    config: ChainConfig,
    clock: C,
}

impl Chain<SystemClock> {
    /// Create a chain stamped with wall-clock time and mine its genesis block.
    pub fn new(difficulty: u32) -> Self {
        Self::with_config(ChainConfig::new(difficulty), SystemClock)
    }
}

impl<C: Clock> Chain<C> {
    pub fn with_config(config: ChainConfig, clock: C) -> Self {
        let draft = BlockDraft::genesis(&clock);
        let genesis = mine_with(config.strategy, draft, config.difficulty, config.scheme);
        debug!(
            difficulty = config.difficulty,
            scheme = ?config.scheme,
            strategy = ?config.strategy,
            "created chain"
        );
        Self {
            blocks: vec![genesis],
            config,
            clock,
        }
    }

    /// Rebuild a chain from already-mined blocks without checking them.
    ///
    /// Only rejects an empty list or a tip whose index cannot be followed.
    pub fn from_blocks(
        config: ChainConfig,
        clock: C,
        blocks: Vec<Block>,
    ) -> Result<Self, ChainError> {
        if blocks.is_empty() {
            return Err(ChainError::Empty);
        }
        let tip_index = blocks[blocks.len() - 1].index();
        if tip_index == u64::MAX {
            return Err(ChainError::IndexExhausted(tip_index));
        }
        Ok(Self {
            blocks,
            config,
            clock,
        })
    }

    /// Rebuild a chain and reject it unless [`Chain::verify_strict`] passes.
    pub fn from_blocks_checked(
        config: ChainConfig,
        clock: C,
        blocks: Vec<Block>,
    ) -> Result<Self, ChainError> {
        let chain = Self::from_blocks(config, clock, blocks)?;
        chain.verify_strict()?;
        Ok(chain)
    }

    /// Mine a block carrying `data` on top of the current tip and append it.
    pub fn append(&mut self, data: impl Into<String>) -> &Block {
        let last = self
            .blocks
            .last()
            .expect("chain always holds its genesis block");
        let draft = BlockDraft::new(last.index() + 1, data, last.hash(), &self.clock);
        let block = mine_with(
            self.config.strategy,
            draft,
            self.config.difficulty,
            self.config.scheme,
        );
        debug!(index = block.index(), "appended block");
        self.blocks.push(block);
        self.tip()
    }

    /// True when every block after genesis links to its predecessor, hashes
    /// to its stored hash and meets the difficulty.
    pub fn validate(&self) -> bool {
        self.verify().is_ok()
    }

    /// Same checks as [`Chain::validate`], reporting the first violation.
    /// Genesis is trusted as the root and not checked.
    pub fn verify(&self) -> Result<(), ValidationError> {
        for pair in self.blocks.windows(2) {
            self.check_pair(&pair[0], &pair[1]).inspect_err(|e| warn!("{e}"))?;
        }
        Ok(())
    }

    /// [`Chain::verify`] plus genesis checks and index continuity.
    pub fn verify_strict(&self) -> Result<(), ValidationError> {
        self.check_genesis().inspect_err(|e| warn!("{e}"))?;
        for (position, pair) in self.blocks.windows(2).enumerate() {
            let (prev, curr) = (&pair[0], &pair[1]);
            let expected = prev.index() + 1;
            if curr.index() != expected {
                let err = ValidationError::IndexGap {
                    position: position + 1,
                    expected,
                    found: curr.index(),
                };
                warn!("{err}");
                return Err(err);
            }
            self.check_pair(prev, curr).inspect_err(|e| warn!("{e}"))?;
        }
        Ok(())
    }

    fn check_pair(&self, prev: &Block, curr: &Block) -> Result<(), ValidationError> {
        if curr.prev_hash() != prev.hash() {
            return Err(ValidationError::BrokenLink {
                index: curr.index(),
                expected: prev.hash().to_string(),
                found: curr.prev_hash().to_string(),
            });
        }
        self.check_block(curr)
    }

    fn check_block(&self, block: &Block) -> Result<(), ValidationError> {
        let computed = block.compute_hash(self.config.scheme);
        if block.hash() != computed {
            return Err(ValidationError::HashMismatch {
                index: block.index(),
                stored: block.hash().to_string(),
                computed,
            });
        }
        if !meets_difficulty(block.hash(), self.config.difficulty) {
            return Err(ValidationError::InsufficientWork {
                index: block.index(),
                difficulty: self.config.difficulty,
                hash: block.hash().to_string(),
            });
        }
        Ok(())
    }

    fn check_genesis(&self) -> Result<(), ValidationError> {
        let genesis = self.genesis();
        if genesis.index() != 0 {
            return Err(ValidationError::BadGenesis {
                reason: "index is not 0",
            });
        }
        if genesis.prev_hash() != GENESIS_PREV_HASH {
            return Err(ValidationError::BadGenesis {
                reason: "prev_hash is not empty",
            });
        }
        self.check_block(genesis)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn genesis(&self) -> &Block {
        &self.blocks[0]
    }

    pub fn tip(&self) -> &Block {
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Never true for a constructed chain.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    pub fn difficulty(&self) -> u32 {
        self.config.difficulty
    }

    pub fn scheme(&self) -> HashScheme {
        self.config.scheme
    }

    pub fn strategy(&self) -> MiningStrategy {
        self.config.strategy
    }

    pub fn config(&self) -> ChainConfig {
        self.config
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }
}

impl<'a, C: Clock> IntoIterator for &'a Chain<C> {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{FixedClock, SequenceClock};

    fn chain(difficulty: u32) -> Chain<SequenceClock> {
        Chain::with_config(ChainConfig::new(difficulty), SequenceClock::new("t"))
    }

    #[test]
    fn genesis_block_example() {
        let chain = chain(2);
        let genesis = chain.genesis();
        assert_eq!(chain.len(), 1);
        assert_eq!(genesis.index(), 0);
        assert_eq!(genesis.prev_hash(), "");
        assert_eq!(genesis.data(), "Genesis Block");
        assert_eq!(genesis.timestamp(), "t0");
        assert!(genesis.hash().starts_with("00"));
    }

    #[test]
    fn difficulty_zero_genesis_uses_first_nonce() {
        let chain = chain(0);
        assert_eq!(chain.genesis().nonce(), 1);
        assert!(chain.validate());
    }

    #[test]
    fn append_links_and_indexes_blocks() {
        let mut chain = chain(1);
        for i in 0..5 {
            let block = chain.append(i.to_string());
            assert_eq!(block.data(), i.to_string());
        }
        assert_eq!(chain.len(), 6);
        for (i, block) in chain.iter().enumerate() {
            assert_eq!(block.index(), i as u64);
            assert_eq!(block.timestamp(), format!("t{i}"));
        }
        for pair in chain.blocks().windows(2) {
            assert_eq!(pair[1].prev_hash(), pair[0].hash());
        }
        assert!(chain.validate());
        assert!(chain.verify_strict().is_ok());
    }

    #[test]
    fn append_accepts_empty_data() {
        let mut chain = chain(1);
        chain.append("");
        assert_eq!(chain.tip().data(), "");
        assert!(chain.validate());
    }

    #[test]
    fn tampered_data_is_detected() {
        let mut chain = chain(2);
        for data in ["0", "1", "2"] {
            chain.append(data);
        }
        assert!(chain.validate());

        chain.blocks[1].data_mut().replace_range(0..1, "X");
        assert!(!chain.validate());
        assert!(matches!(
            chain.verify(),
            Err(ValidationError::HashMismatch { index: 1, .. })
        ));
    }

    #[test]
    fn tampered_tip_data_is_detected() {
        let mut chain = chain(1);
        chain.append("a");
        chain.append("b");
        chain.blocks[2].data_mut().push('c');
        assert!(!chain.validate());
    }

    #[test]
    fn replaced_block_breaks_the_next_link() {
        let mut chain = chain(1);
        chain.append("a");
        chain.append("b");
        let draft = BlockDraft::new(1, "a", chain.genesis().hash(), &FixedClock::new("x"));
        let replacement = crate::pow::mine(draft, 1, HashScheme::Concat);
        assert_ne!(replacement.hash(), chain.blocks[1].hash());
        chain.blocks[1] = replacement;
        assert!(!chain.validate());
        assert!(matches!(
            chain.verify(),
            Err(ValidationError::BrokenLink { index: 2, .. })
        ));
    }

    #[test]
    fn genesis_is_trusted_by_validate_but_not_by_verify_strict() {
        let mut chain = chain(1);
        chain.append("a");
        chain.blocks[0].data_mut().push('!');
        // Block 1 still links to the stored genesis hash.
        assert!(chain.validate());
        assert!(matches!(
            chain.verify_strict(),
            Err(ValidationError::HashMismatch { index: 0, .. })
        ));
    }

    #[test]
    fn verify_strict_detects_index_gap() {
        let genesis = chain(1).genesis().clone();
        let draft = BlockDraft::new(5, "a", genesis.hash(), &FixedClock::new("x"));
        let skipped = crate::pow::mine(draft, 1, HashScheme::Concat);
        let gapped =
            Chain::from_blocks(ChainConfig::new(1), SystemClock, vec![genesis, skipped]).unwrap();
        assert!(gapped.validate());
        assert_eq!(
            gapped.verify_strict(),
            Err(ValidationError::IndexGap {
                position: 1,
                expected: 1,
                found: 5,
            })
        );
    }

    #[test]
    fn validation_uses_chain_difficulty() {
        let mut chain = chain(1);
        chain.append("a");
        let blocks = chain.into_blocks();
        let stricter = Chain::from_blocks(ChainConfig::new(16), SystemClock, blocks).unwrap();
        assert!(matches!(
            stricter.verify(),
            Err(ValidationError::InsufficientWork { index: 1, difficulty: 16, .. })
        ));
    }

    #[test]
    fn validation_uses_chain_scheme() {
        let config = ChainConfig::new(1).with_scheme(HashScheme::LengthPrefixed);
        let mut chain = Chain::with_config(config, SequenceClock::new("t"));
        chain.append("a");
        assert!(chain.validate());
        let blocks = chain.into_blocks();
        let concat = Chain::from_blocks(ChainConfig::new(1), SystemClock, blocks).unwrap();
        assert!(matches!(
            concat.verify(),
            Err(ValidationError::HashMismatch { index: 1, .. })
        ));
    }

    #[test]
    fn from_blocks_rejects_empty() {
        let err = Chain::from_blocks(ChainConfig::default(), SystemClock, vec![]).unwrap_err();
        assert_eq!(err, ChainError::Empty);
    }

    #[test]
    fn from_blocks_rejects_tip_at_max_index() {
        let draft = BlockDraft::new(u64::MAX, "last", "", &FixedClock::new("ts"));
        let tip = crate::pow::mine(draft, 0, HashScheme::Concat);
        let err = Chain::from_blocks(ChainConfig::new(0), SystemClock, vec![tip]).unwrap_err();
        assert_eq!(err, ChainError::IndexExhausted(u64::MAX));
    }

    #[test]
    fn from_blocks_accepts_tip_below_max_index() {
        let draft = BlockDraft::new(u64::MAX - 1, "last", "", &FixedClock::new("ts"));
        let tip = crate::pow::mine(draft, 0, HashScheme::Concat);
        let mut chain = Chain::from_blocks(ChainConfig::new(0), SystemClock, vec![tip]).unwrap();
        assert_eq!(chain.append("x").index(), u64::MAX);
    }

    #[test]
    fn parallel_chain_validates() {
        let config = ChainConfig::new(2).with_strategy(MiningStrategy::Parallel);
        let mut chain = Chain::with_config(config, SequenceClock::new("t"));
        for i in 0..3 {
            chain.append(format!("block-{i}"));
        }
        assert_eq!(chain.strategy(), MiningStrategy::Parallel);
        assert!(chain.verify_strict().is_ok());
    }

    #[test]
    fn default_config_example() {
        let config = ChainConfig::default();
        assert_eq!(config.difficulty, DEFAULT_DIFFICULTY);
        assert_eq!(config.scheme, HashScheme::Concat);
        assert_eq!(config.strategy, MiningStrategy::Sequential);
    }
}
