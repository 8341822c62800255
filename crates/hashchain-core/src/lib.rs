//! Append-only hash-chained ledger gated by hex-prefix proof of work.
//!
//! ```no_run
//! use hashchain_core::Chain;
//!
//! let mut chain = Chain::new(4);
//! chain.append("hello");
//! assert!(chain.validate());
//! ```

pub mod block;
pub mod chain;
pub mod clock;
pub mod constants;
pub mod error;
pub mod hash;
pub mod mine;
pub mod pow;

pub use block::{Block, BlockDraft};
pub use chain::{Chain, ChainConfig};
pub use clock::{Clock, FixedClock, SequenceClock, SystemClock};
pub use error::{ChainError, MiningError, ValidationError};
pub use hash::{digest, digest_with, HashScheme};
pub use mine::{mine_parallel, mine_with, MiningStrategy};
