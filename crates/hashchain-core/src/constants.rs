pub const HASH_SIZE: usize = 32;
pub const HASH_HEX_SIZE: usize = HASH_SIZE * 2;
pub const GENESIS_DATA: &str = "Genesis Block";
pub const GENESIS_PREV_HASH: &str = "";
pub const DEFAULT_DIFFICULTY: u32 = 4;
pub const DEFAULT_DEMO_BLOCKS: u32 = 15;
