use anyhow::{ensure, Result};
use clap::{Parser, Subcommand, ValueEnum};
use hashchain_core::{
    constants::{DEFAULT_DEMO_BLOCKS, DEFAULT_DIFFICULTY, HASH_HEX_SIZE},
    pow::{count_leading_zero_hex, meets_difficulty},
    Block, Chain, ChainConfig, HashScheme, MiningStrategy, SystemClock,
};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "hashchain")]
#[command(about = "Mine and verify a proof-of-work hash chain")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mine a chain, print every block and report whether it validates
    Mine {
        /// Number of leading zero hex characters each hash needs
        #[arg(short, long, default_value_t = DEFAULT_DIFFICULTY)]
        difficulty: u32,
        /// Blocks to mine after genesis, with payloads "0", "1", ...
        #[arg(short, long, default_value_t = DEFAULT_DEMO_BLOCKS)]
        blocks: u32,
        /// Explicit payloads; overrides --blocks
        #[arg(long = "data", value_name = "DATA")]
        data: Vec<String>,
        /// Search nonces on all cores
        #[arg(long)]
        parallel: bool,
        #[arg(long, value_enum, default_value_t = Scheme::Concat)]
        scheme: Scheme,
        /// Print the chain as JSON instead of the text report
        #[arg(long)]
        json: bool,
    },
    /// Print the digest of a set of block fields
    Digest {
        #[arg(long)]
        index: u64,
        #[arg(long, default_value = "")]
        timestamp: String,
        #[arg(long, default_value = "")]
        data: String,
        #[arg(long, default_value = "")]
        prev_hash: String,
        #[arg(long)]
        nonce: u64,
        #[arg(long, value_enum, default_value_t = Scheme::Concat)]
        scheme: Scheme,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Scheme {
    Concat,
    LengthPrefixed,
}

impl From<Scheme> for HashScheme {
    fn from(scheme: Scheme) -> Self {
        match scheme {
            Scheme::Concat => HashScheme::Concat,
            Scheme::LengthPrefixed => HashScheme::LengthPrefixed,
        }
    }
}

#[derive(Serialize)]
struct Report<'a> {
    difficulty: u32,
    scheme: HashScheme,
    strategy: MiningStrategy,
    valid: bool,
    blocks: &'a [Block],
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Mine {
            difficulty,
            blocks,
            data,
            parallel,
            scheme,
            json,
        } => {
            ensure!(
                difficulty as usize <= HASH_HEX_SIZE,
                "difficulty {difficulty} can never be met"
            );
            let payloads = if data.is_empty() {
                (0..blocks).map(|i| i.to_string()).collect()
            } else {
                data
            };
            let strategy = if parallel {
                MiningStrategy::Parallel
            } else {
                MiningStrategy::Sequential
            };
            let config = ChainConfig::new(difficulty)
                .with_scheme(scheme.into())
                .with_strategy(strategy);

            if !json {
                println!(
                    "Mining {} blocks with difficulty {}...",
                    payloads.len(),
                    difficulty
                );
            }
            let mut chain = Chain::with_config(config, SystemClock);
            for (i, payload) in payloads.into_iter().enumerate() {
                chain.append(payload);
                info!(block = i + 1, "mined");
                if !json {
                    println!("Mined block {}", i + 1);
                }
            }

            let valid = chain.validate();
            if json {
                let report = Report {
                    difficulty,
                    scheme: chain.scheme(),
                    strategy: chain.strategy(),
                    valid,
                    blocks: chain.blocks(),
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for block in &chain {
                    print!("{}", render_block(block, difficulty));
                }
                println!("Blockchain valid: {valid}");
            }
        }
        Command::Digest {
            index,
            timestamp,
            data,
            prev_hash,
            nonce,
            scheme,
        } => {
            let hash = hashchain_core::digest_with(
                scheme.into(),
                index,
                &timestamp,
                &data,
                &prev_hash,
                nonce,
            );
            println!("{hash}");
            println!("leading zeros: {}", count_leading_zero_hex(&hash));
        }
    }
    Ok(())
}

fn render_block(block: &Block, difficulty: u32) -> String {
    let mut out = format!(
        "Index: {}\nTimestamp: {}\nData: {}\nPrevHash: {}\nHash: {}\nNonce: {}\n\n",
        block.index(),
        block.timestamp(),
        block.data(),
        block.prev_hash(),
        block.hash(),
        block.nonce(),
    );
    if !meets_difficulty(block.hash(), difficulty) {
        out.push_str("WARNING: Hash does not meet difficulty requirement!\n");
    }
    out
}
