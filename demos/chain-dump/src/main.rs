//! Chain Dump Example
//!
//! Reads raw mirai gateway payloads, one JSON object per line, and prints
//! the display line of every event.
//!
//! # Usage
//!
//! ```bash
//! # Dump a recorded session
//! cargo run --package chain-dump -- session.jsonl
//!
//! # Follow live traffic for one group, re-emitting each chain as wire JSON
//! gateway-tap | cargo run --package chain-dump -- --group 12345 --chain
//! ```
//!
//! Configuration is read from `miraikit.toml` as usual; `--config` points at
//! an explicit file instead.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use miraikit_mirai::{ChainStatus, MiraiEvent};
use miraikit_runtime::config::{ConfigLoader, validate_config};
use miraikit_runtime::{Decoder, logging};
use tracing::{debug, error, info, warn};

// ============================================================================
// Command Line
// ============================================================================

#[derive(Debug, Parser)]
#[command(name = "chain-dump", about = "Dump mirai gateway traffic as display lines")]
struct Args {
    /// Input file with one JSON payload per line; stdin when omitted.
    input: Option<PathBuf>,

    /// Explicit configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Only show events belonging to this group.
    #[arg(short, long, value_name = "ID")]
    group: Option<i64>,

    /// Also print every message chain re-serialized as wire JSON.
    #[arg(long)]
    chain: bool,

    /// Reject events the model does not know.
    #[arg(long)]
    strict: bool,

    /// Disable ANSI colour.
    #[arg(long)]
    no_color: bool,
}

// ============================================================================
// Dumping
// ============================================================================

fn dump(decoder: &Decoder, args: &Args, event: &MiraiEvent) -> Result<()> {
    if let Some(group) = args.group
        && event.group_id() != Some(group)
    {
        debug!(tag = ?event.tag(), "Skipping event outside the selected group");
        return Ok(());
    }

    println!("{}", decoder.render(event));

    if let Some(message) = event.message() {
        if let ChainStatus::Discarded { index, reason } = message.status() {
            warn!(index, %reason, "Message chain was discarded");
        }
        if args.chain {
            let wire = serde_json::to_string(message.chain())
                .context("Failed to serialize message chain")?;
            println!("  {wire}");
        }
    }

    Ok(())
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> Result<()> {
    let args = Args::parse();

    let loader = match &args.config {
        Some(path) => ConfigLoader::new().file(path),
        None => ConfigLoader::new(),
    };
    let config = loader.load().context("Failed to load configuration")?;
    validate_config(&config).context("Invalid configuration")?;

    logging::init_from_config(&config.logging);

    let decoder = Decoder::from_config(&config.decode)
        .strict(args.strict || config.decode.strict_events)
        .with_color(config.decode.color && !args.no_color);

    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let mut decoded = 0usize;
    let mut failed = 0usize;
    for (number, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }

        match decoder.decode(&line) {
            Ok(event) => {
                decoded += 1;
                dump(&decoder, &args, &event)?;
            }
            Err(e) => {
                failed += 1;
                error!(line = number + 1, "Failed to decode payload: {}", e);
            }
        }
    }

    info!(decoded, failed, "Input exhausted");
    Ok(())
}
