// src/main.rs
//! Peg bridge node
//!
//! Loads a genesis configuration, replays bridge operations one block at a
//! time and prints the resulting bridge status.

use anyhow::{Context, Result};
use clap::Parser;
use peg_bridge::config::Config;
use peg_bridge::msg::ExecuteMsg;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(short, long, value_parser, default_value = "bridge.toml")]
    config: PathBuf,

    /// JSON array of execute messages, applied one per block
    #[clap(short, long, value_parser)]
    ops: Option<PathBuf>,

    #[clap(short, long)]
    verbose: bool,

    /// Print the exported genesis instead of the bridge status
    #[clap(short, long)]
    export: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose)?;

    info!("Starting peg bridge v{}", peg_bridge::VERSION);
    info!("Configuration file: {:?}", args.config);

    let config = Config::load(&args.config).context("Failed to load configuration")?;
    info!("✓ Configuration loaded");
    info!("  Chain: {}", config.chain.chain_id);
    info!("  Custody: {}", config.custody_address);

    let mut app = config.build_app()?;
    info!("✓ Genesis initialized at height {}", app.block().height);

    if let Some(path) = &args.ops {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read ops file {}", path.display()))?;
        let ops: Vec<ExecuteMsg> = serde_json::from_str(&raw).context("Failed to parse ops file")?;
        info!("Replaying {} operations", ops.len());

        let (mut applied, mut rejected) = (0usize, 0usize);
        for (index, op) in ops.into_iter().enumerate() {
            app.next_block();
            let height = app.block().height;

            match app.execute(op) {
                Ok(res) => {
                    applied += 1;
                    info!("op #{} applied at height {}: {} events", index, height, res.events.len());
                }
                Err(err) if err.is_fatal() => {
                    error!("op #{} hit a fatal error at height {}: {}", index, height, err);
                    return Err(err).context("Bridge halted");
                }
                Err(err) => {
                    rejected += 1;
                    warn!("op #{} rejected at height {} (code {}): {}", index, height, err.code(), err);
                }
            }
        }
        info!("✓ Replay finished: {} applied, {} rejected", applied, rejected);
    }

    let output = if args.export {
        serde_json::to_string_pretty(&app.export_genesis()?)?
    } else {
        serde_json::to_string_pretty(&app.bridge_status()?)?
    };
    println!("{}", output);

    Ok(())
}

fn init_tracing(verbose: bool) -> Result<()> {
    let log_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("peg_bridge={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(())
}
