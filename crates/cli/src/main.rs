//! ironchain CLI entry point.
//!
//! Wires the ledger and its persistence collaborator together: builds a
//! chain from genesis, mines one block over a demo batch, persists it,
//! prints the chain, and validates it end-to-end.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use ironchain_chain::Chain;
use ironchain_core::Transaction;
use ironchain_storage::{BlockStore, SledBlockStore};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ironchain")]
#[command(about = "A proof-of-work append-only ledger", long_about = None)]
struct Cli {
    /// Directory for the block database
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// Sender of the demo transaction
    #[arg(long, default_value = "Bharat")]
    sender: String,

    /// Receiver of the demo transaction
    #[arg(long, default_value = "Raul")]
    receiver: String,

    /// Amount of the demo transaction
    #[arg(long, default_value_t = 10.0)]
    amount: f64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let store = SledBlockStore::open(&cli.data_dir)
        .with_context(|| format!("failed to open block store at {:?}", cli.data_dir))?;

    let mut chain = Chain::new();

    let batch = vec![Transaction::new(cli.sender, cli.receiver, cli.amount)];
    chain.append(batch).context("failed to append block")?;

    // Persistence is best-effort and sequenced after the in-memory
    // append; a failure here does not roll the chain back.
    for block in chain.blocks() {
        if let Err(e) = store.save_block(block) {
            tracing::warn!(index = block.index(), error = %e, "failed to persist block");
        }
    }

    println!("{}", chain);

    chain.validate().context("chain validation failed")?;
    println!("{}", "Chain validated successfully.".green().bold());

    store.close().context("failed to close block store")?;
    Ok(())
}
