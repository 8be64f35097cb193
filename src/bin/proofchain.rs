#![forbid(unsafe_code)]
//! Walks one signed transfer through the ledger: sign, queue, mine, then
//! report balances and chain validity.

use clap::Parser;
use colored::*;
use proofchain::config::{load_config, DEFAULT_CONFIG_PATH};
use proofchain::{Address, KeyPair, Ledger, Transaction};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Ledger configuration file (defaults apply when it does not exist)
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,
    /// Hex secret key of the sending wallet; a fresh key is generated if omitted
    #[arg(long)]
    secret_key: Option<String>,
    /// Receiver of the transfer
    #[arg(long, default_value = "some-public-key")]
    to: String,
    /// Amount to transfer
    #[arg(long, default_value_t = 10)]
    amount: u64,
    /// Overrides the configured difficulty
    #[arg(long)]
    difficulty: Option<usize>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = load_config(&cli.config)?;
    if let Some(difficulty) = cli.difficulty {
        config.difficulty = difficulty;
        config.validate()?;
    }

    let keypair = match &cli.secret_key {
        Some(hex_key) => KeyPair::from_secret_hex(hex_key)?,
        None => {
            let keypair = KeyPair::generate();
            println!(
                "{} {}",
                "🔑 Generated wallet key (pass with --secret-key to reuse):".yellow(),
                keypair.secret_hex()
            );
            keypair
        }
    };
    let wallet = keypair.address();

    let mut ledger = Ledger::from_config(&config)?;

    let mut tx = Transaction::transfer(wallet.clone(), cli.to.as_str(), cli.amount);
    tx.sign(&keypair)?;
    ledger.add_transaction(tx)?;

    println!("\n{}", "⛏️  Starting the miner...".bright_cyan().bold());
    let start_time = Instant::now();
    let block = ledger.mine_pending(wallet.clone());
    println!(
        "{} {} ({} transactions, nonce {}, {:.2?})",
        "✅ Block mined:".bright_green(),
        block.hash,
        block.transactions.len(),
        block.nonce,
        start_time.elapsed()
    );

    println!();
    println!("{:<10} {}", "Wallet".bright_white(), wallet);
    println!(
        "{:<10} {}",
        "Balance".bright_white(),
        ledger.balance_of(&wallet)
    );
    println!(
        "{:<10} {}",
        "Receiver".bright_white(),
        ledger.balance_of(&Address::from(cli.to.as_str()))
    );

    let valid = ledger.is_valid();
    let verdict = if valid { "yes".green() } else { "no".red() };
    println!("{:<10} {}", "Valid".bright_white(), verdict);

    Ok(())
}
