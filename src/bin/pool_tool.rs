//! Decode Raydium AMM v4 pool creations and burns, or swap through a pool.
//!
//! Usage:
//!   cargo run --bin pool_tool -- decode-pool <SIGNATURE>
//!   cargo run --bin pool_tool -- decode-burn <SIGNATURE> [--balances]
//!   cargo run --bin pool_tool -- swap --pool <ADDRESS> --amount <UI> --tip <LAMPORTS> --direction buy|sell

use std::{path::PathBuf, str::FromStr};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::warn;
use rust_decimal::Decimal;
use solana_sdk::{pubkey::Pubkey, signature::Signature};

use raydium_pool_kit::{config::Settings, PoolClient, SwapDirection};

#[derive(Parser, Debug)]
#[command(name = "pool_tool", about = "Raydium AMM v4 decoder and swap tool")]
struct Args {
    /// Settings file; defaults to config/settings.json when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides `rpc_url` from the settings file.
    #[arg(long)]
    rpc_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode the pool created by an `initialize2` transaction.
    DecodePool { signature: String },

    /// Decode the first token burn in a transaction.
    DecodeBurn {
        signature: String,
        /// Also fetch the account's balance and the mint's supply now.
        #[arg(long)]
        balances: bool,
    },

    /// Swap through a single pool.
    Swap {
        #[arg(long)]
        pool: String,
        /// Amount of the input token, in display units.
        #[arg(long)]
        amount: Decimal,
        /// Tip in lamports.
        #[arg(long, default_value_t = 0)]
        tip: u64,
        #[arg(long, value_enum)]
        direction: Side,
        /// Base58 secret key; falls back to `private_key_base58`.
        #[arg(long)]
        key: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Side {
    /// Spend wSOL for the token.
    Buy,
    /// Spend the token for wSOL.
    Sell,
}

impl From<Side> for SwapDirection {
    fn from(side: Side) -> Self {
        match side {
            Side::Buy => SwapDirection::QuoteForBase,
            Side::Sell => SwapDirection::BaseForQuote,
        }
    }
}

fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => Settings::load_from_file(path)?,
        None => Settings::load().unwrap_or_else(|e| {
            warn!("using default settings: {e:#}");
            Settings::default()
        }),
    };
    if let Some(url) = &args.rpc_url {
        settings.rpc_url = url.clone();
    }
    Ok(settings)
}

fn parse_signature(raw: &str) -> Result<Signature> {
    Signature::from_str(raw).with_context(|| format!("invalid signature `{raw}`"))
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let settings = load_settings(&args)?;
    let client = PoolClient::from_settings(settings);

    let output = match args.command {
        Command::DecodePool { signature } => {
            let event = client.decode_pool_creation(&parse_signature(&signature)?).await?;
            serde_json::to_string_pretty(&event)?
        }
        Command::DecodeBurn { signature, balances } => {
            let burn = client.decode_burn(&parse_signature(&signature)?, balances).await;
            serde_json::to_string_pretty(&burn)?
        }
        Command::Swap {
            pool,
            amount,
            tip,
            direction,
            key,
        } => {
            let pool = Pubkey::from_str(&pool).with_context(|| format!("invalid pool address `{pool}`"))?;
            let key = key
                .or_else(|| client.settings().private_key_base58.clone())
                .ok_or_else(|| anyhow!("no wallet key: pass --key or set private_key_base58"))?;
            let result = client.swap(&pool, &key, amount, tip, direction.into()).await;
            serde_json::to_string_pretty(&result)?
        }
    };

    println!("{output}");
    Ok(())
}
