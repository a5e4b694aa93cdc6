//! # Stockbook CLI
//!
//! Prices voucher lines, checks voucher files, and submits them to the
//! backend.
//!
//! ## Usage
//! ```text
//! stockbook price --kind purchase --rate 250 --qty 4 --gst 18
//! stockbook totals voucher.json
//! stockbook validate voucher.json
//! stockbook submit voucher.json --config ./stockbook.toml
//! ```
//!
//! Voucher files are the JSON form of a `VoucherDraft`. Numeric fields accept
//! numbers or strings; blanks and garbage count as zero.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use stockbook_core::{PricingRules, VoucherKind};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "stockbook")]
#[command(about = "Line-item pricing and voucher entry for the stock books")]
struct Cli {
    /// Path to the TOML config file (defaults to the platform config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Price a single line
    Price(PriceArgs),

    /// Show a voucher file's lines and totals
    Totals {
        /// Voucher JSON file
        file: PathBuf,
    },

    /// Run the pre-submission checks on a voucher file
    Validate {
        file: PathBuf,
    },

    /// Validate and submit a voucher file to the backend
    Submit {
        file: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
struct PriceArgs {
    /// Voucher kind, which picks the default pricing stages
    #[arg(short, long, default_value = "purchase", value_parser = parse_kind)]
    kind: VoucherKind,

    /// Override the stages: comma list of gst, discount, extra (or "none")
    #[arg(long, value_parser = parse_rules)]
    stages: Option<PricingRules>,

    #[arg(long, default_value = "0")]
    rate: Decimal,

    /// Quantity in units
    #[arg(long, default_value = "0", conflicts_with_all = ["dozens", "pieces"])]
    qty: Decimal,

    #[arg(long)]
    dozens: Option<Decimal>,

    #[arg(long)]
    pieces: Option<Decimal>,

    /// GST percent
    #[arg(long, default_value = "0")]
    gst: Decimal,

    /// Flat discount amount
    #[arg(long, default_value = "0")]
    discount: Decimal,

    #[arg(long, default_value = "0")]
    discount_percent: Decimal,

    #[arg(long, default_value = "0")]
    extra_discount_percent: Decimal,

    /// Print the breakdown as JSON
    #[arg(long)]
    json: bool,
}

fn parse_kind(value: &str) -> Result<VoucherKind, String> {
    value.parse()
}

/// Parses `gst,discount,extra` into explicit pricing stages.
fn parse_rules(value: &str) -> Result<PricingRules, String> {
    let mut rules = PricingRules::PLAIN;
    for stage in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match stage.to_ascii_lowercase().as_str() {
            "gst" => rules.has_gst = true,
            "discount" => rules.has_discount = true,
            "extra" | "extra_discount" => rules.has_extra_discount = true,
            "none" => {}
            other => return Err(format!("unknown pricing stage: {other}")),
        }
    }
    Ok(rules)
}

/// Initializes the tracing subscriber.
///
/// Logs go to stderr so command output on stdout stays pipeable.
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=stockbook_client=trace` - Trace the backend gateway only
/// - Default: `info,stockbook=debug`
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info,stockbook=debug" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Price(args) => commands::price(&args, cli.config),
        Command::Totals { file } => commands::totals(&file, cli.config),
        Command::Validate { file } => commands::validate(&file),
        Command::Submit { file } => commands::submit(&file, cli.config).await,
    }
}
