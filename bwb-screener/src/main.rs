//! # Scan one underlying/expiry for broken-wing butterflies
//! bwb-screener scan --chain data/flat/aapl_chain_flat.csv --underlying AAPL --expiry 2025-11-28
//!
//! # Same scan with a config file and an override
//! bwb-screener scan --chain data/flat/aapl_chain_flat.csv --underlying AAPL \
//!     --expiry 2025-11-28 --config config/default.toml --max-short-delta 0.30
//!
//! # List the (underlying, expiry) slices in a chain file
//! bwb-screener list --chain data/flat/aapl_chain_flat.csv

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing::warn;

use bwb_screener::data::{available_slices, load_chain_csv, quotes_from_frame, select_slice};
use bwb_screener::report::{to_dataframe, write_csv};
use bwb_screener::{FilterConfig, FilterStage, OptionType, Screener, ScreenerConfig};

#[derive(Parser)]
#[command(name = "bwb-screener")]
#[command(about = "Screen an options chain for broken-wing butterfly spreads")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate, filter, score and rank call BWBs for one slice
    Scan(ScanArgs),

    /// List the (underlying, expiry) pairs available in a chain file
    List {
        /// Path to the flattened chain CSV
        #[arg(short, long)]
        chain: PathBuf,
    },
}

#[derive(Args)]
struct ScanArgs {
    /// Path to the flattened chain CSV
    #[arg(short, long)]
    chain: PathBuf,

    /// Underlying symbol
    #[arg(short, long)]
    underlying: String,

    /// Expiry date (YYYY-MM-DD)
    #[arg(short, long)]
    expiry: String,

    /// Screener configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep only the N best candidates (values <= 0 return nothing)
    #[arg(long, allow_negative_numbers = true)]
    top_n: Option<i64>,

    /// Minimum entry credit per share
    #[arg(long, allow_negative_numbers = true)]
    min_credit: Option<f64>,

    /// Minimum days to expiration
    #[arg(long)]
    min_dte: Option<i32>,

    /// Maximum days to expiration
    #[arg(long)]
    max_dte: Option<i32>,

    /// Minimum |delta| of the short strike
    #[arg(long)]
    min_short_delta: Option<f64>,

    /// Maximum |delta| of the short strike
    #[arg(long)]
    max_short_delta: Option<f64>,

    /// Run the range filter after payoff scoring
    #[arg(long)]
    filter_after_scoring: bool,

    /// Write the ranked table to this CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl ScanArgs {
    /// File config (if any) with command-line overrides applied.
    fn screener_config(&self) -> Result<ScreenerConfig> {
        let mut config = match &self.config {
            Some(path) => ScreenerConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ScreenerConfig::default(),
        };

        config.filter.merge(&FilterConfig {
            min_credit: self.min_credit,
            min_dte: self.min_dte,
            max_dte: self.max_dte,
            min_short_delta: self.min_short_delta,
            max_short_delta: self.max_short_delta,
        });

        if let Some(n) = self.top_n {
            config.top_n = Some(n.max(0) as usize);
        }
        if self.filter_after_scoring {
            config.filter_stage = FilterStage::AfterScoring;
        }

        Ok(config)
    }
}

fn cmd_scan(args: ScanArgs) -> Result<()> {
    let expiry = NaiveDate::parse_from_str(&args.expiry, "%Y-%m-%d")
        .context("Invalid expiry date format")?;
    let config = args.screener_config()?;

    let df = load_chain_csv(&args.chain)
        .with_context(|| format!("Failed to load chain {}", args.chain.display()))?;
    let quotes = quotes_from_frame(&df).context("Failed to read option quotes")?;

    let slice = select_slice(&quotes, &args.underlying, expiry, OptionType::Call);
    if slice.is_empty() {
        warn!("No CALL rows found for {} {}", args.underlying, expiry);
    }

    let result = Screener::new(config).screen_slice(&slice)?;
    let mut table = to_dataframe(&result.candidates)?;

    println!("{} {} ({})", args.underlying, expiry, result.summary());
    println!("{}", table);

    if let Some(path) = &args.output {
        write_csv(&mut table, path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Wrote {} rows to {}", table.height(), path.display());
    }

    Ok(())
}

fn cmd_list(chain: PathBuf) -> Result<()> {
    let df = load_chain_csv(&chain)
        .with_context(|| format!("Failed to load chain {}", chain.display()))?;
    let quotes = quotes_from_frame(&df).context("Failed to read option quotes")?;

    println!("{} quotes in {}", quotes.len(), chain.display());
    for (underlying, expiry) in available_slices(&quotes) {
        let calls = select_slice(&quotes, &underlying, expiry, OptionType::Call).len();
        println!("  {:<8} {}  {} calls", underlying, expiry, calls);
    }

    Ok(())
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bwb_screener=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan(args) => cmd_scan(args)?,
        Commands::List { chain } => cmd_list(chain)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn scan_args(extra: &[&str]) -> ScanArgs {
        let mut argv = vec![
            "bwb-screener",
            "scan",
            "--chain",
            "chain.csv",
            "--underlying",
            "AAPL",
            "--expiry",
            "2025-11-28",
        ];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Scan(args) => args,
            Commands::List { .. } => panic!("expected scan"),
        }
    }

    #[test]
    fn test_negative_top_n_clamps_to_zero() {
        let config = scan_args(&["--top-n", "-3"]).screener_config().unwrap();
        assert_eq!(config.top_n, Some(0));

        let config = scan_args(&["--top-n", "4"]).screener_config().unwrap();
        assert_eq!(config.top_n, Some(4));

        let config = scan_args(&[]).screener_config().unwrap();
        assert_eq!(config.top_n, None);
        assert!(config.filter.is_unbounded());
        assert_eq!(config.filter_stage, FilterStage::BeforeScoring);
    }

    #[test]
    fn test_flags_override_file_values() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(
            b"top_n = 20\n\
              [filter]\n\
              min_credit = 0.05\n\
              max_dte = 45\n\
              max_short_delta = 0.35\n",
        )
        .unwrap();
        file.flush().unwrap();
        let path = file.path().to_str().unwrap();

        let config = scan_args(&[
            "--config",
            path,
            "--max-dte",
            "30",
            "--min-short-delta",
            "0.10",
            "--filter-after-scoring",
        ])
        .screener_config()
        .unwrap();

        assert_eq!(config.top_n, Some(20));
        assert_eq!(config.filter.min_credit, Some(0.05));
        assert_eq!(config.filter.max_dte, Some(30));
        assert_eq!(config.filter.min_short_delta, Some(0.10));
        assert_eq!(config.filter.max_short_delta, Some(0.35));
        assert_eq!(config.filter_stage, FilterStage::AfterScoring);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let args = scan_args(&["--config", "does/not/exist.toml"]);
        assert!(args.screener_config().is_err());
    }
}
