//! Ranked-table export.
//!
//! The ranked candidates leave the crate as a polars `DataFrame` with a
//! fixed schema, empty or not, and can be written out as CSV.

use std::fs::File;
use std::path::Path;

use polars::prelude::*;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::strategy::ScoredCandidate;

/// Output columns, in order.
pub const OUTPUT_COLUMNS: &[&str] = &[
    "underlying",
    "expiry",
    "k1",
    "k2",
    "k3",
    "credit",
    "days_to_expiration",
    "short_delta",
    "pnl_low",
    "pnl_at_k2",
    "pnl_high",
    "max_profit",
    "max_loss",
    "score",
];

fn decimal_column(
    name: &str,
    scored: &[ScoredCandidate],
    f: impl Fn(&ScoredCandidate) -> Decimal,
) -> Column {
    let values: Vec<f64> = scored
        .iter()
        .map(|s| f(s).to_f64().unwrap_or(f64::NAN))
        .collect();
    Column::new(name.into(), values)
}

/// Build the ranked table. `Unbounded` scores are rendered as `+inf`.
pub fn to_dataframe(scored: &[ScoredCandidate]) -> PolarsResult<DataFrame> {
    let underlying: Vec<String> = scored.iter().map(|s| s.candidate.underlying.clone()).collect();
    let expiry: Vec<String> = scored.iter().map(|s| s.candidate.expiry.to_string()).collect();
    let dte: Vec<i32> = scored.iter().map(|s| s.candidate.dte).collect();
    let short_delta: Vec<f64> = scored.iter().map(|s| s.candidate.short_delta).collect();
    let score: Vec<f64> = scored.iter().map(|s| s.score.as_f64()).collect();

    DataFrame::new(vec![
        Column::new("underlying".into(), underlying),
        Column::new("expiry".into(), expiry),
        decimal_column("k1", scored, |s| s.candidate.k1),
        decimal_column("k2", scored, |s| s.candidate.k2),
        decimal_column("k3", scored, |s| s.candidate.k3),
        decimal_column("credit", scored, |s| s.candidate.credit),
        Column::new("days_to_expiration".into(), dte),
        Column::new("short_delta".into(), short_delta),
        decimal_column("pnl_low", scored, |s| s.payoff.pnl_low),
        decimal_column("pnl_at_k2", scored, |s| s.payoff.pnl_at_k2),
        decimal_column("pnl_high", scored, |s| s.payoff.pnl_high),
        decimal_column("max_profit", scored, |s| s.payoff.max_profit),
        decimal_column("max_loss", scored, |s| s.payoff.max_loss),
        Column::new("score".into(), score),
    ])
}

/// Write a table to CSV with a header row.
pub fn write_csv(df: &mut DataFrame, path: impl AsRef<Path>) -> PolarsResult<()> {
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(df)
}
