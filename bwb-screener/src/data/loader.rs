//! Chain loader for flattened option-chain CSV files.
//!
//! Reads the CSV into a polars `DataFrame`, normalizes column names, and
//! converts rows into typed `OptionQuote`s. The screening core never sees
//! the raw table; it only consumes quotes sliced to one underlying,
//! expiry and side.
//!
//! Expected columns (after normalization):
//! - underlying, expiry, strike, delta, days_to_expiration
//! - mid, or bid and ask (mid is derived as their average)
//! - put_call (optional; rows without it are treated as calls)

use std::collections::BTreeSet;
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use chrono::NaiveDate;
use polars::prelude::*;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use thiserror::Error;

use super::types::{OptionQuote, OptionType, QuoteSlice};

/// Columns every chain must carry.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "underlying",
    "expiry",
    "strike",
    "delta",
    "days_to_expiration",
];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Missing required columns: {0:?}")]
    MissingColumns(Vec<String>),

    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Load a flattened chain CSV with normalized column names.
pub fn load_chain_csv(path: impl AsRef<Path>) -> Result<DataFrame, LoaderError> {
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(LoaderError::FileNotFound(path.display().to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .into_reader_with_file_handle(file)
        .finish()?;

    normalize_columns(&mut df)?;
    Ok(df)
}

/// Normalize a single column name: trim, lower-case, snake-case, aliases.
pub fn normalize_column_name(name: &str) -> String {
    let cleaned = name.trim().to_lowercase().replace([' ', '-'], "_");
    match cleaned.as_str() {
        "ticker" | "symbol" => "underlying".to_string(),
        "expiration" | "expir_date" | "expiration_date" => "expiry".to_string(),
        "dte" | "daystoexpiration" => "days_to_expiration".to_string(),
        "option_type" | "type" | "putcall" | "side" => "put_call".to_string(),
        _ => cleaned,
    }
}

/// Rename every column of `df` in place.
pub fn normalize_columns(df: &mut DataFrame) -> Result<(), LoaderError> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|n| normalize_column_name(&n.to_string()))
        .collect();
    df.set_column_names(names)?;
    Ok(())
}

fn has_column(df: &DataFrame, name: &str) -> bool {
    df.column(name).is_ok()
}

fn f64_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, LoaderError> {
    let col = df.column(name)?.cast(&DataType::Float64)?;
    Ok(col.f64()?.into_iter().collect())
}

fn i64_values(df: &DataFrame, name: &str) -> Result<Vec<Option<i64>>, LoaderError> {
    let col = df.column(name)?.cast(&DataType::Int64)?;
    Ok(col.i64()?.into_iter().collect())
}

fn str_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, LoaderError> {
    let col = df.column(name)?.cast(&DataType::String)?;
    Ok(col
        .str()?
        .into_iter()
        .map(|v| v.map(|s| s.trim().to_string()))
        .collect())
}

fn required<T>(value: Option<T>, column: &str, row: usize) -> Result<T, LoaderError> {
    value.ok_or_else(|| LoaderError::InvalidData(format!("null '{}' at row {}", column, row)))
}

fn to_decimal(value: f64, column: &str, row: usize) -> Result<Decimal, LoaderError> {
    Decimal::from_f64(value).ok_or_else(|| {
        LoaderError::InvalidData(format!("non-finite '{}' at row {}: {}", column, row, value))
    })
}

/// Convert a normalized chain table into typed quotes.
pub fn quotes_from_frame(df: &DataFrame) -> Result<Vec<OptionQuote>, LoaderError> {
    let mut missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !has_column(df, c))
        .map(|c| c.to_string())
        .collect();

    let has_mid = has_column(df, "mid");
    if !has_mid {
        for c in ["bid", "ask"] {
            if !has_column(df, c) {
                missing.push(format!("mid (or {})", c));
            }
        }
    }

    if !missing.is_empty() {
        return Err(LoaderError::MissingColumns(missing));
    }

    let underlyings = str_values(df, "underlying")?;
    let expiries = str_values(df, "expiry")?;
    let strikes = f64_values(df, "strike")?;
    let deltas = f64_values(df, "delta")?;
    let dtes = i64_values(df, "days_to_expiration")?;
    let sides = if has_column(df, "put_call") {
        Some(str_values(df, "put_call")?)
    } else {
        None
    };
    let mids = if has_mid {
        f64_values(df, "mid")?
    } else {
        let bids = f64_values(df, "bid")?;
        let asks = f64_values(df, "ask")?;
        bids.into_iter()
            .zip(asks)
            .map(|(b, a)| Some((b? + a?) / 2.0))
            .collect()
    };

    let mut quotes = Vec::with_capacity(df.height());

    for idx in 0..df.height() {
        let expiry_str = required(expiries[idx].as_deref(), "expiry", idx)?;
        let expiry = NaiveDate::parse_from_str(expiry_str, "%Y-%m-%d").map_err(|e| {
            LoaderError::InvalidData(format!("invalid expiry '{}' at row {}: {}", expiry_str, idx, e))
        })?;

        let option_type = match sides.as_ref().and_then(|s| s[idx].as_deref()) {
            Some(raw) => OptionType::from_str(raw).ok_or_else(|| {
                LoaderError::InvalidData(format!("invalid put_call '{}' at row {}", raw, idx))
            })?,
            None => OptionType::Call,
        };

        let dte = required(dtes[idx], "days_to_expiration", idx)?;
        let dte = i32::try_from(dte)
            .ok()
            .filter(|d| *d >= 0)
            .ok_or_else(|| {
                LoaderError::InvalidData(format!("invalid days_to_expiration {} at row {}", dte, idx))
            })?;

        quotes.push(OptionQuote {
            underlying: required(underlyings[idx].clone(), "underlying", idx)?,
            expiry,
            option_type,
            strike: to_decimal(required(strikes[idx], "strike", idx)?, "strike", idx)?,
            mid: to_decimal(required(mids[idx], "mid", idx)?, "mid", idx)?,
            delta: required(deltas[idx], "delta", idx)?,
            dte,
        });
    }

    Ok(quotes)
}

/// Slice quotes down to one underlying, expiry and side.
pub fn select_slice(
    quotes: &[OptionQuote],
    underlying: &str,
    expiry: NaiveDate,
    option_type: OptionType,
) -> QuoteSlice {
    let mut slice = QuoteSlice::new(underlying, expiry, option_type);
    for quote in quotes {
        slice.add_quote(quote.clone());
    }
    slice
}

/// Distinct (underlying, expiry) pairs present in the chain, sorted.
pub fn available_slices(quotes: &[OptionQuote]) -> Vec<(String, NaiveDate)> {
    quotes
        .iter()
        .map(|q| (q.underlying.clone(), q.expiry))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
