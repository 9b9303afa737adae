//! Range filters over candidate structures.
//!
//! A `FilterConfig` is a conjunction of optional inclusive bounds on
//! credit, days to expiration and short-strike delta. Unset bounds impose
//! no constraint, so the default config is the identity filter.
//!
//! Filtering works on anything `Screenable`. Untyped inputs (a polars
//! table or a list of JSON records) go through `CandidateTable`, which
//! validates the three fields once and hands back typed `CandidateRow`s.

use polars::prelude::*;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data::BwbCandidate;
use crate::error::{ScreenError, ScreenResult};
use crate::strategy::ScoredCandidate;

pub const CREDIT_FIELD: &str = "credit";
pub const DTE_FIELD: &str = "days_to_expiration";
pub const DTE_ALIAS: &str = "dte";
pub const SHORT_DELTA_FIELD: &str = "short_delta";

/// Optional inclusive bounds; all unset means "keep everything".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Minimum entry credit per share.
    pub min_credit: Option<f64>,
    /// Minimum days to expiration.
    pub min_dte: Option<i32>,
    /// Maximum days to expiration.
    pub max_dte: Option<i32>,
    /// Minimum |delta| of the short strike.
    pub min_short_delta: Option<f64>,
    /// Maximum |delta| of the short strike.
    pub max_short_delta: Option<f64>,
}

impl FilterConfig {
    /// True when no bound is active.
    pub fn is_unbounded(&self) -> bool {
        self == &Self::default()
    }

    /// Check a single item against every active bound.
    pub fn accepts<T: Screenable + ?Sized>(&self, item: &T) -> bool {
        let credit = item.credit();
        let dte = item.dte();
        let delta = item.short_delta();

        self.min_credit.map_or(true, |min| credit >= min)
            && self.min_dte.map_or(true, |min| dte >= min)
            && self.max_dte.map_or(true, |max| dte <= max)
            && self.min_short_delta.map_or(true, |min| delta >= min)
            && self.max_short_delta.map_or(true, |max| delta <= max)
    }

    /// Overlay every bound that `other` sets onto `self`.
    pub fn merge(&mut self, other: &FilterConfig) {
        if other.min_credit.is_some() {
            self.min_credit = other.min_credit;
        }
        if other.min_dte.is_some() {
            self.min_dte = other.min_dte;
        }
        if other.max_dte.is_some() {
            self.max_dte = other.max_dte;
        }
        if other.min_short_delta.is_some() {
            self.min_short_delta = other.min_short_delta;
        }
        if other.max_short_delta.is_some() {
            self.max_short_delta = other.max_short_delta;
        }
    }
}

/// The fields the filter predicates read.
pub trait Screenable {
    fn credit(&self) -> f64;
    fn dte(&self) -> i32;
    fn short_delta(&self) -> f64;
}

impl Screenable for BwbCandidate {
    fn credit(&self) -> f64 {
        self.credit.to_f64().unwrap_or(f64::NAN)
    }

    fn dte(&self) -> i32 {
        self.dte
    }

    fn short_delta(&self) -> f64 {
        self.short_delta
    }
}

impl Screenable for ScoredCandidate {
    fn credit(&self) -> f64 {
        self.candidate.credit()
    }

    fn dte(&self) -> i32 {
        self.candidate.dte
    }

    fn short_delta(&self) -> f64 {
        self.candidate.short_delta
    }
}

/// Keep the items that satisfy every active bound, in input order.
pub fn filter_candidates<T: Screenable>(items: Vec<T>, config: &FilterConfig) -> Vec<T> {
    if config.is_unbounded() {
        return items;
    }
    items.into_iter().filter(|item| config.accepts(item)).collect()
}

/// Typed view of one untyped input record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateRow {
    /// Index of the record in its source table.
    pub position: usize,
    pub credit: f64,
    pub dte: i32,
    pub short_delta: f64,
}

impl Screenable for CandidateRow {
    fn credit(&self) -> f64 {
        self.credit
    }

    fn dte(&self) -> i32 {
        self.dte
    }

    fn short_delta(&self) -> f64 {
        self.short_delta
    }
}

/// Untyped candidate input: a table or a list of record mappings.
#[derive(Debug, Clone, Copy)]
pub enum CandidateTable<'a> {
    Frame(&'a DataFrame),
    Records(&'a [Value]),
}

impl<'a> From<&'a DataFrame> for CandidateTable<'a> {
    fn from(df: &'a DataFrame) -> Self {
        Self::Frame(df)
    }
}

impl<'a> From<&'a [Value]> for CandidateTable<'a> {
    fn from(records: &'a [Value]) -> Self {
        Self::Records(records)
    }
}

impl<'a> From<&'a Vec<Value>> for CandidateTable<'a> {
    fn from(records: &'a Vec<Value>) -> Self {
        Self::Records(records.as_slice())
    }
}

impl CandidateTable<'_> {
    /// Validate and convert every record.
    pub fn rows(&self) -> ScreenResult<Vec<CandidateRow>> {
        match self {
            Self::Frame(df) => rows_from_frame(df),
            Self::Records(records) => rows_from_records(records),
        }
    }
}

fn frame_dte_column(df: &DataFrame) -> Option<&'static str> {
    [DTE_FIELD, DTE_ALIAS]
        .into_iter()
        .find(|name| df.column(name).is_ok())
}

fn rows_from_frame(df: &DataFrame) -> ScreenResult<Vec<CandidateRow>> {
    let dte_column = frame_dte_column(df);

    let mut missing = Vec::new();
    if df.column(CREDIT_FIELD).is_err() {
        missing.push(CREDIT_FIELD.to_string());
    }
    if dte_column.is_none() {
        missing.push(DTE_FIELD.to_string());
    }
    if df.column(SHORT_DELTA_FIELD).is_err() {
        missing.push(SHORT_DELTA_FIELD.to_string());
    }
    let dte_column = match dte_column {
        Some(name) if missing.is_empty() => name,
        _ => return Err(ScreenError::schema(missing, None)),
    };

    let credits = numeric_column(df, CREDIT_FIELD, CREDIT_FIELD)?;
    let dtes = numeric_column(df, dte_column, DTE_FIELD)?;
    let deltas = numeric_column(df, SHORT_DELTA_FIELD, SHORT_DELTA_FIELD)?;

    credits
        .f64()?
        .into_iter()
        .zip(dtes.f64()?.into_iter())
        .zip(deltas.f64()?.into_iter())
        .enumerate()
        .map(|(position, ((credit, dte), delta))| -> ScreenResult<CandidateRow> {
            let null = |field: &str| ScreenError::invalid_field(field, Some(position), "null value");
            let dte = dte.ok_or_else(|| null(DTE_FIELD))?;
            Ok(CandidateRow {
                position,
                credit: credit.ok_or_else(|| null(CREDIT_FIELD))?,
                dte: whole_days(dte, position)?,
                short_delta: delta.ok_or_else(|| null(SHORT_DELTA_FIELD))?,
            })
        })
        .collect()
}

/// A numeric column as `Float64`. Other dtypes are rejected, not coerced.
fn numeric_column(df: &DataFrame, name: &str, field: &str) -> ScreenResult<Column> {
    let column = df.column(name)?;
    match column.dtype() {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64
        | DataType::Float32
        | DataType::Float64 => Ok(column.cast(&DataType::Float64)?),
        _ => Err(ScreenError::invalid_field(field, None, "expected a number")),
    }
}

fn dte_to_i32(dte: i64, position: usize) -> ScreenResult<i32> {
    i32::try_from(dte)
        .map_err(|_| ScreenError::invalid_field(DTE_FIELD, Some(position), "out of range"))
}

fn whole_days(days: f64, position: usize) -> ScreenResult<i32> {
    if days.fract() != 0.0 {
        return Err(ScreenError::invalid_field(
            DTE_FIELD,
            Some(position),
            "expected a whole number of days",
        ));
    }
    if days < f64::from(i32::MIN) || days > f64::from(i32::MAX) {
        return Err(ScreenError::invalid_field(DTE_FIELD, Some(position), "out of range"));
    }
    Ok(days as i32)
}

fn rows_from_records(records: &[Value]) -> ScreenResult<Vec<CandidateRow>> {
    records
        .iter()
        .enumerate()
        .map(|(position, record)| row_from_record(position, record))
        .collect()
}

fn row_from_record(position: usize, record: &Value) -> ScreenResult<CandidateRow> {
    let map = record.as_object().ok_or_else(|| {
        ScreenError::invalid_field("record", Some(position), "expected an object")
    })?;

    let credit = map.get(CREDIT_FIELD);
    let dte = map.get(DTE_FIELD).or_else(|| map.get(DTE_ALIAS));
    let delta = map.get(SHORT_DELTA_FIELD);

    let missing: Vec<String> = [
        (CREDIT_FIELD, credit.is_none()),
        (DTE_FIELD, dte.is_none()),
        (SHORT_DELTA_FIELD, delta.is_none()),
    ]
    .into_iter()
    .filter(|(_, absent)| *absent)
    .map(|(name, _)| name.to_string())
    .collect();

    let (Some(credit), Some(dte), Some(delta)) = (credit, dte, delta) else {
        return Err(ScreenError::schema(missing, Some(position)));
    };

    let number = |field: &str, value: &Value| {
        value
            .as_f64()
            .ok_or_else(|| ScreenError::invalid_field(field, Some(position), "expected a number"))
    };

    let dte = match dte.as_i64() {
        Some(d) => dte_to_i32(d, position)?,
        None => whole_days(number(DTE_FIELD, dte)?, position)?,
    };

    Ok(CandidateRow {
        position,
        credit: number(CREDIT_FIELD, credit)?,
        dte,
        short_delta: number(SHORT_DELTA_FIELD, delta)?,
    })
}

/// Filter untyped input, returning the surviving typed rows.
pub fn filter_table<'a>(
    table: impl Into<CandidateTable<'a>>,
    config: &FilterConfig,
) -> ScreenResult<Vec<CandidateRow>> {
    let rows = table.into().rows()?;
    Ok(filter_candidates(rows, config))
}

/// Filter a candidate table, keeping every column of the surviving rows.
pub fn filter_frame(df: &DataFrame, config: &FilterConfig) -> ScreenResult<DataFrame> {
    let rows = CandidateTable::Frame(df).rows()?;
    let mask: Vec<bool> = rows.iter().map(|row| config.accepts(row)).collect();
    let mask = BooleanChunked::from_slice("mask".into(), &mask);
    Ok(df.filter(&mask)?)
}

/// Filter JSON records, returning clones of the surviving records.
pub fn filter_records(records: &[Value], config: &FilterConfig) -> ScreenResult<Vec<Value>> {
    let kept = filter_table(records, config)?;
    Ok(kept
        .into_iter()
        .map(|row| records[row.position].clone())
        .collect())
}
