//! Error types for the screening core.

use polars::prelude::PolarsError;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScreenError {
    /// Required field(s) absent from the input records.
    #[error("Missing required fields {missing:?}{}", fmt_record(.record))]
    Schema {
        missing: Vec<String>,
        record: Option<usize>,
    },

    /// The same strike appears twice in one generation call.
    #[error("Duplicate strike {strike} in quote slice")]
    DuplicateStrike { strike: Decimal },

    /// A required field is present but unusable.
    #[error("Invalid value for '{field}'{}: {reason}", fmt_record(.record))]
    InvalidField {
        field: String,
        record: Option<usize>,
        reason: String,
    },

    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

pub type ScreenResult<T> = Result<T, ScreenError>;

impl ScreenError {
    pub fn schema(missing: Vec<String>, record: Option<usize>) -> Self {
        Self::Schema { missing, record }
    }

    pub fn invalid_field(
        field: impl Into<String>,
        record: Option<usize>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidField {
            field: field.into(),
            record,
            reason: reason.into(),
        }
    }
}

fn fmt_record(record: &Option<usize>) -> String {
    match record {
        Some(idx) => format!(" (record {})", idx),
        None => String::new(),
    }
}
