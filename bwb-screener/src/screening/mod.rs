//! Candidate screening.
//!
//! Provides:
//! - Range filters on credit, DTE and short delta (typed or tabular input)
//! - Stable score ranking with optional top-N truncation
//! - The end-to-end `Screener` and its TOML configuration

pub mod config;
pub mod filter;
pub mod pipeline;
pub mod ranker;

pub use config::{ConfigError, FilterStage, ScreenerConfig};
pub use filter::{
    filter_candidates, filter_frame, filter_records, filter_table, CandidateRow, CandidateTable,
    FilterConfig, Screenable,
};
pub use pipeline::{ScanResult, Screener};
pub use ranker::{best_candidate, rank};
