pub mod data;
pub mod error;
pub mod report;
pub mod screening;
pub mod strategy;

// Re-export commonly used types
pub use data::{BwbCandidate, LoaderError, OptionQuote, OptionType, QuoteSlice};
pub use error::{ScreenError, ScreenResult};
pub use screening::{FilterConfig, FilterStage, ScanResult, Screener, ScreenerConfig};
pub use strategy::{PayoffProfile, Score, ScoredCandidate};
