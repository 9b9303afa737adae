//! End-to-end screening of one quote slice.
//!
//! generate -> filter -> score -> rank, or generate -> score -> filter ->
//! rank when configured with `FilterStage::AfterScoring`.

use tracing::{debug, info, warn};

use crate::data::{OptionQuote, QuoteSlice};
use crate::error::ScreenResult;
use crate::strategy::{generate_candidates, score_candidates, ScoredCandidate};

use super::config::{FilterStage, ScreenerConfig};
use super::filter::filter_candidates;
use super::ranker::rank;

/// Outcome of one screening run.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    /// Ranked (and possibly truncated) candidates.
    pub candidates: Vec<ScoredCandidate>,
    /// Structures enumerated before filtering.
    pub generated: usize,
    /// Structures that passed the range filter.
    pub passed_filter: usize,
}

impl ScanResult {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} generated, {} passed filters, {} returned",
            self.generated,
            self.passed_filter,
            self.candidates.len()
        )
    }
}

/// Broken-wing butterfly screener.
pub struct Screener {
    config: ScreenerConfig,
}

impl Screener {
    pub fn new(config: ScreenerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScreenerConfig {
        &self.config
    }

    /// Screen the quotes of a single (underlying, expiry, side) slice.
    pub fn screen(&self, quotes: &[OptionQuote]) -> ScreenResult<ScanResult> {
        let candidates = generate_candidates(quotes)?;
        let generated = candidates.len();

        if generated == 0 {
            warn!(
                "No BWB combinations generated from {} quotes (too few strikes?)",
                quotes.len()
            );
            return Ok(ScanResult::default());
        }

        let scored = match self.config.filter_stage {
            FilterStage::BeforeScoring => {
                let kept = filter_candidates(candidates, &self.config.filter);
                debug!("Scoring {} of {} candidates", kept.len(), generated);
                score_candidates(kept)
            }
            FilterStage::AfterScoring => {
                filter_candidates(score_candidates(candidates), &self.config.filter)
            }
        };
        let passed_filter = scored.len();

        let ranked = rank(scored, self.config.top_n);

        let result = ScanResult {
            candidates: ranked,
            generated,
            passed_filter,
        };
        info!("Screened {} quotes: {}", quotes.len(), result.summary());

        Ok(result)
    }

    /// Screen a loaded slice.
    pub fn screen_slice(&self, slice: &QuoteSlice) -> ScreenResult<ScanResult> {
        info!(
            "Screening {} {} {} ({} quotes)",
            slice.underlying,
            slice.expiry,
            slice.option_type.as_str(),
            slice.len()
        );
        self.screen(&slice.quotes)
    }
}
