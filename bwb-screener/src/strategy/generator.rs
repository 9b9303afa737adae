//! Broken-wing butterfly candidate generation.
//!
//! Enumerates every strike triple K1 < K2 < K3 of a call slice and keeps
//! those with unequal wing widths. The search is exhaustive (O(n³) in the
//! strike count): the candidate set is the deliverable, not an
//! intermediate.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::debug;

use crate::data::{BwbCandidate, OptionQuote, QuoteSlice};
use crate::error::{ScreenError, ScreenResult};

/// Generate all BWB candidates from one (underlying, expiry, side) slice.
///
/// Fails on a repeated strike; callers must deduplicate upstream since it
/// is ambiguous which quote is authoritative. Fewer than three distinct
/// strikes yields an empty result.
pub fn generate_candidates(quotes: &[OptionQuote]) -> ScreenResult<Vec<BwbCandidate>> {
    let mut by_strike: BTreeMap<Decimal, &OptionQuote> = BTreeMap::new();
    for quote in quotes {
        if by_strike.insert(quote.strike, quote).is_some() {
            return Err(ScreenError::DuplicateStrike {
                strike: quote.strike,
            });
        }
    }

    // BTreeMap iteration is ascending by strike
    let legs: Vec<&OptionQuote> = by_strike.into_values().collect();
    let n = legs.len();
    let mut candidates = Vec::new();

    for i in 0..n {
        for j in (i + 1)..n {
            for k in (j + 1)..n {
                let (low, short, high) = (legs[i], legs[j], legs[k]);

                if short.strike - low.strike == high.strike - short.strike {
                    continue;
                }

                candidates.push(BwbCandidate {
                    underlying: low.underlying.clone(),
                    expiry: low.expiry,
                    k1: low.strike,
                    k2: short.strike,
                    k3: high.strike,
                    credit: Decimal::TWO * short.mid - low.mid - high.mid,
                    dte: low.dte,
                    short_delta: short.delta.abs(),
                });
            }
        }
    }

    debug!(
        "Generated {} candidates from {} strikes",
        candidates.len(),
        n
    );

    Ok(candidates)
}

impl QuoteSlice {
    /// Generate all BWB candidates for this slice.
    pub fn candidates(&self) -> ScreenResult<Vec<BwbCandidate>> {
        generate_candidates(&self.quotes)
    }
}
