//! Score ranking.

use crate::strategy::ScoredCandidate;

/// Sort by score descending and keep the first `top_n`.
///
/// The sort is stable, so equal scores keep their input order and the
/// result is reproducible for a fixed input. `Some(0)` yields an empty
/// result; a `top_n` past the end returns everything.
pub fn rank(mut scored: Vec<ScoredCandidate>, top_n: Option<usize>) -> Vec<ScoredCandidate> {
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    if let Some(n) = top_n {
        scored.truncate(n);
    }
    scored
}

/// Best candidate of an already ranked list.
pub fn best_candidate(ranked: &[ScoredCandidate]) -> Option<&ScoredCandidate> {
    ranked.first()
}
