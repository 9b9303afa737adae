//! Broken-wing butterfly construction and payoff.
//!
//! Provides:
//! - Candidate generation over a call slice (asymmetric strike triples)
//! - Breakpoint payoff evaluation and reward/risk scoring

pub mod generator;
pub mod payoff;

pub use generator::generate_candidates;
pub use payoff::{
    evaluate, expiry_payoff, pnl_at_expiry, score_candidate, score_candidates, PayoffProfile,
    Score, ScoredCandidate,
};
