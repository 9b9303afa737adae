//! Expiry payoff and reward/risk scoring for call broken-wing butterflies.
//!
//! The position is long 1 K1 call, short 2 K2 calls, long 1 K3 call. Net
//! contract count is zero, so the terminal PnL as a function of spot is
//! piecewise linear, continuous and flat on both tails:
//!
//! - `S <= K1`: PnL = credit
//! - `K1 < S <= K2`: rises to `(K2 - K1) + credit` at `S = K2`
//! - `K2 < S <= K3`: falls linearly
//! - `S >= K3`: PnL = `(K2 - K1) - (K3 - K2) + credit`
//!
//! Extrema therefore sit exactly on the three breakpoints and no interior
//! evaluation is needed.

use std::cmp::Ordering;
use std::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::data::BwbCandidate;

/// Terminal payoff per share at `spot`, excluding the entry credit.
pub fn expiry_payoff(spot: Decimal, k1: Decimal, k2: Decimal, k3: Decimal) -> Decimal {
    let call = |strike: Decimal| (spot - strike).max(Decimal::ZERO);
    call(k1) - Decimal::TWO * call(k2) + call(k3)
}

/// PnL per share at an arbitrary expiry spot for a position opened for `credit`.
pub fn pnl_at_expiry(spot: Decimal, k1: Decimal, k2: Decimal, k3: Decimal, credit: Decimal) -> Decimal {
    expiry_payoff(spot, k1, k2, k3) + credit
}

/// PnL at the three breakpoints plus the floored extrema.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayoffProfile {
    /// PnL for any spot at or below K1.
    pub pnl_low: Decimal,
    /// PnL at the short strike (the peak).
    pub pnl_at_k2: Decimal,
    /// PnL for any spot at or above K3.
    pub pnl_high: Decimal,
    /// Best-case PnL, floored at zero.
    pub max_profit: Decimal,
    /// Worst-case loss as a non-negative magnitude.
    pub max_loss: Decimal,
}

/// Evaluate max profit and max loss per share for a BWB opened for `credit`.
///
/// Both extremes are floored at zero: a structure that can never lose
/// reports `max_loss == 0`, one that can never profit reports
/// `max_profit == 0`.
pub fn evaluate(k1: Decimal, k2: Decimal, k3: Decimal, credit: Decimal) -> PayoffProfile {
    let pnl_low = credit;
    let pnl_at_k2 = (k2 - k1) + credit;
    let pnl_high = (k2 - k1) - (k3 - k2) + credit;

    let best = pnl_low.max(pnl_at_k2).max(pnl_high);
    let worst = pnl_low.min(pnl_at_k2).min(pnl_high);

    PayoffProfile {
        pnl_low,
        pnl_at_k2,
        pnl_high,
        max_profit: best.max(Decimal::ZERO),
        max_loss: (-worst).max(Decimal::ZERO),
    }
}

impl PayoffProfile {
    /// Reward/risk score for this profile.
    pub fn score(&self) -> Score {
        if self.max_loss > Decimal::ZERO {
            let profit = self.max_profit.to_f64().unwrap_or(0.0);
            let loss = self.max_loss.to_f64().unwrap_or(f64::MAX);
            Score::Ratio(profit / loss)
        } else if self.max_profit > Decimal::ZERO {
            Score::Unbounded
        } else {
            Score::Ratio(0.0)
        }
    }
}

/// Reward/risk score: `max_profit / max_loss`.
///
/// A structure with no downside and positive upside is `Unbounded`, a
/// marker distinct from any float (never NaN). It ranks above every
/// finite ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Score {
    Ratio(f64),
    Unbounded,
}

impl Score {
    /// Numeric view for tabular output; `Unbounded` maps to `+inf`.
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Ratio(r) => *r,
            Self::Unbounded => f64::INFINITY,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, Self::Unbounded)
    }

    /// Total order used by the ranker.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Unbounded, Self::Unbounded) => Ordering::Equal,
            (Self::Unbounded, Self::Ratio(_)) => Ordering::Greater,
            (Self::Ratio(_), Self::Unbounded) => Ordering::Less,
            (Self::Ratio(a), Self::Ratio(b)) => a.total_cmp(b),
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ratio(r) => write!(f, "{:.4}", r),
            Self::Unbounded => write!(f, "unbounded"),
        }
    }
}

/// A candidate with its payoff profile and score attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub candidate: BwbCandidate,
    pub payoff: PayoffProfile,
    pub score: Score,
}

impl ScoredCandidate {
    pub fn max_profit(&self) -> Decimal {
        self.payoff.max_profit
    }

    pub fn max_loss(&self) -> Decimal {
        self.payoff.max_loss
    }
}

/// Attach payoff and score to a single candidate.
pub fn score_candidate(candidate: BwbCandidate) -> ScoredCandidate {
    let payoff = evaluate(candidate.k1, candidate.k2, candidate.k3, candidate.credit);
    let score = payoff.score();
    ScoredCandidate {
        candidate,
        payoff,
        score,
    }
}

/// Score every candidate, preserving order.
pub fn score_candidates(candidates: Vec<BwbCandidate>) -> Vec<ScoredCandidate> {
    candidates.into_iter().map(score_candidate).collect()
}
