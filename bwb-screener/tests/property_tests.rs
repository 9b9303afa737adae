//! Property tests for screening invariants.
//!
//! Uses proptest to verify:
//! 1. Structure: every candidate has K1 < K2 < K3 and unequal wings
//! 2. Order independence: shuffling the quotes never changes the output
//! 3. Floors: max profit and max loss are never negative
//! 4. Filter identity and idempotence
//! 5. Filter stage: filtering before or after scoring agrees

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use bwb_screener::screening::{filter_candidates, FilterConfig};
use bwb_screener::strategy::{evaluate, generate_candidates};
use bwb_screener::{FilterStage, OptionQuote, OptionType, Screener, ScreenerConfig};

// ── Strategies (proptest) ────────────────────────────────────────────

/// A call slice with distinct strikes on a 2.5 grid.
fn arb_chain() -> impl Strategy<Value = Vec<OptionQuote>> {
    prop::collection::btree_set(20i64..80, 0..9).prop_flat_map(|strikes| {
        let n = strikes.len();
        (
            Just(strikes),
            prop::collection::vec(1i64..2000, n),
            prop::collection::vec(0.01..0.99f64, n),
            0i32..60,
        )
            .prop_map(|(strikes, mids, deltas, dte)| {
                strikes
                    .into_iter()
                    .zip(mids)
                    .zip(deltas)
                    .map(|((k, mid), delta)| OptionQuote {
                        underlying: "SPY".to_string(),
                        expiry: NaiveDate::from_ymd_opt(2025, 12, 19).unwrap(),
                        option_type: OptionType::Call,
                        strike: Decimal::new(k * 25, 1),
                        mid: Decimal::new(mid, 2),
                        delta,
                        dte,
                    })
                    .collect()
            })
    })
}

fn arb_filter() -> impl Strategy<Value = FilterConfig> {
    (
        prop::option::of(-5.0..5.0f64),
        prop::option::of(0i32..30),
        prop::option::of(20i32..60),
        prop::option::of(0.0..0.5f64),
        prop::option::of(0.3..1.0f64),
    )
        .prop_map(
            |(min_credit, min_dte, max_dte, min_short_delta, max_short_delta)| FilterConfig {
                min_credit,
                min_dte,
                max_dte,
                min_short_delta,
                max_short_delta,
            },
        )
}

// ── 1. Structure ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn candidates_are_asymmetric_and_ordered(chain in arb_chain()) {
        let candidates = generate_candidates(&chain).unwrap();
        for c in &candidates {
            prop_assert!(c.k1 < c.k2 && c.k2 < c.k3);
            prop_assert_ne!(c.lower_wing(), c.upper_wing());
            prop_assert!(c.short_delta >= 0.0);
        }
        if chain.len() < 3 {
            prop_assert!(candidates.is_empty());
        }
    }
}

// ── 2. Order Independence ────────────────────────────────────────────

proptest! {
    #[test]
    fn generation_ignores_input_order(
        (chain, shuffled) in arb_chain().prop_flat_map(|c| (Just(c.clone()), Just(c).prop_shuffle()))
    ) {
        let a = generate_candidates(&chain).unwrap();
        let b = generate_candidates(&shuffled).unwrap();
        prop_assert_eq!(a, b);
    }
}

// ── 3. Floors ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn profit_and_loss_never_negative(
        k1 in 1i64..100,
        lower in 1i64..50,
        upper in 1i64..50,
        credit in -5000i64..5000,
    ) {
        let k1 = Decimal::from(k1);
        let k2 = k1 + Decimal::from(lower);
        let k3 = k2 + Decimal::from(upper);
        let p = evaluate(k1, k2, k3, Decimal::new(credit, 2));

        prop_assert!(p.max_profit >= Decimal::ZERO);
        prop_assert!(p.max_loss >= Decimal::ZERO);
        prop_assert!(p.pnl_at_k2 >= p.pnl_low);
    }
}

// ── 4. Filter Identity & Idempotence ─────────────────────────────────

proptest! {
    #[test]
    fn unbounded_filter_is_identity(chain in arb_chain()) {
        let candidates = generate_candidates(&chain).unwrap();
        let filtered = filter_candidates(candidates.clone(), &FilterConfig::default());
        prop_assert_eq!(filtered, candidates);
    }

    #[test]
    fn filter_is_idempotent(chain in arb_chain(), config in arb_filter()) {
        let candidates = generate_candidates(&chain).unwrap();
        let once = filter_candidates(candidates, &config);
        let twice = filter_candidates(once.clone(), &config);
        prop_assert_eq!(once, twice);
    }
}

// ── 5. Filter Stage ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn filter_stage_is_irrelevant(
        chain in arb_chain(),
        filter in arb_filter(),
        top_n in prop::option::of(0usize..10),
    ) {
        let before = Screener::new(ScreenerConfig {
            filter: filter.clone(),
            top_n,
            filter_stage: FilterStage::BeforeScoring,
        })
        .screen(&chain)
        .unwrap();

        let after = Screener::new(ScreenerConfig {
            filter,
            top_n,
            filter_stage: FilterStage::AfterScoring,
        })
        .screen(&chain)
        .unwrap();

        prop_assert_eq!(before.candidates, after.candidates);
        prop_assert_eq!(before.passed_filter, after.passed_filter);
    }
}
