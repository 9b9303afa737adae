//! Core data types for chain screening.
//!
//! Quotes are the read-only input handed over by the loader; candidates
//! are derived from them by the generator in `strategy`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Option type (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "C" | "CALL" => Some(Self::Call),
            "P" | "PUT" => Some(Self::Put),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Call => "CALL",
            Self::Put => "PUT",
        }
    }
}

/// A single option quote from a chain snapshot.
///
/// One quote per strike within an (underlying, expiry, side) slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionQuote {
    /// Underlying symbol (e.g., "AAPL")
    pub underlying: String,

    /// Option expiration date
    pub expiry: NaiveDate,

    /// Option type (call or put)
    pub option_type: OptionType,

    /// Strike price
    pub strike: Decimal,

    /// Mid price, the credit/debit basis
    pub mid: Decimal,

    /// Option delta in [-1, 1]
    pub delta: f64,

    /// Days to expiration
    pub dte: i32,
}

/// All quotes for one underlying, expiry and side.
#[derive(Debug, Clone)]
pub struct QuoteSlice {
    pub underlying: String,
    pub expiry: NaiveDate,
    pub option_type: OptionType,
    pub quotes: Vec<OptionQuote>,
}

impl QuoteSlice {
    /// Create a new empty slice.
    pub fn new(underlying: impl Into<String>, expiry: NaiveDate, option_type: OptionType) -> Self {
        Self {
            underlying: underlying.into(),
            expiry,
            option_type,
            quotes: Vec::new(),
        }
    }

    /// Add a quote if it belongs to this slice. Returns whether it was kept.
    pub fn add_quote(&mut self, quote: OptionQuote) -> bool {
        if quote.underlying != self.underlying
            || quote.expiry != self.expiry
            || quote.option_type != self.option_type
        {
            return false;
        }
        self.quotes.push(quote);
        true
    }

    /// Distinct strikes in ascending order.
    pub fn strikes(&self) -> Vec<Decimal> {
        let mut strikes: Vec<_> = self.quotes.iter().map(|q| q.strike).collect();
        strikes.sort();
        strikes.dedup();
        strikes
    }

    /// Find the quote at a specific strike.
    pub fn quote_at_strike(&self, strike: Decimal) -> Option<&OptionQuote> {
        self.quotes.iter().find(|q| q.strike == strike)
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

/// A call broken-wing butterfly: long 1 @ K1, short 2 @ K2, long 1 @ K3.
///
/// Wing widths are always unequal; the generator never produces a
/// symmetric triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BwbCandidate {
    pub underlying: String,
    pub expiry: NaiveDate,
    pub k1: Decimal,
    pub k2: Decimal,
    pub k3: Decimal,
    /// Entry credit per share (negative means a net debit).
    pub credit: Decimal,
    /// Days to expiration.
    pub dte: i32,
    /// |delta| of the doubled short strike.
    pub short_delta: f64,
}

impl BwbCandidate {
    /// Width between the long K1 and the short K2.
    pub fn lower_wing(&self) -> Decimal {
        self.k2 - self.k1
    }

    /// Width between the short K2 and the long K3.
    pub fn upper_wing(&self) -> Decimal {
        self.k3 - self.k2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn quote(strike: Decimal) -> OptionQuote {
        OptionQuote {
            underlying: "AAPL".to_string(),
            expiry: NaiveDate::from_ymd_opt(2025, 11, 28).unwrap(),
            option_type: OptionType::Call,
            strike,
            mid: dec!(1.00),
            delta: 0.5,
            dte: 10,
        }
    }

    #[test]
    fn test_option_type_parsing() {
        assert_eq!(OptionType::from_str("C"), Some(OptionType::Call));
        assert_eq!(OptionType::from_str("P"), Some(OptionType::Put));
        assert_eq!(OptionType::from_str("call"), Some(OptionType::Call));
        assert_eq!(OptionType::from_str(" PUT "), Some(OptionType::Put));
        assert_eq!(OptionType::from_str("X"), None);
    }

    #[test]
    fn test_slice_rejects_foreign_quotes() {
        let expiry = NaiveDate::from_ymd_opt(2025, 11, 28).unwrap();
        let mut slice = QuoteSlice::new("AAPL", expiry, OptionType::Call);

        assert!(slice.add_quote(quote(dec!(100))));

        let mut other = quote(dec!(105));
        other.underlying = "MSFT".to_string();
        assert!(!slice.add_quote(other));

        let mut put = quote(dec!(105));
        put.option_type = OptionType::Put;
        assert!(!slice.add_quote(put));

        assert_eq!(slice.len(), 1);
    }

    #[test]
    fn test_slice_strikes_sorted() {
        let expiry = NaiveDate::from_ymd_opt(2025, 11, 28).unwrap();
        let mut slice = QuoteSlice::new("AAPL", expiry, OptionType::Call);
        for k in [dec!(110), dec!(95), dec!(100)] {
            slice.add_quote(quote(k));
        }
        assert_eq!(slice.strikes(), vec![dec!(95), dec!(100), dec!(110)]);
        assert_eq!(slice.quote_at_strike(dec!(100)).unwrap().strike, dec!(100));
        assert!(slice.quote_at_strike(dec!(105)).is_none());
    }

    #[test]
    fn test_wing_widths() {
        let bwb = BwbCandidate {
            underlying: "AAPL".to_string(),
            expiry: NaiveDate::from_ymd_opt(2025, 11, 28).unwrap(),
            k1: dec!(95),
            k2: dec!(100),
            k3: dec!(110),
            credit: dec!(2.00),
            dte: 5,
            short_delta: 0.25,
        };
        assert_eq!(bwb.lower_wing(), dec!(5));
        assert_eq!(bwb.upper_wing(), dec!(10));
    }
}
