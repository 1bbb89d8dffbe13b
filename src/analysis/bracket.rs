use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Income brackets
// ---------------------------------------------------------------------------

/// Ordered income category. Intervals are half-open, `[lower, upper)`,
/// and the top bracket is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum IncomeBracket {
    #[serde(rename = "<1jt")]
    UnderOne,
    #[serde(rename = "1-3jt")]
    OneToThree,
    #[serde(rename = "3-5jt")]
    ThreeToFive,
    #[serde(rename = "5-10jt")]
    FiveToTen,
    #[serde(rename = ">10jt")]
    OverTen,
}

const MILLION: f64 = 1_000_000.0;

impl IncomeBracket {
    pub const ALL: [IncomeBracket; 5] = [
        IncomeBracket::UnderOne,
        IncomeBracket::OneToThree,
        IncomeBracket::ThreeToFive,
        IncomeBracket::FiveToTen,
        IncomeBracket::OverTen,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            IncomeBracket::UnderOne => "<1jt",
            IncomeBracket::OneToThree => "1-3jt",
            IncomeBracket::ThreeToFive => "3-5jt",
            IncomeBracket::FiveToTen => "5-10jt",
            IncomeBracket::OverTen => ">10jt",
        }
    }

    /// Inclusive lower bound.
    pub fn lower(self) -> f64 {
        match self {
            IncomeBracket::UnderOne => 0.0,
            IncomeBracket::OneToThree => MILLION,
            IncomeBracket::ThreeToFive => 3.0 * MILLION,
            IncomeBracket::FiveToTen => 5.0 * MILLION,
            IncomeBracket::OverTen => 10.0 * MILLION,
        }
    }

    /// Exclusive upper bound; `None` for the top bracket.
    pub fn upper(self) -> Option<f64> {
        match self {
            IncomeBracket::OverTen => None,
            other => Some(IncomeBracket::ALL[other as usize + 1].lower()),
        }
    }
}

impl fmt::Display for IncomeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Map an income to its bracket.
///
/// Missing, NaN and negative incomes have no bracket.
pub fn bin_income(value: Option<f64>) -> Option<IncomeBracket> {
    let v = value?;
    if v.is_nan() || v < 0.0 {
        return None;
    }
    IncomeBracket::ALL
        .iter()
        .rev()
        .find(|b| v >= b.lower())
        .copied()
}
