use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// The most frequent value, or `NonUnique` when several values tie.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Mode {
    Unique(f64),
    NonUnique,
}

impl Mode {
    pub fn value(&self) -> Option<f64> {
        match self {
            Mode::Unique(v) => Some(*v),
            Mode::NonUnique => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Unique(v) => write!(f, "{v}"),
            Mode::NonUnique => f.write_str("not unique"),
        }
    }
}

// ---------------------------------------------------------------------------
// Descriptive statistics
// ---------------------------------------------------------------------------

/// Mean, median, mode and sample standard deviation of a non-empty sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub mode: Mode,
    /// `None` for a single value (the N-1 denominator is zero).
    pub standard_deviation: Option<f64>,
}

/// One bar of the statistics chart. `note` explains a bar drawn at zero
/// because its statistic has no number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatBar {
    pub label: &'static str,
    pub value: f64,
    pub note: Option<&'static str>,
}

impl StatisticsSummary {
    /// Mean / Median / Mode / Std Dev bars.
    pub fn chart_bars(&self) -> Vec<StatBar> {
        let bar = |label, value: Option<f64>, note| StatBar {
            label,
            value: value.unwrap_or(0.0),
            note: if value.is_some() { None } else { Some(note) },
        };
        vec![
            bar("Mean", Some(self.mean), ""),
            bar("Median", Some(self.median), ""),
            bar("Mode", self.mode.value(), "not unique"),
            bar("Std Dev", self.standard_deviation, "undefined"),
        ]
    }
}

/// Summarize the finite values of a sample. `None` when nothing is left.
pub fn summarize(values: &[f64]) -> Option<StatisticsSummary> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    };
    let standard_deviation = (n > 1).then(|| {
        let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n - 1) as f64).sqrt()
    });

    Some(StatisticsSummary {
        count: n,
        // Clamp away float drift so the mean never leaves [min, max].
        mean: mean.clamp(sorted[0], sorted[n - 1]),
        median,
        mode: mode_of_sorted(&sorted),
        standard_deviation,
    })
}

/// Mode of an ascending, non-empty sample.
fn mode_of_sorted(sorted: &[f64]) -> Mode {
    let mut best: Option<(f64, usize)> = None;
    let mut tied = false;
    for run in sorted.chunk_by(|a, b| a == b) {
        let len = run.len();
        match best {
            Some((_, best_len)) if len < best_len => {}
            Some((_, best_len)) if len == best_len => tied = true,
            _ => {
                best = Some((run[0], len));
                tied = false;
            }
        }
    }
    match best {
        Some((v, _)) if !tied => Mode::Unique(v),
        _ => Mode::NonUnique,
    }
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Equal-width bin `[start, end)`; the last bin also includes `end`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Split the finite values into `bins` equal-width bins spanning [min, max].
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if range.abs() < f64::EPSILON {
        return vec![HistogramBin {
            start: min,
            end: max,
            count: finite.len(),
        }];
    }

    let width = range / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in &finite {
        let i = (((v - min) / width) as usize).min(bins - 1);
        counts[i] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: min + width * i as f64,
            end: if i + 1 == bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_of_income_sample() {
        let s = summarize(&[500_000.0, 1_500_000.0, 1_500_000.0, 9_000_000.0]).unwrap();
        assert_eq!(s.count, 4);
        assert_eq!(s.mean, 3_125_000.0);
        assert_eq!(s.median, 1_500_000.0);
        assert_eq!(s.mode, Mode::Unique(1_500_000.0));
        // sum of squared deviations = 46_687_500_000_000, / 3
        let expected = (46_687_500_000_000.0f64 / 3.0).sqrt();
        assert!((s.standard_deviation.unwrap() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_all_distinct_values_have_no_unique_mode() {
        let s = summarize(&[1_000_000.0, 2_000_000.0, 3_000_000.0]).unwrap();
        assert_eq!(s.mode, Mode::NonUnique);
        assert_eq!(s.median, 2_000_000.0);

        let bars = s.chart_bars();
        assert_eq!(bars[2].label, "Mode");
        assert_eq!(bars[2].value, 0.0);
        assert_eq!(bars[2].note, Some("not unique"));
        assert_eq!(bars[0].note, None);
    }

    #[test]
    fn test_tie_between_repeated_values_is_non_unique() {
        let s = summarize(&[1.0, 1.0, 2.0, 2.0, 3.0]).unwrap();
        assert_eq!(s.mode, Mode::NonUnique);
        let s = summarize(&[1.0, 2.0, 2.0, 3.0, 3.0, 3.0]).unwrap();
        assert_eq!(s.mode, Mode::Unique(3.0));
    }

    #[test]
    fn test_single_value() {
        let s = summarize(&[42.0]).unwrap();
        assert_eq!(s.mean, 42.0);
        assert_eq!(s.median, 42.0);
        assert_eq!(s.mode, Mode::Unique(42.0));
        assert_eq!(s.standard_deviation, None);
        assert_eq!(s.chart_bars()[3].note, Some("undefined"));
    }

    #[test]
    fn test_empty_input_has_no_summary() {
        assert_eq!(summarize(&[]), None);
        assert_eq!(summarize(&[f64::NAN]), None);
    }

    #[test]
    fn test_mean_stays_within_range() {
        let samples: [&[f64]; 4] = [
            &[0.1, 0.1, 0.1],
            &[1e15, 1e15 + 2.0, 1e15 + 4.0],
            &[-3.0, 7.5, 2.25, 2.25],
            &[0.3; 10],
        ];
        for sample in samples {
            let s = summarize(sample).unwrap();
            let min = sample.iter().copied().fold(f64::INFINITY, f64::min);
            let max = sample.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            assert!(s.mean >= min && s.mean <= max, "{sample:?} -> {}", s.mean);
        }
    }

    #[test]
    fn test_histogram_bins_cover_all_values() {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0, 10.0];
        let bins = histogram(&values, 5);
        assert_eq!(bins.len(), 5);
        assert_eq!(bins[0].start, 0.0);
        assert_eq!(bins[4].end, 10.0);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
        assert_eq!(bins[0].count, 2);
        assert_eq!(bins[4].count, 1);
    }

    #[test]
    fn test_histogram_degenerate_inputs() {
        assert!(histogram(&[], 30).is_empty());
        assert!(histogram(&[1.0], 0).is_empty());
        let single = histogram(&[5.0, 5.0], 30);
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].count, 2);
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_mean_and_median_stay_within_range(
            values in prop::collection::vec(-1e12f64..1e12, 1..64),
        ) {
            let s = summarize(&values).unwrap();
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(s.mean >= min && s.mean <= max);
            prop_assert!(s.median >= min && s.median <= max);
            prop_assert_eq!(s.count, values.len());
            if let Some(std) = s.standard_deviation {
                prop_assert!(std >= 0.0);
            }
        }

        #[test]
        fn prop_histogram_counts_every_value(
            values in prop::collection::vec(0f64..2e7, 0..64),
            bins in 1usize..40,
        ) {
            let total: usize = histogram(&values, bins).iter().map(|b| b.count).sum();
            prop_assert_eq!(total, values.len());
        }
    }
}
