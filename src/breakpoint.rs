//! Statistical breakpoint detection over a distance series.
//!
//! A breakpoint sits after sentence `i` when the distance between sentences
//! `i` and `i + 1` is strictly greater than a threshold derived from the
//! whole series:
//!
//! | Type | Threshold |
//! |------|-----------|
//! | Percentile | `percentile(d, amount)` |
//! | StandardDeviation | `mean(d) + amount * std(d)` |
//! | InterquartileRange | `Q3(d) + amount * (Q3(d) - Q1(d))` |
//!
//! ## Formulas
//!
//! Reproducibility depends on these staying fixed:
//!
//! - **Percentile**: linear interpolation between closest ranks over the
//!   sorted series, at rank `p / 100 * (n - 1)`. Same as NumPy's default.
//! - **Standard deviation**: population form, dividing by `n`.
//! - **Quartiles**: the percentile above at 25 and 75.
//!
//! With a single distance every formula returns that distance, so two
//! sentences never split.

use tracing::trace;

use crate::BreakpointThresholdType;

/// The cut-off for `distances` under `kind` with parameter `amount`.
///
/// Returns `None` for an empty series.
pub fn threshold(distances: &[f64], kind: BreakpointThresholdType, amount: f64) -> Option<f64> {
    if distances.is_empty() {
        return None;
    }

    let value = match kind {
        BreakpointThresholdType::Percentile => percentile(&sorted(distances), amount),
        BreakpointThresholdType::StandardDeviation => {
            let (mean, std_dev) = mean_and_std_dev(distances);
            mean + amount * std_dev
        }
        BreakpointThresholdType::InterquartileRange => {
            let sorted = sorted(distances);
            let q1 = percentile(&sorted, 25.0);
            let q3 = percentile(&sorted, 75.0);
            q3 + amount * (q3 - q1)
        }
    };
    Some(value)
}

/// Indices `i` with `distances[i] > threshold`: break after sentence `i`.
pub fn detect_breakpoints(
    distances: &[f64],
    kind: BreakpointThresholdType,
    amount: f64,
) -> Vec<usize> {
    let Some(cutoff) = threshold(distances, kind, amount) else {
        return Vec::new();
    };

    let breakpoints: Vec<usize> = distances
        .iter()
        .enumerate()
        .filter(|&(_, &d)| d > cutoff)
        .map(|(i, _)| i)
        .collect();

    trace!(%kind, amount, cutoff, ?breakpoints, "breakpoints detected");
    breakpoints
}

/// Group `count` consecutive items into index ranges that end at each
/// breakpoint (inclusive).
///
/// ```text
/// count = 5, breakpoints = [0, 2]  ->  [0..1, 1..3, 3..5]
/// ```
pub fn group_ranges(count: usize, breakpoints: &[usize]) -> Vec<std::ops::Range<usize>> {
    let mut ranges = Vec::with_capacity(breakpoints.len() + 1);
    let mut start = 0;
    for &bp in breakpoints {
        let end = bp + 1;
        if end > start && end <= count {
            ranges.push(start..end);
            start = end;
        }
    }
    if start < count {
        ranges.push(start..count);
    }
    ranges
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Linear-interpolated percentile of an already sorted, non-empty slice.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let last = sorted.len() - 1;
    let rank = (p.clamp(0.0, 100.0) / 100.0) * last as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

fn mean_and_std_dev(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_percentile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert!((percentile(&sorted, 0.0) - 1.0).abs() < EPS);
        assert!((percentile(&sorted, 100.0) - 4.0).abs() < EPS);
        assert!((percentile(&sorted, 50.0) - 2.5).abs() < EPS);
        // rank = 0.95 * 3 = 2.85
        assert!((percentile(&sorted, 95.0) - 3.85).abs() < EPS);
    }

    #[test]
    fn test_percentile_threshold_ignores_order() {
        let t = threshold(&[4.0, 1.0, 3.0, 2.0], BreakpointThresholdType::Percentile, 50.0);
        assert!((t.unwrap() - 2.5).abs() < EPS);
    }

    #[test]
    fn test_std_dev_is_population() {
        // mean 5, population std 2
        let d = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let t = threshold(&d, BreakpointThresholdType::StandardDeviation, 1.5).unwrap();
        assert!((t - 8.0).abs() < EPS);
    }

    #[test]
    fn test_interquartile_range() {
        // Q1 = 1.75, Q3 = 3.25, IQR = 1.5
        let d = [1.0, 2.0, 3.0, 4.0];
        let t = threshold(&d, BreakpointThresholdType::InterquartileRange, 1.0).unwrap();
        assert!((t - 4.75).abs() < EPS);
    }

    #[test]
    fn test_empty_series() {
        assert_eq!(threshold(&[], BreakpointThresholdType::Percentile, 95.0), None);
        assert!(detect_breakpoints(&[], BreakpointThresholdType::Percentile, 95.0).is_empty());
    }

    #[test]
    fn test_single_distance_never_breaks() {
        for kind in [
            BreakpointThresholdType::Percentile,
            BreakpointThresholdType::StandardDeviation,
            BreakpointThresholdType::InterquartileRange,
        ] {
            assert!(detect_breakpoints(&[0.9], kind, kind.default_amount()).is_empty());
        }
    }

    #[test]
    fn test_strictly_greater() {
        // Everything equal: nothing is above the threshold.
        let d = [0.5, 0.5, 0.5];
        assert!(detect_breakpoints(&d, BreakpointThresholdType::Percentile, 50.0).is_empty());
    }

    #[test]
    fn test_outlier_detected_by_every_type() {
        let d = [0.9, 0.01, 0.02, 0.015];
        for kind in [
            BreakpointThresholdType::Percentile,
            BreakpointThresholdType::StandardDeviation,
            BreakpointThresholdType::InterquartileRange,
        ] {
            let amount = if kind == BreakpointThresholdType::StandardDeviation {
                1.0
            } else {
                kind.default_amount()
            };
            assert_eq!(detect_breakpoints(&d, kind, amount), [0], "{kind}");
        }
    }

    #[test]
    fn test_group_ranges() {
        assert_eq!(group_ranges(5, &[0, 2]), [0..1, 1..3, 3..5]);
        assert_eq!(group_ranges(3, &[]), [0..3]);
        assert_eq!(group_ranges(3, &[2]), [0..3]);
        assert!(group_ranges(0, &[]).is_empty());
    }
}
