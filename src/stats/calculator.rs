//! Statistics Calculator Module
//! Handles the descriptive statistics behind each chart: quartiles and means.

use serde::Serialize;
use statrs::statistics::Statistics;

/// min, first quartile, median, third quartile, max.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Handles statistical calculations over a group's like counts.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute the five-number summary of a set of values.
    ///
    /// Returns `None` for an empty slice.
    pub fn five_number_summary(values: &[f64]) -> Option<FiveNumberSummary> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        Some(FiveNumberSummary {
            min: sorted[0],
            q1: Self::quantile_sorted(&sorted, 0.25)?,
            median: Self::quantile_sorted(&sorted, 0.5)?,
            q3: Self::quantile_sorted(&sorted, 0.75)?,
            max: sorted[sorted.len() - 1],
        })
    }

    /// Quantile of an ascending slice by linear interpolation between order
    /// statistics at rank `(n - 1) * p` (R type 7, NumPy "linear").
    pub fn quantile_sorted(sorted_values: &[f64], p: f64) -> Option<f64> {
        let n = sorted_values.len();
        if n == 0 || p.is_nan() {
            return None;
        }
        if n == 1 {
            return Some(sorted_values[0]);
        }

        let rank = p.clamp(0.0, 1.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            Some(sorted_values[lower])
        } else {
            Some(sorted_values[lower] + (sorted_values[upper] - sorted_values[lower]) * frac)
        }
    }

    /// Arithmetic mean rounded to two decimals, or `None` for no values.
    pub fn rounded_mean(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        Some(Self::round2(values.mean()))
    }

    /// Round half away from zero to two decimal places.
    pub fn round2(value: f64) -> f64 {
        (value * 100.0).round() / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_five_number_summary_of_three_values() {
        let summary = StatsCalculator::five_number_summary(&[30.0, 10.0, 20.0]).unwrap();
        assert_eq!(
            summary,
            FiveNumberSummary {
                min: 10.0,
                q1: 15.0,
                median: 20.0,
                q3: 25.0,
                max: 30.0,
            }
        );
    }

    #[test]
    fn test_quantiles_interpolate_between_order_statistics() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(StatsCalculator::quantile_sorted(&sorted, 0.25), Some(1.75));
        assert_eq!(StatsCalculator::quantile_sorted(&sorted, 0.5), Some(2.5));
        assert_eq!(StatsCalculator::quantile_sorted(&sorted, 0.75), Some(3.25));
        assert_eq!(StatsCalculator::quantile_sorted(&sorted, 0.0), Some(1.0));
        assert_eq!(StatsCalculator::quantile_sorted(&sorted, 1.0), Some(4.0));
        assert_eq!(StatsCalculator::quantile_sorted(&[], 0.5), None);
    }

    #[test]
    fn test_summary_is_ordered() {
        let samples: [&[f64]; 5] = [
            &[5.0],
            &[3.0, 3.0],
            &[9.0, 1.0, 4.0, 4.0, 7.0],
            &[100.0, -20.0, 0.5, 73.0, 12.0, 12.0, 61.0],
            &[2.0, 1.0, 8.0, 3.0, 5.0, 13.0, 21.0, 34.0],
        ];

        for values in samples {
            let s = StatsCalculator::five_number_summary(values).unwrap();
            assert!(s.min <= s.q1, "{values:?}");
            assert!(s.q1 <= s.median, "{values:?}");
            assert!(s.median <= s.q3, "{values:?}");
            assert!(s.q3 <= s.max, "{values:?}");
        }
    }

    #[test]
    fn test_single_value_summary_collapses() {
        let s = StatsCalculator::five_number_summary(&[42.0]).unwrap();
        assert_eq!((s.min, s.q1, s.median, s.q3, s.max), (42.0, 42.0, 42.0, 42.0, 42.0));
        assert_eq!(StatsCalculator::five_number_summary(&[]), None);
    }

    #[test]
    fn test_rounded_mean() {
        assert_eq!(StatsCalculator::rounded_mean(&[10.0, 20.0]), Some(15.0));
        assert_eq!(StatsCalculator::rounded_mean(&[1.0, 2.0, 2.0]), Some(1.67));
        assert_eq!(StatsCalculator::rounded_mean(&[7.25]), Some(7.25));
        assert_eq!(StatsCalculator::rounded_mean(&[]), None);
    }
}
