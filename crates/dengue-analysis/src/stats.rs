//! Descriptive statistics and color-scale math shared by the views.
//!
//! Quantiles use linear interpolation at `q * (n - 1)`, the same
//! estimator the published report's percentile figures were computed
//! with, so the stats box and scale bounds reproduce those numbers.

use serde::Serialize;

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (ddof = 1); `None` below two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}

/// Interpolated quantile over an ascending-sorted slice.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let q = q.clamp(0.0, 1.0);
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        return Some(sorted[lower]);
    }
    let fraction = position - lower as f64;
    Some(sorted[lower] + fraction * (sorted[upper] - sorted[lower]))
}

pub fn median(sorted: &[f64]) -> Option<f64> {
    quantile(sorted, 0.5)
}

/// `n` evenly spaced values from `min` to `max` inclusive.
pub fn linspace(min: f64, max: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let step = (max - min) / (n - 1) as f64;
            (0..n).map(|i| min + step * i as f64).collect()
        }
    }
}

/// Format a non-negative number with grouped thousands and a fixed
/// number of decimals (`12345.678` → `12,345.68`).
pub fn format_grouped(value: f64, decimals: usize) -> String {
    let formatted = format!("{value:.decimals$}");
    let (integer, fraction) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };
    let (sign, digits) = match integer.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer),
    };
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    match fraction {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Tick-label style for a [`ColorScale`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LabelStyle {
    /// Whole numbers only (state map, calendar).
    Whole,
    /// One decimal for marks under 10 (municipal map, where rates for
    /// small municipalities cluster near zero).
    FineUnderTen,
}

/// A color-bar scale capped at the 95th percentile.
///
/// The cap mitigates outliers: a single extreme municipality would
/// otherwise flatten the rest of the map into the lowest color band.
#[derive(Debug, Clone, Serialize)]
pub struct ColorScale {
    /// Data minimum.
    pub min: f64,
    /// 95th percentile of the data.
    pub max: f64,
    /// Tick positions, `min..=max` inclusive.
    pub marks: Vec<f64>,
    /// Tick labels; the last one carries the `≥` prefix.
    pub labels: Vec<String>,
}

impl ColorScale {
    /// Scale with whole-number tick labels.
    pub fn build(values: &[f64], intervals: usize) -> Self {
        Self::build_with(values, intervals, LabelStyle::Whole)
    }

    /// Scale formatting small marks with one decimal.
    pub fn build_fine(values: &[f64], intervals: usize) -> Self {
        Self::build_with(values, intervals, LabelStyle::FineUnderTen)
    }

    fn build_with(values: &[f64], intervals: usize, style: LabelStyle) -> Self {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        sorted.sort_by(f64::total_cmp);

        let min = sorted.first().copied().unwrap_or(0.0);
        let max = quantile(&sorted, 0.95).unwrap_or(min);
        let marks = linspace(min, max, intervals);
        let mut labels: Vec<String> = marks
            .iter()
            .map(|mark| match style {
                LabelStyle::FineUnderTen if *mark < 10.0 => format_grouped(*mark, 1),
                _ => format_grouped(*mark, 0),
            })
            .collect();
        if let Some(last) = labels.last_mut() {
            *last = format!("≥{}", format_grouped(max, 0));
        }
        Self {
            min,
            max,
            marks,
            labels,
        }
    }

    /// Normalized position of `value` on the scale, clamped to `0..=1`.
    /// A collapsed scale (min == max) maps everything to the midpoint.
    pub fn position(&self, value: f64) -> f64 {
        if self.max > self.min {
            ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
        } else {
            0.5
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn quantiles_interpolate_linearly() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&sorted, 0.0), Some(1.0));
        assert_eq!(quantile(&sorted, 1.0), Some(4.0));
        assert_eq!(quantile(&sorted, 0.5), Some(2.5));
        assert_eq!(quantile(&sorted, 0.25), Some(1.75));
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn std_uses_sample_variance() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        // population variance 4.0; sample variance 32/7
        let std = sample_std(&values).unwrap();
        assert!((std - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
        assert_eq!(sample_std(&[1.0]), None);
    }

    #[test]
    fn linspace_is_inclusive() {
        let marks = linspace(0.0, 10.0, 11);
        assert_eq!(marks.len(), 11);
        assert_eq!(marks[0], 0.0);
        assert_eq!(marks[10], 10.0);
        assert!((marks[5] - 5.0).abs() < 1e-12);
    }

    #[test]
    fn grouped_formatting() {
        assert_eq!(format_grouped(0.0, 0), "0");
        assert_eq!(format_grouped(999.0, 0), "999");
        assert_eq!(format_grouped(1234.0, 0), "1,234");
        assert_eq!(format_grouped(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_grouped(42.0, 1), "42.0");
    }

    #[test]
    fn scale_caps_at_p95_and_marks_last_label() {
        let values: Vec<f64> = (1..=100).map(f64::from).collect();
        let scale = ColorScale::build(&values, 11);
        assert_eq!(scale.min, 1.0);
        assert!((scale.max - 95.05).abs() < 1e-9);
        assert_eq!(scale.marks.len(), 11);
        assert_eq!(scale.labels.len(), 11);
        assert!(scale.labels.last().unwrap().starts_with('≥'));
    }

    #[test]
    fn fine_scale_formats_small_marks_with_a_decimal() {
        let values = [0.5, 1.0, 2.0, 3.0, 50.0, 60.0, 70.0];
        let scale = ColorScale::build_fine(&values, 13);
        assert!(scale.labels[0].contains('.'));
        assert!(scale.labels.last().unwrap().starts_with('≥'));
    }

    #[test]
    fn degenerate_inputs_collapse_cleanly() {
        let empty = ColorScale::build(&[], 9);
        assert_eq!(empty.min, 0.0);
        assert_eq!(empty.max, 0.0);
        assert!(empty.marks.iter().all(|m| m.is_finite()));
        assert_eq!(empty.position(3.0), 0.5);

        let single = ColorScale::build(&[7.0], 9);
        assert_eq!(single.min, 7.0);
        assert_eq!(single.max, 7.0);
        assert_eq!(single.marks.len(), 9);
    }

    proptest! {
        #[test]
        fn scale_marks_are_always_finite_and_ordered(
            values in proptest::collection::vec(0.0f64..1e6, 0..200),
            intervals in 2usize..20,
        ) {
            let scale = ColorScale::build(&values, intervals);
            prop_assert_eq!(scale.marks.len(), intervals);
            prop_assert!(scale.marks.iter().all(|m| m.is_finite()));
            for pair in scale.marks.windows(2) {
                prop_assert!(pair[1] >= pair[0] - 1e-9);
            }
        }

        #[test]
        fn position_is_clamped(value in -1e7f64..1e7) {
            let scale = ColorScale::build(&[1.0, 2.0, 3.0, 4.0, 5.0], 5);
            let p = scale.position(value);
            prop_assert!((0.0..=1.0).contains(&p));
        }
    }
}
