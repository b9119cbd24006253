// Fixed-threshold classification of a single method
//
// Temporal: current run vs. the stored baseline run of the same method.
// Within-group: current run vs. the group's reference method in the same run.

use crate::regression::config::RegressionThresholds;
use crate::units::ABSENT;
use serde::Serialize;

/// Change of one method between the baseline run and the current run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemporalClass {
    Improved,
    Regressed,
    Neutral,
    Unknown,
}

/// Position of one method relative to its group's reference method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WithinGroupClass {
    /// The method is the group's reference
    Baseline,
    Neutral,
    Faster,
    Slower,
    Unknown,
}

impl TemporalClass {
    pub fn as_str(self) -> &'static str {
        match self {
            TemporalClass::Improved => "improved",
            TemporalClass::Regressed => "regressed",
            TemporalClass::Neutral => "neutral",
            TemporalClass::Unknown => "unknown",
        }
    }
}

impl WithinGroupClass {
    pub fn as_str(self) -> &'static str {
        match self {
            WithinGroupClass::Baseline => "baseline",
            WithinGroupClass::Neutral => "neutral",
            WithinGroupClass::Faster => "faster",
            WithinGroupClass::Slower => "slower",
            WithinGroupClass::Unknown => "unknown",
        }
    }
}

/// Temporal delta with its classification
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemporalChange {
    /// `current - baseline` in microseconds
    pub delta_us: Option<f64>,
    /// `100 * delta / baseline`; absent when the baseline mean is zero
    pub delta_percent: Option<f64>,
    pub class: TemporalClass,
}

/// Ratio against the group reference with its classification
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WithinGroupComparison {
    /// `current / reference`
    pub ratio: Option<f64>,
    pub class: WithinGroupClass,
}

impl WithinGroupComparison {
    /// Display text: `"baseline"`, `"1.00x"`, `"1.03x slower"`, `"2.10x faster"`
    pub fn display(&self) -> String {
        match (self.class, self.ratio) {
            (WithinGroupClass::Baseline, _) => "baseline".to_string(),
            (WithinGroupClass::Neutral, _) => "1.00x".to_string(),
            (WithinGroupClass::Faster, Some(ratio)) if ratio > 0.0 => {
                format!("{:.2}x faster", 1.0 / ratio)
            }
            (WithinGroupClass::Slower, Some(ratio)) => format!("{:.2}x slower", ratio),
            _ => ABSENT.to_string(),
        }
    }
}

/// Classify the change between a baseline mean and a current mean
///
/// `Unknown` when either mean is absent. A zero baseline mean has no
/// percentage and counts as `Neutral`. Otherwise strictly beyond
/// `±temporal_percent` is improved/regressed.
///
/// # Example
/// ```
/// use benchlens::regression::{classify_temporal, RegressionThresholds, TemporalClass};
///
/// let change = classify_temporal(Some(100.0), Some(106.0), &RegressionThresholds::default());
/// assert_eq!(change.class, TemporalClass::Regressed);
/// ```
pub fn classify_temporal(
    baseline_mean: Option<f64>,
    current_mean: Option<f64>,
    thresholds: &RegressionThresholds,
) -> TemporalChange {
    let delta_us = match (baseline_mean, current_mean) {
        (Some(baseline), Some(current)) => Some(current - baseline),
        _ => None,
    };
    let delta_percent = match (delta_us, baseline_mean) {
        (Some(delta), Some(baseline)) if baseline != 0.0 => Some(100.0 * delta / baseline),
        _ => None,
    };

    let class = match (delta_us, delta_percent) {
        (None, _) => TemporalClass::Unknown,
        (Some(_), Some(pct)) if pct < -thresholds.temporal_percent => TemporalClass::Improved,
        (Some(_), Some(pct)) if pct > thresholds.temporal_percent => TemporalClass::Regressed,
        (Some(_), _) => TemporalClass::Neutral,
    };

    TemporalChange {
        delta_us,
        delta_percent,
        class,
    }
}

/// Compare a method's current mean with its group reference's current mean
///
/// The reference method itself is always `Baseline`, whatever its numbers.
/// A zero mean on either side has no meaningful ratio and is `Unknown`.
pub fn compare_within_group(
    current_mean: Option<f64>,
    reference_mean: Option<f64>,
    is_reference: bool,
    thresholds: &RegressionThresholds,
) -> WithinGroupComparison {
    if is_reference {
        return WithinGroupComparison {
            ratio: None,
            class: WithinGroupClass::Baseline,
        };
    }

    let ratio = match (current_mean, reference_mean) {
        (Some(current), Some(reference)) if reference != 0.0 && current != 0.0 => {
            Some(current / reference)
        }
        _ => None,
    };

    let class = match ratio {
        None => WithinGroupClass::Unknown,
        Some(r) if (r - 1.0).abs() < thresholds.within_group_band => WithinGroupClass::Neutral,
        Some(r) if r < 1.0 => WithinGroupClass::Faster,
        Some(_) => WithinGroupClass::Slower,
    };

    WithinGroupComparison { ratio, class }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t() -> RegressionThresholds {
        RegressionThresholds::default()
    }

    #[test]
    fn test_temporal_thresholds() {
        assert_eq!(
            classify_temporal(Some(100.0), Some(106.0), &t()).class,
            TemporalClass::Regressed
        );
        assert_eq!(
            classify_temporal(Some(100.0), Some(94.0), &t()).class,
            TemporalClass::Improved
        );
        assert_eq!(
            classify_temporal(Some(100.0), Some(102.0), &t()).class,
            TemporalClass::Neutral
        );
    }

    #[test]
    fn test_temporal_exact_threshold_is_neutral() {
        let change = classify_temporal(Some(200.0), Some(210.0), &t());
        assert_eq!(change.delta_percent, Some(5.0));
        assert_eq!(change.class, TemporalClass::Neutral);
    }

    #[test]
    fn test_temporal_delta_values() {
        let change = classify_temporal(Some(100.0), Some(94.0), &t());
        assert_eq!(change.delta_us, Some(-6.0));
        assert_eq!(change.delta_percent, Some(-6.0));
    }

    #[test]
    fn test_temporal_absent_is_unknown() {
        let change = classify_temporal(None, Some(10.0), &t());
        assert_eq!(change.class, TemporalClass::Unknown);
        assert!(change.delta_us.is_none());
        assert!(change.delta_percent.is_none());

        assert_eq!(
            classify_temporal(Some(10.0), None, &t()).class,
            TemporalClass::Unknown
        );
    }

    #[test]
    fn test_temporal_zero_baseline() {
        let change = classify_temporal(Some(0.0), Some(3.0), &t());
        assert_eq!(change.delta_us, Some(3.0));
        assert!(change.delta_percent.is_none());
        assert_eq!(change.class, TemporalClass::Neutral);
    }

    #[test]
    fn test_temporal_zero_mean_against_itself() {
        // "0.4 ns" rounds to 0.000 µs
        let mean = crate::units::parse_time("0.4 ns");
        assert_eq!(mean, Some(0.0));

        let change = classify_temporal(mean, mean, &t());
        assert_eq!(change.delta_us, Some(0.0));
        assert!(change.delta_percent.is_none());
        assert_eq!(change.class, TemporalClass::Neutral);
    }

    #[test]
    fn test_within_group_neutral_band() {
        let cmp = compare_within_group(Some(100.5), Some(100.0), false, &t());
        assert_eq!(cmp.class, WithinGroupClass::Neutral);
        assert_eq!(cmp.display(), "1.00x");
    }

    #[test]
    fn test_within_group_slower() {
        let cmp = compare_within_group(Some(103.0), Some(100.0), false, &t());
        assert_eq!(cmp.class, WithinGroupClass::Slower);
        assert_eq!(cmp.display(), "1.03x slower");
    }

    #[test]
    fn test_within_group_faster_shows_inverse() {
        let cmp = compare_within_group(Some(50.0), Some(100.0), false, &t());
        assert_eq!(cmp.class, WithinGroupClass::Faster);
        assert_eq!(cmp.ratio, Some(0.5));
        assert_eq!(cmp.display(), "2.00x faster");
    }

    #[test]
    fn test_within_group_reference_is_baseline() {
        let cmp = compare_within_group(Some(140.0), Some(100.0), true, &t());
        assert_eq!(cmp.class, WithinGroupClass::Baseline);
        assert_eq!(cmp.display(), "baseline");
    }

    #[test]
    fn test_within_group_zero_current_mean() {
        let tiny = crate::units::parse_time("0.3 ns");
        let cmp = compare_within_group(tiny, Some(100.0), false, &t());
        assert_eq!(cmp.class, WithinGroupClass::Unknown);
        assert!(cmp.ratio.is_none());
        assert_eq!(cmp.display(), "—");
        assert!(!cmp.display().contains("inf"));
    }

    #[test]
    fn test_faster_display_never_divides_by_zero() {
        let cmp = WithinGroupComparison {
            ratio: Some(0.0),
            class: WithinGroupClass::Faster,
        };
        assert_eq!(cmp.display(), "—");
    }

    #[test]
    fn test_within_group_unknown_cases() {
        for (current, reference) in [
            (None, Some(1.0)),
            (Some(1.0), None),
            (Some(1.0), Some(0.0)),
            (Some(0.0), Some(1.0)),
        ] {
            let cmp = compare_within_group(current, reference, false, &t());
            assert_eq!(cmp.class, WithinGroupClass::Unknown);
            assert_eq!(cmp.display(), "—");
        }
    }

    #[test]
    fn test_class_names() {
        assert_eq!(TemporalClass::Regressed.as_str(), "regressed");
        assert_eq!(WithinGroupClass::Baseline.as_str(), "baseline");
        assert_eq!(
            serde_json::to_value(WithinGroupClass::Faster).unwrap(),
            "faster"
        );
    }
}
