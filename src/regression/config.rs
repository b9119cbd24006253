// Thresholds for regression classification
//
// Two fixed policies answer two different questions and are kept apart:
// - temporal: did this method get slower or faster since the baseline run?
// - within-group: is this method practically identical to its group's reference?
//
// Neither looks at error or standard deviation. A third, narrower band only
// decides which delta cells get highlighted in rendered reports.

use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};

/// Classification thresholds
///
/// # Example
/// ```
/// use benchlens::regression::RegressionThresholds;
///
/// let thresholds = RegressionThresholds::default();
/// assert_eq!(thresholds.temporal_percent, 5.0);
/// assert_eq!(thresholds.within_group_band, 0.015);
/// assert_eq!(thresholds.delta_highlight_percent, 1.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegressionThresholds {
    /// Percent change against the baseline run beyond which a method is
    /// `improved` or `regressed`
    ///
    /// Default: 5.0 (strictly greater than ±5%)
    pub temporal_percent: f64,

    /// Relative band around a ratio of 1.0 inside which a method counts as
    /// identical to its group's reference implementation
    ///
    /// Default: 0.015 (|ratio - 1| < 1.5%)
    pub within_group_band: f64,

    /// Percent change beyond which a rendered delta cell is coloured
    ///
    /// Display only, never used for classification. Default: 1.5
    pub delta_highlight_percent: f64,
}

impl Default for RegressionThresholds {
    fn default() -> Self {
        Self {
            temporal_percent: 5.0,
            within_group_band: 0.015,
            delta_highlight_percent: 1.5,
        }
    }
}

impl RegressionThresholds {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.temporal_percent.is_finite() || self.temporal_percent < 0.0 {
            return Err(ReportError::Config(format!(
                "temporal_percent must be a non-negative number, got {}",
                self.temporal_percent
            )));
        }

        if !self.within_group_band.is_finite() || !(0.0..1.0).contains(&self.within_group_band) {
            return Err(ReportError::Config(format!(
                "within_group_band must be in [0, 1), got {}",
                self.within_group_band
            )));
        }

        if !self.delta_highlight_percent.is_finite() || self.delta_highlight_percent < 0.0 {
            return Err(ReportError::Config(format!(
                "delta_highlight_percent must be a non-negative number, got {}",
                self.delta_highlight_percent
            )));
        }

        Ok(())
    }
}
