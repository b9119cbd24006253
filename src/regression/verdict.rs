// Run-level regression verdict
//
// Collapses every flagged method into one pass/fail answer plus the list of
// improvements, for the report banner and the CLI exit summary.

use crate::regression::classify::TemporalClass;
use serde::Serialize;

/// One method that moved beyond the temporal threshold
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlaggedChange {
    pub label: String,
    pub delta_percent: f64,
    pub class: TemporalClass,
}

impl FlaggedChange {
    /// `"Label (+6.0%)"`
    pub fn display(&self) -> String {
        format!("{} ({:+.1}%)", self.label, self.delta_percent)
    }
}

/// Final verdict for a baseline-vs-current comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RegressionVerdict {
    /// Every method stayed within the temporal threshold or got faster
    NoRegression,

    /// At least one method got slower beyond the threshold
    Regression { count: usize },
}

/// Regressions and improvements across the whole run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionSummary {
    pub regressions: Vec<FlaggedChange>,
    pub improvements: Vec<FlaggedChange>,
    pub threshold_percent: f64,
}

impl RegressionSummary {
    /// Split flagged changes, keeping their traversal order
    pub fn from_changes(changes: Vec<FlaggedChange>, threshold_percent: f64) -> Self {
        let (regressions, improvements) = changes
            .into_iter()
            .partition(|c| c.class == TemporalClass::Regressed);
        Self {
            regressions,
            improvements,
            threshold_percent,
        }
    }

    pub fn verdict(&self) -> RegressionVerdict {
        if self.regressions.is_empty() {
            RegressionVerdict::NoRegression
        } else {
            RegressionVerdict::Regression {
                count: self.regressions.len(),
            }
        }
    }

    pub fn has_regressions(&self) -> bool {
        !self.regressions.is_empty()
    }

    fn joined(changes: &[FlaggedChange]) -> String {
        changes
            .iter()
            .map(FlaggedChange::display)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Headline for the regression side of the summary
    pub fn regression_line(&self) -> String {
        match self.verdict() {
            RegressionVerdict::NoRegression => format!(
                "No regressions detected — all methods within {}% of baseline",
                self.threshold_percent
            ),
            RegressionVerdict::Regression { count } => format!(
                "{} regression(s) detected (>{}% slower): {}",
                count,
                self.threshold_percent,
                Self::joined(&self.regressions)
            ),
        }
    }

    /// Headline for improvements, if there are any
    pub fn improvement_line(&self) -> Option<String> {
        if self.improvements.is_empty() {
            return None;
        }
        Some(format!(
            "{} improvement(s): {}",
            self.improvements.len(),
            Self::joined(&self.improvements)
        ))
    }

    /// Generate human-readable report
    pub fn to_report_string(&self) -> String {
        let mut report = String::new();

        match self.verdict() {
            RegressionVerdict::NoRegression => report.push_str("✅ "),
            RegressionVerdict::Regression { .. } => report.push_str("❌ "),
        }
        report.push_str(&self.regression_line());
        report.push('\n');

        if let Some(line) = self.improvement_line() {
            report.push_str("🚀 ");
            report.push_str(&line);
            report.push('\n');
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(label: &str, pct: f64) -> FlaggedChange {
        FlaggedChange {
            label: label.to_string(),
            delta_percent: pct,
            class: if pct > 0.0 {
                TemporalClass::Regressed
            } else {
                TemporalClass::Improved
            },
        }
    }

    #[test]
    fn test_summary_partitions_in_order() {
        let summary = RegressionSummary::from_changes(
            vec![change("A", 6.0), change("B", -7.5), change("C", 12.0)],
            5.0,
        );
        assert_eq!(summary.verdict(), RegressionVerdict::Regression { count: 2 });
        let labels: Vec<_> = summary.regressions.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "C"]);
        assert_eq!(summary.improvements.len(), 1);
    }

    #[test]
    fn test_report_string_no_regression() {
        let summary = RegressionSummary::from_changes(vec![], 5.0);
        assert_eq!(summary.verdict(), RegressionVerdict::NoRegression);
        let report = summary.to_report_string();
        assert!(report.contains("No regressions detected"));
        assert!(report.contains("within 5% of baseline"));
        assert!(!report.contains("improvement"));
    }

    #[test]
    fn test_report_string_regression() {
        let summary =
            RegressionSummary::from_changes(vec![change("Trait foreach", 6.0), change("Span", -6.0)], 5.0);
        let report = summary.to_report_string();
        assert!(report.contains("1 regression(s) detected (>5% slower): Trait foreach (+6.0%)"));
        assert!(report.contains("1 improvement(s): Span (-6.0%)"));
    }
}
