// Regression analysis between two benchmark snapshots
//
// Answers two questions per method:
// - temporal: did it get faster or slower since the stored baseline run?
// - within-group: how does it compare with its group's reference method in
//   the current run?
//
// Both use fixed thresholds (RegressionThresholds). Reported error and
// standard deviation are not consulted.

mod analyzer;
mod classify;
mod config;
mod verdict;

pub use analyzer::{
    analyze, analyze_group, merged_method_names, GroupAnalysis, RegressionAnalysis,
    RegressionResult,
};
pub use classify::{
    classify_temporal, compare_within_group, TemporalChange, TemporalClass, WithinGroupClass,
    WithinGroupComparison,
};
pub use config::RegressionThresholds;
pub use verdict::{FlaggedChange, RegressionSummary, RegressionVerdict};
