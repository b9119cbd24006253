// Snapshot-to-snapshot regression analysis
//
// Walks both snapshots in a fixed order (current first, then anything only the
// baseline knows about) so the output order never depends on map iteration.

use crate::model::{ComparisonGroup, MethodRecord, Snapshot};
use crate::regression::classify::{
    classify_temporal, compare_within_group, TemporalChange, TemporalClass, WithinGroupComparison,
};
use crate::regression::config::RegressionThresholds;
use crate::regression::verdict::{FlaggedChange, RegressionSummary};
use serde::Serialize;
use std::collections::HashSet;

/// Analysis of one method in one comparison group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionResult {
    pub class_name: String,
    pub group_id: String,
    pub method_name: String,
    /// Current label when the method exists in the current run, else the baseline's
    pub label: String,
    pub baseline_mean: Option<f64>,
    pub current_mean: Option<f64>,
    pub temporal: TemporalChange,
    pub within_group: WithinGroupComparison,
}

/// Analysis of one comparison group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupAnalysis {
    pub class_name: String,
    pub group_id: String,
    pub in_current: bool,
    pub in_baseline: bool,
    /// One entry per merged method name, in merge order
    pub results: Vec<RegressionResult>,
}

impl GroupAnalysis {
    pub fn result(&self, method_name: &str) -> Option<&RegressionResult> {
        self.results.iter().find(|r| r.method_name == method_name)
    }
}

/// Full comparison of a current snapshot against a baseline snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionAnalysis {
    pub groups: Vec<GroupAnalysis>,
    pub thresholds: RegressionThresholds,
}

impl RegressionAnalysis {
    pub fn group(&self, class_name: &str, group_id: &str) -> Option<&GroupAnalysis> {
        self.groups
            .iter()
            .find(|g| g.class_name == class_name && g.group_id == group_id)
    }

    pub fn result(
        &self,
        class_name: &str,
        group_id: &str,
        method_name: &str,
    ) -> Option<&RegressionResult> {
        self.group(class_name, group_id)?.result(method_name)
    }

    /// Every result in traversal order
    pub fn results(&self) -> impl Iterator<Item = &RegressionResult> {
        self.groups.iter().flat_map(|g| g.results.iter())
    }

    /// Improved or regressed methods across all classes and groups, in traversal order
    pub fn flagged_changes(&self) -> Vec<FlaggedChange> {
        self.results()
            .filter_map(|r| match (r.temporal.class, r.temporal.delta_percent) {
                (TemporalClass::Improved | TemporalClass::Regressed, Some(pct)) => {
                    Some(FlaggedChange {
                        label: r.label.clone(),
                        delta_percent: pct,
                        class: r.temporal.class,
                    })
                }
                _ => None,
            })
            .collect()
    }

    /// Pass/fail summary for the whole run
    pub fn summary(&self) -> RegressionSummary {
        RegressionSummary::from_changes(self.flagged_changes(), self.thresholds.temporal_percent)
    }
}

/// Union of method names: current order first, then baseline-only names
///
/// # Example
/// ```
/// use benchlens::model::{ComparisonGroup, Measurement, MethodRecord};
/// use benchlens::regression::merged_method_names;
///
/// let current = ComparisonGroup::new("g", "G")
///     .with_method(MethodRecord::new("A", "A", Measurement::absent()))
///     .with_method(MethodRecord::new("B", "B", Measurement::absent()));
/// let baseline = ComparisonGroup::new("g", "G")
///     .with_method(MethodRecord::new("C", "C", Measurement::absent()))
///     .with_method(MethodRecord::new("A", "A", Measurement::absent()));
///
/// assert_eq!(merged_method_names(Some(&current), Some(&baseline)), vec!["A", "B", "C"]);
/// ```
pub fn merged_method_names(
    current: Option<&ComparisonGroup>,
    baseline: Option<&ComparisonGroup>,
) -> Vec<String> {
    let mut seen = HashSet::new();
    current
        .into_iter()
        .chain(baseline)
        .flat_map(|g| g.methods.iter())
        .filter(|&m| seen.insert(m.name.as_str()))
        .map(|m| m.name.clone())
        .collect()
}

fn display_label(
    name: &str,
    current: Option<&MethodRecord>,
    baseline: Option<&MethodRecord>,
) -> String {
    current
        .or(baseline)
        .map(|m| m.display_label().to_string())
        .unwrap_or_else(|| name.to_string())
}

/// Analyze one comparison group
///
/// The in-group reference is the first method flagged `is_baseline` in the
/// current group. With no current group every within-group result is
/// unknown; with no baseline group every temporal result is.
pub fn analyze_group(
    class_name: &str,
    current: Option<&ComparisonGroup>,
    baseline: Option<&ComparisonGroup>,
    thresholds: &RegressionThresholds,
) -> GroupAnalysis {
    let group_id = current
        .or(baseline)
        .map(|g| g.id.clone())
        .unwrap_or_default();

    let reference = current.and_then(ComparisonGroup::flagged_baseline);
    let reference_mean = reference.and_then(|m| m.measurement.mean_us);

    let results = merged_method_names(current, baseline)
        .into_iter()
        .map(|name| {
            let current_method = current.and_then(|g| g.method(&name));
            let baseline_method = baseline.and_then(|g| g.method(&name));
            let current_mean = current_method.and_then(|m| m.measurement.mean_us);
            let baseline_mean = baseline_method.and_then(|m| m.measurement.mean_us);
            let is_reference = reference.is_some_and(|r| r.name == name);

            RegressionResult {
                class_name: class_name.to_string(),
                group_id: group_id.clone(),
                label: display_label(&name, current_method, baseline_method),
                baseline_mean,
                current_mean,
                temporal: classify_temporal(baseline_mean, current_mean, thresholds),
                within_group: compare_within_group(
                    current_mean,
                    reference_mean,
                    is_reference,
                    thresholds,
                ),
                method_name: name,
            }
        })
        .collect();

    GroupAnalysis {
        class_name: class_name.to_string(),
        group_id,
        in_current: current.is_some(),
        in_baseline: baseline.is_some(),
        results,
    }
}

/// Compare a current snapshot against a historical baseline snapshot
///
/// Covers every (class, group, method) present in either snapshot. Neither
/// snapshot is modified.
pub fn analyze(
    baseline: &Snapshot,
    current: &Snapshot,
    thresholds: &RegressionThresholds,
) -> RegressionAnalysis {
    let mut groups = Vec::new();

    for current_class in current.classes() {
        let class_name = current_class.class_name();
        let baseline_class = baseline.class(class_name);
        if baseline_class.is_none() {
            tracing::debug!(class = class_name, "class missing from baseline snapshot");
        }

        for current_group in &current_class.groups {
            let baseline_group = baseline_class.and_then(|c| c.group(&current_group.id));
            groups.push(analyze_group(
                class_name,
                Some(current_group),
                baseline_group,
                thresholds,
            ));
        }

        if let Some(baseline_class) = baseline_class {
            for baseline_group in &baseline_class.groups {
                if current_class.group(&baseline_group.id).is_none() {
                    groups.push(analyze_group(
                        class_name,
                        None,
                        Some(baseline_group),
                        thresholds,
                    ));
                }
            }
        }
    }

    for baseline_class in baseline.classes() {
        if current.class(baseline_class.class_name()).is_some() {
            continue;
        }
        tracing::debug!(
            class = baseline_class.class_name(),
            "class only present in baseline snapshot"
        );
        for baseline_group in &baseline_class.groups {
            groups.push(analyze_group(
                baseline_class.class_name(),
                None,
                Some(baseline_group),
                thresholds,
            ));
        }
    }

    RegressionAnalysis {
        groups,
        thresholds: *thresholds,
    }
}
