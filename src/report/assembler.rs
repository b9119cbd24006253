//! Report data assembly
//!
//! Joins a current snapshot, an optional baseline snapshot and the configured
//! root-cause annotations into one render-ready [`Report`]. All numbers come
//! from the snapshots or the regression analyzer; nothing is computed here.

use crate::config::RootCauses;
use crate::environment::Environment;
use crate::error::{ReportError, Result};
use crate::model::{ClassInfo, ComparisonGroup, Measurement, Snapshot};
use crate::regression::{
    analyze, analyze_group, RegressionResult, RegressionSummary, RegressionThresholds,
    WithinGroupComparison,
};
use serde::Serialize;
use std::path::Path;

/// Which report is being produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    /// Point-in-time results of one snapshot
    Public,
    /// Current snapshot against the stored baseline
    Regression,
}

/// One method row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodRow {
    pub name: String,
    pub label: String,
    pub code_snippet: String,
    /// Flagged as the group reference in the current snapshot
    pub is_baseline: bool,
    /// False for methods only known from the baseline snapshot
    pub in_current: bool,
    /// Current measurement, all-absent when the method is baseline-only
    pub measurement: Measurement,
    pub baseline_measurement: Option<Measurement>,
    pub within_group: WithinGroupComparison,
    /// Present whenever a baseline snapshot was supplied
    pub regression: Option<RegressionResult>,
    /// Rendered as an extra row beneath this one
    pub root_cause: Option<String>,
}

/// One comparison group section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupReport {
    pub id: String,
    pub name: String,
    pub description: String,
    pub baseline_name: String,
    /// The baseline snapshot has a group with this id
    pub has_baseline_data: bool,
    pub methods: Vec<MethodRow>,
}

/// One benchmark class section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassReport {
    pub info: ClassInfo,
    pub groups: Vec<GroupReport>,
}

/// Fully joined report, ready for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub kind: ReportKind,
    pub timestamp: String,
    pub baseline_timestamp: Option<String>,
    pub environment: Environment,
    pub classes: Vec<ClassReport>,
    /// Run-level verdict, present whenever a baseline snapshot was supplied
    pub summary: Option<RegressionSummary>,
    pub thresholds: RegressionThresholds,
}

impl Report {
    pub fn has_baseline(&self) -> bool {
        self.baseline_timestamp.is_some()
    }

    pub fn method_count(&self) -> usize {
        self.classes
            .iter()
            .flat_map(|c| &c.groups)
            .map(|g| g.methods.len())
            .sum()
    }
}

fn assemble_group(
    class_name: &str,
    group: &ComparisonGroup,
    baseline_group: Option<&ComparisonGroup>,
    with_baseline: bool,
    causes: &RootCauses,
    thresholds: &RegressionThresholds,
) -> GroupReport {
    let analysis = analyze_group(class_name, Some(group), baseline_group, thresholds);

    let methods = analysis
        .results
        .into_iter()
        .map(|result| {
            let current = group.method(&result.method_name);
            let previous = baseline_group.and_then(|g| g.method(&result.method_name));
            let code_snippet = current
                .or(previous)
                .map(|m| m.code_snippet.clone())
                .unwrap_or_default();

            MethodRow {
                name: result.method_name.clone(),
                label: result.label.clone(),
                code_snippet,
                is_baseline: current.is_some_and(|m| m.is_baseline),
                in_current: current.is_some(),
                measurement: current.map(|m| m.measurement.clone()).unwrap_or_default(),
                baseline_measurement: previous.map(|m| m.measurement.clone()),
                within_group: result.within_group,
                root_cause: causes.get(&result.method_name).map(str::to_string),
                regression: with_baseline.then_some(result),
            }
        })
        .collect();

    GroupReport {
        id: group.id.clone(),
        name: group.name.clone(),
        description: group.description.clone(),
        baseline_name: group.baseline_name.clone(),
        has_baseline_data: baseline_group.is_some(),
        methods,
    }
}

/// Join snapshots and annotations into a report
///
/// Without a baseline snapshot this is a public report: method order is the
/// current snapshot's and only within-group comparisons are filled in. With a
/// baseline each group lists the merged method set and every row carries its
/// regression result.
pub fn assemble(
    current: &Snapshot,
    baseline: Option<&Snapshot>,
    causes: &RootCauses,
    thresholds: &RegressionThresholds,
) -> Report {
    let classes = current
        .classes()
        .iter()
        .map(|class| {
            let baseline_class = baseline.and_then(|b| b.class(class.class_name()));
            ClassReport {
                info: class.info.clone(),
                groups: class
                    .groups
                    .iter()
                    .map(|group| {
                        assemble_group(
                            class.class_name(),
                            group,
                            baseline_class.and_then(|c| c.group(&group.id)),
                            baseline.is_some(),
                            causes,
                            thresholds,
                        )
                    })
                    .collect(),
            }
        })
        .collect();

    Report {
        kind: if baseline.is_some() {
            ReportKind::Regression
        } else {
            ReportKind::Public
        },
        timestamp: current.timestamp.clone(),
        baseline_timestamp: baseline.map(|b| b.timestamp.clone()),
        environment: current.environment.clone(),
        classes,
        summary: baseline.map(|b| analyze(b, current, thresholds).summary()),
        thresholds: *thresholds,
    }
}

/// Assemble the baseline-vs-current report
///
/// Missing current data is an error. A missing baseline is not: the report
/// is produced from current data alone and flagged as baseline-less.
pub fn assemble_regression(
    current: Option<&Snapshot>,
    baseline: Option<&Snapshot>,
    causes: &RootCauses,
    thresholds: &RegressionThresholds,
    current_dir: &Path,
) -> Result<Report> {
    let current = current.ok_or_else(|| ReportError::MissingCurrentData(current_dir.to_path_buf()))?;
    if baseline.is_none() {
        tracing::warn!("no baseline snapshot, regression report shows current results only");
    }

    let mut report = assemble(current, baseline, causes, thresholds);
    report.kind = ReportKind::Regression;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BenchmarkClass, MethodRecord};
    use crate::regression::{TemporalClass, WithinGroupClass};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn snapshot(ts: &str, methods: Vec<MethodRecord>) -> Snapshot {
        let group = methods
            .into_iter()
            .fold(ComparisonGroup::new("g", "Group"), |g, m| g.with_method(m));
        Snapshot::new(ts, Environment::default())
            .with_class(BenchmarkClass::new("Sum1D").with_group(group))
    }

    fn m(name: &str, mean: f64) -> MethodRecord {
        MethodRecord::new(name, name, Measurement::with_mean(mean))
    }

    fn causes() -> RootCauses {
        let mut map = HashMap::new();
        map.insert("B".to_string(), "Bounds check per element".to_string());
        map.insert("A".to_string(), String::new());
        RootCauses::new(map)
    }

    #[test]
    fn test_public_report_has_no_regression_data() {
        let current = snapshot("t1", vec![m("A", 100.0).baseline(), m("B", 103.0)]);
        let report = assemble(&current, None, &RootCauses::default(), &RegressionThresholds::default());

        assert_eq!(report.kind, ReportKind::Public);
        assert!(!report.has_baseline());
        assert!(report.summary.is_none());
        let rows = &report.classes[0].groups[0].methods;
        assert!(rows.iter().all(|r| r.regression.is_none()));
        assert_eq!(rows[0].within_group.class, WithinGroupClass::Baseline);
        assert_eq!(rows[1].within_group.display(), "1.03x slower");
    }

    #[test]
    fn test_regression_report_joins_results_and_root_causes() {
        let baseline = snapshot("t0", vec![m("A", 100.0).baseline(), m("B", 100.0), m("C", 50.0)]);
        let current = snapshot("t1", vec![m("A", 100.0).baseline(), m("B", 106.0)]);
        let report = assemble(&current, Some(&baseline), &causes(), &RegressionThresholds::default());

        assert_eq!(report.kind, ReportKind::Regression);
        assert_eq!(report.baseline_timestamp.as_deref(), Some("t0"));
        let group = &report.classes[0].groups[0];
        assert!(group.has_baseline_data);
        let names: Vec<_> = group.methods.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);

        let b = &group.methods[1];
        assert_eq!(b.root_cause.as_deref(), Some("Bounds check per element"));
        assert_eq!(
            b.regression.as_ref().unwrap().temporal.class,
            TemporalClass::Regressed
        );
        assert_eq!(b.baseline_measurement.as_ref().unwrap().mean_us, Some(100.0));

        assert_eq!(group.methods[0].root_cause, None);

        let c = &group.methods[2];
        assert!(!c.in_current);
        assert!(c.measurement.is_absent());
        assert_eq!(c.within_group.class, WithinGroupClass::Unknown);

        let summary = report.summary.as_ref().unwrap();
        assert_eq!(summary.regressions.len(), 1);
        assert_eq!(summary.regressions[0].label, "B");
    }

    #[test]
    fn test_regression_requires_current_data() {
        let err = assemble_regression(
            None,
            None,
            &RootCauses::default(),
            &RegressionThresholds::default(),
            Path::new("data/latest"),
        )
        .unwrap_err();
        assert!(matches!(err, ReportError::MissingCurrentData(p) if p == PathBuf::from("data/latest")));
    }

    #[test]
    fn test_regression_without_baseline_is_flagged() {
        let current = snapshot("t1", vec![m("A", 1.0).baseline()]);
        let report = assemble_regression(
            Some(&current),
            None,
            &causes(),
            &RegressionThresholds::default(),
            Path::new("data/latest"),
        )
        .unwrap();
        assert_eq!(report.kind, ReportKind::Regression);
        assert!(!report.has_baseline());
        assert!(report.summary.is_none());
        assert_eq!(report.method_count(), 1);
    }
}
