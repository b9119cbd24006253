//! Benchmark data model: measurements, comparison groups, classes and snapshots
//!
//! The serde layout of these types is the stored snapshot document format, so
//! field renames here are a wire-format change.

use crate::environment::Environment;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Parsed measurements keyed by method name
pub type MeasurementTable = HashMap<String, Measurement>;

/// Canonical result of one benchmarked method
///
/// Timing and throughput fields are independently optional. `None` means
/// "not measured" and is never treated as zero. `allocated_bytes` has no
/// absent state: zero covers both "no allocation" and "no data".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Mean time per operation in microseconds
    #[serde(rename = "mean_us", default)]
    pub mean_us: Option<f64>,

    /// Half-width of the 99.9% confidence interval in microseconds
    #[serde(rename = "error_us", default)]
    pub error_us: Option<f64>,

    /// Standard deviation in microseconds
    #[serde(rename = "stddev_us", default)]
    pub stddev_us: Option<f64>,

    /// Throughput in GB/s
    #[serde(rename = "gbPerSec", default)]
    pub throughput_gbs: Option<f64>,

    /// Bytes allocated per operation
    #[serde(rename = "allocated", default)]
    pub allocated_bytes: u64,
}

impl Measurement {
    /// A measurement with every field absent, for configured-but-unmeasured methods
    pub fn absent() -> Self {
        Self::default()
    }

    /// Measurement with only a mean, mostly useful in tests and fixtures
    pub fn with_mean(mean_us: f64) -> Self {
        Self {
            mean_us: Some(mean_us),
            ..Self::default()
        }
    }

    /// True when no field carries data
    pub fn is_absent(&self) -> bool {
        self.mean_us.is_none()
            && self.error_us.is_none()
            && self.stddev_us.is_none()
            && self.throughput_gbs.is_none()
            && self.allocated_bytes == 0
    }
}

/// One method inside a comparison group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodRecord {
    /// Stable identifier, the join key across snapshots
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub code_snippet: String,
    #[serde(default)]
    pub is_baseline: bool,
    #[serde(flatten)]
    pub measurement: Measurement,
}

impl MethodRecord {
    pub fn new(name: impl Into<String>, label: impl Into<String>, measurement: Measurement) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            code_snippet: String::new(),
            is_baseline: false,
            measurement,
        }
    }

    /// Mark this method as its group's baseline
    pub fn baseline(mut self) -> Self {
        self.is_baseline = true;
        self
    }

    /// Label for display, falling back to the method name
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.name
        } else {
            &self.label
        }
    }
}

/// Ordered set of methods compared against one designated baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonGroup {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Configured baseline method name; may not be present in `methods`
    #[serde(rename = "baseline", default)]
    pub baseline_name: String,
    /// Display order, never re-sorted
    #[serde(default)]
    pub methods: Vec<MethodRecord>,
}

impl ComparisonGroup {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            baseline_name: String::new(),
            methods: Vec::new(),
        }
    }

    pub fn with_method(mut self, method: MethodRecord) -> Self {
        self.methods.push(method);
        self
    }

    /// Look up a method by name
    pub fn method(&self, name: &str) -> Option<&MethodRecord> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// First method flagged as baseline, if any
    pub fn flagged_baseline(&self) -> Option<&MethodRecord> {
        self.methods.iter().find(|m| m.is_baseline)
    }
}

/// Descriptive metadata of a benchmark class, passed through untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassInfo {
    #[serde(rename = "benchmarkClass")]
    pub class_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub element_type: String,
    #[serde(default)]
    pub element_size: u64,
    #[serde(default)]
    pub array_length: u64,
    #[serde(default)]
    pub total_bytes: u64,
}

/// A benchmark class and its comparison groups
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkClass {
    pub info: ClassInfo,
    pub groups: Vec<ComparisonGroup>,
}

impl BenchmarkClass {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            info: ClassInfo {
                class_name: class_name.into(),
                ..ClassInfo::default()
            },
            groups: Vec::new(),
        }
    }

    pub fn with_group(mut self, group: ComparisonGroup) -> Self {
        self.groups.push(group);
        self
    }

    pub fn class_name(&self) -> &str {
        &self.info.class_name
    }

    /// Look up a comparison group by id
    pub fn group(&self, id: &str) -> Option<&ComparisonGroup> {
        self.groups.iter().find(|g| g.id == id)
    }
}

/// All benchmark classes captured at one point in time
///
/// Classes keep insertion order. Built once, then only read.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub timestamp: String,
    pub environment: Environment,
    classes: Vec<BenchmarkClass>,
}

impl Snapshot {
    pub fn new(timestamp: impl Into<String>, environment: Environment) -> Self {
        Self {
            timestamp: timestamp.into(),
            environment,
            classes: Vec::new(),
        }
    }

    /// Add a class; a class with the same key is replaced in place
    pub fn with_class(mut self, class: BenchmarkClass) -> Self {
        match self
            .classes
            .iter_mut()
            .find(|c| c.class_name() == class.class_name())
        {
            Some(existing) => *existing = class,
            None => self.classes.push(class),
        }
        self
    }

    pub fn class(&self, class_name: &str) -> Option<&BenchmarkClass> {
        self.classes.iter().find(|c| c.class_name() == class_name)
    }

    pub fn classes(&self) -> &[BenchmarkClass] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
