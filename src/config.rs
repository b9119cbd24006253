//! Benchmark group configuration and on-disk layout
//!
//! `benchmark-groups.json` declares, per benchmark class, which methods are
//! compared with each other and which one is the reference implementation.

use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the group configuration inside the report root
pub const GROUPS_FILE: &str = "benchmark-groups.json";

/// Method definition inside a configured comparison group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDef {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub code_snippet: String,
    /// Explanation rendered beneath the method's row in the regression report
    #[serde(default)]
    pub root_cause: String,
}

/// Configured comparison group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub baseline: String,
    pub methods: Vec<MethodDef>,
}

/// Configured benchmark class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDef {
    #[serde(rename = "class")]
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
    pub comparison_groups: Vec<GroupDef>,
}

/// Root of `benchmark-groups.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkGroupsConfig {
    pub benchmark_classes: Vec<ClassDef>,
}

impl BenchmarkGroupsConfig {
    /// Load and validate a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ReportError::io(path, e))?;
        let config: Self =
            serde_json::from_str(&contents).map_err(|e| ReportError::json(path, e))?;
        config.validate()?;
        Ok(config)
    }

    /// Check structural invariants
    ///
    /// Class keys, group ids within a class and method names within a group
    /// must be unique. A non-empty `baseline` must name one of the group's
    /// methods. A group without any baseline is allowed but logged.
    pub fn validate(&self) -> Result<()> {
        let mut classes = HashSet::new();
        for class in &self.benchmark_classes {
            if !classes.insert(class.class_name.as_str()) {
                return Err(ReportError::Config(format!(
                    "duplicate benchmark class '{}'",
                    class.class_name
                )));
            }

            let mut groups = HashSet::new();
            for group in &class.comparison_groups {
                if !groups.insert(group.id.as_str()) {
                    return Err(ReportError::Config(format!(
                        "duplicate group id '{}' in class '{}'",
                        group.id, class.class_name
                    )));
                }

                let mut methods = HashSet::new();
                for method in &group.methods {
                    if !methods.insert(method.name.as_str()) {
                        return Err(ReportError::Config(format!(
                            "duplicate method '{}' in group '{}'",
                            method.name, group.id
                        )));
                    }
                }

                if group.baseline.is_empty() {
                    tracing::warn!(
                        class = %class.class_name,
                        group = %group.id,
                        "comparison group has no baseline method"
                    );
                } else if !methods.contains(group.baseline.as_str()) {
                    return Err(ReportError::Config(format!(
                        "baseline '{}' of group '{}' is not one of its methods",
                        group.baseline, group.id
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn class(&self, class_name: &str) -> Option<&ClassDef> {
        self.benchmark_classes
            .iter()
            .find(|c| c.class_name == class_name)
    }

    /// Collect non-empty root-cause annotations keyed by method name
    pub fn root_causes(&self) -> RootCauses {
        let mut by_method = HashMap::new();
        for method in self
            .benchmark_classes
            .iter()
            .flat_map(|c| &c.comparison_groups)
            .flat_map(|g| &g.methods)
        {
            if !method.root_cause.is_empty() {
                by_method.insert(method.name.clone(), method.root_cause.clone());
            }
        }
        RootCauses { by_method }
    }
}

/// Root-cause annotations, loaded once and handed to the report assembler
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RootCauses {
    by_method: HashMap<String, String>,
}

impl RootCauses {
    pub fn new(by_method: HashMap<String, String>) -> Self {
        Self { by_method }
    }

    /// Annotation for a method, `None` when missing or empty
    pub fn get(&self, method_name: &str) -> Option<&str> {
        self.by_method
            .get(method_name)
            .map(String::as_str)
            .filter(|text| !text.is_empty())
    }

    pub fn len(&self) -> usize {
        self.by_method.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_method.is_empty()
    }
}

/// File layout of a report root directory
#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub root: PathBuf,
}

impl ReportPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn groups_file(&self) -> PathBuf {
        self.root.join(GROUPS_FILE)
    }

    /// Snapshot corpus used as the historical reference
    pub fn baseline_dir(&self) -> PathBuf {
        self.root.join("data").join("baseline")
    }

    /// Snapshot corpus produced by the most recent run
    pub fn latest_dir(&self) -> PathBuf {
        self.root.join("data").join("latest")
    }

    pub fn public_notes(&self) -> PathBuf {
        self.root.join("fragments").join("public").join("notes.xhtml")
    }

    pub fn regression_scratchpad(&self) -> PathBuf {
        self.root
            .join("fragments")
            .join("regression")
            .join("scratchpad.xhtml")
    }

    pub fn public_report(&self, extension: &str) -> PathBuf {
        self.root.join(format!("Benchmark-Report.{}", extension))
    }

    pub fn regression_report(&self, extension: &str) -> PathBuf {
        self.root
            .join(format!("Benchmark-Regression-Report.{}", extension))
    }

    /// Default BenchmarkDotNet artifacts directory, next to the report root
    pub fn default_artifacts(&self) -> PathBuf {
        let parent = match self.root.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => self.root.join(".."),
        };
        parent.join("BenchmarkDotNet.Artifacts").join("results")
    }
}
