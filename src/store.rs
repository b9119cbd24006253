//! Snapshot document storage
//!
//! A snapshot lives on disk as one JSON document per benchmark class:
//!
//! ```text
//! data/latest/Sum1DBenchmarks.apple-m4-max.macos.json
//! data/latest/Sum2DBenchmarks.apple-m4-max.macos.json
//! ```
//!
//! Documents are read in file-name order, so the loaded snapshot does not
//! depend on directory listing order.

use crate::environment::Environment;
use crate::error::{ReportError, Result};
use crate::model::{BenchmarkClass, ClassInfo, ComparisonGroup, Snapshot};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Metadata block of a class document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(flatten)]
    pub info: ClassInfo,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub environment: Environment,
}

/// One stored class document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDocument {
    pub metadata: DocumentMetadata,
    pub comparison_groups: Vec<ComparisonGroup>,
}

impl ClassDocument {
    /// Wrap a class with the timestamp and environment of its run
    pub fn new(class: BenchmarkClass, timestamp: &str, environment: &Environment) -> Self {
        Self {
            metadata: DocumentMetadata {
                info: class.info,
                timestamp: timestamp.to_string(),
                environment: environment.clone(),
            },
            comparison_groups: class.groups,
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| ReportError::io(path, e))?;
        let doc: Self = serde_json::from_str(&contents).map_err(|e| ReportError::json(path, e))?;
        if doc.metadata.info.class_name.is_empty() {
            return Err(ReportError::Config(format!(
                "{}: metadata.benchmarkClass is empty",
                path.display()
            )));
        }
        Ok(doc)
    }

    /// File name following `<Class>.<cpuId>.<osSlug>.json`
    pub fn file_name(&self) -> String {
        let env = &self.metadata.environment;
        format!(
            "{}.{}.{}.json",
            self.metadata.info.class_name,
            non_empty_or(&env.cpu_id, "unknown-cpu"),
            non_empty_or(&env.os_slug, "unknown-os")
        )
    }

    fn into_class(self) -> BenchmarkClass {
        BenchmarkClass {
            info: self.metadata.info,
            groups: self.comparison_groups,
        }
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

/// List `*.json` files of a directory, sorted by file name
pub fn list_documents(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| ReportError::io(dir, e))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    Ok(files)
}

/// Load every class document in a directory into one snapshot
///
/// Returns `Ok(None)` when the directory is missing or holds no documents.
/// Timestamp and environment come from the first document. When two documents
/// describe the same class, the one whose file name sorts last is kept.
pub fn load_snapshot(dir: &Path) -> Result<Option<Snapshot>> {
    let files = list_documents(dir)?;
    let mut snapshot: Option<Snapshot> = None;

    for path in files {
        let doc = ClassDocument::from_file(&path)?;
        tracing::debug!(path = %path.display(), class = %doc.metadata.info.class_name, "loaded snapshot document");

        let current = snapshot.take().unwrap_or_else(|| {
            Snapshot::new(
                doc.metadata.timestamp.clone(),
                doc.metadata.environment.clone(),
            )
        });
        if current.class(&doc.metadata.info.class_name).is_some() {
            tracing::warn!(
                class = %doc.metadata.info.class_name,
                path = %path.display(),
                "duplicate class document, keeping the later file"
            );
        }
        snapshot = Some(current.with_class(doc.into_class()));
    }

    Ok(snapshot)
}

/// Write a class document into `dir`, creating the directory if needed
pub fn write_document(dir: &Path, doc: &ClassDocument) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|e| ReportError::io(dir, e))?;
    let path = dir.join(doc.file_name());
    let mut json = serde_json::to_string_pretty(doc).map_err(|e| ReportError::json(&path, e))?;
    json.push('\n');
    fs::write(&path, json).map_err(|e| ReportError::io(&path, e))?;
    Ok(path)
}

/// Copy every document of `latest` over `baseline`
///
/// A plain file-level replace: nothing is parsed or rewritten.
pub fn promote(latest: &Path, baseline: &Path) -> Result<Vec<PathBuf>> {
    let files = list_documents(latest)?;
    if files.is_empty() {
        return Err(ReportError::NoData(latest.to_path_buf()));
    }

    fs::create_dir_all(baseline).map_err(|e| ReportError::io(baseline, e))?;
    let mut promoted = Vec::with_capacity(files.len());
    for src in files {
        let Some(name) = src.file_name() else {
            continue;
        };
        let dest = baseline.join(name);
        fs::copy(&src, &dest).map_err(|e| ReportError::io(&src, e))?;
        promoted.push(dest);
    }
    Ok(promoted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Measurement, MethodRecord};
    use tempfile::TempDir;

    fn env() -> Environment {
        Environment {
            cpu: "Apple M4 Max".to_string(),
            cpu_id: "apple-m4-max".to_string(),
            os_slug: "macos".to_string(),
            ..Environment::default()
        }
    }

    fn class(name: &str, mean: f64) -> BenchmarkClass {
        BenchmarkClass::new(name).with_group(
            ComparisonGroup::new("g", "Group")
                .with_method(MethodRecord::new("A", "Alpha", Measurement::with_mean(mean)).baseline())
                .with_method(MethodRecord::new("B", "Beta", Measurement::absent())),
        )
    }

    #[test]
    fn test_write_then_load() {
        let dir = TempDir::new().unwrap();
        let doc = ClassDocument::new(class("Sum1D", 103.8), "2026-02-16T22:30:00Z", &env());
        let path = write_document(dir.path(), &doc).unwrap();
        assert!(path.ends_with("Sum1D.apple-m4-max.macos.json"));

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.ends_with("}\n"));
        assert!(text.contains("\"benchmarkClass\": \"Sum1D\""));
        assert!(text.contains("\"mean_us\": null"));

        let snapshot = load_snapshot(dir.path()).unwrap().unwrap();
        assert_eq!(snapshot.timestamp, "2026-02-16T22:30:00Z");
        assert_eq!(snapshot.environment.cpu, "Apple M4 Max");
        let group = snapshot.class("Sum1D").unwrap().group("g").unwrap();
        assert_eq!(group.method("A").unwrap().measurement.mean_us, Some(103.8));
        assert!(group.method("A").unwrap().is_baseline);
        assert!(group.method("B").unwrap().measurement.is_absent());
    }

    #[test]
    fn test_load_missing_dir_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(load_snapshot(&dir.path().join("absent")).unwrap().is_none());
        assert!(load_snapshot(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_load_orders_by_file_name() {
        let dir = TempDir::new().unwrap();
        write_document(dir.path(), &ClassDocument::new(class("Zeta", 1.0), "t2", &env())).unwrap();
        write_document(dir.path(), &ClassDocument::new(class("Alpha", 1.0), "t1", &env())).unwrap();

        let snapshot = load_snapshot(dir.path()).unwrap().unwrap();
        let names: Vec<_> = snapshot.classes().iter().map(|c| c.class_name()).collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
        assert_eq!(snapshot.timestamp, "t1");
    }

    #[test]
    fn test_duplicate_class_keeps_later_file() {
        let dir = TempDir::new().unwrap();
        let mut other_env = env();
        other_env.cpu_id = "zz-cpu".to_string();
        write_document(dir.path(), &ClassDocument::new(class("Sum1D", 1.0), "t", &env())).unwrap();
        write_document(dir.path(), &ClassDocument::new(class("Sum1D", 2.0), "t", &other_env)).unwrap();

        let snapshot = load_snapshot(dir.path()).unwrap().unwrap();
        assert_eq!(snapshot.len(), 1);
        let a = snapshot.class("Sum1D").unwrap().group("g").unwrap().method("A").unwrap();
        assert_eq!(a.measurement.mean_us, Some(2.0));
    }

    #[test]
    fn test_malformed_document_is_fatal_with_path() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Bad.json"), r#"{"metadata": {}}"#).unwrap();
        let err = load_snapshot(dir.path()).unwrap_err();
        assert!(err.to_string().contains("Bad.json"));
    }

    #[test]
    fn test_promote_copies_documents() {
        let root = TempDir::new().unwrap();
        let latest = root.path().join("latest");
        let baseline = root.path().join("baseline");
        write_document(&latest, &ClassDocument::new(class("Sum1D", 1.0), "t", &env())).unwrap();

        let promoted = promote(&latest, &baseline).unwrap();
        assert_eq!(promoted.len(), 1);
        assert_eq!(
            fs::read_to_string(&promoted[0]).unwrap(),
            fs::read_to_string(latest.join("Sum1D.apple-m4-max.macos.json")).unwrap()
        );
    }

    #[test]
    fn test_promote_empty_latest_fails() {
        let root = TempDir::new().unwrap();
        let err = promote(&root.path().join("latest"), &root.path().join("baseline")).unwrap_err();
        assert!(matches!(err, ReportError::NoData(_)));
    }
}
