//! BenchmarkDotNet results to snapshot documents
//!
//! For every configured class with a results CSV: parse it, arrange rows into
//! the configured comparison groups and write one class document into the
//! output directory. Classes without a CSV are skipped.

use crate::assembly::assemble_class;
use crate::config::BenchmarkGroupsConfig;
use crate::environment::Environment;
use crate::error::Result;
use crate::ingest::{read_results_csv, results_csv_path, scan_run_logs};
use crate::store::{write_document, ClassDocument};
use std::path::{Path, PathBuf};

/// Inputs of one conversion run
#[derive(Debug, Clone)]
pub struct ConvertOptions<'a> {
    /// BenchmarkDotNet `results` directory; run logs are read from its parent
    pub artifacts_dir: &'a Path,
    pub prefix: &'a str,
    pub output_dir: &'a Path,
    /// Run timestamp stamped on every document
    pub timestamp: &'a str,
    /// Host environment; runtime and BenchmarkDotNet versions are filled per class
    pub environment: &'a Environment,
}

/// One written class document
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedClass {
    pub class_name: String,
    pub path: PathBuf,
    /// Rows parsed from the CSV
    pub method_count: usize,
}

/// Convert every configured class that has a results CSV
pub fn convert_results(
    config: &BenchmarkGroupsConfig,
    opts: &ConvertOptions<'_>,
) -> Result<Vec<ConvertedClass>> {
    let log_dir = opts.artifacts_dir.parent().unwrap_or(opts.artifacts_dir);
    let mut converted = Vec::new();

    for class_def in &config.benchmark_classes {
        let csv_path = results_csv_path(opts.artifacts_dir, opts.prefix, &class_def.class_name);
        if !csv_path.is_file() {
            tracing::warn!(
                class = %class_def.class_name,
                path = %csv_path.display(),
                "skipping class, no results CSV"
            );
            continue;
        }

        let table = read_results_csv(&csv_path)?;
        let logs = scan_run_logs(log_dir, &class_def.class_name);

        let mut environment = opts.environment.clone();
        environment.runtime = logs.runtime.unwrap_or(table.runtime);
        environment.benchmark_dot_net = logs.benchmark_dot_net.unwrap_or_default();

        let class = assemble_class(class_def, &table.measurements);
        let doc = ClassDocument::new(class, opts.timestamp, &environment);
        let path = write_document(opts.output_dir, &doc)?;
        tracing::info!(class = %class_def.class_name, path = %path.display(), "wrote snapshot document");

        converted.push(ConvertedClass {
            class_name: class_def.class_name.clone(),
            path,
            method_count: table.measurements.len(),
        });
    }

    Ok(converted)
}
