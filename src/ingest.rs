//! BenchmarkDotNet results ingestion
//!
//! Reads the `*-report.csv` exporter output and the run logs next to it. Every
//! cell goes through [`crate::units`], so a malformed cell only blanks that one
//! field.

use crate::error::{ReportError, Result};
use crate::model::{Measurement, MeasurementTable};
use crate::units::{parse_bytes, parse_throughput, parse_time};
use regex::Regex;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Default results file prefix written by the benchmark project
pub const DEFAULT_CSV_PREFIX: &str = "TraitSharp.Benchmarks.";

/// Only the head of a run log carries version banners
const LOG_SCAN_CHARS: usize = 5000;

/// Parsed contents of one results CSV
#[derive(Debug, Clone, Default)]
pub struct ResultsTable {
    pub measurements: MeasurementTable,
    /// Last non-empty `Runtime` column value
    pub runtime: String,
}

/// Versions found in run logs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunLogInfo {
    pub benchmark_dot_net: Option<String>,
    pub runtime: Option<String>,
}

/// Path of the results CSV for a benchmark class
pub fn results_csv_path(artifacts_dir: &Path, prefix: &str, class_name: &str) -> PathBuf {
    artifacts_dir.join(format!("{}{}-report.csv", prefix, class_name))
}

/// Read a results CSV from disk
pub fn read_results_csv(path: &Path) -> Result<ResultsTable> {
    let file = fs::File::open(path).map_err(|e| ReportError::io(path, e))?;
    parse_results(file).map_err(|source| ReportError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse results CSV content keyed by header names
pub fn parse_results<R: Read>(reader: R) -> std::result::Result<ResultsTable, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.trim() == name);
    let method_col = column("Method");
    let mean_col = column("Mean");
    let error_col = column("Error");
    let stddev_col = column("StdDev");
    let gbs_col = column("GB/s");
    let alloc_col = column("Allocated");
    let runtime_col = column("Runtime");

    let mut table = ResultsTable::default();
    for record in reader.records() {
        let record = record?;
        let cell = |col: Option<usize>| {
            col.and_then(|i| record.get(i))
                .map(str::trim)
                .unwrap_or("")
        };

        let name = cell(method_col);
        if name.is_empty() {
            continue;
        }

        let measurement = Measurement {
            mean_us: parse_time(cell(mean_col)),
            error_us: parse_time(cell(error_col)),
            stddev_us: parse_time(cell(stddev_col)),
            throughput_gbs: parse_throughput(cell(gbs_col)),
            allocated_bytes: parse_bytes(cell(alloc_col)),
        };
        if measurement.mean_us.is_none() && !cell(mean_col).is_empty() {
            tracing::warn!(method = name, raw = cell(mean_col), "unparseable mean");
        }
        table.measurements.insert(name.to_string(), measurement);

        let runtime = cell(runtime_col);
        if !runtime.is_empty() {
            table.runtime = runtime.to_string();
        }
    }

    Ok(table)
}

/// Scan `*<class_name>*.log` files in `dir` for toolchain versions
///
/// Unreadable logs are skipped. When several logs match, later file names win.
pub fn scan_run_logs(dir: &Path, class_name: &str) -> RunLogInfo {
    let mut info = RunLogInfo::default();
    let Ok(entries) = fs::read_dir(dir) else {
        return info;
    };

    let mut logs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.contains(class_name) && n.ends_with(".log"))
        })
        .collect();
    logs.sort();

    for log in logs {
        let bytes = match fs::read(&log) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!(path = %log.display(), error = %e, "skipping unreadable log");
                continue;
            }
        };
        let head: String = String::from_utf8_lossy(&bytes)
            .chars()
            .take(LOG_SCAN_CHARS)
            .collect();
        let found = scan_log_text(&head);
        if found.benchmark_dot_net.is_some() {
            info.benchmark_dot_net = found.benchmark_dot_net;
        }
        if found.runtime.is_some() {
            info.runtime = found.runtime;
        }
    }

    info
}

fn bdn_version_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"BenchmarkDotNet v([\d.]+)").ok()).as_ref()
}

fn runtime_version_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\.NET (\d+\.\d+\.\d+)").ok()).as_ref()
}

/// Extract versions from the text of a run log
pub fn scan_log_text(text: &str) -> RunLogInfo {
    let capture = |re: Option<&Regex>| {
        re.and_then(|re| re.captures(text))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    };

    RunLogInfo {
        benchmark_dot_net: capture(bdn_version_re()).map(|v| v.trim_end_matches('.').to_string()),
        runtime: capture(runtime_version_re()).map(|v| format!(".NET {}", v)),
    }
}
