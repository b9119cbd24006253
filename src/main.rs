use anyhow::{Context, Result};
use benchlens::cli::{Cli, Command, OutputFormat};
use benchlens::config::{BenchmarkGroupsConfig, ReportPaths, RootCauses};
use benchlens::convert::{convert_results, ConvertOptions};
use benchlens::error::ReportError;
use benchlens::regression::RegressionThresholds;
use benchlens::report::{assemble, assemble_regression, HtmlOutput, JsonOutput, Report};
use benchlens::{environment, store};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber, raised to TRACE with --debug
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Hand-written markup spliced into a report, if present
fn read_fragment(path: &Path) -> Result<Option<String>> {
    if !path.is_file() {
        return Ok(None);
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read fragment {}", path.display()))?;
    Ok(Some(text))
}

/// Root-cause notes from the groups file; none when there is no groups file
fn load_root_causes(paths: &ReportPaths) -> Result<RootCauses> {
    let groups_file = paths.groups_file();
    if !groups_file.is_file() {
        tracing::debug!(path = %groups_file.display(), "no groups file, no root-cause notes");
        return Ok(RootCauses::default());
    }
    Ok(BenchmarkGroupsConfig::from_file(&groups_file)?.root_causes())
}

fn write_report(
    report: &Report,
    format: OutputFormat,
    fragment: Option<String>,
    out: &Path,
) -> Result<()> {
    let contents = match format {
        OutputFormat::Html => HtmlOutput::new(report).with_fragment(fragment).to_html(),
        OutputFormat::Json => JsonOutput::new(report).with_fragment(fragment).to_json()?,
    };
    fs::write(out, contents).with_context(|| format!("failed to write {}", out.display()))?;
    Ok(())
}

fn run_convert(paths: &ReportPaths, artifacts: Option<PathBuf>, prefix: &str) -> Result<()> {
    let config = BenchmarkGroupsConfig::from_file(paths.groups_file())?;
    let artifacts = artifacts.unwrap_or_else(|| paths.default_artifacts());
    let environment = environment::detect();
    let timestamp = chrono::Utc::now().to_rfc3339();
    let latest = paths.latest_dir();

    let converted = convert_results(
        &config,
        &ConvertOptions {
            artifacts_dir: &artifacts,
            prefix,
            output_dir: &latest,
            timestamp: &timestamp,
            environment: &environment,
        },
    )?;
    if converted.is_empty() {
        anyhow::bail!("No results CSV found in {}", artifacts.display());
    }

    for class in &converted {
        println!(
            "✅ {} ({} methods)",
            class.path.display(),
            class.method_count
        );
    }
    Ok(())
}

fn run_public(paths: &ReportPaths, data_dir: Option<PathBuf>, format: OutputFormat) -> Result<()> {
    let data_dir = data_dir.unwrap_or_else(|| paths.baseline_dir());
    let snapshot =
        store::load_snapshot(&data_dir)?.ok_or_else(|| ReportError::NoData(data_dir.clone()))?;

    let report = assemble(
        &snapshot,
        None,
        &RootCauses::default(),
        &RegressionThresholds::default(),
    );
    let out = paths.public_report(format.extension());
    write_report(&report, format, read_fragment(&paths.public_notes())?, &out)?;

    println!("✅ Public report: {}", out.display());
    Ok(())
}

fn run_regression(paths: &ReportPaths, format: OutputFormat, threshold: Option<f64>) -> Result<()> {
    let mut thresholds = RegressionThresholds::default();
    if let Some(percent) = threshold {
        thresholds.temporal_percent = percent;
    }
    thresholds.validate()?;

    let causes = load_root_causes(paths)?;
    let latest_dir = paths.latest_dir();
    let current = store::load_snapshot(&latest_dir)?;
    let baseline = store::load_snapshot(&paths.baseline_dir())?;

    let report = assemble_regression(
        current.as_ref(),
        baseline.as_ref(),
        &causes,
        &thresholds,
        &latest_dir,
    )?;
    let out = paths.regression_report(format.extension());
    write_report(
        &report,
        format,
        read_fragment(&paths.regression_scratchpad())?,
        &out,
    )?;

    match &report.summary {
        Some(summary) => print!("{}", summary.to_report_string()),
        None => println!("⚠️ No baseline data found, showing current results only"),
    }
    println!("✅ Regression report: {}", out.display());
    Ok(())
}

fn run_baseline(paths: &ReportPaths) -> Result<()> {
    let promoted = store::promote(&paths.latest_dir(), &paths.baseline_dir())?;
    for path in &promoted {
        println!("✅ Promoted {}", path.display());
    }
    println!("Baseline updated ({} files)", promoted.len());
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let paths = ReportPaths::new(args.root.clone());
    match args.command {
        Command::Convert { artifacts, prefix } => run_convert(&paths, artifacts, &prefix),
        Command::Public { data_dir } => run_public(&paths, data_dir, args.format),
        Command::Regression { threshold } => run_regression(&paths, args.format, threshold),
        Command::Baseline => run_baseline(&paths),
    }
}
