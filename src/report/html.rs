//! HTML output for benchmark reports
//!
//! Self-contained documents with embedded CSS. Every piece of text taken from
//! snapshots or configuration is escaped; the optional notes fragment is
//! trusted markup and inserted verbatim.

use crate::environment::Environment;
use crate::model::{ClassInfo, Measurement};
use crate::regression::{RegressionSummary, WithinGroupClass};
use crate::report::assembler::{ClassReport, GroupReport, MethodRow, Report, ReportKind};
use crate::units::{fmt_alloc, fmt_delta, fmt_gbs, fmt_percent, fmt_us, group_thousands};

/// Columns in the regression table, used for root-cause row spans
const REGRESSION_COLUMNS: usize = 8;

/// HTML output formatter
#[derive(Debug)]
pub struct HtmlOutput<'a> {
    report: &'a Report,
    fragment: Option<String>,
    generated_at: String,
}

impl<'a> HtmlOutput<'a> {
    /// Create a formatter stamped with the current local time
    pub fn new(report: &'a Report) -> Self {
        Self {
            report,
            fragment: None,
            generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M").to_string(),
        }
    }

    /// Attach the notes (public) or scratchpad (regression) fragment
    pub fn with_fragment(mut self, fragment: Option<String>) -> Self {
        self.fragment = fragment;
        self
    }

    pub fn with_generated_at(mut self, generated_at: impl Into<String>) -> Self {
        self.generated_at = generated_at.into();
        self
    }

    /// Escape HTML special characters to prevent XSS
    pub fn escape_html(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&#39;")
    }

    /// Generate embedded CSS styles
    fn generate_styles() -> &'static str {
        r#"
        :root {
            --bg: #ffffff; --fg: #1a1a2e; --accent: #0f3460;
            --green: #27ae60; --red: #e74c3c; --yellow: #f39c12;
            --border: #dfe6e9; --code-bg: #f8f9fa; --stripe: #f5f7fa;
        }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            color: var(--fg);
            background: var(--bg);
            line-height: 1.6;
            max-width: 1200px;
            margin: 0 auto;
            padding: 2rem;
        }
        h1 {
            color: var(--accent);
            border-bottom: 3px solid var(--accent);
            padding-bottom: 0.5rem;
        }
        h2 {
            color: var(--accent);
            border-bottom: 1px solid var(--border);
            margin-top: 2rem;
        }
        .subtitle {
            color: #636e72;
            font-size: 0.9rem;
        }
        .env-table, .benchmark-table {
            width: 100%;
            border-collapse: collapse;
            margin: 1rem 0;
            font-size: 0.85rem;
        }
        .env-table th {
            background: var(--stripe);
            text-align: left;
            width: 150px;
        }
        .env-table th, .env-table td {
            border: 1px solid var(--border);
            padding: 0.4rem 0.8rem;
        }
        .benchmark-table th {
            background: var(--accent);
            color: white;
            padding: 0.5rem 0.8rem;
            text-align: right;
        }
        .benchmark-table td {
            padding: 0.5rem 0.8rem;
            text-align: right;
            border: 1px solid var(--border);
        }
        .benchmark-table th:first-child, .benchmark-table td:first-child {
            text-align: left;
        }
        .benchmark-table tr:nth-child(even) {
            background: var(--stripe);
        }
        .benchmark-table tr.baseline {
            font-weight: 600;
        }
        .faster, .delta-positive {
            color: var(--green);
            font-weight: 600;
        }
        .slower, .delta-negative {
            color: var(--red);
            font-weight: 600;
        }
        .neutral {
            color: #636e72;
        }
        .group-section {
            margin: 1.5rem 0;
            padding: 1rem;
            border: 1px solid var(--border);
            border-radius: 6px;
        }
        .group-description {
            color: #636e72;
            font-size: 0.9rem;
        }
        .code-comparison {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(350px, 1fr));
            gap: 0.8rem;
        }
        .code-card {
            border: 1px solid var(--border);
            border-radius: 4px;
        }
        .code-card-header {
            background: var(--stripe);
            padding: 0.3rem 0.6rem;
            font-size: 0.8rem;
            font-weight: 600;
        }
        .code-card pre {
            margin: 0;
            padding: 0.8rem 1rem;
            background: var(--code-bg);
            overflow-x: auto;
            font-size: 0.8rem;
        }
        .stale-banner, .summary-pass, .summary-fail {
            border-radius: 4px;
            padding: 0.5rem 1rem;
            margin: 1rem 0;
        }
        .stale-banner {
            background: #ffeaa7;
            border: 1px solid var(--yellow);
        }
        .summary-pass {
            background: #d4edda;
            border: 1px solid var(--green);
        }
        .summary-fail {
            background: #f8d7da;
            border: 1px solid var(--red);
        }
        .root-cause td {
            font-style: italic;
            color: #636e72;
            font-size: 0.8rem;
            text-align: left;
            background: #fffdf5;
        }
        .scratchpad {
            border: 2px dashed var(--border);
            border-radius: 6px;
            padding: 1rem;
            margin: 2rem 0;
        }
        .footer {
            margin-top: 3rem;
            font-size: 0.75rem;
            color: #636e72;
            text-align: center;
        }
        "#
    }

    fn title(&self) -> &'static str {
        match self.report.kind {
            ReportKind::Public => "Benchmark Report",
            ReportKind::Regression => "Benchmark Regression Report",
        }
    }

    fn subtitle(&self) -> &'static str {
        match self.report.kind {
            ReportKind::Public => "Performance comparison across benchmark groups",
            ReportKind::Regression => "Baseline vs Current comparison",
        }
    }

    /// Environment table, one row per non-empty field
    fn render_environment(env: &Environment) -> String {
        let mut html = String::from("    <h2>Environment</h2>\n    <table class=\"env-table\">\n");
        for (label, value) in env.display_rows() {
            html.push_str(&format!(
                "        <tr><th>{}</th><td>{}</td></tr>\n",
                label,
                Self::escape_html(&value)
            ));
        }
        html.push_str("    </table>\n");
        html
    }

    fn render_class_header(info: &ClassInfo) -> String {
        let title = if info.title.is_empty() {
            &info.class_name
        } else {
            &info.title
        };
        let mut html = format!("\n    <h2>{}</h2>\n", Self::escape_html(title));
        if !info.description.is_empty() {
            html.push_str(&format!(
                "    <p class=\"group-description\">{}</p>\n",
                Self::escape_html(&info.description)
            ));
        }
        if !info.element_type.is_empty() {
            html.push_str(&format!(
                "    <p class=\"group-description\"><strong>Array:</strong> {}[{}] ({} bytes total)</p>\n",
                Self::escape_html(&info.element_type),
                group_thousands(&info.array_length.to_string()),
                group_thousands(&info.total_bytes.to_string())
            ));
        }
        html
    }

    /// Side-by-side snippet cards for methods in the current run
    fn render_code_cards(rows: &[MethodRow]) -> String {
        let mut html = String::from("    <div class=\"code-comparison\">\n");
        for row in rows.iter().filter(|r| r.in_current) {
            html.push_str(&format!(
                "        <div class=\"code-card\">\n            <div class=\"code-card-header\">{}</div>\n            <pre><code>{}</code></pre>\n        </div>\n",
                Self::escape_html(&row.label),
                Self::escape_html(&row.code_snippet)
            ));
        }
        html.push_str("    </div>\n");
        html
    }

    fn within_group_class(class: WithinGroupClass) -> &'static str {
        match class {
            WithinGroupClass::Faster => "faster",
            WithinGroupClass::Slower => "slower",
            _ => "neutral",
        }
    }

    /// Delta cell colour, banded independently of the temporal classification
    fn delta_class(delta_percent: Option<f64>, band: f64) -> &'static str {
        match delta_percent {
            Some(pct) if pct < -band => "delta-positive",
            Some(pct) if pct > band => "delta-negative",
            _ => "neutral",
        }
    }

    fn row_open(row: &MethodRow) -> &'static str {
        if row.is_baseline {
            "        <tr class=\"baseline\">"
        } else {
            "        <tr>"
        }
    }

    fn render_public_table(rows: &[MethodRow]) -> String {
        let mut html = String::from("    <table class=\"benchmark-table\">\n");
        html.push_str("        <tr><th>Method</th><th>Mean</th><th>Error</th><th>StdDev</th><th>vs Baseline</th><th>GB/s</th><th>Allocated</th></tr>\n");

        for row in rows.iter().filter(|r| r.in_current) {
            let m: &Measurement = &row.measurement;
            html.push_str(Self::row_open(row));
            html.push_str(&format!(
                "<td>{}</td><td>{}</td><td>±{}</td><td>{}</td><td class=\"{}\">{}</td><td>{}</td><td>{}</td></tr>\n",
                Self::escape_html(&row.label),
                fmt_us(m.mean_us),
                fmt_us(m.error_us),
                fmt_us(m.stddev_us),
                Self::within_group_class(row.within_group.class),
                row.within_group.display(),
                fmt_gbs(m.throughput_gbs),
                fmt_alloc(m.allocated_bytes)
            ));
        }

        html.push_str("    </table>\n");
        html
    }

    fn render_regression_table(rows: &[MethodRow], highlight_band: f64) -> String {
        let mut html = String::from("    <table class=\"benchmark-table\">\n");
        html.push_str("        <tr><th>Method</th><th>Baseline (µs)</th><th>Current (µs)</th><th>Δ (µs)</th><th>Δ (%)</th><th>vs Group Baseline</th><th>Baseline GB/s</th><th>Current GB/s</th></tr>\n");

        for row in rows {
            let baseline_gbs = row
                .baseline_measurement
                .as_ref()
                .and_then(|m| m.throughput_gbs);
            let (baseline_mean, current_mean, temporal) = match &row.regression {
                Some(r) => (r.baseline_mean, r.current_mean, Some(&r.temporal)),
                None => (None, row.measurement.mean_us, None),
            };
            let delta_class =
                Self::delta_class(temporal.and_then(|t| t.delta_percent), highlight_band);

            html.push_str(Self::row_open(row));
            html.push_str(&format!(
                "<td>{}</td><td>{}</td><td>{}</td><td class=\"{dc}\">{}</td><td class=\"{dc}\">{}</td><td class=\"{}\">{}</td><td>{}</td><td>{}</td></tr>\n",
                Self::escape_html(&row.label),
                fmt_us(baseline_mean),
                fmt_us(current_mean),
                fmt_delta(temporal.and_then(|t| t.delta_us)),
                fmt_percent(temporal.and_then(|t| t.delta_percent)),
                Self::within_group_class(row.within_group.class),
                row.within_group.display(),
                fmt_gbs(baseline_gbs),
                fmt_gbs(row.measurement.throughput_gbs),
                dc = delta_class,
            ));

            if let Some(cause) = &row.root_cause {
                html.push_str(&format!(
                    "        <tr class=\"root-cause\"><td colspan=\"{}\">{}</td></tr>\n",
                    REGRESSION_COLUMNS,
                    Self::escape_html(cause)
                ));
            }
        }

        html.push_str("    </table>\n");
        html
    }

    fn render_group(&self, group: &GroupReport) -> String {
        let mut html = String::from("\n    <div class=\"group-section\">\n");
        html.push_str(&format!("    <h3>{}</h3>\n", Self::escape_html(&group.name)));
        if !group.description.is_empty() {
            html.push_str(&format!(
                "    <p class=\"group-description\">{}</p>\n",
                Self::escape_html(&group.description)
            ));
        }
        html.push_str(&Self::render_code_cards(&group.methods));

        match self.report.kind {
            ReportKind::Regression if group.has_baseline_data => {
                html.push_str(&Self::render_regression_table(
                    &group.methods,
                    self.report.thresholds.delta_highlight_percent,
                ));
            }
            ReportKind::Regression => {
                html.push_str(
                    "    <p><em>No baseline data for this group, showing current only</em></p>\n",
                );
                html.push_str(&Self::render_public_table(&group.methods));
            }
            ReportKind::Public => html.push_str(&Self::render_public_table(&group.methods)),
        }

        html.push_str("    </div>\n");
        html
    }

    fn render_class(&self, class: &ClassReport) -> String {
        let mut html = Self::render_class_header(&class.info);
        for group in &class.groups {
            html.push_str(&self.render_group(group));
        }
        html
    }

    /// Pass/fail banner plus an improvements banner when anything got faster
    fn render_summary(summary: &RegressionSummary) -> String {
        let mut html = String::new();
        if summary.has_regressions() {
            html.push_str(&format!(
                "    <div class=\"summary-fail\">❌ {}</div>\n",
                Self::escape_html(&summary.regression_line())
            ));
        } else {
            html.push_str(&format!(
                "    <div class=\"summary-pass\">✅ {}</div>\n",
                Self::escape_html(&summary.regression_line())
            ));
        }
        if let Some(line) = summary.improvement_line() {
            html.push_str(&format!(
                "    <div class=\"summary-pass\">🚀 {}</div>\n",
                Self::escape_html(&line)
            ));
        }
        html
    }

    fn render_fragment(&self) -> String {
        let Some(fragment) = &self.fragment else {
            return String::new();
        };
        match self.report.kind {
            ReportKind::Public => format!("\n    <h2>Notes</h2>\n{}\n", fragment),
            ReportKind::Regression => format!(
                "\n    <div class=\"scratchpad\">\n{}\n    </div>\n",
                fragment
            ),
        }
    }

    /// Timestamps are shown to the second
    fn short_timestamp(ts: &str) -> String {
        ts.chars().take(19).collect::<String>().replace('T', " ")
    }

    /// Generate complete HTML document
    pub fn to_html(&self) -> String {
        let report = self.report;
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n");
        html.push_str("<html lang=\"en\">\n");

        html.push_str("<head>\n");
        html.push_str("    <meta charset=\"UTF-8\">\n");
        html.push_str(
            "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        html.push_str(&format!("    <title>{}</title>\n", self.title()));
        html.push_str("    <style>");
        html.push_str(Self::generate_styles());
        html.push_str("</style>\n");
        html.push_str("</head>\n");

        html.push_str("<body>\n");
        html.push_str(&format!("    <h1>{}</h1>\n", self.title()));
        html.push_str(&format!("    <p class=\"subtitle\">{}</p>\n", self.subtitle()));
        html.push_str(&format!(
            "    <p class=\"subtitle\">Generated: {}</p>\n",
            Self::escape_html(&self.generated_at)
        ));

        if report.kind == ReportKind::Regression && !report.has_baseline() {
            html.push_str("    <div class=\"stale-banner\">⚠️ No baseline data found. Showing current results only. Run <code>benchlens baseline</code> to set a baseline.</div>\n");
        }

        html.push_str(&Self::render_environment(&report.environment));

        match report.kind {
            ReportKind::Public => {
                if !report.timestamp.is_empty() {
                    html.push_str(&format!(
                        "    <p class=\"subtitle\">Data collected: {} UTC</p>\n",
                        Self::escape_html(&Self::short_timestamp(&report.timestamp))
                    ));
                }
            }
            ReportKind::Regression => {
                let baseline_ts = report
                    .baseline_timestamp
                    .as_deref()
                    .map_or_else(|| "none".to_string(), Self::short_timestamp);
                html.push_str(&format!(
                    "    <p class=\"subtitle\">Baseline: {} | Current: {}</p>\n",
                    Self::escape_html(&baseline_ts),
                    Self::escape_html(&Self::short_timestamp(&report.timestamp))
                ));
            }
        }

        if let Some(summary) = &report.summary {
            html.push_str(&Self::render_summary(summary));
        }

        for class in &report.classes {
            html.push_str(&self.render_class(class));
        }

        html.push_str(&self.render_fragment());

        html.push_str("    <div class=\"footer\">\n");
        html.push_str("        Generated by Benchlens - Benchmark Report Generator\n");
        html.push_str("    </div>\n");

        html.push_str("</body>\n");
        html.push_str("</html>\n");

        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RootCauses;
    use crate::model::{BenchmarkClass, ComparisonGroup, MethodRecord, Snapshot};
    use crate::regression::RegressionThresholds;
    use crate::report::assembler::{assemble, assemble_regression};
    use std::collections::HashMap;
    use std::path::Path;

    fn method(name: &str, mean: f64) -> MethodRecord {
        let mut m = MethodRecord::new(name, format!("{} label", name), Measurement::with_mean(mean));
        m.code_snippet = format!("for (int i = 0; i < n; i++) sum += {}[i];", name);
        m
    }

    fn snapshot(ts: &str, b_mean: f64) -> Snapshot {
        let mut class = BenchmarkClass::new("Sum1DBenchmarks");
        class.info.title = "1D Sum".to_string();
        class.info.element_type = "int".to_string();
        class.info.array_length = 1_000_000;
        class.info.total_bytes = 4_000_000;
        let group = ComparisonGroup::new("sum", "Sum <int>")
            .with_method(method("Span", 100.0).baseline())
            .with_method(method("Trait", b_mean));
        let env = Environment {
            cpu: "Apple M3 Pro".to_string(),
            ..Environment::default()
        };
        Snapshot::new(ts, env).with_class(class.with_group(group))
    }

    fn causes() -> RootCauses {
        let mut map = HashMap::new();
        map.insert("Trait".to_string(), "Interface dispatch <not inlined>".to_string());
        RootCauses::new(map)
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(HtmlOutput::escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(HtmlOutput::escape_html("a&b"), "a&amp;b");
        assert_eq!(HtmlOutput::escape_html("\"test\""), "&quot;test&quot;");
        assert_eq!(HtmlOutput::escape_html("'test'"), "&#39;test&#39;");
    }

    #[test]
    fn test_public_report_structure() {
        let current = snapshot("2026-03-01T10:20:30.123Z", 103.0);
        let report = assemble(&current, None, &RootCauses::default(), &RegressionThresholds::default());
        let html = HtmlOutput::new(&report).with_generated_at("2026-03-01 11:00").to_html();

        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("<title>Benchmark Report</title>"));
        assert!(html.contains("Generated: 2026-03-01 11:00"));
        assert!(html.contains("<tr><th>CPU</th><td>Apple M3 Pro</td></tr>"));
        assert!(html.contains("Data collected: 2026-03-01 10:20:30 UTC"));
        assert!(html.contains("int[1,000,000] (4,000,000 bytes total)"));
        assert!(html.contains("<h3>Sum &lt;int&gt;</h3>"));
        assert!(html.contains("sum += Span[i];"));
        assert!(html.contains("<td class=\"neutral\">baseline</td>"));
        assert!(html.contains("<td class=\"slower\">1.03x slower</td>"));
        assert!(html.contains("<td>100.0 µs</td><td>±—</td>"));
        assert!(html.contains("Generated by Benchlens"));
        assert!(!html.contains("stale-banner\">"));
        assert!(!html.contains("class=\"summary-"));
    }

    #[test]
    fn test_regression_report_rows_and_root_cause() {
        let baseline = snapshot("2026-02-01T00:00:00Z", 100.0);
        let current = snapshot("2026-03-01T00:00:00Z", 110.0);
        let report = assemble_regression(
            Some(&current),
            Some(&baseline),
            &causes(),
            &RegressionThresholds::default(),
            Path::new("latest"),
        )
        .unwrap();
        let html = HtmlOutput::new(&report).to_html();

        assert!(html.contains("<title>Benchmark Regression Report</title>"));
        assert!(html.contains("Baseline: 2026-02-01 00:00:00 | Current: 2026-03-01 00:00:00"));
        assert!(html.contains("<td class=\"delta-negative\">+10.0</td><td class=\"delta-negative\">+10.0%</td>"));
        assert!(html.contains(
            "<tr class=\"root-cause\"><td colspan=\"8\">Interface dispatch &lt;not inlined&gt;</td></tr>"
        ));
        assert!(html.contains("summary-fail\">❌ 1 regression(s) detected (&gt;5% slower): Trait label (+10.0%)"));
        assert!(html.contains("<tr class=\"baseline\"><td>Span label</td>"));
    }

    #[test]
    fn test_regression_report_without_baseline_is_stale() {
        let current = snapshot("2026-03-01T00:00:00Z", 100.0);
        let report = assemble_regression(
            Some(&current),
            None,
            &causes(),
            &RegressionThresholds::default(),
            Path::new("latest"),
        )
        .unwrap();
        let html = HtmlOutput::new(&report).to_html();

        assert!(html.contains("<div class=\"stale-banner\">"));
        assert!(html.contains("Baseline: none"));
        assert!(html.contains("No baseline data for this group"));
        assert!(!html.contains("class=\"summary-pass"));
    }

    #[test]
    fn test_no_regression_banner_and_improvements() {
        let baseline = snapshot("t0", 120.0);
        let current = snapshot("t1", 100.0);
        let report = assemble(&current, Some(&baseline), &RootCauses::default(), &RegressionThresholds::default());
        let html = HtmlOutput::new(&report).to_html();

        assert!(html.contains("summary-pass\">✅ No regressions detected"));
        assert!(html.contains("🚀 1 improvement(s): Trait label (-16.7%)"));
        assert!(html.contains("<td class=\"delta-positive\">-20.0</td>"));
    }

    #[test]
    fn test_delta_highlight_is_narrower_than_classification() {
        let baseline = snapshot("t0", 100.0);
        let current = snapshot("t1", 103.0);
        let report = assemble(&current, Some(&baseline), &RootCauses::default(), &RegressionThresholds::default());
        let html = HtmlOutput::new(&report).to_html();

        // +3% is neutral for the verdict but still highlighted
        assert!(html.contains("summary-pass\">✅ No regressions detected"));
        assert!(html.contains("<td class=\"delta-negative\">+3.0</td><td class=\"delta-negative\">+3.0%</td>"));

        let unchanged = snapshot("t1", 101.0);
        let report = assemble(&unchanged, Some(&baseline), &RootCauses::default(), &RegressionThresholds::default());
        let html = HtmlOutput::new(&report).to_html();
        assert!(html.contains("<td class=\"neutral\">+1.0</td><td class=\"neutral\">+1.0%</td>"));
    }

    #[test]
    fn test_delta_class_bands() {
        assert_eq!(HtmlOutput::delta_class(Some(-1.6), 1.5), "delta-positive");
        assert_eq!(HtmlOutput::delta_class(Some(1.6), 1.5), "delta-negative");
        assert_eq!(HtmlOutput::delta_class(Some(1.5), 1.5), "neutral");
        assert_eq!(HtmlOutput::delta_class(None, 1.5), "neutral");
    }

    #[test]
    fn test_fragments() {
        let current = snapshot("t1", 100.0);
        let public = assemble(&current, None, &RootCauses::default(), &RegressionThresholds::default());
        let html = HtmlOutput::new(&public)
            .with_fragment(Some("<p>hand written</p>".to_string()))
            .to_html();
        assert!(html.contains("<h2>Notes</h2>\n<p>hand written</p>"));

        let regression = assemble(&current, Some(&current), &RootCauses::default(), &RegressionThresholds::default());
        let html = HtmlOutput::new(&regression)
            .with_fragment(Some("<p>scratch</p>".to_string()))
            .to_html();
        assert!(html.contains("<div class=\"scratchpad\">\n<p>scratch</p>"));
    }

    #[test]
    fn test_escapes_snapshot_text() {
        let mut current = snapshot("t1", 100.0);
        current = current.with_class(
            BenchmarkClass::new("<script>alert('x')</script>")
                .with_group(ComparisonGroup::new("g", "G")),
        );
        let report = assemble(&current, None, &RootCauses::default(), &RegressionThresholds::default());
        let html = HtmlOutput::new(&report).to_html();
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
    }
}
