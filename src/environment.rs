//! Host environment metadata attached to every snapshot document
//!
//! The analyzer never looks inside an [`Environment`]; it is carried through to
//! the report so readers know which machine produced the numbers.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::process::Command;
use std::sync::OnceLock;
use sysinfo::System;

/// Environment description as stored in snapshot documents
///
/// Unknown keys from stored documents are kept in `extra` and written back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Environment {
    pub os: String,
    pub os_slug: String,
    pub cpu: String,
    pub cpu_id: String,
    pub cores_logical: u64,
    pub dotnet_sdk: String,
    pub runtime: String,
    pub benchmark_dot_net: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Environment {
    /// Label/value pairs shown in the report's environment table, skipping empty values
    pub fn display_rows(&self) -> Vec<(&'static str, String)> {
        let cores = if self.cores_logical > 0 {
            self.cores_logical.to_string()
        } else {
            String::new()
        };
        [
            ("CPU", self.cpu.clone()),
            ("OS", self.os.clone()),
            ("Logical Cores", cores),
            (".NET SDK", self.dotnet_sdk.clone()),
            ("Runtime", self.runtime.clone()),
            ("BenchmarkDotNet", self.benchmark_dot_net.clone()),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .collect()
    }
}

/// Detect the current host
///
/// `runtime` and `benchmark_dot_net` are left empty; they come from the
/// benchmark run artifacts, not the host.
pub fn detect() -> Environment {
    let mut sys = System::new_all();
    sys.refresh_cpu_all();

    let cpu = sys
        .cpus()
        .first()
        .map(|cpu| cpu.brand().trim().to_string())
        .filter(|brand| !brand.is_empty())
        .unwrap_or_else(|| "Unknown".to_string());

    let os = System::long_os_version().unwrap_or_else(|| {
        format!(
            "{} {}",
            System::name().unwrap_or_else(|| "Unknown".to_string()),
            System::os_version().unwrap_or_default()
        )
        .trim()
        .to_string()
    });

    let env = Environment {
        os,
        os_slug: os_slug().to_string(),
        cpu_id: slugify_cpu(&cpu),
        cpu,
        cores_logical: sys.cpus().len() as u64,
        dotnet_sdk: dotnet_sdk_version(),
        ..Environment::default()
    };
    tracing::debug!(cpu = %env.cpu, os = %env.os, "detected host environment");
    env
}

/// Short OS identifier used in snapshot file names
pub fn os_slug() -> &'static str {
    match std::env::consts::OS {
        "macos" => "macos",
        "linux" => "linux",
        "windows" => "windows",
        other => other,
    }
}

fn dotnet_sdk_version() -> String {
    match Command::new("dotnet").arg("--version").output() {
        Ok(output) if output.status.success() => {
            String::from_utf8_lossy(&output.stdout).trim().to_string()
        }
        Ok(_) | Err(_) => {
            tracing::debug!("dotnet --version unavailable");
            "unknown".to_string()
        }
    }
}

/// Known CPU families and their slug templates
const CPU_PATTERNS: [(&str, &str); 4] = [
    (r"apple\s+m(\d+)\s*(pro|max|ultra)?", "apple-m${1}-${2}"),
    (r"intel.*core.*i(\d+)-(\w+)", "intel-i${1}-${2}"),
    (r"amd\s+ryzen\s+(\d+)\s+(\w+)", "amd-ryzen-${1}-${2}"),
    (r"intel.*xeon.*w-(\w+)", "xeon-w-${1}"),
];

/// Compiled CPU patterns, built on first use
fn cpu_patterns() -> &'static [(Regex, &'static str)] {
    static PATTERNS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        CPU_PATTERNS
            .iter()
            .filter_map(|(pattern, template)| Regex::new(pattern).ok().map(|re| (re, *template)))
            .collect()
    })
}

fn non_slug_chars() -> Option<&'static Regex> {
    static NON_SLUG: OnceLock<Option<Regex>> = OnceLock::new();
    NON_SLUG.get_or_init(|| Regex::new(r"[^a-z0-9]+").ok()).as_ref()
}

/// Convert a CPU brand string into a file-name friendly slug
///
/// # Example
/// ```
/// use benchlens::environment::slugify_cpu;
///
/// assert_eq!(slugify_cpu("Apple M4 Max"), "apple-m4-max");
/// ```
pub fn slugify_cpu(name: &str) -> String {
    let name = name.to_lowercase();

    for (re, template) in cpu_patterns() {
        if let Some(caps) = re.captures(&name) {
            let mut slug = String::new();
            caps.expand(template, &mut slug);
            let slug = slug.trim_matches('-').trim();
            return slug
                .chars()
                .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
                .collect();
        }
    }

    let generic = non_slug_chars()
        .map(|re| re.replace_all(&name, "-").trim_matches('-').to_string())
        .unwrap_or_default();
    if generic.is_empty() {
        "unknown-cpu".to_string()
    } else {
        generic.chars().take(40).collect()
    }
}
