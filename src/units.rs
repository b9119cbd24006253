//! Unit normalization for raw benchmark result strings
//!
//! BenchmarkDotNet prints timings as magnitude-plus-unit strings (`"1,234.5 ns"`,
//! `"150.0 ms"`, `"12.3 µs"`) and allocations as `"1.5 KB"`. Everything in this
//! crate works in microseconds and bytes, so raw strings are converted here once
//! and never re-parsed downstream.
//!
//! Parsing never fails loudly: an unrecognized or malformed value becomes absent
//! (`None`) for timings and `0` for allocations.

/// Placeholder rendered for an absent value
pub const ABSENT: &str = "—";

/// Time units understood by [`parse_time`] and [`format_time`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Nanos,
    Micros,
    Millis,
    Seconds,
}

impl TimeUnit {
    /// Canonical ASCII suffix for this unit
    pub fn suffix(self) -> &'static str {
        match self {
            TimeUnit::Nanos => "ns",
            TimeUnit::Micros => "us",
            TimeUnit::Millis => "ms",
            TimeUnit::Seconds => "s",
        }
    }

    /// Convert a magnitude expressed in this unit to microseconds
    pub fn to_micros(self, value: f64) -> f64 {
        match self {
            TimeUnit::Nanos => value / 1_000.0,
            TimeUnit::Micros => value,
            TimeUnit::Millis => value * 1_000.0,
            TimeUnit::Seconds => value * 1_000_000.0,
        }
    }

    /// Convert a microsecond value to a magnitude in this unit
    pub fn from_micros(self, micros: f64) -> f64 {
        match self {
            TimeUnit::Nanos => micros * 1_000.0,
            TimeUnit::Micros => micros,
            TimeUnit::Millis => micros / 1_000.0,
            TimeUnit::Seconds => micros / 1_000_000.0,
        }
    }

    /// Decimals needed to keep 3-decimal microsecond precision
    fn decimals(self) -> usize {
        match self {
            TimeUnit::Nanos => 0,
            TimeUnit::Micros => 3,
            TimeUnit::Millis => 6,
            TimeUnit::Seconds => 9,
        }
    }
}

/// Suffix lookup table, most specific first.
///
/// Every two-letter token is checked before the bare `s`, otherwise `"150 ms"`
/// would be read as 150 seconds of a malformed magnitude.
const TIME_SUFFIXES: [(&str, TimeUnit); 4] = [
    ("ns", TimeUnit::Nanos),
    ("us", TimeUnit::Micros),
    ("ms", TimeUnit::Millis),
    ("s", TimeUnit::Seconds),
];

/// Allocation suffixes with their byte multipliers, most specific first
const BYTE_SUFFIXES: [(&str, u64); 4] = [
    ("GB", 1024 * 1024 * 1024),
    ("MB", 1024 * 1024),
    ("KB", 1024),
    ("B", 1),
];

fn is_missing(s: &str) -> bool {
    s.is_empty() || s == "NA" || s == "N/A"
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Parse a timing string into microseconds
///
/// Returns `None` for empty, `NA`, `N/A` and anything that does not parse.
/// Thousands separators are ignored and any micro sign is accepted for `us`.
/// The result is rounded to 3 decimals.
///
/// # Example
/// ```
/// use benchlens::units::parse_time;
///
/// assert_eq!(parse_time("150.0 ms"), Some(150_000.0));
/// assert_eq!(parse_time("2,500 ns"), Some(2.5));
/// assert_eq!(parse_time("NA"), None);
/// ```
pub fn parse_time(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if is_missing(trimmed) {
        return None;
    }

    let normalized = trimmed
        .replace(',', "")
        .replace("\u{00b5}s", "us")
        .replace("\u{03bc}s", "us");
    let normalized = normalized.trim();

    for (suffix, unit) in TIME_SUFFIXES {
        if let Some(magnitude) = normalized.strip_suffix(suffix) {
            return parse_number(magnitude)
                .map(|v| round_to(unit.to_micros(v), 3))
                .filter(|v| v.is_finite());
        }
    }

    parse_number(normalized)
        .map(|v| round_to(v, 3))
        .filter(|v| v.is_finite())
}

/// Parse an allocation string into bytes
///
/// `""`, `"-"` and `"NA"` are zero, as is anything malformed. Zero therefore
/// means both "nothing allocated" and "not measured".
///
/// # Example
/// ```
/// use benchlens::units::parse_bytes;
///
/// assert_eq!(parse_bytes("1.5 KB"), 1536);
/// assert_eq!(parse_bytes("-"), 0);
/// ```
pub fn parse_bytes(raw: &str) -> u64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "-" || trimmed == "NA" {
        return 0;
    }

    let normalized = trimmed.replace(',', "");
    let (magnitude, multiplier) = BYTE_SUFFIXES
        .iter()
        .find_map(|(suffix, mult)| normalized.strip_suffix(suffix).map(|m| (m, *mult)))
        .unwrap_or((normalized.as_str(), 1));

    match parse_number(magnitude) {
        Some(v) if v >= 0.0 => (v * multiplier as f64) as u64,
        _ => 0,
    }
}

/// Parse a throughput column (GB/s), rounded to 2 decimals
pub fn parse_throughput(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if is_missing(trimmed) {
        return None;
    }
    parse_number(&trimmed.replace(',', "")).map(|v| round_to(v, 2))
}

/// Insert thousands separators into a formatted decimal number
pub(crate) fn group_thousands(formatted: &str) -> String {
    let (sign, digits) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

/// Format a microsecond value in the given unit, the way result tables print it
///
/// Output re-parses through [`parse_time`] to the same value within 0.001 µs.
pub fn format_time(micros: f64, unit: TimeUnit) -> String {
    let magnitude = unit.from_micros(micros);
    let number = format!("{:.*}", unit.decimals(), magnitude);
    format!("{} {}", group_thousands(&number), unit.suffix())
}

/// Display a microsecond value with one decimal, e.g. `"1,234.5 µs"`
pub fn fmt_us(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{} µs", group_thousands(&format!("{:.1}", v))),
        None => ABSENT.to_string(),
    }
}

/// Display a signed microsecond delta with one decimal, e.g. `"+2.8"`
pub fn fmt_delta(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:+.1}", v),
        None => ABSENT.to_string(),
    }
}

/// Display a signed percentage with one decimal, e.g. `"-6.0%"`
pub fn fmt_percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:+.1}%", v),
        None => ABSENT.to_string(),
    }
}

/// Display throughput in GB/s with two decimals
pub fn fmt_gbs(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => ABSENT.to_string(),
    }
}

/// Display an allocation size
pub fn fmt_alloc(bytes: u64) -> String {
    if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}
