//! Shared formatting helpers for the text report.
//!
//! Pure functions only; collectors use [`format_uptime`] to build
//! `Uptime::text`, everything else is for presentation.

use std::fmt::Display;

/// Controls compact (one-line summaries) vs verbose (report body) output.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FmtStyle {
    /// Compact: no spaces, short suffixes ("1.5G")
    Compact,
    /// Detail: spaces, full suffixes ("1.5 GiB")
    Detail,
}

/// Placeholder for values the host did not report.
pub const UNKNOWN: &str = "unknown";

/// Format byte count as human-readable size.
///
/// Compact: `"1.5G"`, `"100.3M"`, `"50.0K"`, `"512B"`
/// Detail:  `"1.5 GiB"`, `"100.3 MiB"`, `"50.0 KiB"`, `"512 B"`
pub fn format_bytes(bytes: u64, style: FmtStyle) -> String {
    let (t, g, m, k, b) = match style {
        FmtStyle::Compact => ("T", "G", "M", "K", "B"),
        FmtStyle::Detail => (" TiB", " GiB", " MiB", " KiB", " B"),
    };
    let f = bytes as f64;
    if bytes >= 1 << 40 {
        format!("{:.1}{}", f / (1u64 << 40) as f64, t)
    } else if bytes >= 1 << 30 {
        format!("{:.1}{}", f / (1u64 << 30) as f64, g)
    } else if bytes >= 1 << 20 {
        format!("{:.1}{}", f / (1u64 << 20) as f64, m)
    } else if bytes >= 1 << 10 {
        format!("{:.1}{}", f / 1024.0, k)
    } else {
        format!("{}{}", bytes, b)
    }
}

/// Format uptime in seconds as `"1 day, 3 hours, 46 minutes, 40 seconds"`.
///
/// Zero units are left out; `0` seconds is `"0 seconds"`.
pub fn format_uptime(secs: u64) -> String {
    let units = [
        (secs / 31_536_000, "year"),
        (secs % 31_536_000 / 86_400, "day"),
        (secs % 86_400 / 3_600, "hour"),
        (secs % 3_600 / 60, "minute"),
        (secs % 60, "second"),
    ];
    let parts: Vec<String> = units
        .iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, unit)| format!("{} {}{}", n, unit, if *n == 1 { "" } else { "s" }))
        .collect();
    if parts.is_empty() {
        "0 seconds".to_string()
    } else {
        parts.join(", ")
    }
}

/// Formats `Some(v)` with `f`, `None` as [`UNKNOWN`].
pub fn or_unknown<T>(value: Option<T>, f: impl FnOnce(T) -> String) -> String {
    value.map(f).unwrap_or_else(|| UNKNOWN.to_string())
}

/// Displays `Some(v)`, or [`UNKNOWN`].
pub fn display_or_unknown<T: Display>(value: Option<T>) -> String {
    or_unknown(value, |v| v.to_string())
}

/// Optional byte count; see [`format_bytes`].
pub fn format_opt_bytes(bytes: Option<u64>, style: FmtStyle) -> String {
    or_unknown(bytes, |b| format_bytes(b, style))
}

/// Optional whole percentage, `"75%"`.
pub fn format_opt_percent(percent: Option<f64>) -> String {
    or_unknown(percent, |p| format!("{}%", p))
}
