//! Parsers for `/proc` filesystem files.
//!
//! These are pure functions that parse the content of various `/proc` files
//! into structured data. They are designed to be easily testable with string inputs.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

pub use crate::collector::error::ParseError;
use crate::model::{CpuRecord, LoadAverage, WifiLink};

static KERNEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Linux version (\S+)").expect("kernel version regex"));

static MEMINFO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^([^:\n]+):\s+(\d+)\s*(?:[kK][bB])?\s*$").expect("meminfo regex")
});

// Exactly one trailing numeric pair; spaces inside fields are octal-escaped by the kernel.
static MOUNTS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(\S+) (\S+) (\S+) (\S+) \d+ \d+$").expect("mounts regex")
});

static WIRELESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^\s*(\S+):\s*(\d+)\s+(\S+)\s+(\S+)\s+(\S+)\s+(\d+)\s+(\d+)\s+(\d+)\s+(\d+)\s+(\d+)\s+(\d+)\s*$",
    )
    .expect("wireless regex")
});

/// Parses the kernel release out of `/proc/version`.
pub fn parse_kernel_version(content: &str) -> Result<String, ParseError> {
    KERNEL_RE
        .captures(content.trim_start())
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| ParseError::new("expected 'Linux version <release> ...'"))
}

/// Selected `/proc/meminfo` values, in kibibytes.
///
/// Keys missing from the file stay `0`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemInfo {
    pub mem_total: u64,
    pub mem_free: u64,
    pub swap_total: u64,
    pub swap_free: u64,
    pub swap_cached: u64,
}

/// Parses `/proc/meminfo` content.
///
/// Lines are `Key:   value [kB]`; the unit suffix is optional.
pub fn parse_meminfo(content: &str) -> Result<MemInfo, ParseError> {
    let values: HashMap<&str, u64> = MEMINFO_RE
        .captures_iter(content)
        .filter_map(|caps| {
            let key = caps.get(1)?.as_str().trim();
            let value = caps.get(2)?.as_str().parse().ok()?;
            Some((key, value))
        })
        .collect();

    if values.is_empty() {
        return Err(ParseError::new("no 'Key: value' lines in meminfo"));
    }

    let get = |key: &str| values.get(key).copied().unwrap_or(0);
    Ok(MemInfo {
        mem_total: get("MemTotal"),
        mem_free: get("MemFree"),
        swap_total: get("SwapTotal"),
        swap_free: get("SwapFree"),
        swap_cached: get("SwapCached"),
    })
}

/// One row of `/proc/swaps`, sizes in kibibytes.
#[derive(Debug, Clone, PartialEq)]
pub struct SwapEntry {
    pub device: String,
    pub kind: String,
    pub size_kb: u64,
    pub used_kb: u64,
}

/// Parses `/proc/swaps`. The header and any malformed row are skipped.
pub fn parse_swaps(content: &str) -> Vec<SwapEntry> {
    content
        .lines()
        .filter_map(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 4 {
                return None;
            }
            Some(SwapEntry {
                device: parts[0].to_string(),
                kind: parts[1].to_string(),
                size_kb: parts[2].parse().ok()?,
                used_kb: parts[3].parse().ok()?,
            })
        })
        .collect()
}

/// Key/value fields of one `/proc/cpuinfo` stanza.
pub type CpuStanza = HashMap<String, String>;

/// Splits `/proc/cpuinfo` into per-processor stanzas.
///
/// A stanza ends at a blank line that follows at least one field; the last
/// stanza is kept even without a trailing blank line. Fields split on the
/// first colon, both sides trimmed; fields with an empty side are ignored.
pub fn parse_cpuinfo(content: &str) -> Result<Vec<CpuStanza>, ParseError> {
    let mut stanzas = Vec::new();
    let mut current = CpuStanza::new();

    for line in content.trim().lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                stanzas.push(std::mem::take(&mut current));
            }
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());
        if key.is_empty() || value.is_empty() {
            continue;
        }
        current.insert(key.to_string(), value.to_string());
    }

    if !current.is_empty() {
        stanzas.push(current);
    }

    if stanzas.is_empty() {
        return Err(ParseError::new("no processor entries"));
    }
    Ok(stanzas)
}

/// Builds a [`CpuRecord`] from one stanza.
///
/// Resolution order matters because architectures expose the data under
/// different keys:
/// - vendor: `vendor_id`
/// - frequency: `cpu MHz`, else `Cpu0ClkTck` (hexadecimal Hz) / 1e6
/// - model: `model name`, else `cpu`
pub fn cpu_record(stanza: &CpuStanza) -> CpuRecord {
    let vendor = stanza.get("vendor_id").cloned();

    let mhz = stanza
        .get("cpu MHz")
        .and_then(|v| v.parse::<f64>().ok())
        .or_else(|| {
            stanza.get("Cpu0ClkTck").and_then(|v| {
                let hex = v.trim_start_matches("0x").trim_start_matches("0X");
                u64::from_str_radix(hex, 16)
                    .ok()
                    .map(|hz| hz as f64 / 1_000_000.0)
            })
        });

    let model = stanza
        .get("model name")
        .or_else(|| stanza.get("cpu"))
        .cloned();

    CpuRecord { vendor, model, mhz }
}

/// Parses `/proc/uptime` into whole seconds, rounded up.
pub fn parse_uptime(content: &str) -> Result<u64, ParseError> {
    let seconds: f64 = content
        .split_whitespace()
        .next()
        .ok_or_else(|| ParseError::new("empty uptime"))?
        .parse()
        .map_err(|_| ParseError::new("invalid uptime seconds"))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(ParseError::new("invalid uptime seconds"));
    }
    Ok(seconds.ceil() as u64)
}

/// Parses `/proc/loadavg` content.
///
/// Only the three averages are used; the running/total and last-pid fields are ignored.
pub fn parse_loadavg(content: &str) -> Result<LoadAverage, ParseError> {
    let parts: Vec<&str> = content.split_whitespace().collect();
    if parts.len() < 3 {
        return Err(ParseError::new("invalid loadavg format"));
    }

    let now = parts[0]
        .parse()
        .map_err(|_| ParseError::new("invalid load1"))?;
    let five_min = parts[1]
        .parse()
        .map_err(|_| ParseError::new("invalid load5"))?;
    let fifteen_min = parts[2]
        .parse()
        .map_err(|_| ParseError::new("invalid load15"))?;

    Ok(LoadAverage {
        now,
        five_min,
        fifteen_min,
    })
}

/// One row of `/proc/mounts`.
#[derive(Debug, Clone, PartialEq)]
pub struct MountLine {
    pub source: String,
    /// Mount point with octal escapes decoded.
    pub mount_point: String,
    pub fs_type: String,
    pub options: String,
}

/// Parses `/proc/mounts`. Rows that do not have the six-field shape are skipped.
pub fn parse_mounts(content: &str) -> Vec<MountLine> {
    MOUNTS_RE
        .captures_iter(content)
        .map(|caps| MountLine {
            source: caps[1].to_string(),
            mount_point: unescape_octal(&caps[2]),
            fs_type: caps[3].to_string(),
            options: caps[4].to_string(),
        })
        .collect()
}

/// Decodes the kernel's `\NNN` octal escapes (e.g. `\040` for space) and `\\`.
pub fn unescape_octal(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'\\' {
            let octal = bytes.get(i + 1..i + 4).filter(|d| d.iter().all(|b| (b'0'..=b'7').contains(b)));
            if let Some(digits) = octal {
                let value = digits
                    .iter()
                    .fold(0u32, |acc, d| acc * 8 + u32::from(d - b'0'));
                if let Ok(byte) = u8::try_from(value) {
                    out.push(byte);
                    i += 4;
                    continue;
                }
            }
            if bytes.get(i + 1) == Some(&b'\\') {
                out.push(b'\\');
                i += 2;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

/// Parses `/proc/net/wireless`.
///
/// Quality columns may carry a trailing `.` marking an updated value; it is
/// stripped. Rows whose quality columns are not numeric are skipped.
pub fn parse_wireless(content: &str) -> Vec<WifiLink> {
    let quality = |s: &str| s.trim_end_matches('.').parse::<f64>().ok();

    WIRELESS_RE
        .captures_iter(content)
        .filter_map(|caps| {
            let counter = |idx: usize| caps[idx].parse::<u64>().ok();
            Some(WifiLink {
                device: caps[1].to_string(),
                status: caps[2].to_string(),
                quality_link: quality(&caps[3])?,
                quality_level: quality(&caps[4])?,
                quality_noise: quality(&caps[5])?,
                discarded_nwid: counter(6)?,
                discarded_crypt: counter(7)?,
                discarded_frag: counter(8)?,
                discarded_retry: counter(9)?,
                discarded_misc: counter(10)?,
                missed_beacon: counter(11)?,
            })
        })
        .collect()
}
