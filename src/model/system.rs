//! OS-level records: memory, processors, mounts, load and uptime.

use serde::{Deserialize, Serialize};

/// Physical memory and swap usage. Source: `/proc/meminfo`, `/proc/swaps`.
///
/// All values are bytes (kernel kibibytes multiplied by 1024).
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct MemoryInfo {
    pub total: u64,
    pub free: u64,
    pub swap_total: u64,
    pub swap_free: u64,
    pub swap_cached: u64,
    /// Active swap areas in `/proc/swaps` order.
    pub swaps: Vec<SwapDevice>,
}

/// One active swap area.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct SwapDevice {
    pub device: String,
    /// `partition` or `file`.
    #[serde(rename = "type")]
    pub kind: String,
    pub size: u64,
    pub used: u64,
}

/// One logical processor. Source: `/proc/cpuinfo` stanza.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct CpuRecord {
    pub vendor: Option<String>,
    pub model: Option<String>,
    pub mhz: Option<f64>,
}

/// A mounted filesystem with its capacity. Source: `/proc/mounts` + statvfs.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct MountEntry {
    /// Resolved symlink target of the mount source, or the raw source.
    pub device: String,
    pub mount_point: String,
    pub fs_type: String,
    pub size: Option<u64>,
    pub used: Option<u64>,
    pub free: Option<u64>,
    pub used_percent: Option<f64>,
    pub free_percent: Option<f64>,
}

/// System load averages. Source: `/proc/loadavg`.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct LoadAverage {
    pub now: f64,
    #[serde(rename = "5min")]
    pub five_min: f64,
    #[serde(rename = "15min")]
    pub fifteen_min: f64,
}

/// Time since boot. Source: `/proc/uptime`.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct Uptime {
    /// Whole seconds, rounded up.
    pub seconds: u64,
    /// Human-readable rendering, e.g. `"2 days, 4 hours, 1 minute"`.
    pub text: String,
}
