//! The top-level snapshot produced by one collection pass.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::hardware::{
    BatteryInfo, BlockDevice, HardwareDevice, NetInterface, RaidArray, TemperatureReading,
    WifiLink,
};
use super::system::{CpuRecord, LoadAverage, MemoryInfo, MountEntry, Uptime};

/// Point-in-time description of the host.
///
/// One field per subsystem. A disabled subsystem is `None` (scalars and
/// aggregates) or an empty `Vec` (lists); a subsystem that failed has the same
/// empty value plus at least one diagnostic returned next to the snapshot.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Snapshot {
    pub collected_at: DateTime<Utc>,
    pub os: Option<String>,
    pub kernel: Option<String>,
    pub hostname: Option<String>,
    pub uptime: Option<Uptime>,
    pub load: Option<LoadAverage>,
    pub memory: Option<MemoryInfo>,
    pub cpus: Vec<CpuRecord>,
    pub disks: Vec<BlockDevice>,
    pub mounts: Vec<MountEntry>,
    pub devices: Vec<HardwareDevice>,
    pub network: Vec<NetInterface>,
    pub temps: Vec<TemperatureReading>,
    pub batteries: Vec<BatteryInfo>,
    pub raid: Vec<RaidArray>,
    pub wifi: Vec<WifiLink>,
}

impl Snapshot {
    /// An empty snapshot stamped with `collected_at`.
    pub fn empty(collected_at: DateTime<Utc>) -> Self {
        Self {
            collected_at,
            os: None,
            kernel: None,
            hostname: None,
            uptime: None,
            load: None,
            memory: None,
            cpus: Vec::new(),
            disks: Vec::new(),
            mounts: Vec::new(),
            devices: Vec::new(),
            network: Vec::new(),
            temps: Vec::new(),
            batteries: Vec::new(),
            raid: Vec::new(),
            wifi: Vec::new(),
        }
    }
}
