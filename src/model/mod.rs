//! Data model for collected snapshots.
//!
//! Every record here is produced by exactly one collector and is immutable once
//! the [`Snapshot`] is assembled. Values the kernel did not provide are `None`
//! rather than sentinel strings; presentation code decides how to render them.

mod hardware;
mod snapshot;
mod system;

pub use hardware::{
    BatteryInfo, BlockDevice, BusType, HardwareDevice, InterfaceType, LinkState, NetInterface,
    RaidArray, RaidMember, RaidMemberState, TemperatureReading, TrafficCounters, WifiLink,
};
pub use snapshot::Snapshot;
pub use system::{CpuRecord, LoadAverage, MemoryInfo, MountEntry, SwapDevice, Uptime};
