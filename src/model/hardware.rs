//! Hardware records: block devices, PCI/USB devices, RAID, network, power, sensors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A block device with a model descriptor. Source: `/sys/block/*/device/model`.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct BlockDevice {
    /// Model string reported by the device.
    pub name: Option<String>,
    pub vendor: Option<String>,
    /// Device node, e.g. `/dev/sda`.
    pub device: String,
    pub removable: bool,
    /// Completed reads (field 1 of the block stat line).
    pub reads: Option<u64>,
    /// Completed writes (field 5 of the block stat line).
    pub writes: Option<u64>,
}

/// Bus a resolved hardware device sits on.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum BusType {
    #[serde(rename = "PCI")]
    Pci,
    #[serde(rename = "USB")]
    Usb,
}

impl fmt::Display for BusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusType::Pci => write!(f, "PCI"),
            BusType::Usb => write!(f, "USB"),
        }
    }
}

/// A PCI or USB device whose IDs were found in the vendor database.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct HardwareDevice {
    pub vendor: String,
    pub device: String,
    pub bus: BusType,
}

/// State of one RAID member as flagged in `/proc/mdstat`.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RaidMemberState {
    /// No flag.
    Normal,
    /// `(S)`
    Spare,
    /// `(F)`
    Failed,
    /// Any other flag.
    Unknown,
}

/// One member drive of a software RAID array.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct RaidMember {
    /// Device node, e.g. `/dev/sda1`.
    pub device: String,
    pub state: RaidMemberState,
}

/// A software RAID array. Source: `/proc/mdstat`.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct RaidArray {
    /// Device node, e.g. `/dev/md0`.
    pub device: String,
    /// Activity state, e.g. `active`.
    pub status: String,
    pub level: u32,
    pub members: Vec<RaidMember>,
    pub blocks: u64,
    /// `level 5, 64k chunk, algorithm 2` for parity levels.
    pub algorithm: Option<String>,
    /// Working members, the second number of `[n/m]`.
    pub active_count: u32,
    /// Configured members, the first number of `[n/m]`.
    pub total_count: u32,
    /// Health bitmap exactly as reported, e.g. `UU_`.
    pub chart: String,
}

/// Operational state of a network interface. Source: `operstate`.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LinkState {
    Up,
    Down,
    #[default]
    Unknown,
}

/// Bus class of a network interface. Source: `device/modalias` prefix.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub enum InterfaceType {
    #[serde(rename = "PCI")]
    Pci,
    #[serde(rename = "USB")]
    Usb,
    #[default]
    #[serde(rename = "N/A")]
    NotAvailable,
}

/// Cumulative counters for one traffic direction.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct TrafficCounters {
    pub bytes: u64,
    pub errors: u64,
    pub packets: u64,
}

/// A network interface. Source: `/sys/class/net/*`.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct NetInterface {
    pub name: String,
    pub state: LinkState,
    #[serde(rename = "type")]
    pub kind: InterfaceType,
    pub received: TrafficCounters,
    pub sent: TrafficCounters,
}

/// A battery. Source: `/sys/class/power_supply/BAT*`.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct BatteryInfo {
    pub charge_full: u64,
    pub charge_now: u64,
    /// `None` when either charge value is zero.
    pub percentage: Option<f64>,
    /// `"<manufacturer> <model>"`.
    pub device: String,
    pub state: String,
}

impl BatteryInfo {
    /// Percentage with unit, `?%` when it could not be computed.
    pub fn percentage_label(&self) -> String {
        match self.percentage {
            Some(p) => format!("{}%", p),
            None => "?%".to_string(),
        }
    }
}

/// Link quality of one wireless interface. Source: `/proc/self/net/wireless`.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct WifiLink {
    pub device: String,
    /// Raw status word, e.g. `0000`.
    pub status: String,
    pub quality_link: f64,
    pub quality_level: f64,
    pub quality_noise: f64,
    pub discarded_nwid: u64,
    pub discarded_crypt: u64,
    pub discarded_frag: u64,
    pub discarded_retry: u64,
    pub discarded_misc: u64,
    pub missed_beacon: u64,
}

/// One sensor value reported by an external daemon.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct TemperatureReading {
    /// Sensor location, e.g. `/dev/sda` or `TEMP0`.
    pub path: String,
    /// Sensor label or drive model.
    pub name: String,
    pub value: f64,
    /// `C`, `F`, `RPM` or `V`.
    pub unit: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_battery_percentage_label() {
        let mut bat = BatteryInfo {
            percentage: Some(87.5),
            ..Default::default()
        };
        assert_eq!(bat.percentage_label(), "87.5%");

        bat.percentage = None;
        assert_eq!(bat.percentage_label(), "?%");
    }

    #[test]
    fn test_enum_serialization() {
        assert_eq!(serde_json::to_string(&BusType::Usb).unwrap(), "\"USB\"");
        assert_eq!(
            serde_json::to_string(&InterfaceType::NotAvailable).unwrap(),
            "\"N/A\""
        );
        assert_eq!(
            serde_json::to_string(&RaidMemberState::Failed).unwrap(),
            "\"failed\""
        );
        assert_eq!(serde_json::to_string(&LinkState::Up).unwrap(), "\"up\"");
    }
}
