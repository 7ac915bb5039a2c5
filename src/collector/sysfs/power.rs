//! Batteries from `/sys/class/power_supply/BAT*`.

use std::path::{Path, PathBuf};

use crate::collector::reader::PseudoFileReader;
use crate::collector::traits::FileSystem;
use crate::model::BatteryInfo;

pub struct BatteryCollector<F: FileSystem> {
    fs: F,
    sys_path: PathBuf,
}

impl<F: FileSystem> BatteryCollector<F> {
    pub fn new(fs: F, sys_path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            sys_path: sys_path.into(),
        }
    }

    /// Batteries in name order. A host without batteries yields an empty list.
    pub fn collect(&self) -> Vec<BatteryInfo> {
        let reader = PseudoFileReader::new(&self.fs);
        reader
            .matching(&self.sys_path.join("class/power_supply"), "BAT*")
            .iter()
            .map(|dir| battery(&reader, dir))
            .collect()
    }
}

fn battery<F: FileSystem>(reader: &PseudoFileReader<'_, F>, dir: &Path) -> BatteryInfo {
    let charge_full = reader.read_u64(&dir.join("charge_full"));
    let charge_now = reader.read_u64(&dir.join("charge_now"));
    let device = format!(
        "{} {}",
        reader.read_or(&dir.join("manufacturer"), ""),
        reader.read_or(&dir.join("model_name"), "Unknown")
    );

    BatteryInfo {
        charge_full,
        charge_now,
        percentage: charge_percentage(charge_now, charge_full),
        device: device.trim().to_string(),
        state: reader.read_or(&dir.join("status"), "Unknown"),
    }
}

/// Charge level in percent with two decimals, `None` when either value is zero.
pub fn charge_percentage(now: u64, full: u64) -> Option<f64> {
    if now == 0 || full == 0 {
        return None;
    }
    Some((now as f64 / full as f64 * 10_000.0).round() / 100.0)
}
