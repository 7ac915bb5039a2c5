//! Main collector that runs every enabled subsystem into one `Snapshot`.
//!
//! Subsystems are independent: a failure in one becomes a diagnostic and
//! leaves its field empty, the others still run. The only fatal condition
//! is a missing `/proc` or `/sys` root, detected in [`Collector::new`].

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::debug;

use crate::collector::devices::{DeviceCollector, IdDatabases};
use crate::collector::diagnostics::{CORE, Diagnostics, MDSTAT, WIFI};
use crate::collector::error::CollectError;
use crate::collector::procfs::{MountCollector, MountFilter, RaidCollector, SystemCollector};
use crate::collector::sysfs::{BatteryCollector, NetworkCollector, StorageCollector};
use crate::collector::temps::TemperatureAggregator;
use crate::collector::traits::FileSystem;
use crate::config::{Config, PathsConfig};
use crate::model::Snapshot;

/// Timing information for each collector phase.
///
/// Disabled phases stay at `Duration::ZERO`.
#[derive(Debug, Clone, Default)]
pub struct CollectorTiming {
    /// Total snapshot collection time.
    pub total: Duration,
    /// OS name, kernel release and hostname.
    pub os: Duration,
    pub uptime: Duration,
    pub load: Duration,
    /// `/proc/meminfo` and `/proc/swaps`.
    pub memory: Duration,
    pub cpu: Duration,
    /// Block devices under `/sys/block`.
    pub storage: Duration,
    /// Mount table and capacity probes.
    pub mounts: Duration,
    /// PCI/USB discovery and vendor database lookup.
    pub devices: Duration,
    pub network: Duration,
    pub battery: Duration,
    pub raid: Duration,
    pub wifi: Duration,
    /// External temperature collaborators.
    pub temps: Duration,
}

/// Runs `f` and adds its wall time to `slot`.
fn timed<T>(slot: &mut Duration, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let value = f();
    *slot += start.elapsed();
    value
}

/// Turns a subsystem failure into a diagnostic.
fn soft<T>(result: Result<T, CollectError>, subsystem: &str, diagnostics: &mut Diagnostics) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            diagnostics.record(subsystem, e.to_string());
            None
        }
    }
}

/// Collects a complete host snapshot through a [`FileSystem`].
pub struct Collector<F: FileSystem + Clone> {
    system: SystemCollector<F>,
    mounts: MountCollector<F>,
    raid: RaidCollector<F>,
    storage: StorageCollector<F>,
    network: NetworkCollector<F>,
    battery: BatteryCollector<F>,
    devices: DeviceCollector<F>,
    /// Filesystem handed to log-based temperature sources.
    logs: Arc<dyn FileSystem>,
    /// Replaces the sources built from `Config::temps` when set.
    temperatures: Option<TemperatureAggregator>,
    /// Timing information from the last collect_snapshot call.
    last_timing: Option<CollectorTiming>,
}

impl<F: FileSystem + Clone + 'static> Collector<F> {
    /// Creates a new collector.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `paths` - Roots of `/proc` and `/sys` and the vendor database files
    ///
    /// Fails with [`CollectError::MissingRoot`] when either root is not a directory.
    pub fn new(fs: F, paths: &PathsConfig) -> Result<Self, CollectError> {
        for root in [&paths.proc, &paths.sys] {
            if !fs.is_dir(root) {
                return Err(CollectError::MissingRoot { path: root.clone() });
            }
        }

        let proc_path: &PathBuf = &paths.proc;
        let sys_path: &PathBuf = &paths.sys;
        let databases = IdDatabases {
            pci: paths.pci_ids.clone(),
            usb: paths.usb_ids.clone(),
        };

        Ok(Self {
            system: SystemCollector::new(fs.clone(), proc_path),
            mounts: MountCollector::new(fs.clone(), proc_path),
            raid: RaidCollector::new(fs.clone(), proc_path),
            storage: StorageCollector::new(fs.clone(), sys_path),
            network: NetworkCollector::new(fs.clone(), sys_path),
            battery: BatteryCollector::new(fs.clone(), sys_path),
            devices: DeviceCollector::new(fs.clone(), sys_path, databases),
            logs: Arc::new(fs),
            temperatures: None,
            last_timing: None,
        })
    }

    /// Uses `aggregator` instead of the daemons configured in `Config::temps`.
    pub fn with_temperature_sources(mut self, aggregator: TemperatureAggregator) -> Self {
        self.temperatures = Some(aggregator);
        self
    }

    /// Returns timing information from the last collect_snapshot call.
    pub fn last_timing(&self) -> Option<&CollectorTiming> {
        self.last_timing.as_ref()
    }

    /// Collects every subsystem enabled in `config`.
    ///
    /// Never fails: problems are returned as diagnostics next to the snapshot.
    /// Also records timing information accessible via `last_timing()`.
    pub fn collect_snapshot(&mut self, config: &Config) -> (Snapshot, Diagnostics) {
        let total_start = Instant::now();
        let mut timing = CollectorTiming::default();
        let mut diags = Diagnostics::new();
        let mut snapshot = Snapshot::empty(Utc::now());
        let show = &config.show;

        if show.os {
            snapshot.os = Some(self.system.collect_os());
        }
        if show.kernel {
            let kernel = timed(&mut timing.os, || self.system.collect_kernel());
            snapshot.kernel = soft(kernel, CORE, &mut diags);
        }
        if show.hostname {
            let hostname = timed(&mut timing.os, || self.system.collect_hostname());
            snapshot.hostname = soft(hostname, CORE, &mut diags);
        }
        if show.uptime {
            let uptime = timed(&mut timing.uptime, || self.system.collect_uptime());
            snapshot.uptime = soft(uptime, CORE, &mut diags);
        }
        if show.load {
            let load = timed(&mut timing.load, || self.system.collect_loadavg());
            snapshot.load = soft(load, CORE, &mut diags);
        }
        if show.ram {
            let memory = timed(&mut timing.memory, || self.system.collect_memory());
            snapshot.memory = soft(memory, CORE, &mut diags);
        }
        if show.cpu {
            let cpus = timed(&mut timing.cpu, || self.system.collect_cpus());
            snapshot.cpus = soft(cpus, CORE, &mut diags).unwrap_or_default();
        }
        if show.hd {
            let disks = timed(&mut timing.storage, || self.storage.collect());
            snapshot.disks = soft(disks, CORE, &mut diags).unwrap_or_default();
        }
        if show.mounts {
            let filter = MountFilter {
                devices: &config.hide.storage_devices,
                fs_types: &config.hide.filesystems,
            };
            let mounts = timed(&mut timing.mounts, || self.mounts.collect(filter));
            snapshot.mounts = soft(mounts, CORE, &mut diags).unwrap_or_default();
        }
        if show.devices {
            snapshot.devices = timed(&mut timing.devices, || self.devices.collect(&mut diags));
        }
        if show.network {
            let network = timed(&mut timing.network, || self.network.collect());
            snapshot.network = soft(network, CORE, &mut diags).unwrap_or_default();
        }
        if show.battery {
            snapshot.batteries = timed(&mut timing.battery, || self.battery.collect());
        }
        if show.raid && config.raid.mdadm {
            let raid = timed(&mut timing.raid, || self.raid.collect(&mut diags));
            snapshot.raid = soft(raid, MDSTAT, &mut diags).unwrap_or_default();
        }
        if show.wifi {
            let wifi = timed(&mut timing.wifi, || self.system.collect_wifi());
            snapshot.wifi = soft(wifi, WIFI, &mut diags).unwrap_or_default();
        }
        if show.temps {
            let configured;
            let aggregator = match &self.temperatures {
                Some(aggregator) => aggregator,
                None => {
                    configured =
                        TemperatureAggregator::from_config(&config.temps, Arc::clone(&self.logs));
                    &configured
                }
            };
            snapshot.temps = timed(&mut timing.temps, || aggregator.collect(&mut diags));
        }

        timing.total = total_start.elapsed();
        debug!(
            total_ms = timing.total.as_millis() as u64,
            devices_ms = timing.devices.as_millis() as u64,
            mounts_ms = timing.mounts.as_millis() as u64,
            diagnostics = diags.len(),
            "snapshot collected"
        );
        self.last_timing = Some(timing);

        (snapshot, diags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::MockFs;
    use crate::config::ShowConfig;
    use crate::model::{LoadAverage, RaidMemberState};

    fn collector(fs: MockFs) -> Collector<MockFs> {
        Collector::new(fs, &PathsConfig::default()).unwrap()
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let mut fs = MockFs::new();
        fs.add_dir("/proc");
        let err = Collector::new(fs, &PathsConfig::default()).err().unwrap();
        assert!(matches!(err, CollectError::MissingRoot { ref path } if path == &PathBuf::from("/sys")));
        assert!(err.to_string().contains("/sys"));
    }

    #[test]
    fn test_collect_snapshot_typical_host() {
        let mut collector = collector(MockFs::typical_host());
        let (snapshot, diags) = collector.collect_snapshot(&Config::default());

        assert_eq!(snapshot.os.as_deref(), Some("Linux"));
        assert_eq!(snapshot.kernel.as_deref(), Some("6.1.0-18-amd64"));
        assert_eq!(snapshot.hostname.as_deref(), Some("box01"));
        assert_eq!(
            snapshot.load,
            Some(LoadAverage {
                now: 0.10,
                five_min: 0.20,
                fifteen_min: 0.30
            })
        );
        assert_eq!(snapshot.memory.as_ref().map(|m| m.total), Some(16384000 * 1024));
        assert_eq!(snapshot.cpus.len(), 2);
        assert_eq!(snapshot.disks.len(), 2);
        // proc, sysfs and tmpfs are hidden by default
        assert_eq!(snapshot.mounts.len(), 3);
        assert_eq!(snapshot.devices.len(), 4);
        assert_eq!(snapshot.network.len(), 4);
        assert_eq!(snapshot.batteries.len(), 1);
        assert_eq!(snapshot.raid.len(), 2);
        assert_eq!(snapshot.raid[0].members[3].state, RaidMemberState::Failed);
        assert_eq!(snapshot.wifi.len(), 1);
        assert!(snapshot.temps.is_empty());
        assert!(diags.is_empty(), "unexpected diagnostics: {:?}", diags);

        let timing = collector.last_timing().unwrap();
        assert!(timing.total >= timing.devices);
    }

    #[test]
    fn test_failures_are_isolated() {
        let mut collector = collector(MockFs::degraded_host());
        let (snapshot, diags) = collector.collect_snapshot(&Config::default());

        assert_eq!(snapshot.kernel, None);
        assert_eq!(snapshot.hostname, None);
        assert_eq!(snapshot.load, None);
        assert_eq!(snapshot.memory, None);
        assert!(snapshot.network.is_empty());
        assert!(snapshot.wifi.is_empty());

        // the rest still produced data
        assert_eq!(snapshot.cpus.len(), 1);
        assert_eq!(snapshot.disks.len(), 1);
        assert_eq!(snapshot.mounts.len(), 1);
        assert_eq!(snapshot.batteries.len(), 1);

        assert!(diags.for_subsystem(CORE).count() >= 5);
        assert_eq!(diags.for_subsystem(MDSTAT).count(), 1);
        assert_eq!(diags.for_subsystem(WIFI).count(), 1);
        assert_eq!(diags.for_subsystem("devices").count(), 1);
    }

    #[test]
    fn test_disabled_subsystems_do_no_io() {
        let fs = MockFs::typical_host();
        let mut collector = collector(fs.clone());
        fs.clear_access_log();

        let config = Config {
            show: ShowConfig::all(false),
            ..Config::default()
        };
        let (snapshot, diags) = collector.collect_snapshot(&config);

        assert_eq!(fs.read_count(), 0, "reads: {:?}", fs.accessed());
        assert!(fs.probed().is_empty());
        assert_eq!(snapshot.os, None);
        assert_eq!(snapshot.memory, None);
        assert!(snapshot.cpus.is_empty());
        assert!(snapshot.mounts.is_empty());
        assert!(snapshot.devices.is_empty());
        assert!(snapshot.raid.is_empty());
        assert!(diags.is_empty());
    }

    #[test]
    fn test_single_disabled_subsystem_is_not_read() {
        let fs = MockFs::typical_host();
        let mut collector = collector(fs.clone());

        let mut config = Config::default();
        config.show.raid = false;
        config.show.devices = false;
        let (snapshot, _) = collector.collect_snapshot(&config);

        assert!(snapshot.raid.is_empty());
        assert!(snapshot.devices.is_empty());
        let accessed = fs.accessed();
        assert!(!accessed.iter().any(|p| p.ends_with("mdstat")));
        assert!(!accessed.iter().any(|p| p.starts_with("/sys/bus")));
        assert!(!accessed.iter().any(|p| p.starts_with("/usr/share/misc")));
    }

    #[test]
    fn test_mdadm_switch_gates_raid() {
        let fs = MockFs::typical_host();
        let mut collector = collector(fs.clone());

        let mut config = Config::default();
        config.raid.mdadm = false;
        let (snapshot, _) = collector.collect_snapshot(&config);

        assert!(snapshot.raid.is_empty());
        assert!(!fs.accessed().iter().any(|p| p.ends_with("mdstat")));
    }

    #[test]
    fn test_injected_temperature_sources() {
        use crate::collector::temps::{CollaboratorError, TemperatureSource};
        use crate::model::TemperatureReading;

        struct Down;
        impl TemperatureSource for Down {
            fn name(&self) -> &str {
                "mbmon"
            }
            fn collect(&self) -> Result<Vec<TemperatureReading>, CollaboratorError> {
                Err(CollaboratorError::Timeout {
                    address: "localhost:411".to_string(),
                })
            }
        }

        let mut collector = collector(MockFs::typical_host())
            .with_temperature_sources(TemperatureAggregator::new(vec![Box::new(Down)]));
        let (snapshot, diags) = collector.collect_snapshot(&Config::default());

        assert!(snapshot.temps.is_empty());
        let mbmon: Vec<_> = diags.for_subsystem("mbmon").collect();
        assert_eq!(mbmon.len(), 1);
        assert!(mbmon[0].message.contains("timed out"));
    }
}
