//! System collector for OS-level facts from `/proc/`.

use std::path::{Path, PathBuf};

use crate::collector::error::CollectError;
use crate::collector::procfs::parser::{
    cpu_record, parse_cpuinfo, parse_kernel_version, parse_loadavg, parse_meminfo, parse_swaps,
    parse_uptime, parse_wireless,
};
use crate::collector::reader::PseudoFileReader;
use crate::collector::traits::FileSystem;
use crate::fmt::format_uptime;
use crate::model::{CpuRecord, LoadAverage, MemoryInfo, SwapDevice, Uptime, WifiLink};

/// Kernel memory figures are kibibytes.
const KIB: u64 = 1024;

/// Collects OS, memory, processor, load and wireless information from `/proc/`.
pub struct SystemCollector<F: FileSystem> {
    fs: F,
    proc_path: PathBuf,
}

impl<F: FileSystem> SystemCollector<F> {
    /// Creates a new system collector.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `proc_path` - Base path to proc filesystem (usually "/proc")
    pub fn new(fs: F, proc_path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            proc_path: proc_path.into(),
        }
    }

    fn reader(&self) -> PseudoFileReader<'_, F> {
        PseudoFileReader::new(&self.fs)
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.proc_path.join(relative)
    }

    /// Operating system name. This collector only ever runs on Linux.
    pub fn collect_os(&self) -> String {
        "Linux".to_string()
    }

    /// Kernel release from `/proc/version`.
    pub fn collect_kernel(&self) -> Result<String, CollectError> {
        let path = self.path("version");
        let content = self.reader().read_required(&path)?;
        parse_kernel_version(&content).map_err(|e| CollectError::unparsable(&path, e.message))
    }

    /// Host name from `/proc/sys/kernel/hostname`.
    pub fn collect_hostname(&self) -> Result<String, CollectError> {
        let path = self.path("sys/kernel/hostname");
        Ok(self.reader().read_required(&path)?.trim().to_string())
    }

    /// Time since boot from `/proc/uptime`.
    pub fn collect_uptime(&self) -> Result<Uptime, CollectError> {
        let path = self.path("uptime");
        let content = self.reader().read_required(&path)?;
        let seconds =
            parse_uptime(&content).map_err(|e| CollectError::unparsable(&path, e.message))?;
        Ok(Uptime {
            seconds,
            text: format_uptime(seconds),
        })
    }

    /// Load averages from `/proc/loadavg`.
    pub fn collect_loadavg(&self) -> Result<LoadAverage, CollectError> {
        let path = self.path("loadavg");
        let content = self.reader().read_required(&path)?;
        parse_loadavg(&content).map_err(|e| CollectError::unparsable(&path, e.message))
    }

    /// Memory and swap usage from `/proc/meminfo` and `/proc/swaps`.
    ///
    /// Both files must be readable; missing individual keys count as zero.
    pub fn collect_memory(&self) -> Result<MemoryInfo, CollectError> {
        let meminfo_path = self.path("meminfo");
        let swaps_path = self.path("swaps");
        let reader = self.reader();
        let meminfo = reader.read_required(&meminfo_path)?;
        let swaps = reader.read_required(&swaps_path)?;

        let mem = parse_meminfo(&meminfo)
            .map_err(|e| CollectError::unparsable(&meminfo_path, e.message))?;

        Ok(MemoryInfo {
            total: mem.mem_total * KIB,
            free: mem.mem_free * KIB,
            swap_total: mem.swap_total * KIB,
            swap_free: mem.swap_free * KIB,
            swap_cached: mem.swap_cached * KIB,
            swaps: parse_swaps(&swaps)
                .into_iter()
                .map(|swap| SwapDevice {
                    device: swap.device,
                    kind: swap.kind,
                    size: swap.size_kb * KIB,
                    used: swap.used_kb * KIB,
                })
                .collect(),
        })
    }

    /// One record per logical processor from `/proc/cpuinfo`, in file order.
    pub fn collect_cpus(&self) -> Result<Vec<CpuRecord>, CollectError> {
        let path = self.path("cpuinfo");
        let content = self.reader().read_required(&path)?;
        let stanzas =
            parse_cpuinfo(&content).map_err(|e| CollectError::unparsable(&path, e.message))?;
        Ok(stanzas.iter().map(cpu_record).collect())
    }

    /// Wireless link quality from `/proc/self/net/wireless`.
    pub fn collect_wifi(&self) -> Result<Vec<WifiLink>, CollectError> {
        let path = self.path("self/net/wireless");
        let content = self.reader().read_required(Path::new(&path))?;
        Ok(parse_wireless(&content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::MockFs;

    #[test]
    fn test_collect_kernel() {
        let collector = SystemCollector::new(MockFs::typical_host(), "/proc");
        assert_eq!(collector.collect_kernel().unwrap(), "6.1.0-18-amd64");
    }

    #[test]
    fn test_collect_kernel_unparsable() {
        let collector = SystemCollector::new(MockFs::degraded_host(), "/proc");
        let err = collector.collect_kernel().unwrap_err();
        assert!(matches!(err, CollectError::Unparsable { .. }));
    }

    #[test]
    fn test_collect_hostname() {
        let collector = SystemCollector::new(MockFs::typical_host(), "/proc");
        assert_eq!(collector.collect_hostname().unwrap(), "box01");

        let collector = SystemCollector::new(MockFs::bare_host(), "/proc");
        assert!(matches!(
            collector.collect_hostname(),
            Err(CollectError::SourceUnavailable { .. })
        ));
    }

    #[test]
    fn test_collect_uptime() {
        let collector = SystemCollector::new(MockFs::typical_host(), "/proc");
        let uptime = collector.collect_uptime().unwrap();
        assert_eq!(uptime.seconds, 97246);
        assert_eq!(uptime.text, "1 day, 3 hours, 46 seconds");
    }

    #[test]
    fn test_collect_loadavg() {
        let collector = SystemCollector::new(MockFs::typical_host(), "/proc");
        let load = collector.collect_loadavg().unwrap();
        assert_eq!(
            load,
            LoadAverage {
                now: 0.10,
                five_min: 0.20,
                fifteen_min: 0.30
            }
        );
    }

    #[test]
    fn test_collect_memory_bytes_are_kib_times_1024() {
        let collector = SystemCollector::new(MockFs::typical_host(), "/proc");
        let mem = collector.collect_memory().unwrap();

        assert_eq!(mem.total, 16384000 * 1024);
        assert_eq!(mem.free, 8192000 * 1024);
        assert_eq!(mem.swap_total, 4194300 * 1024);
        assert_eq!(mem.swap_free, 4190204 * 1024);
        assert_eq!(mem.swap_cached, 1024 * 1024);
        assert_eq!(
            mem.swaps,
            vec![SwapDevice {
                device: "/dev/sda2".to_string(),
                kind: "partition".to_string(),
                size: 4194300 * 1024,
                used: 4096 * 1024,
            }]
        );
    }

    #[test]
    fn test_collect_memory_requires_both_sources() {
        let mut fs = MockFs::bare_host();
        fs.add_file("/proc/meminfo", "MemTotal: 1024 kB\n");
        let collector = SystemCollector::new(fs, "/proc");

        let err = collector.collect_memory().unwrap_err();
        assert!(err.to_string().contains("/proc/swaps"));
    }

    #[test]
    fn test_collect_cpus() {
        let collector = SystemCollector::new(MockFs::typical_host(), "/proc");
        let cpus = collector.collect_cpus().unwrap();

        assert_eq!(cpus.len(), 2);
        assert_eq!(cpus[0].vendor.as_deref(), Some("GenuineIntel"));
        assert_eq!(
            cpus[0].model.as_deref(),
            Some("Intel(R) Core(TM) i7-8700 CPU @ 3.20GHz")
        );
        assert_eq!(cpus[0].mhz, Some(3192.002));
        assert_eq!(cpus[1].mhz, Some(3200.0));
    }

    #[test]
    fn test_collect_cpus_unknown_fields() {
        let collector = SystemCollector::new(MockFs::degraded_host(), "/proc");
        let cpus = collector.collect_cpus().unwrap();
        assert_eq!(cpus, vec![CpuRecord::default()]);
    }

    #[test]
    fn test_collect_wifi() {
        let collector = SystemCollector::new(MockFs::typical_host(), "/proc");
        let links = collector.collect_wifi().unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].device, "wlan0");
        assert_eq!(links[0].quality_link, 54.0);
    }
}
