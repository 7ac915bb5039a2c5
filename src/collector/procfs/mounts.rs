//! Mounted filesystems from `/proc/mounts` with capacity from `statvfs`.

use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::collector::error::CollectError;
use crate::collector::procfs::parser::{MountLine, parse_mounts};
use crate::collector::reader::PseudoFileReader;
use crate::collector::traits::FileSystem;
use crate::model::MountEntry;

/// Devices and filesystem types to leave out of the mount list.
#[derive(Debug, Clone, Copy, Default)]
pub struct MountFilter<'a> {
    pub devices: &'a [String],
    pub fs_types: &'a [String],
}

impl MountFilter<'_> {
    fn hides(&self, line: &MountLine) -> bool {
        self.devices.iter().any(|d| *d == line.source)
            || self.fs_types.iter().any(|t| *t == line.fs_type)
    }
}

pub struct MountCollector<F: FileSystem> {
    fs: F,
    proc_path: PathBuf,
}

impl<F: FileSystem> MountCollector<F> {
    pub fn new(fs: F, proc_path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            proc_path: proc_path.into(),
        }
    }

    /// Lists mounted filesystems in `/proc/mounts` order.
    ///
    /// Hidden entries are dropped before any capacity probe runs.
    pub fn collect(&self, filter: MountFilter<'_>) -> Result<Vec<MountEntry>, CollectError> {
        let path = self.proc_path.join("mounts");
        let content = PseudoFileReader::new(&self.fs).read_required(&path)?;

        let entries = parse_mounts(&content)
            .into_iter()
            .filter(|line| {
                let hidden = filter.hides(line);
                if hidden {
                    trace!(source = %line.source, fs_type = %line.fs_type, "mount hidden");
                }
                !hidden
            })
            .map(|line| self.entry(line))
            .collect();
        Ok(entries)
    }

    fn entry(&self, line: MountLine) -> MountEntry {
        let mount_point = Path::new(&line.mount_point);
        let size = self
            .fs
            .disk_total(mount_point)
            .inspect_err(|e| debug!(mount = %line.mount_point, error = %e, "disk_total failed"))
            .ok();
        let free = self
            .fs
            .disk_free(mount_point)
            .inspect_err(|e| debug!(mount = %line.mount_point, error = %e, "disk_free failed"))
            .ok();
        let used = match (size, free) {
            (Some(total), Some(free)) => Some(total.saturating_sub(free)),
            _ => None,
        };

        MountEntry {
            device: self.resolve_source(&line.source),
            used_percent: percent_of(used, size),
            free_percent: percent_of(free, size),
            mount_point: line.mount_point,
            fs_type: line.fs_type,
            size,
            used,
            free,
        }
    }

    /// Follows a symlinked mount source (`/dev/disk/by-uuid/...`) to the real node.
    fn resolve_source(&self, source: &str) -> String {
        let path = Path::new(source);
        if !self.fs.is_symlink(path) {
            return source.to_string();
        }
        match self.fs.canonicalize(path) {
            Ok(target) => target.to_string_lossy().into_owned(),
            Err(e) => {
                debug!(source, error = %e, "cannot resolve mount source");
                source.to_string()
            }
        }
    }
}

/// Whole-number percentage of `part` in `total`, rounded half up.
///
/// Integer arithmetic, so `285/1000` is 29.
/// Unknown when either side is unknown or zero.
pub fn percent_of(part: Option<u64>, total: Option<u64>) -> Option<f64> {
    match (part, total) {
        (Some(part), Some(total)) if part > 0 && total > 0 => {
            let (part, total) = (part as u128, total as u128);
            Some(((part * 200 + total) / (2 * total)) as f64)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::MockFs;

    fn collect(fs: MockFs, devices: &[String], fs_types: &[String]) -> Vec<MountEntry> {
        MountCollector::new(fs, "/proc")
            .collect(MountFilter { devices, fs_types })
            .unwrap()
    }

    #[test]
    fn test_used_and_percentages() {
        let mut fs = MockFs::bare_host();
        fs.add_file("/proc/mounts", "/dev/sda1 /mnt/data ext4 rw 0 0\n");
        fs.set_disk_space("/mnt/data", Some(1000), Some(250));

        let mounts = collect(fs, &[], &[]);
        assert_eq!(
            mounts,
            vec![MountEntry {
                device: "/dev/sda1".to_string(),
                mount_point: "/mnt/data".to_string(),
                fs_type: "ext4".to_string(),
                size: Some(1000),
                used: Some(750),
                free: Some(250),
                used_percent: Some(75.0),
                free_percent: Some(25.0),
            }]
        );
    }

    #[test]
    fn test_failed_probe_leaves_percentages_unknown() {
        let mut fs = MockFs::bare_host();
        fs.add_file(
            "/proc/mounts",
            "/dev/sda1 /a ext4 rw 0 0\n/dev/sda2 /b ext4 rw 0 0\n/dev/sda3 /c ext4 rw 0 0\n",
        );
        fs.set_disk_space("/a", Some(1000), None);
        fs.set_disk_space("/b", None, Some(250));
        fs.set_disk_space("/c", Some(0), Some(0));

        let mounts = collect(fs, &[], &[]);
        assert_eq!(mounts.len(), 3);

        assert_eq!(mounts[0].size, Some(1000));
        assert_eq!(mounts[0].used, None);
        assert_eq!(mounts[0].used_percent, None);
        assert_eq!(mounts[0].free_percent, None);

        assert_eq!(mounts[1].used, None);
        assert_eq!(mounts[1].used_percent, None);
        assert_eq!(mounts[1].free_percent, None);

        // zero-sized filesystem: no division
        assert_eq!(mounts[2].used, Some(0));
        assert_eq!(mounts[2].used_percent, None);
        assert_eq!(mounts[2].free_percent, None);
    }

    #[test]
    fn test_hidden_entries_are_not_probed() {
        let fs = MockFs::typical_host();
        let devices = vec!["/dev/sdb1".to_string()];
        let fs_types = vec!["proc".to_string(), "sysfs".to_string(), "tmpfs".to_string()];

        let mounts = collect(fs.clone(), &devices, &fs_types);
        let points: Vec<_> = mounts.iter().map(|m| m.mount_point.as_str()).collect();
        assert_eq!(points, vec!["/", "/boot"]);

        let probed = fs.probed();
        for hidden in ["/proc", "/sys", "/run", "/mnt/my data"] {
            assert!(
                !probed.iter().any(|p| p == Path::new(hidden)),
                "{} was probed: {:?}",
                hidden,
                probed
            );
        }
        assert!(probed.iter().any(|p| p == Path::new("/boot")));
    }

    #[test]
    fn test_escaped_mount_point_and_symlinked_source() {
        let mounts = collect(MockFs::typical_host(), &[], &[]);

        let data = mounts.iter().find(|m| m.device == "/dev/sdb1").unwrap();
        assert_eq!(data.mount_point, "/mnt/my data");
        assert_eq!(data.size, Some(2000));
        assert_eq!(data.free, None);
        assert_eq!(data.used_percent, None);

        let boot = mounts.iter().find(|m| m.mount_point == "/boot").unwrap();
        assert_eq!(boot.device, "/dev/sda3");
        // nothing used: no used percentage
        assert_eq!(boot.used, Some(0));
        assert_eq!(boot.used_percent, None);
        assert_eq!(boot.free_percent, Some(100.0));
    }

    #[test]
    fn test_percent_rounding() {
        assert_eq!(percent_of(Some(1), Some(3)), Some(33.0));
        assert_eq!(percent_of(Some(2), Some(3)), Some(67.0));
        assert_eq!(percent_of(Some(3), Some(8)), Some(38.0));
        assert_eq!(percent_of(Some(1000), Some(1000)), Some(100.0));
        assert_eq!(percent_of(None, Some(3)), None);
        assert_eq!(percent_of(Some(1), Some(0)), None);
        assert_eq!(percent_of(Some(0), Some(1000)), None);
    }

    #[test]
    fn test_percent_half_rounds_up() {
        assert_eq!(percent_of(Some(285), Some(1000)), Some(29.0));
        assert_eq!(percent_of(Some(575), Some(1000)), Some(58.0));
        assert_eq!(percent_of(Some(5), Some(1000)), Some(1.0));
        assert_eq!(percent_of(Some(4), Some(1000)), Some(0.0));
    }

    #[test]
    fn test_missing_mounts_file() {
        let collector = MountCollector::new(MockFs::bare_host(), "/proc");
        assert!(collector.collect(MountFilter::default()).is_err());
    }
}
