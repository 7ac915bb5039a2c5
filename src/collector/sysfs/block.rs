//! Block devices from `/sys/block`.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::collector::error::CollectError;
use crate::collector::reader::PseudoFileReader;
use crate::collector::sysfs::parser::parse_block_stat;
use crate::collector::traits::FileSystem;
use crate::model::BlockDevice;

/// Enumerates block devices that expose a `device/model` descriptor.
///
/// Loop, RAM and md devices have no model and are skipped.
pub struct StorageCollector<F: FileSystem> {
    fs: F,
    sys_path: PathBuf,
}

impl<F: FileSystem> StorageCollector<F> {
    pub fn new(fs: F, sys_path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            sys_path: sys_path.into(),
        }
    }

    pub fn collect(&self) -> Result<Vec<BlockDevice>, CollectError> {
        let block_dir = self.sys_path.join("block");
        let reader = PseudoFileReader::new(&self.fs);
        if !self.fs.is_dir(&block_dir) {
            return Err(CollectError::unavailable(
                &block_dir,
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory"),
            ));
        }

        let devices = reader
            .matching(&block_dir, "*")
            .into_iter()
            .filter(|dir| self.fs.exists(&dir.join("device/model")))
            .filter_map(|dir| self.device(&reader, &dir))
            .collect();
        Ok(devices)
    }

    fn device(&self, reader: &PseudoFileReader<'_, F>, dir: &Path) -> Option<BlockDevice> {
        let name = dir.file_name()?.to_string_lossy().into_owned();

        let (reads, writes) = match reader.read(&dir.join("stat")).map(|s| parse_block_stat(&s)) {
            Some(Ok((reads, writes))) => (Some(reads), Some(writes)),
            Some(Err(e)) => {
                debug!(device = %name, error = %e, "unexpected block stat line");
                (None, None)
            }
            None => (None, None),
        };

        Some(BlockDevice {
            name: reader.read(&dir.join("device/model")),
            vendor: reader.read(&dir.join("device/vendor")),
            removable: reader.read(&dir.join("removable")).as_deref() == Some("1"),
            device: format!("/dev/{}", name),
            reads,
            writes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::MockFs;

    #[test]
    fn test_collect_typical_host() {
        let collector = StorageCollector::new(MockFs::typical_host(), "/sys");
        let disks = collector.collect().unwrap();

        assert_eq!(
            disks,
            vec![
                BlockDevice {
                    name: Some("Samsung SSD 860".to_string()),
                    vendor: Some("ATA".to_string()),
                    device: "/dev/sda".to_string(),
                    removable: false,
                    reads: Some(12345),
                    writes: Some(6789),
                },
                BlockDevice {
                    name: Some("DVD-RW DVR-K17".to_string()),
                    vendor: Some("PIONEER".to_string()),
                    device: "/dev/sr0".to_string(),
                    removable: true,
                    reads: None,
                    writes: None,
                },
            ]
        );
    }

    #[test]
    fn test_bad_stat_keeps_entry() {
        let collector = StorageCollector::new(MockFs::degraded_host(), "/sys");
        let disks = collector.collect().unwrap();

        assert_eq!(disks.len(), 1);
        assert_eq!(disks[0].name.as_deref(), Some("QEMU HARDDISK"));
        assert_eq!(disks[0].vendor, None);
        assert!(!disks[0].removable);
        assert_eq!(disks[0].reads, None);
        assert_eq!(disks[0].writes, None);
    }

    #[test]
    fn test_missing_block_dir() {
        let collector = StorageCollector::new(MockFs::bare_host(), "/sys");
        assert!(collector.collect().is_err());
    }
}
