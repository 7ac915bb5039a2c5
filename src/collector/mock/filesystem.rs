//! In-memory mock filesystem for testing collectors without real `/proc` and `/sys`.
//!
//! Besides files and directories, `MockFs` models symlinks and per-mount
//! capacity, and records every read so tests can assert on I/O behaviour.

use crate::collector::traits::FileSystem;
use std::collections::{HashMap, HashSet};
use std::io::{self, BufRead, Cursor};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Capacity answers for one mount point. `None` makes the probe fail.
#[derive(Debug, Clone, Copy, Default)]
struct DiskSpace {
    total: Option<u64>,
    free: Option<u64>,
}

/// In-memory filesystem for testing.
#[derive(Debug, Clone, Default)]
pub struct MockFs {
    /// Map from path to file contents.
    files: HashMap<PathBuf, String>,
    /// Set of directories (for read_dir support).
    directories: HashSet<PathBuf>,
    /// Map from link path to link target.
    symlinks: HashMap<PathBuf, PathBuf>,
    /// Map from mount point to capacity.
    disk_space: HashMap<PathBuf, DiskSpace>,
    /// Every path passed to `read_to_string`, `open` or `read_dir`, in order.
    accessed: Arc<Mutex<Vec<PathBuf>>>,
    /// Every path passed to `disk_total` or `disk_free`, in order.
    probed: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockFs {
    /// Creates a new empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file with the given content.
    ///
    /// Parent directories are automatically created.
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = path.as_ref().to_path_buf();
        self.add_parents(&path);
        self.files.insert(path, content.into());
    }

    /// Adds an empty directory.
    pub fn add_dir(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        self.add_parents(&path);
        self.directories.insert(path);
    }

    /// Adds a symbolic link pointing at `target`.
    pub fn add_symlink(&mut self, link: impl AsRef<Path>, target: impl AsRef<Path>) {
        let link = link.as_ref().to_path_buf();
        self.add_parents(&link);
        self.symlinks.insert(link, target.as_ref().to_path_buf());
    }

    /// Sets the capacity reported for a mount point.
    ///
    /// A `None` value makes the corresponding probe fail.
    pub fn set_disk_space(&mut self, mount: impl AsRef<Path>, total: Option<u64>, free: Option<u64>) {
        self.disk_space
            .insert(mount.as_ref().to_path_buf(), DiskSpace { total, free });
    }

    /// Adds a network interface under `/sys/class/net`.
    ///
    /// `modalias` may be empty for virtual interfaces without a backing device.
    pub fn add_net_interface(
        &mut self,
        name: &str,
        operstate: &str,
        modalias: &str,
        rx: (u64, u64, u64),
        tx: (u64, u64, u64),
    ) {
        let base = PathBuf::from(format!("/sys/class/net/{}", name));
        self.add_dir(&base);
        self.add_file(base.join("operstate"), format!("{}\n", operstate));
        if !modalias.is_empty() {
            self.add_file(base.join("device/modalias"), format!("{}\n", modalias));
        }
        let stats = base.join("statistics");
        self.add_file(stats.join("rx_bytes"), rx.0.to_string());
        self.add_file(stats.join("rx_errors"), rx.1.to_string());
        self.add_file(stats.join("rx_packets"), rx.2.to_string());
        self.add_file(stats.join("tx_bytes"), tx.0.to_string());
        self.add_file(stats.join("tx_errors"), tx.1.to_string());
        self.add_file(stats.join("tx_packets"), tx.2.to_string());
    }

    /// Paths read so far, in access order.
    pub fn accessed(&self) -> Vec<PathBuf> {
        self.accessed.lock().map(|log| log.clone()).unwrap_or_default()
    }

    /// Number of reads performed so far.
    pub fn read_count(&self) -> usize {
        self.accessed.lock().map(|log| log.len()).unwrap_or(0)
    }

    /// Mount points whose capacity was queried, in probe order.
    pub fn probed(&self) -> Vec<PathBuf> {
        self.probed.lock().map(|log| log.clone()).unwrap_or_default()
    }

    /// Forgets all recorded reads and capacity probes.
    pub fn clear_access_log(&self) {
        for log in [&self.accessed, &self.probed] {
            if let Ok(mut log) = log.lock() {
                log.clear();
            }
        }
    }

    fn add_parents(&mut self, path: &Path) {
        let mut parent = path.parent();
        while let Some(p) = parent {
            if !p.as_os_str().is_empty() {
                self.directories.insert(p.to_path_buf());
            }
            parent = p.parent();
        }
    }

    fn record(&self, path: &Path) {
        if let Ok(mut log) = self.accessed.lock() {
            log.push(path.to_path_buf());
        }
    }

    fn record_probe(&self, path: &Path) {
        if let Ok(mut log) = self.probed.lock() {
            log.push(path.to_path_buf());
        }
    }

    fn not_found(what: &str, path: &Path) -> io::Error {
        io::Error::new(io::ErrorKind::NotFound, format!("{} not found: {:?}", what, path))
    }
}

impl FileSystem for MockFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.record(path);
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| Self::not_found("file", path))
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn BufRead + '_>> {
        self.record(path);
        let content = self
            .files
            .get(path)
            .ok_or_else(|| Self::not_found("file", path))?;
        Ok(Box::new(Cursor::new(content.as_bytes())))
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
            || self.directories.contains(path)
            || self.symlinks.contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.directories.contains(path)
    }

    fn is_symlink(&self, path: &Path) -> bool {
        self.symlinks.contains_key(path)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        let mut current = path.to_path_buf();
        // Bounded like the kernel's own symlink-follow limit.
        for _ in 0..40 {
            match self.symlinks.get(&current) {
                Some(target) => current = target.clone(),
                None if self.exists(&current) => return Ok(current),
                None => return Err(Self::not_found("link target", &current)),
            }
        }
        Err(io::Error::other(format!("too many levels of symlinks: {:?}", path)))
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        self.record(path);
        if !self.directories.contains(path) {
            return Err(Self::not_found("directory", path));
        }

        let mut entries = HashSet::new();
        let children = self
            .files
            .keys()
            .chain(self.directories.iter())
            .chain(self.symlinks.keys());
        for child in children {
            if child.parent().is_some_and(|parent| parent == path) && child != path {
                entries.insert(child.clone());
            }
        }

        Ok(entries.into_iter().collect())
    }

    fn disk_total(&self, path: &Path) -> io::Result<u64> {
        self.record_probe(path);
        self.disk_space
            .get(path)
            .and_then(|space| space.total)
            .ok_or_else(|| Self::not_found("mount", path))
    }

    fn disk_free(&self, path: &Path) -> io::Result<u64> {
        self.record_probe(path);
        self.disk_space
            .get(path)
            .and_then(|space| space.free)
            .ok_or_else(|| Self::not_found("mount", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_fs_add_file() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/meminfo", "MemTotal: 16384 kB\n");

        assert!(fs.exists(Path::new("/proc/meminfo")));
        assert!(fs.is_dir(Path::new("/proc")));

        let content = fs.read_to_string(Path::new("/proc/meminfo")).unwrap();
        assert_eq!(content, "MemTotal: 16384 kB\n");
    }

    #[test]
    fn test_mock_fs_read_dir() {
        let mut fs = MockFs::new();
        fs.add_file("/sys/block/sda/device/model", "Disk A");
        fs.add_file("/sys/block/sda/stat", "0");
        fs.add_file("/sys/block/sdb/device/model", "Disk B");

        let entries = fs.read_dir(Path::new("/sys/block")).unwrap();
        assert_eq!(entries.len(), 2);

        let sda = fs.read_dir(Path::new("/sys/block/sda")).unwrap();
        assert_eq!(sda.len(), 2); // device and stat
    }

    #[test]
    fn test_mock_fs_symlinks() {
        let mut fs = MockFs::new();
        fs.add_file("/dev/sda1", "");
        fs.add_symlink("/dev/disk/by-uuid/abcd", "/dev/sda1");
        fs.add_symlink("/dev/root", "/dev/disk/by-uuid/abcd");

        assert!(fs.is_symlink(Path::new("/dev/root")));
        assert!(!fs.is_symlink(Path::new("/dev/sda1")));
        assert_eq!(
            fs.canonicalize(Path::new("/dev/root")).unwrap(),
            PathBuf::from("/dev/sda1")
        );
        assert!(fs.canonicalize(Path::new("/dev/missing")).is_err());
    }

    #[test]
    fn test_mock_fs_disk_space() {
        let mut fs = MockFs::new();
        fs.set_disk_space("/", Some(1000), None);

        assert_eq!(fs.disk_total(Path::new("/")).unwrap(), 1000);
        assert!(fs.disk_free(Path::new("/")).is_err());
        assert!(fs.disk_total(Path::new("/home")).is_err());

        let probed = fs.probed();
        assert_eq!(probed.len(), 3);
        assert_eq!(probed[2], PathBuf::from("/home"));
        // probes are not reads
        assert_eq!(fs.read_count(), 0);

        fs.clear_access_log();
        assert!(fs.probed().is_empty());
    }

    #[test]
    fn test_mock_fs_records_reads() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/loadavg", "0.1 0.2 0.3 1/100 42\n");

        let clone = fs.clone();
        let _ = clone.read_to_string(Path::new("/proc/loadavg"));
        let _ = clone.read_to_string(Path::new("/proc/missing"));

        // Clones share the access log.
        assert_eq!(fs.read_count(), 2);
        assert_eq!(fs.accessed()[1], PathBuf::from("/proc/missing"));

        fs.clear_access_log();
        assert_eq!(fs.read_count(), 0);
    }

    #[test]
    fn test_mock_fs_not_found() {
        let fs = MockFs::new();
        let result = fs.read_to_string(Path::new("/nonexistent"));
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::NotFound);
    }
}
