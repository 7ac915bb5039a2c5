//! Safe reads of kernel pseudo-files.
//!
//! Every collector goes through [`PseudoFileReader`] so that a missing or
//! unreadable file turns into `None`, a default, or a typed error instead of
//! a panic, and so that directory globbing works the same on `MockFs`.

use std::path::{Path, PathBuf};

use glob::Pattern;
use tracing::{debug, trace};

use crate::collector::error::CollectError;
use crate::collector::traits::FileSystem;

/// Reader over a [`FileSystem`] with pseudo-file conventions applied:
/// content is trimmed, and failures never panic.
pub struct PseudoFileReader<'a, F: FileSystem> {
    fs: &'a F,
}

impl<'a, F: FileSystem> PseudoFileReader<'a, F> {
    pub fn new(fs: &'a F) -> Self {
        Self { fs }
    }

    /// Trimmed content, or `None` when the file is missing or unreadable.
    ///
    /// An existing empty file yields `Some("")`.
    pub fn read(&self, path: &Path) -> Option<String> {
        match self.fs.read_to_string(path) {
            Ok(content) => Some(content.trim().to_string()),
            Err(e) => {
                trace!(path = %path.display(), error = %e, "pseudo-file unreadable");
                None
            }
        }
    }

    /// Trimmed content, or `default` when the file is missing or unreadable.
    pub fn read_or(&self, path: &Path, default: &str) -> String {
        self.read(path).unwrap_or_else(|| default.to_string())
    }

    /// Integer content, `0` when missing, unreadable or not a number.
    pub fn read_u64(&self, path: &Path) -> u64 {
        self.read(path)
            .and_then(|content| content.parse().ok())
            .unwrap_or(0)
    }

    /// Untrimmed content, or a [`CollectError::SourceUnavailable`].
    pub fn read_required(&self, path: &Path) -> Result<String, CollectError> {
        self.fs
            .read_to_string(path)
            .map_err(|e| CollectError::unavailable(path, e))
    }

    /// Entries of `dir` whose file name matches the glob `pattern`, sorted by path.
    ///
    /// A missing directory yields no entries.
    pub fn matching(&self, dir: &Path, pattern: &str) -> Vec<PathBuf> {
        let pattern = match Pattern::new(pattern) {
            Ok(p) => p,
            Err(e) => {
                debug!(pattern, error = %e, "invalid glob pattern");
                return Vec::new();
            }
        };
        let mut entries: Vec<PathBuf> = match self.fs.read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                trace!(dir = %dir.display(), error = %e, "directory unreadable");
                return Vec::new();
            }
        };
        entries.retain(|entry| {
            entry
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| pattern.matches(name))
        });
        entries.sort();
        entries
    }

    /// The underlying filesystem.
    pub fn fs(&self) -> &'a F {
        self.fs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::MockFs;

    #[test]
    fn test_read_trims_and_distinguishes_absent_from_empty() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/sys/kernel/hostname", "box01\n");
        fs.add_file("/sys/class/net/lo/address", "");
        let reader = PseudoFileReader::new(&fs);

        assert_eq!(
            reader.read(Path::new("/proc/sys/kernel/hostname")).as_deref(),
            Some("box01")
        );
        assert_eq!(
            reader.read(Path::new("/sys/class/net/lo/address")).as_deref(),
            Some("")
        );
        assert_eq!(reader.read(Path::new("/proc/nope")), None);
    }

    #[test]
    fn test_read_or_default() {
        let fs = MockFs::new();
        let reader = PseudoFileReader::new(&fs);
        assert_eq!(reader.read_or(Path::new("/sys/x/vendor"), "Unknown"), "Unknown");
    }

    #[test]
    fn test_read_u64() {
        let mut fs = MockFs::new();
        fs.add_file("/sys/class/net/eth0/statistics/rx_bytes", "4096\n");
        fs.add_file("/sys/class/net/eth0/statistics/tx_bytes", "n/a\n");
        let reader = PseudoFileReader::new(&fs);

        assert_eq!(reader.read_u64(Path::new("/sys/class/net/eth0/statistics/rx_bytes")), 4096);
        assert_eq!(reader.read_u64(Path::new("/sys/class/net/eth0/statistics/tx_bytes")), 0);
        assert_eq!(reader.read_u64(Path::new("/sys/class/net/eth0/statistics/missing")), 0);
    }

    #[test]
    fn test_read_required_error() {
        let fs = MockFs::new();
        let reader = PseudoFileReader::new(&fs);
        let err = reader.read_required(Path::new("/proc/meminfo")).unwrap_err();
        assert!(matches!(err, CollectError::SourceUnavailable { .. }));
        assert!(err.to_string().contains("/proc/meminfo"));
    }

    #[test]
    fn test_matching_filters_and_sorts() {
        let mut fs = MockFs::new();
        fs.add_file("/sys/class/power_supply/BAT1/status", "Full");
        fs.add_file("/sys/class/power_supply/BAT0/status", "Charging");
        fs.add_file("/sys/class/power_supply/AC/online", "1");
        let reader = PseudoFileReader::new(&fs);

        let bats = reader.matching(Path::new("/sys/class/power_supply"), "BAT*");
        assert_eq!(
            bats,
            vec![
                PathBuf::from("/sys/class/power_supply/BAT0"),
                PathBuf::from("/sys/class/power_supply/BAT1"),
            ]
        );
        assert!(reader.matching(Path::new("/sys/missing"), "*").is_empty());
    }
}
