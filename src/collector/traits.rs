//! Abstractions for filesystem access to enable testing and mocking.
//!
//! The `FileSystem` trait lets every collector run against the real `/proc`
//! and `/sys` trees on Linux or against an in-memory `MockFs` in tests.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

/// Upper bound for a single pseudo-file read.
///
/// Some pseudo-files report a bogus length; kernel-generated content is
/// bounded in practice, so anything past this is dropped.
pub const MAX_READ_BYTES: u64 = 16 * 1024 * 1024;

/// Abstraction for the filesystem operations the collectors need.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Opens a file for streamed, line-oriented reading.
    fn open(&self, path: &Path) -> io::Result<Box<dyn BufRead + '_>>;

    /// Checks if a path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Checks if a path is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Checks if a path is a symbolic link (without following it).
    fn is_symlink(&self, path: &Path) -> bool;

    /// Resolves a path to its absolute, symlink-free form.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;

    /// Lists entries in a directory.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    /// Total capacity in bytes of the filesystem containing `path`.
    fn disk_total(&self, path: &Path) -> io::Result<u64>;

    /// Space available to unprivileged users, in bytes, on the filesystem containing `path`.
    fn disk_free(&self, path: &Path) -> io::Result<u64>;
}

/// Real filesystem implementation that delegates to `std::fs` and `statvfs(3)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    /// Creates a new `RealFs` instance.
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let mut content = String::new();
        File::open(path)?
            .take(MAX_READ_BYTES)
            .read_to_string(&mut content)?;
        Ok(content)
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn BufRead + '_>> {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_symlink(&self, path: &Path) -> bool {
        path.is_symlink()
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::canonicalize(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let entries = std::fs::read_dir(path)?;
        let mut paths = Vec::new();
        for entry in entries {
            paths.push(entry?.path());
        }
        Ok(paths)
    }

    fn disk_total(&self, path: &Path) -> io::Result<u64> {
        let stats = nix::sys::statvfs::statvfs(path).map_err(io::Error::from)?;
        Ok(stats.blocks() as u64 * stats.fragment_size() as u64)
    }

    fn disk_free(&self, path: &Path) -> io::Result<u64> {
        let stats = nix::sys::statvfs::statvfs(path).map_err(io::Error::from)?;
        Ok(stats.blocks_available() as u64 * stats.fragment_size() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_real_fs_read_to_string() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hostname");
        std::fs::write(&path, "box01\n").unwrap();

        let fs = RealFs::new();
        assert_eq!(fs.read_to_string(&path).unwrap(), "box01\n");
    }

    #[test]
    fn test_real_fs_open_streams_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "8086  Intel Corporation").unwrap();
        writeln!(file, "\t1237  440FX - 82441FX PMC [Natoma]").unwrap();

        let fs = RealFs::new();
        let lines: Vec<String> = fs
            .open(file.path())
            .unwrap()
            .lines()
            .map(|l| l.unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with('\t'));
    }

    #[test]
    fn test_real_fs_exists_and_is_dir() {
        let dir = tempfile::tempdir().unwrap();
        let fs = RealFs::new();
        assert!(fs.exists(dir.path()));
        assert!(fs.is_dir(dir.path()));
        assert!(!fs.exists(Path::new("/nonexistent/path/12345")));
    }

    #[cfg(unix)]
    #[test]
    fn test_real_fs_symlink_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("sda1");
        std::fs::write(&target, "").unwrap();
        let link = dir.path().join("root");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let fs = RealFs::new();
        assert!(fs.is_symlink(&link));
        assert!(!fs.is_symlink(&target));
        assert_eq!(
            fs.canonicalize(&link).unwrap(),
            std::fs::canonicalize(&target).unwrap()
        );
    }

    #[test]
    fn test_real_fs_read_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a"), "").unwrap();
        std::fs::create_dir(dir.path().join("b")).unwrap();

        let fs = RealFs::new();
        assert_eq!(fs.read_dir(dir.path()).unwrap().len(), 2);
    }

    #[test]
    fn test_real_fs_disk_space() {
        let dir = tempfile::tempdir().unwrap();
        let fs = RealFs::new();
        let total = fs.disk_total(dir.path()).unwrap();
        let free = fs.disk_free(dir.path()).unwrap();
        assert!(total > 0);
        assert!(free <= total);
    }
}
