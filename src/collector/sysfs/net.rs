//! Network interfaces from `/sys/class/net`.

use std::io;
use std::path::{Path, PathBuf};

use crate::collector::error::CollectError;
use crate::collector::reader::PseudoFileReader;
use crate::collector::sysfs::parser::{parse_modalias, parse_operstate};
use crate::collector::traits::FileSystem;
use crate::model::{NetInterface, TrafficCounters};

pub struct NetworkCollector<F: FileSystem> {
    fs: F,
    sys_path: PathBuf,
}

impl<F: FileSystem> NetworkCollector<F> {
    pub fn new(fs: F, sys_path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            sys_path: sys_path.into(),
        }
    }

    /// One entry per interface, sorted by name.
    ///
    /// Each attribute is read on its own; a missing counter reads as zero and
    /// a missing `operstate` or `modalias` falls back to unknown / `N/A`.
    pub fn collect(&self) -> Result<Vec<NetInterface>, CollectError> {
        let net_dir = self.sys_path.join("class/net");
        if !self.fs.is_dir(&net_dir) {
            return Err(CollectError::unavailable(
                &net_dir,
                io::Error::new(io::ErrorKind::NotFound, "no such directory"),
            ));
        }

        let reader = PseudoFileReader::new(&self.fs);
        Ok(reader
            .matching(&net_dir, "*")
            .iter()
            .filter_map(|dir| interface(&reader, dir))
            .collect())
    }
}

fn interface<F: FileSystem>(reader: &PseudoFileReader<'_, F>, dir: &Path) -> Option<NetInterface> {
    let name = dir.file_name()?.to_string_lossy().into_owned();
    let stats = dir.join("statistics");
    let counters = |prefix: &str| TrafficCounters {
        bytes: reader.read_u64(&stats.join(format!("{}_bytes", prefix))),
        errors: reader.read_u64(&stats.join(format!("{}_errors", prefix))),
        packets: reader.read_u64(&stats.join(format!("{}_packets", prefix))),
    };

    Some(NetInterface {
        state: parse_operstate(&reader.read_or(&dir.join("operstate"), "unknown")),
        kind: parse_modalias(&reader.read_or(&dir.join("device/modalias"), "")),
        received: counters("rx"),
        sent: counters("tx"),
        name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::MockFs;
    use crate::model::{InterfaceType, LinkState};

    #[test]
    fn test_collect_typical_host() {
        let collector = NetworkCollector::new(MockFs::typical_host(), "/sys");
        let ifaces = collector.collect().unwrap();

        let names: Vec<_> = ifaces.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["eth0", "lo", "usb0", "wlan0"]);

        let eth0 = &ifaces[0];
        assert_eq!(eth0.state, LinkState::Up);
        assert_eq!(eth0.kind, InterfaceType::Pci);
        assert_eq!(
            eth0.received,
            TrafficCounters {
                bytes: 987654321,
                errors: 5,
                packets: 654321
            }
        );
        assert_eq!(
            eth0.sent,
            TrafficCounters {
                bytes: 123456789,
                errors: 2,
                packets: 456789
            }
        );

        assert_eq!(ifaces[1].kind, InterfaceType::NotAvailable);
        assert_eq!(ifaces[2].state, LinkState::Down);
        assert_eq!(ifaces[2].kind, InterfaceType::Usb);
        assert_eq!(ifaces[3].state, LinkState::Unknown);
    }

    #[test]
    fn test_missing_counters_read_as_zero() {
        let mut fs = MockFs::bare_host();
        fs.add_file("/sys/class/net/dummy0/operstate", "down\n");
        let collector = NetworkCollector::new(fs, "/sys");

        let ifaces = collector.collect().unwrap();
        assert_eq!(ifaces.len(), 1);
        assert_eq!(ifaces[0].state, LinkState::Down);
        assert_eq!(ifaces[0].received, TrafficCounters::default());
        assert_eq!(ifaces[0].sent, TrafficCounters::default());
    }
}
