//! PCI and USB device identification.
//!
//! IDs are discovered from the `uevent` files under `/sys/bus/{pci,usb}/devices`
//! and resolved to names through the `pci.ids` / `usb.ids` databases.

pub mod ids;

use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::collector::diagnostics::{DEVICES, Diagnostics};
use crate::collector::reader::PseudoFileReader;
use crate::collector::traits::FileSystem;
use crate::model::{BusType, HardwareDevice};

pub use ids::{IdSet, resolve_lines};

type UeventParser = fn(&str) -> Option<(String, String)>;

static PCI_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"pci_(?:subsys_)?id=(\w+):(\w+)").expect("pci uevent regex"));

static USB_PRODUCT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^product=([^/]+)/([^/]+)/").expect("usb uevent regex"));

/// PCI vendor and device ID from a lowercased `uevent`.
pub fn parse_pci_uevent(content: &str) -> Option<(String, String)> {
    let caps = PCI_ID_RE.captures(content)?;
    Some((caps[1].to_string(), caps[2].to_string()))
}

/// USB vendor and product ID from a lowercased `uevent`, zero-padded to four digits.
pub fn parse_usb_uevent(content: &str) -> Option<(String, String)> {
    let caps = USB_PRODUCT_RE.captures(content)?;
    Some((format!("{:0>4}", &caps[1]), format!("{:0>4}", &caps[2])))
}

/// Paths to the vendor databases.
#[derive(Debug, Clone)]
pub struct IdDatabases {
    pub pci: PathBuf,
    pub usb: PathBuf,
}

pub struct DeviceCollector<F: FileSystem> {
    fs: F,
    sys_path: PathBuf,
    databases: IdDatabases,
}

impl<F: FileSystem> DeviceCollector<F> {
    pub fn new(fs: F, sys_path: impl Into<PathBuf>, databases: IdDatabases) -> Self {
        Self {
            fs,
            sys_path: sys_path.into(),
            databases,
        }
    }

    /// Resolved PCI devices followed by resolved USB devices.
    pub fn collect(&self, diagnostics: &mut Diagnostics) -> Vec<HardwareDevice> {
        let mut devices = self.collect_bus(BusType::Pci, diagnostics);
        devices.extend(self.collect_bus(BusType::Usb, diagnostics));
        devices
    }

    fn collect_bus(&self, bus: BusType, diagnostics: &mut Diagnostics) -> Vec<HardwareDevice> {
        let (subdir, parse, db) = match bus {
            BusType::Pci => (
                "bus/pci/devices",
                parse_pci_uevent as UeventParser,
                &self.databases.pci,
            ),
            BusType::Usb => (
                "bus/usb/devices",
                parse_usb_uevent as UeventParser,
                &self.databases.usb,
            ),
        };

        let mut wanted = self.discover(&self.sys_path.join(subdir), parse);
        debug!(%bus, ids = wanted.remaining(), "discovered hardware ids");
        if wanted.is_empty() {
            return Vec::new();
        }

        match self.fs.open(db) {
            Ok(reader) => {
                let lines = reader
                    .split(b'\n')
                    .map(|line| line.map(|bytes| String::from_utf8_lossy(&bytes).into_owned()));
                resolve_lines(lines, &mut wanted, bus)
            }
            Err(e) => {
                diagnostics.record(
                    DEVICES,
                    format!("{} id database {} is not readable: {}", bus, db.display(), e),
                );
                Vec::new()
            }
        }
    }

    fn discover(&self, dir: &Path, parse: UeventParser) -> IdSet {
        let reader = PseudoFileReader::new(&self.fs);
        let mut wanted = IdSet::new();
        for device in reader.matching(dir, "*") {
            let Some(uevent) = reader.read(&device.join("uevent")) else {
                continue;
            };
            if let Some((vendor, id)) = parse(&uevent.to_ascii_lowercase()) {
                wanted.insert(&vendor, &id);
            }
        }
        wanted
    }
}
