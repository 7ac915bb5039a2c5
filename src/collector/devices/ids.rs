//! Streamed lookup of hardware IDs in `pci.ids` / `usb.ids` style databases.
//!
//! The databases list each vendor on an unindented line followed by its
//! devices on tab-indented lines:
//!
//! ```text
//! 8086  Intel Corporation
//! 	100e  82540EM Gigabit Ethernet Controller
//! 		8086 001e  PRO/1000 MT Desktop Adapter
//! ```
//!
//! Subsystem lines (two tabs), comments and class sections are ignored.

use std::collections::{HashMap, HashSet};
use std::io;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

use crate::model::{BusType, HardwareDevice};

static VENDOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S{4})  (.+)$").expect("ids vendor regex"));

static DEVICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\t(\S{4})  (.+)$").expect("ids device regex"));

/// Distinct `(vendor, device)` IDs discovered on one bus and not yet resolved.
///
/// IDs are stored lowercase.
#[derive(Debug, Clone, Default)]
pub struct IdSet {
    ids: HashMap<String, HashSet<String>>,
    remaining: usize,
}

impl IdSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an ID pair. Duplicates are counted once.
    pub fn insert(&mut self, vendor: &str, device: &str) {
        let added = self
            .ids
            .entry(vendor.to_ascii_lowercase())
            .or_default()
            .insert(device.to_ascii_lowercase());
        if added {
            self.remaining += 1;
        }
    }

    /// Removes the pair if present, returning whether it was.
    pub fn take(&mut self, vendor: &str, device: &str) -> bool {
        let hit = self
            .ids
            .get_mut(vendor)
            .is_some_and(|devices| devices.remove(device));
        if hit {
            self.remaining -= 1;
        }
        hit
    }

    /// Distinct IDs still unresolved.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn is_empty(&self) -> bool {
        self.remaining == 0
    }
}

/// One classified database line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLine<'a> {
    Vendor { id: &'a str, name: &'a str },
    Device { id: &'a str, name: &'a str },
    Other,
}

pub fn parse_db_line(line: &str) -> DbLine<'_> {
    let line = line.trim_end_matches(['\r', '\n']);
    if let Some(caps) = VENDOR_RE.captures(line)
        && let (Some(id), Some(name)) = (caps.get(1), caps.get(2))
    {
        return DbLine::Vendor {
            id: id.as_str(),
            name: name.as_str().trim(),
        };
    }
    if let Some(caps) = DEVICE_RE.captures(line)
        && let (Some(id), Some(name)) = (caps.get(1), caps.get(2))
    {
        return DbLine::Device {
            id: id.as_str(),
            name: name.as_str().trim(),
        };
    }
    DbLine::Other
}

/// Resolves the IDs in `wanted` against a database streamed as `lines`.
///
/// Stops pulling lines as soon as every wanted ID has been found; IDs the
/// database lacks are dropped silently. Results follow database order.
pub fn resolve_lines<I>(lines: I, wanted: &mut IdSet, bus: BusType) -> Vec<HardwareDevice>
where
    I: IntoIterator<Item = io::Result<String>>,
{
    let mut found = Vec::new();
    if wanted.is_empty() {
        return found;
    }

    let mut vendor: Option<(String, String)> = None;
    for (lineno, line) in lines.into_iter().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                debug!(%bus, error = %e, "vendor database read failed");
                break;
            }
        };

        match parse_db_line(&line) {
            DbLine::Vendor { id, name } => {
                vendor = Some((id.to_ascii_lowercase(), name.to_string()));
            }
            DbLine::Device { id, name } => {
                if let Some((vendor_id, vendor_name)) = &vendor
                    && wanted.take(vendor_id, &id.to_ascii_lowercase())
                {
                    found.push(HardwareDevice {
                        vendor: vendor_name.clone(),
                        device: name.to_string(),
                        bus,
                    });
                    if wanted.is_empty() {
                        trace!(%bus, lines = lineno + 1, "all ids resolved");
                        break;
                    }
                }
            }
            DbLine::Other => {}
        }
    }

    if !wanted.is_empty() {
        debug!(%bus, unresolved = wanted.remaining(), "ids not in vendor database");
    }
    found
}
