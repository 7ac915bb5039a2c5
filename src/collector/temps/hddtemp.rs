//! Disk temperatures from hddtemp, either its TCP daemon or its syslog lines.

use std::path::PathBuf;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use regex::Regex;

use super::{CollaboratorError, TemperatureSource, fetch, scan_log};
use crate::collector::traits::FileSystem;
use crate::config::DaemonAddress;
use crate::model::TemperatureReading;

/// `hddtemp[1234]: /dev/sda: WDC WD5000AAKS: 40 C`
static SYSLOG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"hddtemp\[\d+\]: (/dev/[^:\s]+): (.+?): (-?\d+(?:\.\d+)?) ?([CF])\s*$")
        .expect("hddtemp syslog regex")
});

enum Mode {
    Daemon {
        address: DaemonAddress,
        timeout: Duration,
    },
    Syslog {
        fs: Arc<dyn FileSystem>,
        path: PathBuf,
    },
}

pub struct Hddtemp {
    mode: Mode,
}

impl Hddtemp {
    pub fn daemon(address: DaemonAddress, timeout: Duration) -> Self {
        Self {
            mode: Mode::Daemon { address, timeout },
        }
    }

    pub fn syslog(fs: Arc<dyn FileSystem>, path: impl Into<PathBuf>) -> Self {
        Self {
            mode: Mode::Syslog {
                fs,
                path: path.into(),
            },
        }
    }
}

impl TemperatureSource for Hddtemp {
    fn name(&self) -> &str {
        "hddtemp"
    }

    fn collect(&self) -> Result<Vec<TemperatureReading>, CollaboratorError> {
        match &self.mode {
            Mode::Daemon { address, timeout } => parse_daemon_reply(&fetch(address, *timeout)?),
            Mode::Syslog { fs, path } => scan_log(fs.as_ref(), path, parse_syslog_line),
        }
    }
}

/// Parses the daemon's `|dev|model|temp|unit|` records.
///
/// Drives reporting no number (`NA`, `SLP`, `UNK`) are skipped.
pub fn parse_daemon_reply(reply: &str) -> Result<Vec<TemperatureReading>, CollaboratorError> {
    let reply = reply.trim();
    if reply.is_empty() {
        return Ok(Vec::new());
    }
    if !reply.starts_with('|') || !reply.ends_with('|') {
        return Err(CollaboratorError::Parse(format!(
            "hddtemp reply is not |-delimited: {:?}",
            reply
        )));
    }

    let mut readings = Vec::new();
    for record in reply.trim_matches('|').split("||") {
        let fields: Vec<&str> = record.split('|').collect();
        let &[path, name, temp, unit] = fields.as_slice() else {
            return Err(CollaboratorError::Parse(format!(
                "expected 4 fields in hddtemp record {:?}",
                record
            )));
        };
        let Ok(value) = temp.trim().parse::<f64>() else {
            continue;
        };
        readings.push(TemperatureReading {
            path: path.to_string(),
            name: name.trim().to_string(),
            value,
            unit: unit.trim().to_string(),
        });
    }
    Ok(readings)
}

pub fn parse_syslog_line(line: &str) -> Option<TemperatureReading> {
    let caps = SYSLOG_RE.captures(line)?;
    Some(TemperatureReading {
        path: caps[1].to_string(),
        name: caps[2].trim().to_string(),
        value: caps[3].parse().ok()?,
        unit: caps[4].to_string(),
    })
}
