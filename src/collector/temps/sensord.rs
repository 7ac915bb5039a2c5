//! lm-sensors readings that sensord writes to the system log.
//!
//! ```text
//! Jan  3 10:00:01 box01 sensord: temp1: 41.0 C
//! Jan  3 10:00:01 box01 sensord: fan1: 2596 RPM
//! Jan  3 10:00:01 box01 sensord: in0: +1.18 V
//! ```

use std::path::PathBuf;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use super::{CollaboratorError, TemperatureSource, scan_log};
use crate::collector::traits::FileSystem;
use crate::model::TemperatureReading;

static LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"sensord(?:\[\d+\])?: ([^:]+): ([+-]?\d+(?:\.\d+)?) ?(C|F|RPM|V)\b")
        .expect("sensord line regex")
});

pub struct Sensord {
    fs: Arc<dyn FileSystem>,
    log_path: PathBuf,
}

impl Sensord {
    pub fn new(fs: Arc<dyn FileSystem>, log_path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            log_path: log_path.into(),
        }
    }
}

impl TemperatureSource for Sensord {
    fn name(&self) -> &str {
        "sensord"
    }

    /// Latest reading per label, in order of first appearance in the log.
    fn collect(&self) -> Result<Vec<TemperatureReading>, CollaboratorError> {
        scan_log(self.fs.as_ref(), &self.log_path, parse_line)
    }
}

pub fn parse_line(line: &str) -> Option<TemperatureReading> {
    let caps = LINE_RE.captures(line)?;
    let label = caps[1].trim();
    Some(TemperatureReading {
        path: label.to_string(),
        name: label.to_string(),
        value: caps[2].trim_start_matches('+').parse().ok()?,
        unit: caps[3].to_string(),
    })
}
