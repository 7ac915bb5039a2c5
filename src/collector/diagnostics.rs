//! Non-fatal diagnostics gathered during a collection pass.

use serde::Serialize;
use std::fmt;
use tracing::warn;

/// Subsystem tag used for core `/proc` and `/sys` sources.
pub const CORE: &str = "core";
/// Subsystem tag used by the software RAID parser.
pub const MDSTAT: &str = "mdstat";
/// Subsystem tag used by the wireless parser.
pub const WIFI: &str = "wifi";
/// Subsystem tag used by the PCI/USB device resolver.
pub const DEVICES: &str = "devices";

/// One recorded problem, tagged with the subsystem that hit it.
#[derive(Clone, Serialize, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub subsystem: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.subsystem, self.message)
    }
}

/// Ordered sink for diagnostics.
///
/// Passed by `&mut` into every collector call and handed back to the caller
/// alongside the snapshot. Order within the sink is recording order.
#[derive(Clone, Serialize, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic and emits it as a `warn` event.
    pub fn record(&mut self, subsystem: impl Into<String>, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            subsystem: subsystem.into(),
            message: message.into(),
        };
        warn!(subsystem = %diagnostic.subsystem, "{}", diagnostic.message);
        self.entries.push(diagnostic);
    }

    /// Appends all diagnostics from `other`, keeping their order.
    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Diagnostics recorded for one subsystem.
    pub fn for_subsystem<'a>(&'a self, subsystem: &'a str) -> impl Iterator<Item = &'a Diagnostic> {
        self.entries.iter().filter(move |d| d.subsystem == subsystem)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_preserves_order() {
        let mut diags = Diagnostics::new();
        diags.record(CORE, "/proc/version not found");
        diags.record("hddtemp", "connection refused");
        diags.record(CORE, "error parsing /proc/loadavg");

        assert_eq!(diags.len(), 3);
        let core: Vec<_> = diags.for_subsystem(CORE).map(|d| d.message.as_str()).collect();
        assert_eq!(
            core,
            vec!["/proc/version not found", "error parsing /proc/loadavg"]
        );
    }

    #[test]
    fn test_extend_and_display() {
        let mut a = Diagnostics::new();
        a.record(CORE, "first");
        let mut b = Diagnostics::new();
        b.record(MDSTAT, "second");

        a.extend(b);
        let all = a.into_vec();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].to_string(), "[mdstat] second");
    }
}
