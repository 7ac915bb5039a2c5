//! Motherboard sensors from the mbmon TCP daemon.
//!
//! mbmon in daemon mode (`mbmon -r -P 411`) answers each connection with
//! `NAME : value` lines and closes it:
//!
//! ```text
//! TEMP0 : 31.0
//! FAN0  : 2860
//! VC0   :  +1.33
//! ```

use std::time::Duration;

use super::{CollaboratorError, TemperatureSource, fetch};
use crate::config::DaemonAddress;
use crate::model::TemperatureReading;

pub struct Mbmon {
    address: DaemonAddress,
    timeout: Duration,
}

impl Mbmon {
    pub fn new(address: DaemonAddress, timeout: Duration) -> Self {
        Self { address, timeout }
    }
}

impl TemperatureSource for Mbmon {
    fn name(&self) -> &str {
        "mbmon"
    }

    fn collect(&self) -> Result<Vec<TemperatureReading>, CollaboratorError> {
        parse_reply(&fetch(&self.address, self.timeout)?)
    }
}

/// Unit for an mbmon sensor name, `None` for sensors that are not reported.
fn unit_for(name: &str) -> Option<&'static str> {
    if name.starts_with("TEMP") {
        Some("C")
    } else if name.starts_with("FAN") {
        Some("RPM")
    } else if name.starts_with('V') {
        Some("V")
    } else {
        None
    }
}

/// Parses an mbmon reply. A reply without a single `NAME : value` line is an error.
pub fn parse_reply(reply: &str) -> Result<Vec<TemperatureReading>, CollaboratorError> {
    let mut readings = Vec::new();
    let mut recognised = false;

    for line in reply.lines() {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let name = name.trim();
        let Ok(value) = value.trim().trim_start_matches('+').parse::<f64>() else {
            continue;
        };
        recognised = true;

        if let Some(unit) = unit_for(name) {
            readings.push(TemperatureReading {
                path: name.to_string(),
                name: name.to_string(),
                value,
                unit: unit.to_string(),
            });
        }
    }

    if !recognised && !reply.trim().is_empty() {
        return Err(CollaboratorError::Parse(format!(
            "no sensor lines in mbmon reply {:?}",
            reply.trim()
        )));
    }
    Ok(readings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::temps::testutil::serve_once;

    const REPLY: &str = "\
TEMP0 : 31.0
TEMP1 : 42.5
FAN0  : 2860
VC0   :  +1.33
V33   :  +3.31
";

    #[test]
    fn test_parse_reply_units() {
        let readings = parse_reply(REPLY).unwrap();
        let summary: Vec<_> = readings
            .iter()
            .map(|r| (r.name.as_str(), r.value, r.unit.as_str()))
            .collect();

        assert_eq!(
            summary,
            vec![
                ("TEMP0", 31.0, "C"),
                ("TEMP1", 42.5, "C"),
                ("FAN0", 2860.0, "RPM"),
                ("VC0", 1.33, "V"),
                ("V33", 3.31, "V"),
            ]
        );
    }

    #[test]
    fn test_parse_reply_skips_unknown_sensors() {
        let readings = parse_reply("TEMP0 : 30.0\nCHASSIS : 1\n").unwrap();
        assert_eq!(readings.len(), 1);
    }

    #[test]
    fn test_parse_reply_garbage() {
        assert!(matches!(
            parse_reply("HTTP/1.1 400 Bad Request\r\n"),
            Err(CollaboratorError::Parse(_))
        ));
        assert!(parse_reply("").unwrap().is_empty());
    }

    #[test]
    fn test_collect_over_tcp() {
        let (address, server) = serve_once(REPLY);
        let readings = Mbmon::new(address, Duration::from_secs(2)).collect().unwrap();
        server.join().unwrap();
        assert_eq!(readings.len(), 5);
    }
}
