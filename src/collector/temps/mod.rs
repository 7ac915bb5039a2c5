//! Temperatures, fan speeds and voltages from external monitoring daemons.
//!
//! Each daemon is a [`TemperatureSource`]. The [`TemperatureAggregator`]
//! runs the configured sources in order, concatenates what they return and
//! records a diagnostic for each one that fails.

pub mod hddtemp;
pub mod mbmon;
pub mod sensord;

use std::collections::HashMap;
use std::io::{self, BufRead, Read};
use std::net::{TcpStream, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::collector::diagnostics::Diagnostics;
use crate::collector::traits::FileSystem;
use crate::config::{DaemonAddress, HddtempMode, TempsConfig};
use crate::model::TemperatureReading;

pub use hddtemp::Hddtemp;
pub use mbmon::Mbmon;
pub use sensord::Sensord;

/// Daemon replies are a few hundred bytes; anything past this is ignored.
const MAX_REPLY_BYTES: u64 = 64 * 1024;

#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("cannot connect to {address}: {source}")]
    Connection { address: String, source: io::Error },

    #[error("timed out waiting for {address}")]
    Timeout { address: String },

    #[error("unexpected data: {0}")]
    Parse(String),

    #[error("{} is not readable: {source}", .path.display())]
    Unavailable { path: PathBuf, source: io::Error },
}

/// A collaborator that reports sensor readings.
pub trait TemperatureSource {
    /// Tag used for diagnostics, e.g. `hddtemp`.
    fn name(&self) -> &str;

    fn collect(&self) -> Result<Vec<TemperatureReading>, CollaboratorError>;
}

/// Runs temperature sources and merges their readings.
#[derive(Default)]
pub struct TemperatureAggregator {
    sources: Vec<Box<dyn TemperatureSource>>,
}

impl TemperatureAggregator {
    pub fn new(sources: Vec<Box<dyn TemperatureSource>>) -> Self {
        Self { sources }
    }

    /// Sources enabled in `config`, in hddtemp, mbmon, sensord order.
    ///
    /// Log-based sources read through `fs`.
    pub fn from_config(config: &TempsConfig, fs: Arc<dyn FileSystem>) -> Self {
        let mut sources: Vec<Box<dyn TemperatureSource>> = Vec::new();
        let timeout = config.timeout();

        if config.hddtemp.enabled {
            let source = match config.hddtemp.mode {
                HddtempMode::Daemon => Hddtemp::daemon(config.hddtemp.address.clone(), timeout),
                HddtempMode::Syslog => {
                    Hddtemp::syslog(Arc::clone(&fs), config.hddtemp.syslog_path.clone())
                }
            };
            sources.push(Box::new(source));
        }
        if config.mbmon.enabled {
            sources.push(Box::new(Mbmon::new(config.mbmon.address.clone(), timeout)));
        }
        if config.sensord.enabled {
            sources.push(Box::new(Sensord::new(fs, config.sensord.log_path.clone())));
        }

        Self { sources }
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Concatenated readings of every source that succeeded.
    pub fn collect(&self, diagnostics: &mut Diagnostics) -> Vec<TemperatureReading> {
        let mut readings = Vec::new();
        for source in &self.sources {
            match source.collect() {
                Ok(found) => {
                    debug!(source = source.name(), count = found.len(), "collected readings");
                    readings.extend(found);
                }
                Err(e) => diagnostics.record(source.name(), e.to_string()),
            }
        }
        readings
    }
}

/// Connects to a daemon that writes its report and closes the connection,
/// and returns everything it sent.
pub(crate) fn fetch(address: &DaemonAddress, timeout: Duration) -> Result<String, CollaboratorError> {
    let display = address.to_string();
    let connection_error = |source: io::Error| CollaboratorError::Connection {
        address: display.clone(),
        source,
    };

    let addrs = (address.host.as_str(), address.port)
        .to_socket_addrs()
        .map_err(connection_error)?;

    let mut last_error = io::Error::new(io::ErrorKind::NotFound, "host resolved to no addresses");
    for addr in addrs {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => return read_reply(stream, timeout, &display),
            Err(e) if e.kind() == io::ErrorKind::TimedOut => {
                return Err(CollaboratorError::Timeout {
                    address: display.clone(),
                });
            }
            Err(e) => last_error = e,
        }
    }
    Err(connection_error(last_error))
}

fn read_reply(stream: TcpStream, timeout: Duration, address: &str) -> Result<String, CollaboratorError> {
    stream
        .set_read_timeout(Some(timeout))
        .map_err(|source| CollaboratorError::Connection {
            address: address.to_string(),
            source,
        })?;

    let mut bytes = Vec::new();
    match stream.take(MAX_REPLY_BYTES).read_to_end(&mut bytes) {
        Ok(_) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
            Err(CollaboratorError::Timeout {
                address: address.to_string(),
            })
        }
        Err(source) => Err(CollaboratorError::Connection {
            address: address.to_string(),
            source,
        }),
    }
}

/// Feeds every line of a log file to `parse`, keeping the latest reading per
/// sensor path in order of first appearance.
pub(crate) fn scan_log<P>(
    fs: &dyn FileSystem,
    path: &Path,
    parse: P,
) -> Result<Vec<TemperatureReading>, CollaboratorError>
where
    P: Fn(&str) -> Option<TemperatureReading>,
{
    let unavailable = |source| CollaboratorError::Unavailable {
        path: path.to_path_buf(),
        source,
    };
    let reader = fs.open(path).map_err(unavailable)?;

    let mut readings: Vec<TemperatureReading> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for line in reader.split(b'\n') {
        let line = line.map_err(unavailable)?;
        let Some(reading) = parse(&String::from_utf8_lossy(&line)) else {
            continue;
        };
        match index.get(&reading.path) {
            Some(&i) => readings[i] = reading,
            None => {
                index.insert(reading.path.clone(), readings.len());
                readings.push(reading);
            }
        }
    }
    Ok(readings)
}

#[cfg(test)]
pub(crate) mod testutil {
    use std::io::Write;
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    use crate::config::DaemonAddress;

    /// Serves `reply` to exactly one client on a loopback port.
    pub fn serve_once(reply: &'static str) -> (DaemonAddress, JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                stream.write_all(reply.as_bytes()).unwrap();
            }
        });
        let address = DaemonAddress {
            host: "127.0.0.1".to_string(),
            port,
        };
        (address, handle)
    }

    /// An address nobody listens on.
    pub fn closed_address() -> DaemonAddress {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        DaemonAddress {
            host: "127.0.0.1".to_string(),
            port,
        }
    }
}
