//! Collection settings: which subsystems run, what to hide, where to look.
//!
//! Every field has a default, so an empty YAML document is a valid config.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub show: ShowConfig,
    pub hide: HideConfig,
    pub raid: RaidConfig,
    pub temps: TempsConfig,
    pub paths: PathsConfig,
}

/// One switch per subsystem. A disabled subsystem is not read at all.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ShowConfig {
    pub os: bool,
    pub kernel: bool,
    pub hostname: bool,
    pub uptime: bool,
    pub load: bool,
    pub ram: bool,
    pub cpu: bool,
    pub hd: bool,
    pub mounts: bool,
    pub devices: bool,
    pub network: bool,
    pub battery: bool,
    pub raid: bool,
    pub wifi: bool,
    pub temps: bool,
}

impl Default for ShowConfig {
    fn default() -> Self {
        Self::all(true)
    }
}

impl ShowConfig {
    /// Every subsystem set to `enabled`.
    pub fn all(enabled: bool) -> Self {
        Self {
            os: enabled,
            kernel: enabled,
            hostname: enabled,
            uptime: enabled,
            load: enabled,
            ram: enabled,
            cpu: enabled,
            hd: enabled,
            mounts: enabled,
            devices: enabled,
            network: enabled,
            battery: enabled,
            raid: enabled,
            wifi: enabled,
            temps: enabled,
        }
    }
}

/// Mount entries to leave out, by source device or filesystem type.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct HideConfig {
    pub storage_devices: Vec<String>,
    pub filesystems: Vec<String>,
}

impl Default for HideConfig {
    fn default() -> Self {
        Self {
            storage_devices: vec!["gvfs-fuse-daemon".to_string(), "none".to_string()],
            filesystems: [
                "tmpfs",
                "devtmpfs",
                "proc",
                "sysfs",
                "devpts",
                "securityfs",
                "cgroup",
                "cgroup2",
                "pstore",
                "bpf",
                "debugfs",
                "tracefs",
                "mqueue",
                "hugetlbfs",
                "configfs",
                "fusectl",
                "autofs",
                "binfmt_misc",
                "rpc_pipefs",
                "usbfs",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct RaidConfig {
    /// Parse `/proc/mdstat`.
    pub mdadm: bool,
}

impl Default for RaidConfig {
    fn default() -> Self {
        Self { mdadm: true }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct DaemonAddress {
    pub host: String,
    pub port: u16,
}

impl DaemonAddress {
    fn local(port: u16) -> Self {
        Self {
            host: "localhost".to_string(),
            port,
        }
    }
}

impl std::fmt::Display for DaemonAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum HddtempMode {
    /// Query the hddtemp TCP daemon.
    #[default]
    Daemon,
    /// Scan hddtemp lines in the system log.
    Syslog,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct HddtempConfig {
    pub enabled: bool,
    pub mode: HddtempMode,
    pub address: DaemonAddress,
    pub syslog_path: PathBuf,
}

impl Default for HddtempConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            mode: HddtempMode::Daemon,
            address: DaemonAddress::local(7634),
            syslog_path: PathBuf::from("/var/log/syslog"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct MbmonConfig {
    pub enabled: bool,
    pub address: DaemonAddress,
}

impl Default for MbmonConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            address: DaemonAddress::local(411),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct SensordConfig {
    pub enabled: bool,
    pub log_path: PathBuf,
}

impl Default for SensordConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: PathBuf::from("/var/log/messages"),
        }
    }
}

/// External temperature collaborators. All disabled by default.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct TempsConfig {
    pub hddtemp: HddtempConfig,
    pub mbmon: MbmonConfig,
    pub sensord: SensordConfig,
    /// Connect and read timeout for daemon collaborators.
    pub timeout_ms: u64,
}

impl Default for TempsConfig {
    fn default() -> Self {
        Self {
            hddtemp: HddtempConfig::default(),
            mbmon: MbmonConfig::default(),
            sensord: SensordConfig::default(),
            timeout_ms: 2000,
        }
    }
}

impl TempsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathsConfig {
    pub proc: PathBuf,
    pub sys: PathBuf,
    pub pci_ids: PathBuf,
    pub usb_ids: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            proc: PathBuf::from("/proc"),
            sys: PathBuf::from("/sys"),
            pci_ids: PathBuf::from("/usr/share/misc/pci.ids"),
            usb_ids: PathBuf::from("/usr/share/misc/usb.ids"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse YAML in {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },
    #[error("invalid config: {0}")]
    Validation(String),
}

impl Config {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        let path_display = path_ref.display().to_string();
        let text = fs::read_to_string(path_ref).map_err(|source| ConfigError::Read {
            path: path_display.clone(),
            source,
        })?;
        Self::from_yaml(&text).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path_display,
                source,
            },
            other => other,
        })
    }

    /// Parses and validates a YAML document.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let cfg: Config = serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
            path: "<inline>".to_string(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, path) in [("proc", &self.paths.proc), ("sys", &self.paths.sys)] {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "paths.{} must not be empty",
                    name
                )));
            }
        }

        let temps = &self.temps;
        let daemons_enabled = (temps.hddtemp.enabled && temps.hddtemp.mode == HddtempMode::Daemon)
            || temps.mbmon.enabled;
        if daemons_enabled && temps.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "temps.timeout_ms must be > 0".to_string(),
            ));
        }
        if temps.hddtemp.enabled && temps.hddtemp.mode == HddtempMode::Daemon {
            validate_address("temps.hddtemp.address", &temps.hddtemp.address)?;
        }
        if temps.mbmon.enabled {
            validate_address("temps.mbmon.address", &temps.mbmon.address)?;
        }

        Ok(())
    }
}

fn validate_address(field: &str, address: &DaemonAddress) -> Result<(), ConfigError> {
    if address.host.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{}.host must not be empty", field)));
    }
    if address.port == 0 {
        return Err(ConfigError::Validation(format!("{}.port must be > 0", field)));
    }
    Ok(())
}
