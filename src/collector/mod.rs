//! Hardware and OS collectors for Linux.
//!
//! This module reads the `/proc` and `/sys` pseudo-filesystems, the PCI/USB
//! vendor databases and optional external sensor daemons, with support for
//! mocking for tests on any platform.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Collector                           │
//! │  ┌──────────────────┐ ┌──────────────────┐ ┌──────────────┐  │
//! │  │ procfs           │ │ sysfs            │ │ devices      │  │
//! │  │ - system, mounts │ │ - block, net     │ │ - uevent ids │  │
//! │  │ - mdstat         │ │ - power_supply   │ │ - *.ids scan │  │
//! │  └────────┬─────────┘ └────────┬─────────┘ └──────┬───────┘  │
//! │           └──────────┬─────────┴──────────────────┘          │
//! │               ┌──────▼──────┐         ┌─────────────────┐    │
//! │               │  FileSystem │ (trait) │ temps (daemons) │    │
//! │               └──────┬──────┘         └─────────────────┘    │
//! └──────────────────────┼───────────────────────────────────────┘
//!              ┌─────────┴─────────┐
//!       ┌──────▼──────┐     ┌──────▼──────┐
//!       │   RealFs    │     │   MockFs    │
//!       │  (Linux)    │     │ (Testing)   │
//!       └─────────────┘     └─────────────┘
//! ```
//!
//! # Usage
//!
//! ## Production (Linux)
//!
//! ```ignore
//! use hwsnap::collector::{Collector, RealFs};
//! use hwsnap::config::Config;
//!
//! let config = Config::default();
//! let mut collector = Collector::new(RealFs::new(), &config.paths)?;
//! let (snapshot, diagnostics) = collector.collect_snapshot(&config);
//! ```
//!
//! ## Testing (with MockFs)
//!
//! ```
//! use hwsnap::collector::{Collector, MockFs};
//! use hwsnap::config::Config;
//!
//! let config = Config::default();
//! let mut collector = Collector::new(MockFs::typical_host(), &config.paths).unwrap();
//! let (snapshot, diagnostics) = collector.collect_snapshot(&config);
//! assert!(!snapshot.disks.is_empty());
//! assert!(diagnostics.is_empty());
//! ```

#[allow(clippy::module_inception)]
mod collector;
pub mod devices;
pub mod diagnostics;
pub mod error;
pub mod mock;
pub mod procfs;
pub mod reader;
pub mod sysfs;
pub mod temps;
pub mod traits;

pub use collector::{Collector, CollectorTiming};
pub use diagnostics::{Diagnostic, Diagnostics};
pub use error::{CollectError, ParseError};
pub use mock::MockFs;
pub use temps::{CollaboratorError, TemperatureAggregator, TemperatureSource};
pub use traits::{FileSystem, RealFs};
