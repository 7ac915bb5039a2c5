//! Collectors for the Linux `/proc` filesystem.
//!
//! This module provides parsers and collectors for OS facts, memory, CPUs,
//! mounts, software RAID and wireless links.

pub mod mdstat;
pub mod mounts;
pub mod parser;
pub mod system;

pub use mdstat::RaidCollector;
pub use mounts::{MountCollector, MountFilter};
pub use system::SystemCollector;
