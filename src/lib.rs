//! hwsnap - hardware and OS snapshot library.
//!
//! Reads the Linux `/proc` and `/sys` pseudo-filesystems (plus the PCI/USB
//! vendor databases) and produces one immutable [`model::Snapshot`] per
//! collection pass, together with the non-fatal diagnostics gathered on the way.
//!
//! - `collector`: subsystem collectors, the filesystem seam and the orchestrator
//! - `model`: serializable snapshot records
//! - `config`: visibility flags, hide-lists, collaborator settings
//! - `fmt`: human-readable formatting helpers

pub mod collector;
pub mod config;
pub mod fmt;
pub mod model;
