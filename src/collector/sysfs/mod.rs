//! Collectors for the Linux `/sys` filesystem: block devices, network
//! interfaces and batteries.

pub mod block;
pub mod net;
pub mod parser;
pub mod power;

pub use block::StorageCollector;
pub use net::NetworkCollector;
pub use power::BatteryCollector;
