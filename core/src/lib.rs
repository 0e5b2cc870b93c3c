//! # mnat core
//!
//! Local network discovery: an ARP sweep over an IPv4 range, bounded
//! concurrent reverse lookups of every host that answered, and an optional
//! CSV dump of the resulting device table.
//!
//! * [`scanner`]: link-layer sweep ([`scanner::ArpScanner`]).
//! * [`resolver`] and [`pool`]: hostname lookups, at most K in flight.
//! * [`store`]: CSV persistence.
//! * [`orchestrator`]: ties the phases together.

pub mod network;
pub mod orchestrator;
pub mod pool;
pub mod resolver;
pub mod scanner;
pub mod store;

pub use orchestrator::ScanOrchestrator;
