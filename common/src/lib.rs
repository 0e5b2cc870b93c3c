//! Shared model for the mnat workspace.
//!
//! Holds everything the scanner, resolver and store agree on: the device
//! record, the subnet being scanned, the configuration knobs and the error
//! taxonomy. Nothing in this crate touches the network or the filesystem.

pub mod config;
pub mod error;
pub mod network;
pub mod output;
pub mod report;
