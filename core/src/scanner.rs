//! The central **abstraction** for finding live hosts on a subnet.
//!
//! The orchestrator depends on [`NetworkScanner`] only, so the link-layer
//! implementation ([`ArpScanner`]) can be swapped for a fake in tests.

use std::collections::HashSet;
use std::net::Ipv4Addr;

use async_trait::async_trait;
use mnat_common::error::ScanError;
use mnat_common::network::device::Device;
use mnat_common::network::range::ScanRange;

mod arp;

pub use arp::ArpScanner;

/// Sweeps an address range and reports every host that answered.
#[async_trait]
pub trait NetworkScanner: Send + Sync {
    /// Returns the hosts that replied within the collection window.
    ///
    /// An empty list is a valid result, not an error. Implementations must
    /// not retry.
    async fn scan(&self, range: ScanRange) -> Result<Vec<Device>, ScanError>;
}

/// Keeps the first device seen for each IP address, preserving order.
pub fn dedup_by_ip(devices: impl IntoIterator<Item = Device>) -> Vec<Device> {
    let mut seen: HashSet<Ipv4Addr> = HashSet::new();
    devices
        .into_iter()
        .filter(|device| seen.insert(device.ip))
        .collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
