//! Reverse (PTR) hostname lookups.
//!
//! A lookup never fails from the caller's point of view: errors, missing
//! records and timeouts all come back as [`Hostname::Unresolved`].

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dns_lookup::lookup_addr;
use tokio::sync::Semaphore;
use tracing::debug;

use mnat_common::config::{DEFAULT_LOOKUP_TIMEOUT, DEFAULT_MAX_CONCURRENT_LOOKUPS};
use mnat_common::network::device::Hostname;

#[async_trait]
pub trait HostnameResolver: Send + Sync {
    async fn resolve(&self, ip: Ipv4Addr) -> Hostname;
}

type LookupFn = Arc<dyn Fn(IpAddr) -> Result<String, String> + Send + Sync>;

/// Resolves through the system resolver (`getnameinfo`), bounded by a timeout.
///
/// The blocking call cannot be cancelled, so a timed out lookup keeps its
/// slot until the system resolver gives up. At most `max_in_flight` system
/// lookups run at once, abandoned ones included.
pub struct ReverseDnsResolver {
    timeout: Duration,
    slots: Arc<Semaphore>,
    lookup: LookupFn,
}

impl ReverseDnsResolver {
    pub fn new(timeout: Duration) -> Self {
        Self::with_lookup(timeout, DEFAULT_MAX_CONCURRENT_LOOKUPS, system_lookup)
    }

    /// Caps the system lookups running at once (a zero limit is raised to one).
    pub fn with_max_in_flight(mut self, limit: usize) -> Self {
        self.slots = Arc::new(Semaphore::new(limit.max(1)));
        self
    }

    fn with_lookup<F>(timeout: Duration, limit: usize, lookup: F) -> Self
    where
        F: Fn(IpAddr) -> Result<String, String> + Send + Sync + 'static,
    {
        Self {
            timeout,
            slots: Arc::new(Semaphore::new(limit.max(1))),
            lookup: Arc::new(lookup),
        }
    }
}

impl Default for ReverseDnsResolver {
    fn default() -> Self {
        Self::new(DEFAULT_LOOKUP_TIMEOUT)
    }
}

fn system_lookup(addr: IpAddr) -> Result<String, String> {
    lookup_addr(&addr).map_err(|e| e.to_string())
}

#[async_trait]
impl HostnameResolver for ReverseDnsResolver {
    async fn resolve(&self, ip: Ipv4Addr) -> Hostname {
        // The timeout only starts once a slot is free, so every lookup gets to run.
        let Ok(slot) = self.slots.clone().acquire_owned().await else {
            return Hostname::Unresolved;
        };
        let lookup = self.lookup.clone();
        let handle = tokio::task::spawn_blocking(move || {
            let _slot = slot;
            lookup(IpAddr::V4(ip))
        });

        match tokio::time::timeout(self.timeout, handle).await {
            Ok(Ok(Ok(name))) if name != ip.to_string() => Hostname::from_lookup(Some(name)),
            Ok(Ok(Ok(_))) => {
                debug!("No PTR record for {ip}");
                Hostname::Unresolved
            }
            Ok(Ok(Err(e))) => {
                debug!("Reverse lookup of {ip} failed: {e}");
                Hostname::Unresolved
            }
            Ok(Err(e)) => {
                debug!("Reverse lookup task for {ip} aborted: {e}");
                Hostname::Unresolved
            }
            Err(_) => {
                debug!("Reverse lookup of {ip} timed out after {:?}", self.timeout);
                Hostname::Unresolved
            }
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
