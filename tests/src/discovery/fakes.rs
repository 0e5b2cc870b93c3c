use std::collections::HashMap;
use std::io;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use mnat_common::error::ScanError;
use mnat_common::network::device::{Device, Hostname};
use mnat_common::network::range::ScanRange;
use mnat_core::pool::ResolutionPool;
use mnat_core::resolver::HostnameResolver;
use mnat_core::scanner::NetworkScanner;
use mnat_core::store::ResultStore;
use mnat_core::ScanOrchestrator;
use pnet::util::MacAddr;

pub fn device(last_octet: u8, mac_byte: u8) -> Device {
    Device::new(
        Ipv4Addr::new(192, 168, 1, last_octet),
        MacAddr::new(0x02, 0, 0, 0, 0, mac_byte),
    )
}

/// Replays a fixed set of replies, or fails like a socket without privileges.
pub enum FakeScanner {
    Replies(Vec<Device>),
    Denied,
}

#[async_trait]
impl NetworkScanner for FakeScanner {
    async fn scan(&self, _range: ScanRange) -> Result<Vec<Device>, ScanError> {
        match self {
            FakeScanner::Replies(devices) => Ok(devices.clone()),
            FakeScanner::Denied => Err(ScanError::Permission {
                interface: "eth0".into(),
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            }),
        }
    }
}

/// Answers from a table; every other address fails to resolve.
#[derive(Default)]
pub struct TableResolver {
    names: HashMap<Ipv4Addr, String>,
    pub calls: AtomicUsize,
}

impl TableResolver {
    pub fn with(mut self, ip: Ipv4Addr, name: &str) -> Self {
        self.names.insert(ip, name.to_string());
        self
    }
}

#[async_trait]
impl HostnameResolver for TableResolver {
    async fn resolve(&self, ip: Ipv4Addr) -> Hostname {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Hostname::from_lookup(self.names.get(&ip).cloned())
    }
}

/// Sleeps on every lookup and records the highest number in flight.
#[derive(Default)]
pub struct SlowResolver {
    in_flight: AtomicUsize,
    pub peak: AtomicUsize,
    pub started: Mutex<Vec<Ipv4Addr>>,
}

#[async_trait]
impl HostnameResolver for SlowResolver {
    async fn resolve(&self, ip: Ipv4Addr) -> Hostname {
        self.started.lock().unwrap().push(ip);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(20)).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Hostname::Resolved(format!("host-{}", ip.octets()[3]))
    }
}

pub fn orchestrator(scanner: FakeScanner, resolver: Arc<dyn HostnameResolver>) -> ScanOrchestrator {
    ScanOrchestrator::new(
        Box::new(scanner),
        ResolutionPool::new(resolver, 20),
        ResultStore::new(),
    )
}
