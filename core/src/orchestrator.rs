//! # Scan Orchestrator
//!
//! Runs one scan end to end: sweep the range, resolve hostnames, optionally
//! persist the table.
//!
//! `Idle -> Scanning -> Resolving -> (Persisting) -> Done`. A sweep that finds
//! nothing goes straight to `Done` and never touches the resolver or the disk.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chrono::Local;
use tracing::{Instrument, info, info_span, warn};

use mnat_common::config::ScanConfig;
use mnat_common::error::{RunError, StoreError};
use mnat_common::network::device::Device;
use mnat_common::network::range::ScanRange;
use mnat_common::output::OutputTarget;
use mnat_common::report::ScanResult;

use crate::pool::{ResolutionPool, ResolutionProgress};
use crate::resolver::ReverseDnsResolver;
use crate::scanner::{ArpScanner, NetworkScanner, dedup_by_ip};
use crate::store::ResultStore;

/// Prefixes at or below this length mean a sweep of 65 536+ addresses.
const LARGE_SWEEP_PREFIX: u8 = 16;

pub struct ScanOrchestrator {
    scanner: Box<dyn NetworkScanner>,
    /// `None` when hostname resolution is disabled.
    pool: Option<ResolutionPool>,
    store: ResultStore,
}

impl ScanOrchestrator {
    pub fn new(scanner: Box<dyn NetworkScanner>, pool: ResolutionPool, store: ResultStore) -> Self {
        Self {
            scanner,
            pool: Some(pool),
            store,
        }
    }

    /// ARP scanner, system reverse resolver and CSV store, tuned by `cfg`.
    pub fn from_config(cfg: &ScanConfig) -> Self {
        let resolver = Arc::new(ReverseDnsResolver::new(cfg.lookup_timeout).with_max_in_flight(cfg.lookup_limit()));
        let orchestrator = Self::new(
            Box::new(ArpScanner::new(cfg)),
            ResolutionPool::new(resolver, cfg.lookup_limit()),
            ResultStore::new(),
        );

        if cfg.no_dns {
            orchestrator.without_resolution()
        } else {
            orchestrator
        }
    }

    /// Skips the resolution phase; every device keeps the `unresolved` hostname.
    pub fn without_resolution(mut self) -> Self {
        self.pool = None;
        self
    }

    /// Registers a callback fired after each hostname lookup.
    pub fn on_resolved<F>(mut self, on_resolved: F) -> Self
    where
        F: Fn(&ResolutionProgress<'_>) + Send + Sync + 'static,
    {
        self.pool = self.pool.map(|pool| pool.with_progress(on_resolved));
        self
    }

    /// Scans `base/prefix`, resolves hostnames and saves to `target` if given.
    ///
    /// A persistence failure is returned as [`RunError::Persist`], which still
    /// carries the computed [`ScanResult`].
    pub async fn run(
        &self,
        base: &str,
        prefix: u8,
        target: Option<&OutputTarget>,
    ) -> Result<ScanResult, RunError> {
        let range: ScanRange = ScanRange::parse(base, prefix)?;
        let started_at = Local::now();
        let timer = Instant::now();

        if range.prefix() <= LARGE_SWEEP_PREFIX {
            warn!("Scanning {range} ({} addresses) may take a while", range.len());
        }
        info!("Scanning network: {range}");

        let devices = self
            .scanner
            .scan(range)
            .instrument(info_span!("scan", %range))
            .await?;
        let devices = dedup_by_ip(devices);

        if devices.is_empty() {
            info!("No devices found");
            return Ok(ScanResult::empty(started_at, timer.elapsed()));
        }
        info!("Found {} devices", devices.len());

        let devices = match &self.pool {
            Some(pool) => {
                info!("Resolving hostnames...");
                pool.resolve_all(devices)
                    .instrument(info_span!("resolve", limit = pool.limit()))
                    .await
            }
            None => devices,
        };

        let mut result = ScanResult::new(devices, started_at, timer.elapsed());
        info!("Scan completed in {:.2} seconds", result.duration.as_secs_f64());

        if let Some(target) = target {
            match self.persist(result.devices.clone(), target).await {
                Ok(path) => {
                    info!("Saved results to: {}", path.display());
                    result.saved_to = Some(path);
                }
                Err(source) => {
                    warn!("Could not save results: {source}");
                    return Err(RunError::Persist {
                        result: Box::new(result),
                        source,
                    });
                }
            }
        }

        Ok(result)
    }

    /// Writes on the blocking pool; the file I/O must not stall the runtime.
    async fn persist(&self, devices: Vec<Device>, target: &OutputTarget) -> Result<PathBuf, StoreError> {
        let store: ResultStore = self.store.clone();
        let owned: OutputTarget = target.clone();
        let span = info_span!("persist", path = %target.path().display());

        tokio::task::spawn_blocking(move || span.in_scope(|| store.save(&devices, &owned)))
            .await
            .unwrap_or_else(|e| Err(StoreError::io(target.path(), io::Error::other(e))))
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
