//! Bounded fan-out of hostname lookups over a device list.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::warn;

use mnat_common::network::device::{Device, Hostname};

use crate::resolver::HostnameResolver;

/// Reported once per finished lookup, in completion order.
#[derive(Debug)]
pub struct ResolutionProgress<'a> {
    /// Lookups finished so far, this one included.
    pub completed: usize,
    pub total: usize,
    pub device: &'a Device,
}

pub type ProgressFn = Arc<dyn Fn(&ResolutionProgress<'_>) + Send + Sync>;

pub struct ResolutionPool {
    resolver: Arc<dyn HostnameResolver>,
    limit: usize,
    on_resolved: Option<ProgressFn>,
}

impl ResolutionPool {
    /// A pool running at most `limit` lookups at once (a zero limit is raised to one).
    pub fn new(resolver: Arc<dyn HostnameResolver>, limit: usize) -> Self {
        Self {
            resolver,
            limit: limit.max(1),
            on_resolved: None,
        }
    }

    pub fn with_progress<F>(mut self, on_resolved: F) -> Self
    where
        F: Fn(&ResolutionProgress<'_>) + Send + Sync + 'static,
    {
        self.on_resolved = Some(Arc::new(on_resolved));
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Resolves the hostname of every device and returns them in input order.
    ///
    /// Lookups are submitted in input order and never more than
    /// [`limit`](Self::limit) run at once. Returns only after every lookup
    /// has finished.
    pub async fn resolve_all(&self, devices: Vec<Device>) -> Vec<Device> {
        let total: usize = devices.len();
        let semaphore = Arc::new(Semaphore::new(self.limit));
        let completed = Arc::new(AtomicUsize::new(0));
        let mut tasks: JoinSet<(usize, Device)> = JoinSet::new();

        for (idx, device) in devices.iter().cloned().enumerate() {
            let Ok(permit) = semaphore.clone().acquire_owned().await else {
                break;
            };
            let resolver = self.resolver.clone();
            let completed = completed.clone();
            let on_resolved = self.on_resolved.clone();

            tasks.spawn(async move {
                let hostname: Hostname = resolver.resolve(device.ip).await;
                drop(permit);

                let device = device.with_hostname(hostname);
                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                if let Some(callback) = on_resolved {
                    callback(&ResolutionProgress {
                        completed: done,
                        total,
                        device: &device,
                    });
                }
                (idx, device)
            });
        }

        let mut resolved: Vec<Option<Device>> = vec![None; total];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((idx, device)) => resolved[idx] = Some(device),
                Err(e) => warn!("Hostname lookup task failed: {e}"),
            }
        }

        devices
            .into_iter()
            .zip(resolved)
            .map(|(original, resolved)| {
                resolved.unwrap_or_else(|| original.with_hostname(Hostname::Unresolved))
            })
            .collect()
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
