use std::time::Duration;

/// Window during which ARP replies are accepted after the request burst.
pub const DEFAULT_COLLECT_WINDOW: Duration = Duration::from_secs(2);
/// Upper bound for a single reverse lookup.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(1);
/// Maximum number of reverse lookups in flight at any instant.
pub const DEFAULT_MAX_CONCURRENT_LOOKUPS: usize = 20;

#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Datalink interface to use. Picked automatically when `None`.
    pub interface: Option<String>,
    pub collect_window: Duration,
    pub lookup_timeout: Duration,
    pub max_concurrent_lookups: usize,
    /// Disables the hostname resolution phase.
    ///
    /// Devices keep their `unresolved` hostname.
    pub no_dns: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            interface: None,
            collect_window: DEFAULT_COLLECT_WINDOW,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
            max_concurrent_lookups: DEFAULT_MAX_CONCURRENT_LOOKUPS,
            no_dns: false,
        }
    }
}

impl ScanConfig {
    /// Concurrency cap actually enforced by the resolution pool (never zero).
    pub fn lookup_limit(&self) -> usize {
        self.max_concurrent_lookups.max(1)
    }
}
