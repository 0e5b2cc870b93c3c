pub mod scan;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use mnat_common::config::{DEFAULT_LOOKUP_TIMEOUT, DEFAULT_MAX_CONCURRENT_LOOKUPS, ScanConfig};
use mnat_common::output::OutputTarget;

#[derive(Parser, Debug)]
#[command(name = "mnat")]
#[command(about = "Discover the devices on a local IPv4 network.", version)]
pub struct CommandLine {
    /// Base address of the network to scan, e.g. 192.168.1.0
    #[arg(long, value_name = "IPv4")]
    pub netip: String,

    /// Prefix length, written as /24 or 24
    #[arg(long, value_name = "/N", value_parser = parse_prefix)]
    pub subnet: u8,

    /// Save the device table as CSV (directory or file path)
    #[arg(long, short, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Use this interface instead of picking one
    #[arg(long, value_name = "NAME")]
    pub iface: Option<String>,

    /// Skip reverse DNS lookups
    #[arg(long)]
    pub no_dns: bool,

    /// Give up on a single reverse lookup after this many milliseconds
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_LOOKUP_TIMEOUT.as_millis() as u64)]
    pub lookup_timeout_ms: u64,

    /// Reverse lookups allowed in flight at once
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_CONCURRENT_LOOKUPS)]
    pub workers: usize,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn config(&self) -> ScanConfig {
        ScanConfig {
            interface: self.iface.clone(),
            lookup_timeout: Duration::from_millis(self.lookup_timeout_ms),
            max_concurrent_lookups: self.workers,
            no_dns: self.no_dns,
            ..ScanConfig::default()
        }
    }

    pub fn output_target(&self) -> Option<OutputTarget> {
        self.out.as_ref().map(OutputTarget::classify)
    }
}

fn parse_prefix(raw: &str) -> Result<u8, String> {
    let digits: &str = raw.trim().strip_prefix('/').unwrap_or(raw.trim());
    digits
        .parse::<u8>()
        .ok()
        .filter(|prefix| *prefix <= 32)
        .ok_or_else(|| format!("expected /N or N with N between 0 and 32, got '{raw}'"))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
