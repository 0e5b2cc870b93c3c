use std::fmt;
use std::net::Ipv4Addr;

use pnet::util::MacAddr;

/// Placeholder written in place of a hostname that could not be resolved.
pub const UNRESOLVED: &str = "unresolved";

/// Outcome of a reverse lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Hostname {
    Resolved(String),
    #[default]
    Unresolved,
}

impl Hostname {
    /// Builds a hostname from a raw lookup answer. Empty answers are unresolved.
    pub fn from_lookup(name: Option<String>) -> Self {
        match name {
            Some(name) if !name.trim().is_empty() => Hostname::Resolved(name.trim().to_string()),
            _ => Hostname::Unresolved,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Hostname::Resolved(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Hostname::Resolved(name) => name,
            Hostname::Unresolved => UNRESOLVED,
        }
    }
}

impl fmt::Display for Hostname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A host that answered the ARP sweep.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Device {
    pub ip: Ipv4Addr,
    pub mac: MacAddr,
    pub hostname: Hostname,
}

impl Device {
    pub fn new(ip: Ipv4Addr, mac: MacAddr) -> Self {
        Self {
            ip,
            mac,
            hostname: Hostname::Unresolved,
        }
    }

    pub fn with_hostname(self, hostname: Hostname) -> Self {
        Self { hostname, ..self }
    }

    /// The `IP, MAC, Hostname` fields as written to disk.
    pub fn to_record(&self) -> [String; 3] {
        [
            self.ip.to_string(),
            self.mac.to_string(),
            self.hostname.to_string(),
        ]
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
