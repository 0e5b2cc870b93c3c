use std::net::Ipv4Addr;

use pnet::ipnetwork::Ipv4Network;

use crate::error::ScanError;

/// An IPv4 block (`base/prefix`) targeted by a single scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScanRange {
    network: Ipv4Network,
}

impl ScanRange {
    /// Validates a dotted-quad base address and a prefix length in `[0, 32]`.
    ///
    /// Host bits in `base` are cleared, so `10.0.0.7/24` becomes `10.0.0.0/24`.
    pub fn parse(base: &str, prefix: u8) -> Result<Self, ScanError> {
        let base = base.trim();
        let addr: Ipv4Addr = base
            .parse()
            .map_err(|e| ScanError::InvalidRange(format!("'{base}' is not a dotted-quad address: {e}")))?;
        Self::new(addr, prefix)
    }

    pub fn new(addr: Ipv4Addr, prefix: u8) -> Result<Self, ScanError> {
        if prefix > 32 {
            return Err(ScanError::InvalidRange(format!(
                "prefix /{prefix} is outside /0../32"
            )));
        }
        let normalized = Ipv4Network::new(addr, prefix)
            .and_then(|net| Ipv4Network::new(net.network(), prefix))
            .map_err(|e| ScanError::InvalidRange(format!("{addr}/{prefix}: {e}")))?;

        Ok(Self { network: normalized })
    }

    pub fn network(&self) -> Ipv4Addr {
        self.network.network()
    }

    pub fn broadcast(&self) -> Ipv4Addr {
        self.network.broadcast()
    }

    pub fn prefix(&self) -> u8 {
        self.network.prefix()
    }

    /// Number of addresses in the block, network and broadcast included.
    pub fn len(&self) -> u64 {
        1u64 << (32 - u32::from(self.prefix()))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        self.network.contains(ip)
    }

    /// Every address of the block, in ascending order.
    pub fn hosts(&self) -> impl Iterator<Item = Ipv4Addr> + use<> {
        let start: u32 = self.network().into();
        let end: u32 = self.broadcast().into();
        (start..=end).map(Ipv4Addr::from)
    }
}

impl std::fmt::Display for ScanRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.network(), self.prefix())
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
