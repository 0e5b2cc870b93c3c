//! Frame codecs used by the ARP sweep.
//!
//! Everything here works on byte buffers only; opening sockets and sending
//! frames is left to `mnat-core`.

pub mod arp;
pub mod ethernet;

/// Shortest Ethernet frame on the wire, frame check sequence excluded.
pub const MIN_ETH_FRAME_NO_FCS: usize = 60;
pub const ETH_HDR_LEN: usize = 14;
pub const ARP_LEN: usize = 28;
