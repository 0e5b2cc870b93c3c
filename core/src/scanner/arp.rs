//! ARP sweep of a **local** IPv4 subnet.
//!
//! One broadcast request is built for every address of the range and the
//! whole burst is sent before a single, fixed collection window opens. Replies
//! are accepted until the window closes; silence is not an error.
//!
//! This scanner requires **root privileges** (or `CAP_NET_RAW`) to open a raw
//! Layer 2 socket.

use std::net::Ipv4Addr;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use pnet::datalink::{DataLinkReceiver, DataLinkSender};
use pnet::util::MacAddr;
use tracing::{debug, info, trace};

use mnat_common::config::ScanConfig;
use mnat_common::error::ScanError;
use mnat_common::network::device::Device;
use mnat_common::network::range::ScanRange;
use mnat_protocols::arp;

use super::{NetworkScanner, dedup_by_ip};
use crate::network::channel::{self, EthernetHandle};
use crate::network::interface;

pub struct ArpScanner {
    interface: Option<String>,
    collect_window: Duration,
}

#[async_trait]
impl NetworkScanner for ArpScanner {
    async fn scan(&self, range: ScanRange) -> Result<Vec<Device>, ScanError> {
        let interface: Option<String> = self.interface.clone();
        let window: Duration = self.collect_window;

        tokio::task::spawn_blocking(move || scan_blocking(range, interface.as_deref(), window))
            .await
            .map_err(|e| ScanError::Transport(format!("scan task failed: {e}")))?
    }
}

impl ArpScanner {
    pub fn new(cfg: &ScanConfig) -> Self {
        Self {
            interface: cfg.interface.clone(),
            collect_window: cfg.collect_window,
        }
    }
}

fn scan_blocking(range: ScanRange, forced: Option<&str>, window: Duration) -> Result<Vec<Device>, ScanError> {
    let intf = interface::select_interface(&range, forced)?;
    let src_mac: MacAddr = intf.mac.ok_or(ScanError::NoInterface(range.network()))?;
    let src_addr: Ipv4Addr = interface::source_addr(&intf, &range);
    info!("Sweeping {range} from {} ({src_addr}, {src_mac})", intf.name);

    let EthernetHandle { mut tx, mut rx } = channel::open(&intf)?;
    sweep(&range, src_mac, src_addr, tx.as_mut(), rx.as_mut(), window)
}

/// Sends the request burst, then collects replies for `window`.
pub(crate) fn sweep(
    range: &ScanRange,
    src_mac: MacAddr,
    src_addr: Ipv4Addr,
    tx: &mut dyn DataLinkSender,
    rx: &mut dyn DataLinkReceiver,
    window: Duration,
) -> Result<Vec<Device>, ScanError> {
    let sent: u64 = send_requests(range, src_mac, src_addr, tx)?;
    debug!("Sent {sent} ARP requests, listening for {:?}", window);
    Ok(collect_replies(rx, range, src_mac, window))
}

fn send_requests(
    range: &ScanRange,
    src_mac: MacAddr,
    src_addr: Ipv4Addr,
    tx: &mut dyn DataLinkSender,
) -> Result<u64, ScanError> {
    let mut sent: u64 = 0;
    for target in range.hosts() {
        let frame: Vec<u8> = arp::create_request(src_mac, src_addr, target)
            .map_err(|e| ScanError::Transport(format!("building ARP request for {target}: {e:#}")))?;

        match tx.send_to(&frame, None) {
            Some(Ok(())) => sent += 1,
            Some(Err(e)) => {
                return Err(ScanError::Transport(format!("sending ARP request for {target}: {e}")));
            }
            None => return Err(ScanError::Transport("datalink sender is unavailable".into())),
        }
    }
    Ok(sent)
}

fn collect_replies(
    rx: &mut dyn DataLinkReceiver,
    range: &ScanRange,
    own_mac: MacAddr,
    window: Duration,
) -> Vec<Device> {
    let deadline: Instant = Instant::now() + window;
    let mut replies: Vec<Device> = Vec::new();

    while Instant::now() < deadline {
        let reply = match rx.next() {
            Ok(frame) => arp::parse_reply(frame),
            // Read timeouts land here and just re-check the deadline.
            Err(e) => {
                trace!("datalink read: {e}");
                continue;
            }
        };

        match reply {
            Ok(reply) if reply.sender_mac == own_mac => {}
            Ok(reply) if !range.contains(reply.sender_ip) => {
                debug!("Ignoring reply from {}: outside {range}", reply.sender_ip);
            }
            Ok(reply) => {
                debug!("{} is at {}", reply.sender_ip, reply.sender_mac);
                replies.push(Device::new(reply.sender_ip, reply.sender_mac));
            }
            Err(e) => trace!("Dropping frame: {e:#}"),
        }
    }

    dedup_by_ip(replies)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
