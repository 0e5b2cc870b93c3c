use std::net::Ipv4Addr;

use anyhow::{Context, ensure};
use pnet::packet::Packet;
use pnet::packet::arp::{ArpHardwareTypes, ArpOperations, ArpPacket, MutableArpPacket};
use pnet::packet::ethernet::EtherTypes;
use pnet::util::MacAddr;

use crate::{ARP_LEN, ETH_HDR_LEN, MIN_ETH_FRAME_NO_FCS, ethernet};

/// Sender fields of an ARP reply: who owns which address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArpReply {
    pub sender_mac: MacAddr,
    pub sender_ip: Ipv4Addr,
}

/// Builds a broadcast "who has `target_addr`" request, padded to the minimum
/// Ethernet frame size.
pub fn create_request(
    src_mac: MacAddr,
    src_addr: Ipv4Addr,
    target_addr: Ipv4Addr,
) -> anyhow::Result<Vec<u8>> {
    let mut buffer = [0u8; MIN_ETH_FRAME_NO_FCS];
    ethernet::make_header(&mut buffer, src_mac, MacAddr::broadcast(), EtherTypes::Arp)?;

    let mut arp_packet = MutableArpPacket::new(&mut buffer[ETH_HDR_LEN..ETH_HDR_LEN + ARP_LEN])
        .context("failed to create mutable ARP packet")?;
    arp_packet.set_hardware_type(ArpHardwareTypes::Ethernet);
    arp_packet.set_protocol_type(EtherTypes::Ipv4);
    arp_packet.set_hw_addr_len(6);
    arp_packet.set_proto_addr_len(4);
    arp_packet.set_operation(ArpOperations::Request);
    arp_packet.set_sender_hw_addr(src_mac);
    arp_packet.set_target_hw_addr(MacAddr::zero());
    arp_packet.set_sender_proto_addr(src_addr);
    arp_packet.set_target_proto_addr(target_addr);

    Ok(Vec::from(buffer))
}

/// Extracts the sender of an ARP reply carried in a raw Ethernet frame.
///
/// Fails on non-ARP frames, truncated payloads and ARP requests.
pub fn parse_reply(frame: &[u8]) -> anyhow::Result<ArpReply> {
    let eth_frame = ethernet::get_packet_from_u8(frame)?;
    ensure!(
        eth_frame.get_ethertype() == EtherTypes::Arp,
        "not an ARP frame (ethertype {:?})",
        eth_frame.get_ethertype()
    );

    let arp_packet = ArpPacket::new(eth_frame.payload()).with_context(|| {
        format!(
            "truncated or invalid ARP packet (payload len {})",
            eth_frame.payload().len()
        )
    })?;
    ensure!(
        arp_packet.get_operation() == ArpOperations::Reply,
        "ARP operation {:?} is not a reply",
        arp_packet.get_operation()
    );

    Ok(ArpReply {
        sender_mac: arp_packet.get_sender_hw_addr(),
        sender_ip: arp_packet.get_sender_proto_addr(),
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
