use std::net::Ipv4Addr;

use serde::Serialize;

use crate::protocols::common::ByteReader;
use crate::protocols::ethernet::MacAddr;

use super::error::ArpError;
use super::layout;

/// Ethernet/IPv4 ARP packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArpPacket {
    pub hardware_type: u16,
    pub protocol_type: u16,
    pub hardware_len: u8,
    pub protocol_len: u8,
    pub operation: u16,
    pub sender_mac: MacAddr,
    pub sender_ip: Ipv4Addr,
    pub target_mac: MacAddr,
    pub target_ip: Ipv4Addr,
}

impl ArpPacket {
    pub fn operation_name(&self) -> Option<&'static str> {
        match self.operation {
            layout::OPERATION_REQUEST => Some("request"),
            layout::OPERATION_REPLY => Some("reply"),
            _ => None,
        }
    }
}

/// Decode the 28-byte Ethernet/IPv4 form of an ARP packet.
pub fn parse_arp(packet: &[u8]) -> Result<ArpPacket, ArpError> {
    let reader = ByteReader::new(packet);
    reader.require_len(layout::ETHERNET_IPV4_LEN)?;

    let sender_ip: [u8; 4] = reader.read_array(layout::SENDER_IP_RANGE)?;
    let target_ip: [u8; 4] = reader.read_array(layout::TARGET_IP_RANGE)?;

    Ok(ArpPacket {
        hardware_type: reader.read_u16_be(layout::HARDWARE_TYPE_RANGE)?,
        protocol_type: reader.read_u16_be(layout::PROTOCOL_TYPE_RANGE)?,
        hardware_len: reader.read_u8(layout::HARDWARE_LEN_OFFSET)?,
        protocol_len: reader.read_u8(layout::PROTOCOL_LEN_OFFSET)?,
        operation: reader.read_u16_be(layout::OPERATION_RANGE)?,
        sender_mac: MacAddr(reader.read_array(layout::SENDER_MAC_RANGE)?),
        sender_ip: Ipv4Addr::from(sender_ip),
        target_mac: MacAddr(reader.read_array(layout::TARGET_MAC_RANGE)?),
        target_ip: Ipv4Addr::from(target_ip),
    })
}
