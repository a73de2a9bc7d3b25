use std::net::{Ipv4Addr, Ipv6Addr};

use etherparse::{Ipv4HeaderSlice, Ipv6HeaderSlice};
use serde::Serialize;

use super::error::IpError;
use super::layout;

/// Decoded IPv4 header, borrowing its payload from the record.
#[derive(Debug, Clone, Serialize)]
pub struct Ipv4Header<'a> {
    pub version: u8,
    pub ihl: u8,
    pub dscp: u8,
    pub ecn: u8,
    pub total_length: u16,
    pub identification: u16,
    pub dont_fragment: bool,
    pub more_fragments: bool,
    pub fragment_offset: u16,
    pub ttl: u8,
    pub protocol: u8,
    pub checksum: u16,
    pub source: Ipv4Addr,
    pub destination: Ipv4Addr,
    #[serde(skip)]
    pub payload: &'a [u8],
}

impl Ipv4Header<'_> {
    pub fn header_len(&self) -> usize {
        usize::from(self.ihl) * 4
    }
}

/// Decoded IPv6 fixed header, borrowing its payload from the record.
#[derive(Debug, Clone, Serialize)]
pub struct Ipv6Header<'a> {
    pub version: u8,
    pub traffic_class: u8,
    pub flow_label: u32,
    pub payload_length: u16,
    pub next_header: u8,
    pub hop_limit: u8,
    pub source: Ipv6Addr,
    pub destination: Ipv6Addr,
    #[serde(skip)]
    pub payload: &'a [u8],
}

/// Decode an IPv4 header.
///
/// The payload starts after the header length announced by IHL, which is 20
/// bytes for headers without options.
///
/// # Errors
/// - `IpError::TruncatedHeader` when fewer than 20 bytes (or fewer than the
///   announced header length) are available.
/// - `IpError::InvalidVersion` when the version nibble is not 4.
/// - `IpError::InvalidHeaderLength` when IHL is below 5.
pub fn parse_ipv4(packet: &[u8]) -> Result<Ipv4Header<'_>, IpError> {
    let header = Ipv4HeaderSlice::from_slice(packet)?;
    let (_, payload) = packet.split_at(header.slice().len());

    Ok(Ipv4Header {
        version: header.version(),
        ihl: header.ihl(),
        dscp: header.dcp().value(),
        ecn: header.ecn().value(),
        total_length: header.total_len(),
        identification: header.identification(),
        dont_fragment: header.dont_fragment(),
        more_fragments: header.more_fragments(),
        fragment_offset: header.fragments_offset().value(),
        ttl: header.ttl(),
        protocol: header.protocol().0,
        checksum: header.header_checksum(),
        source: header.source_addr(),
        destination: header.destination_addr(),
        payload,
    })
}

/// Decode an IPv6 fixed header. Extension headers are not walked; the
/// payload is everything after the first 40 bytes.
///
/// # Errors
/// - `IpError::TruncatedHeader` when fewer than 40 bytes are available.
/// - `IpError::InvalidVersion` when the version nibble is not 6.
pub fn parse_ipv6(packet: &[u8]) -> Result<Ipv6Header<'_>, IpError> {
    let header = Ipv6HeaderSlice::from_slice(packet)?;
    let (_, payload) = packet.split_at(header.slice().len());

    Ok(Ipv6Header {
        version: header.version(),
        traffic_class: header.traffic_class(),
        flow_label: header.flow_label().value(),
        payload_length: header.payload_length(),
        next_header: header.next_header().0,
        hop_limit: header.hop_limit(),
        source: header.source_addr(),
        destination: header.destination_addr(),
        payload,
    })
}

/// Version nibble of a raw IP packet, used when no link layer names it.
pub(crate) fn peek_version(packet: &[u8]) -> Option<u8> {
    packet.get(layout::VERSION_OFFSET).map(|byte| byte >> 4)
}

/// Name of an IP protocol / next-header number, when known.
pub fn protocol_name(protocol: u8) -> Option<&'static str> {
    match protocol {
        layout::PROTOCOL_ICMP => Some("ICMP"),
        layout::PROTOCOL_TCP => Some("TCP"),
        layout::PROTOCOL_UDP => Some("UDP"),
        layout::PROTOCOL_ICMPV6 => Some("ICMPv6"),
        _ => None,
    }
}
