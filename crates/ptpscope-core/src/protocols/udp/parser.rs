use etherparse::UdpHeaderSlice;
use serde::Serialize;

use super::error::UdpError;
use super::layout;

/// Decoded UDP header, borrowing its payload from the record.
#[derive(Debug, Clone, Serialize)]
pub struct UdpHeader<'a> {
    pub source_port: u16,
    pub destination_port: u16,
    pub length: u16,
    pub checksum: u16,
    #[serde(skip)]
    pub payload: &'a [u8],
}

impl UdpHeader<'_> {
    /// Whether the payload should be handed to the PTP decoder.
    ///
    /// Only the destination port is considered.
    pub fn carries_ptp(&self) -> bool {
        is_ptp_port(self.destination_port)
    }
}

pub fn is_ptp_port(port: u16) -> bool {
    port == layout::PTP_EVENT_PORT || port == layout::PTP_GENERAL_PORT
}

/// Decode a UDP header.
///
/// # Errors
/// Returns `UdpError::TruncatedHeader` when fewer than 8 bytes are available.
pub fn parse_udp(segment: &[u8]) -> Result<UdpHeader<'_>, UdpError> {
    let header = UdpHeaderSlice::from_slice(segment)?;
    let (_, payload) = segment.split_at(header.slice().len());

    Ok(UdpHeader {
        source_port: header.source_port(),
        destination_port: header.destination_port(),
        length: header.length(),
        checksum: header.checksum(),
        payload,
    })
}
