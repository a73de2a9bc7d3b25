use std::fmt;

use etherparse::{EtherType, Ethernet2HeaderSlice, SingleVlanHeaderSlice};
use serde::{Serialize, Serializer};

use super::error::EthernetError;
use super::layout;

/// A 48-bit hardware address, rendered as `AA:BB:CC:DD:EE:FF`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddr(pub [u8; 6]);

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

impl Serialize for MacAddr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// IEEE 802.1Q tag fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VlanTag {
    pub tci: u16,
    pub priority: u8,
    pub dei: bool,
    pub vlan_id: u16,
    pub encapsulated_type: u16,
}

impl VlanTag {
    fn from_slice(tag: &SingleVlanHeaderSlice<'_>) -> Self {
        let priority = tag.priority_code_point().value();
        let dei = tag.drop_eligible_indicator();
        let vlan_id = tag.vlan_identifier().value();
        Self {
            tci: (u16::from(priority) << layout::VLAN_PRIORITY_SHIFT)
                | (u16::from(dei) << layout::VLAN_DEI_SHIFT)
                | vlan_id,
            priority,
            dei,
            vlan_id,
            encapsulated_type: tag.ether_type().0,
        }
    }
}

/// Decoded Ethernet II header, borrowing its payload from the record.
#[derive(Debug, Clone, Serialize)]
pub struct EthernetFrame<'a> {
    pub destination: MacAddr,
    pub source: MacAddr,
    /// Type tag as found in the fixed header.
    pub ethertype: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan: Option<VlanTag>,
    /// Type of the payload after any VLAN tag has been consumed.
    pub payload_type: u16,
    #[serde(skip)]
    pub payload: &'a [u8],
}

impl<'a> EthernetFrame<'a> {
    pub fn header_len(&self) -> usize {
        layout::HEADER_LEN + self.vlan.map_or(0, |_| layout::VLAN_TAG_LEN)
    }
}

/// Decode the link-layer header of a captured Ethernet frame.
///
/// # Errors
/// Returns `EthernetError::TruncatedFrame` when the frame is shorter than the
/// fixed header, or when a VLAN tag is announced but not fully present.
///
/// # Examples
/// ```
/// use ptpscope_core::protocols::ethernet::parse_ethernet;
///
/// let mut frame = vec![0u8; 14];
/// frame[12..14].copy_from_slice(&0x0800u16.to_be_bytes());
/// frame.extend_from_slice(&[0x45, 0x00]);
/// let eth = parse_ethernet(&frame).unwrap();
/// assert_eq!(eth.payload_type, 0x0800);
/// assert_eq!(eth.payload, &[0x45, 0x00]);
/// ```
pub fn parse_ethernet(frame: &[u8]) -> Result<EthernetFrame<'_>, EthernetError> {
    let header = Ethernet2HeaderSlice::from_slice(frame)?;
    let ethertype = header.ether_type();
    let (_, rest) = frame.split_at(header.slice().len());

    let (vlan, payload) = if ethertype == EtherType::VLAN_TAGGED_FRAME {
        let tag = SingleVlanHeaderSlice::from_slice(rest)
            .map_err(|err| err.add_offset(layout::HEADER_LEN))?;
        let (_, inner) = rest.split_at(tag.slice().len());
        (Some(VlanTag::from_slice(&tag)), inner)
    } else {
        (None, rest)
    };

    Ok(EthernetFrame {
        destination: MacAddr(header.destination()),
        source: MacAddr(header.source()),
        ethertype: ethertype.0,
        payload_type: vlan.map_or(ethertype.0, |tag| tag.encapsulated_type),
        vlan,
        payload,
    })
}

/// Well-known name of an ethertype, when this crate knows it.
pub fn ethertype_name(ethertype: u16) -> Option<&'static str> {
    match ethertype {
        layout::ETHERTYPE_IPV4 => Some("IPv4"),
        layout::ETHERTYPE_ARP => Some("ARP"),
        layout::ETHERTYPE_VLAN => Some("802.1Q"),
        layout::ETHERTYPE_IPV6 => Some("IPv6"),
        layout::ETHERTYPE_PTP => Some("PTP"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{MacAddr, parse_ethernet};
    use crate::protocols::ethernet::error::EthernetError;
    use crate::protocols::ethernet::layout;

    fn frame(ethertype: u16, rest: &[u8]) -> Vec<u8> {
        let mut frame = Vec::new();
        frame.extend_from_slice(&[0x01, 0x1b, 0x19, 0x00, 0x00, 0x00]);
        frame.extend_from_slice(&[0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
        frame.extend_from_slice(&ethertype.to_be_bytes());
        frame.extend_from_slice(rest);
        frame
    }

    #[test]
    fn parse_untagged_frame() {
        let data = frame(layout::ETHERTYPE_IPV6, &[0x60, 0, 0, 0]);
        let eth = parse_ethernet(&data).unwrap();
        assert_eq!(eth.destination, MacAddr([0x01, 0x1b, 0x19, 0, 0, 0]));
        assert_eq!(eth.source.to_string(), "00:11:22:33:44:55");
        assert_eq!(eth.ethertype, layout::ETHERTYPE_IPV6);
        assert_eq!(eth.payload_type, layout::ETHERTYPE_IPV6);
        assert!(eth.vlan.is_none());
        assert_eq!(eth.payload, &[0x60, 0, 0, 0]);
        assert_eq!(eth.header_len(), 14);
    }

    #[test]
    fn header_only_frame_has_empty_payload() {
        let data = frame(layout::ETHERTYPE_IPV4, &[]);
        let eth = parse_ethernet(&data).unwrap();
        assert!(eth.payload.is_empty());
    }

    #[test]
    fn short_frame_is_truncated() {
        let data = [0u8; 13];
        let err = parse_ethernet(&data).unwrap_err();
        assert_eq!(
            err,
            EthernetError::TruncatedFrame {
                needed: 14,
                actual: 13
            }
        );
    }

    #[test]
    fn vlan_tag_is_consumed() {
        let tci: u16 = (0b101 << 13) | 0x123;
        let mut rest = Vec::new();
        rest.extend_from_slice(&tci.to_be_bytes());
        rest.extend_from_slice(&layout::ETHERTYPE_IPV4.to_be_bytes());
        rest.extend_from_slice(&[0x45]);
        let data = frame(layout::ETHERTYPE_VLAN, &rest);

        let eth = parse_ethernet(&data).unwrap();
        let vlan = eth.vlan.unwrap();
        assert_eq!(vlan.vlan_id, 291);
        assert_eq!(vlan.priority, 5);
        assert!(!vlan.dei);
        assert_eq!(vlan.encapsulated_type, layout::ETHERTYPE_IPV4);
        assert_eq!(eth.ethertype, layout::ETHERTYPE_VLAN);
        assert_eq!(eth.payload_type, layout::ETHERTYPE_IPV4);
        assert_eq!(eth.payload, &[0x45]);
        assert_eq!(eth.header_len(), 18);
    }

    #[test]
    fn truncated_vlan_tag_is_rejected() {
        let data = frame(layout::ETHERTYPE_VLAN, &[0x00, 0x01]);
        let err = parse_ethernet(&data).unwrap_err();
        assert!(matches!(err, EthernetError::TruncatedFrame { needed: 18, .. }));
    }

    #[test]
    fn dei_bit_and_tci_are_decoded() {
        let mut rest = Vec::new();
        rest.extend_from_slice(&0x1001u16.to_be_bytes());
        rest.extend_from_slice(&layout::ETHERTYPE_IPV6.to_be_bytes());
        let data = frame(layout::ETHERTYPE_VLAN, &rest);

        let vlan = parse_ethernet(&data).unwrap().vlan.unwrap();
        assert!(vlan.dei);
        assert_eq!(vlan.vlan_id, 1);
        assert_eq!(vlan.priority, 0);
        assert_eq!(vlan.tci, 0x1001);
    }

    #[test]
    fn matches_packet_builder_output() {
        use etherparse::PacketBuilder;

        let builder = PacketBuilder::ethernet2([1, 2, 3, 4, 5, 6], [7, 8, 9, 10, 11, 12])
            .ipv4([192, 168, 0, 1], [224, 0, 1, 129], 1)
            .udp(319, 319);
        let payload = [0u8; 4];
        let mut packet = Vec::<u8>::with_capacity(builder.size(payload.len()));
        builder.write(&mut packet, &payload).unwrap();

        let eth = parse_ethernet(&packet).unwrap();
        assert_eq!(eth.source, MacAddr([1, 2, 3, 4, 5, 6]));
        assert_eq!(eth.payload_type, layout::ETHERTYPE_IPV4);
        assert_eq!(eth.payload.len(), packet.len() - eth.header_len());
    }
}
