use etherparse::{EtherType, Ethernet2Header, SingleVlanHeader};

pub const HEADER_LEN: usize = Ethernet2Header::LEN;
pub const VLAN_TAG_LEN: usize = SingleVlanHeader::LEN;

pub const VLAN_DEI_SHIFT: u16 = 12;
pub const VLAN_PRIORITY_SHIFT: u16 = 13;

pub const ETHERTYPE_IPV4: u16 = EtherType::IPV4.0;
pub const ETHERTYPE_ARP: u16 = EtherType::ARP.0;
pub const ETHERTYPE_VLAN: u16 = EtherType::VLAN_TAGGED_FRAME.0;
pub const ETHERTYPE_IPV6: u16 = EtherType::IPV6.0;
pub const ETHERTYPE_PTP: u16 = 0x88f7;
