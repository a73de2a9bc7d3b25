//! ARP decoding for Ethernet/IPv4 address resolution.

pub mod error;
pub mod layout;
pub mod parser;

pub use error::ArpError;
pub use parser::{ArpPacket, parse_arp};
