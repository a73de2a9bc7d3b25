//! Ethernet II link-layer decoding.
//!
//! The parser splits the fixed 14-byte header into hardware addresses and the
//! ethertype, and consumes a single IEEE 802.1Q tag when present. The
//! ethertype and the tag control field are big-endian on the wire regardless
//! of how the capture file itself was written.
//!
//! The decoded frame borrows its payload from the captured record; dispatch
//! to the network layer happens in the dissect chain.

pub mod error;
pub mod layout;
pub mod parser;

pub use error::EthernetError;
pub use parser::{EthernetFrame, MacAddr, VlanTag, ethertype_name, parse_ethernet};
