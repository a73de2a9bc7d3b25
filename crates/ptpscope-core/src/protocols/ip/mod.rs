//! IPv4 and IPv6 network-layer decoding.
//!
//! Both variants take the fixed header from `etherparse` header slices and
//! hand the remaining bytes back as the payload together with the transport
//! protocol number. Extension headers and fragments are not followed.

pub mod error;
pub mod layout;
pub mod parser;

pub use error::IpError;
pub use parser::{Ipv4Header, Ipv6Header, parse_ipv4, parse_ipv6, protocol_name};
