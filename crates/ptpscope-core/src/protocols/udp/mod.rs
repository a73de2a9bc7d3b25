//! UDP transport-layer decoding.

pub mod error;
pub mod layout;
pub mod parser;

pub use error::UdpError;
pub use parser::{UdpHeader, is_ptp_port, parse_udp};
