use serde::Serialize;
use thiserror::Error;

use crate::protocols::arp::ArpError;
use crate::protocols::ethernet::EthernetError;
use crate::protocols::ip::IpError;
use crate::protocols::ptp::PtpError;
use crate::protocols::udp::UdpError;

/// Layer of the decode chain, from the link header upwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Link,
    Network,
    Transport,
    Application,
}

impl Layer {
    pub fn name(self) -> &'static str {
        match self {
            Layer::Link => "link",
            Layer::Network => "network",
            Layer::Transport => "transport",
            Layer::Application => "application",
        }
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A layer decoder that could not finish.
///
/// # Examples
/// ```
/// use ptpscope_core::dissect::{DissectError, Layer};
/// use ptpscope_core::protocols::udp::UdpError;
///
/// let err = DissectError::from(UdpError::TruncatedHeader { needed: 8, actual: 2 });
/// assert_eq!(err.layer(), Layer::Transport);
/// assert_eq!(err.kind(), "truncated_udp_header");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DissectError {
    #[error(transparent)]
    Ethernet(#[from] EthernetError),
    #[error(transparent)]
    Ip(#[from] IpError),
    #[error(transparent)]
    Arp(#[from] ArpError),
    #[error(transparent)]
    Udp(#[from] UdpError),
    #[error(transparent)]
    Ptp(#[from] PtpError),
}

impl DissectError {
    pub fn layer(&self) -> Layer {
        match self {
            DissectError::Ethernet(_) => Layer::Link,
            DissectError::Ip(_) | DissectError::Arp(_) => Layer::Network,
            DissectError::Udp(_) => Layer::Transport,
            DissectError::Ptp(_) => Layer::Application,
        }
    }

    /// Stable label for summaries and machine-readable output.
    pub fn kind(&self) -> &'static str {
        match self {
            DissectError::Ethernet(EthernetError::TruncatedFrame { .. }) => "truncated_frame",
            DissectError::Ip(IpError::TruncatedHeader { .. }) => "truncated_ip_header",
            DissectError::Ip(IpError::InvalidVersion { .. }) => "invalid_ip_version",
            DissectError::Ip(IpError::InvalidHeaderLength { .. }) => "invalid_ip_header_length",
            DissectError::Arp(ArpError::TruncatedHeader { .. }) => "truncated_arp",
            DissectError::Udp(UdpError::TruncatedHeader { .. }) => "truncated_udp_header",
            DissectError::Ptp(PtpError::TruncatedHeader { .. }) => "truncated_ptp_header",
            DissectError::Ptp(PtpError::TruncatedMessage { .. }) => "truncated_ptp_message",
        }
    }
}

impl Serialize for DissectError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("DissectError", 2)?;
        state.serialize_field("kind", self.kind())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}
