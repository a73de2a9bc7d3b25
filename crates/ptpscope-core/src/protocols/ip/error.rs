use etherparse::err::{LenError, ipv4, ipv6};
use thiserror::Error;

/// Errors returned by IPv4/IPv6 decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IpError {
    #[error("truncated {protocol} header: need {needed} bytes, got {actual}")]
    TruncatedHeader {
        protocol: &'static str,
        needed: usize,
        actual: usize,
    },
    #[error("invalid {protocol} version field: {version}")]
    InvalidVersion { protocol: &'static str, version: u8 },
    #[error("invalid IPv4 header length: IHL {ihl}")]
    InvalidHeaderLength { ihl: u8 },
}

impl IpError {
    fn truncated(protocol: &'static str, err: LenError) -> Self {
        IpError::TruncatedHeader {
            protocol,
            needed: err.layer_start_offset + err.required_len,
            actual: err.layer_start_offset + err.len,
        }
    }
}

impl From<ipv4::HeaderSliceError> for IpError {
    fn from(err: ipv4::HeaderSliceError) -> Self {
        match err {
            ipv4::HeaderSliceError::Len(len) => IpError::truncated("IPv4", len),
            ipv4::HeaderSliceError::Content(ipv4::HeaderError::UnexpectedVersion {
                version_number,
            }) => IpError::InvalidVersion {
                protocol: "IPv4",
                version: version_number,
            },
            ipv4::HeaderSliceError::Content(ipv4::HeaderError::HeaderLengthSmallerThanHeader {
                ihl,
            }) => IpError::InvalidHeaderLength { ihl },
        }
    }
}

impl From<ipv6::HeaderSliceError> for IpError {
    fn from(err: ipv6::HeaderSliceError) -> Self {
        match err {
            ipv6::HeaderSliceError::Len(len) => IpError::truncated("IPv6", len),
            ipv6::HeaderSliceError::Content(ipv6::HeaderError::UnexpectedVersion {
                version_number,
            }) => IpError::InvalidVersion {
                protocol: "IPv6",
                version: version_number,
            },
        }
    }
}
