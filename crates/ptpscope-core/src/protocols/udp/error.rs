use thiserror::Error;

use etherparse::err::LenError;

/// Errors returned by UDP decoding.
///
/// # Examples
/// ```
/// use ptpscope_core::protocols::udp::UdpError;
///
/// let err = UdpError::TruncatedHeader { needed: 8, actual: 3 };
/// assert!(err.to_string().contains("truncated UDP header"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UdpError {
    #[error("truncated UDP header: need {needed} bytes, got {actual}")]
    TruncatedHeader { needed: usize, actual: usize },
}

impl From<LenError> for UdpError {
    fn from(err: LenError) -> Self {
        UdpError::TruncatedHeader {
            needed: err.layer_start_offset + err.required_len,
            actual: err.layer_start_offset + err.len,
        }
    }
}
