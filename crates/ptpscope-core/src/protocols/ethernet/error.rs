use thiserror::Error;

use etherparse::err::LenError;

/// Errors returned by Ethernet decoding.
///
/// # Examples
/// ```
/// use ptpscope_core::protocols::ethernet::EthernetError;
///
/// let err = EthernetError::TruncatedFrame { needed: 14, actual: 9 };
/// assert!(err.to_string().contains("truncated Ethernet frame"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EthernetError {
    #[error("truncated Ethernet frame: need {needed} bytes, got {actual}")]
    TruncatedFrame { needed: usize, actual: usize },
}

impl From<LenError> for EthernetError {
    fn from(err: LenError) -> Self {
        EthernetError::TruncatedFrame {
            needed: err.layer_start_offset + err.required_len,
            actual: err.layer_start_offset + err.len,
        }
    }
}
