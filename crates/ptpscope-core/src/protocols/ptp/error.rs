use thiserror::Error;

use crate::protocols::common::ShortRead;

/// Errors returned by PTP decoding.
///
/// # Examples
/// ```
/// use ptpscope_core::protocols::ptp::PtpError;
///
/// let err = PtpError::TruncatedMessage { message: "Announce", needed: 64, actual: 44 };
/// assert_eq!(err.to_string(), "truncated PTP Announce message: need 64 bytes, got 44");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PtpError {
    #[error("truncated PTP common header: need {needed} bytes, got {actual}")]
    TruncatedHeader { needed: usize, actual: usize },
    #[error("truncated PTP {message} message: need {needed} bytes, got {actual}")]
    TruncatedMessage {
        message: &'static str,
        needed: usize,
        actual: usize,
    },
}

impl PtpError {
    pub(crate) fn header(short: ShortRead) -> Self {
        PtpError::TruncatedHeader {
            needed: short.needed,
            actual: short.actual,
        }
    }

    pub(crate) fn message(message: &'static str, short: ShortRead) -> Self {
        PtpError::TruncatedMessage {
            message,
            needed: short.needed,
            actual: short.actual,
        }
    }
}
