use thiserror::Error;

use crate::protocols::common::ShortRead;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArpError {
    #[error("truncated ARP header: need {needed} bytes, got {actual}")]
    TruncatedHeader { needed: usize, actual: usize },
}

impl From<ShortRead> for ArpError {
    fn from(value: ShortRead) -> Self {
        ArpError::TruncatedHeader {
            needed: value.needed,
            actual: value.actual,
        }
    }
}
