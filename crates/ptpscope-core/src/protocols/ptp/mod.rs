//! PTP (IEEE 1588) message decoding.
//!
//! Every message starts with a 34-byte common header; the low nibble of its
//! first byte selects one of the body layouts. Each body is checked against
//! its own minimum length, so a truncated body does not hide the header that
//! was decoded before it.
//!
//! Multi-byte fields are read in an explicit [`Endianness`]. On the wire PTP
//! is big-endian and capture files store frame bytes verbatim, so the
//! default [`PtpFieldOrder::Wire`] reads big-endian for every file. The
//! [`PtpFieldOrder::FileRelative`] policy additionally flips the order for
//! byte-swapped capture files, for tools that wrote frames in file order.
//!
//! Signaling and Management messages are recognised but their bodies are not
//! decoded; they end in [`PtpBody::NotImplemented`].

pub mod error;
pub mod layout;
pub mod parser;
pub(crate) mod reader;

use serde::Serialize;

use crate::endian::{ByteOrderMode, Endianness};

pub use error::PtpError;
pub use parser::{
    AnnounceBody, ClockIdentity, ClockQuality, MessageType, PortIdentity, PtpBody, PtpHeader,
    PtpMessage, PtpTimestamp, parse_ptp, parse_ptp_body, parse_ptp_header,
};

/// How multi-byte PTP fields relate to the capture file's byte order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PtpFieldOrder {
    /// Network byte order regardless of the file.
    #[default]
    Wire,
    /// Network byte order, reversed when the capture file is byte-swapped.
    FileRelative,
}

impl PtpFieldOrder {
    /// Resolve the order used for a file written in `mode`.
    ///
    /// # Examples
    /// ```
    /// use ptpscope_core::endian::{ByteOrderMode, Endianness};
    /// use ptpscope_core::protocols::ptp::PtpFieldOrder;
    ///
    /// assert_eq!(PtpFieldOrder::Wire.resolve(ByteOrderMode::Swapped), Endianness::Big);
    /// assert_eq!(
    ///     PtpFieldOrder::FileRelative.resolve(ByteOrderMode::Swapped),
    ///     Endianness::Little
    /// );
    /// ```
    pub fn resolve(self, mode: ByteOrderMode) -> Endianness {
        match (self, mode) {
            (PtpFieldOrder::FileRelative, ByteOrderMode::Swapped) => Endianness::Little,
            _ => Endianness::Big,
        }
    }
}
