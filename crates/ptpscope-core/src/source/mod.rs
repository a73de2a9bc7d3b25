//! Capture sources.
//!
//! A source frames a capture into [`CapturedRecord`]s, one at a time. Record
//! bytes are copied out of the file so later layers can borrow from them
//! without holding on to the reader.

pub mod pcap;

pub use pcap::{CaptureFileHeader, CaptureReader, PcapFileSource, ReaderOptions};

use serde::Serialize;
use thiserror::Error;

/// One captured frame with its record header fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapturedRecord {
    /// Position in the file, starting at 1. Skipped records consume an index.
    pub index: u64,
    pub ts_sec: u32,
    /// Sub-second part of the timestamp (microseconds for classic pcap).
    pub ts_frac: u32,
    pub caplen: u32,
    pub origlen: u32,
    #[serde(skip)]
    pub data: Vec<u8>,
}

/// A lazy, finite sequence of captured records.
pub trait RecordSource {
    fn header(&self) -> &CaptureFileHeader;

    /// Next record, `Ok(None)` at the end of the capture.
    ///
    /// Errors for which [`SourceError::is_fatal`] is false concern a single
    /// record; calling again continues with the one after it.
    fn next_record(&mut self) -> Result<Option<CapturedRecord>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("not a pcap capture: unrecognised magic number {magic:#010x}")]
    Format { magic: u32 },
    #[error("unsupported pcap version {major}.{minor} (need at least 2.0)")]
    UnsupportedVersion { major: u16, minor: u16 },
    #[error("unsupported link type {linktype} (only Ethernet is decoded)")]
    UnsupportedLinkType { linktype: i32 },
    #[error("capture file truncated in {context}: need {needed} bytes, got {actual}")]
    TruncatedFile {
        context: &'static str,
        needed: usize,
        actual: usize,
    },
    #[error("record {index}: captured length {caplen} exceeds original length {origlen}")]
    TruncatedRecord { index: u64, caplen: u32, origlen: u32 },
    #[error("record {index}: captured length {caplen} exceeds the {limit} byte limit")]
    OversizedRecord { index: u64, caplen: u32, limit: usize },
}

impl SourceError {
    /// Whether the source can still produce records after this error.
    ///
    /// # Examples
    /// ```
    /// use ptpscope_core::source::SourceError;
    ///
    /// let skipped = SourceError::TruncatedRecord { index: 2, caplen: 80, origlen: 60 };
    /// assert!(!skipped.is_fatal());
    /// assert!(SourceError::Format { magic: 0 }.is_fatal());
    /// ```
    pub fn is_fatal(&self) -> bool {
        !matches!(self, SourceError::TruncatedRecord { .. })
    }
}
