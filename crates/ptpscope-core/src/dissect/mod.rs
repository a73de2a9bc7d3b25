//! Record dissection: the layer chain and the driver over a record source.
//!
//! Each record is decoded independently. The link type chooses the first
//! decoder; every decoder narrows the byte range handed to the next one
//! (ethertype, IP protocol, UDP destination port, PTP message type). A
//! decoder error fails that record only and the driver moves on.
//!
//! # Examples
//! ```no_run
//! use std::ops::ControlFlow;
//! use std::path::Path;
//!
//! use ptpscope_core::dissect::{DissectOptions, dissect_pcap_file};
//!
//! let summary = dissect_pcap_file(Path::new("capture.pcap"), &DissectOptions::default(), |d| {
//!     if let Some(ptp) = &d.ptp {
//!         println!("{} seq {}", d.record.index, ptp.header.sequence_id);
//!     }
//!     ControlFlow::Continue(())
//! })?;
//! println!("{summary}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod chain;
mod error;
mod summary;

use std::ops::ControlFlow;
use std::path::Path;

use pcap_parser::Linktype;
use serde::Serialize;

use crate::endian::{ByteOrderMode, Endianness};
use crate::protocols::ptp::PtpFieldOrder;
use crate::source::{CaptureFileHeader, PcapFileSource, ReaderOptions, RecordSource, SourceError};

pub use chain::{
    NetworkLayer, Outcome, RecordDissection, RecordInfo, StopReason, dissect_record, ts_to_rfc3339,
};
pub use error::{DissectError, Layer};
pub use summary::DissectSummary;

/// Caller-selected dissection behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DissectOptions {
    /// Hand only records carrying a PTP message to the sink.
    pub ptp_only: bool,
    /// Accept captures whose link type is not Ethernet.
    pub allow_non_ethernet: bool,
    pub ptp_field_order: PtpFieldOrder,
}

impl DissectOptions {
    pub fn reader_options(&self) -> ReaderOptions {
        ReaderOptions {
            allow_non_ethernet: self.allow_non_ethernet,
        }
    }
}

/// Per-file decode parameters, fixed once the global header is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeContext {
    pub byte_order: ByteOrderMode,
    pub linktype: Linktype,
    /// Resolved byte order for multi-byte PTP fields.
    pub ptp_order: Endianness,
}

impl DecodeContext {
    pub fn new(header: &CaptureFileHeader, options: &DissectOptions) -> Self {
        Self {
            byte_order: header.byte_order,
            linktype: header.linktype,
            ptp_order: options.ptp_field_order.resolve(header.byte_order),
        }
    }
}

/// Dissect every record of `source`, passing each result to `sink`.
///
/// The sink may return `ControlFlow::Break` to stop early. With
/// `options.ptp_only` set, records without a PTP message are counted but not
/// passed on.
///
/// # Errors
/// Fatal source errors (I/O, oversized records) are returned. A file that
/// ends mid-record is not an error here; it is noted in
/// [`DissectSummary::truncated_file`].
pub fn dissect_source<S, F>(
    source: &mut S,
    options: &DissectOptions,
    mut sink: F,
) -> Result<DissectSummary, SourceError>
where
    S: RecordSource + ?Sized,
    F: FnMut(&RecordDissection<'_>) -> ControlFlow<()>,
{
    let context = DecodeContext::new(source.header(), options);
    let mut summary = DissectSummary::default();

    loop {
        let record = match source.next_record() {
            Ok(Some(record)) => record,
            Ok(None) => break,
            Err(err @ SourceError::TruncatedRecord { .. }) => {
                summary.record_skipped();
                tracing::debug!("{err}");
                continue;
            }
            Err(err @ SourceError::TruncatedFile { .. }) => {
                tracing::warn!("{err}");
                summary.truncated_file = Some(err.to_string());
                break;
            }
            Err(err) => return Err(err),
        };

        let dissection = dissect_record(&record, &context);
        summary.record(&dissection);

        if options.ptp_only && dissection.ptp.is_none() {
            continue;
        }
        summary.records_reported += 1;
        if sink(&dissection).is_break() {
            tracing::debug!(index = record.index, "stopped by caller");
            break;
        }
    }

    tracing::info!(
        records_read = summary.records_read,
        records_decoded = summary.records_decoded,
        records_failed = summary.records_failed,
        ptp_messages = summary.ptp_messages,
        "dissection finished"
    );
    Ok(summary)
}

/// Open `path` as a pcap file and run [`dissect_source`] over it.
///
/// # Errors
/// Opening errors (I/O, bad magic, unsupported version or link type) and
/// fatal mid-stream errors.
pub fn dissect_pcap_file<F>(
    path: &Path,
    options: &DissectOptions,
    sink: F,
) -> Result<DissectSummary, SourceError>
where
    F: FnMut(&RecordDissection<'_>) -> ControlFlow<()>,
{
    let mut source = PcapFileSource::open(path, &options.reader_options())?;
    dissect_source(&mut source, options, sink)
}
