//! ptpscope core library: layered dissection of PTP traffic in pcap captures.
//!
//! A capture source frames records out of a classic libpcap file; the
//! dissect chain then runs each record through the protocol decoders
//! (Ethernet, IPv4/IPv6 or ARP, UDP, PTP), each of which checks its own
//! bounds and hands the remaining bytes to the next. Parsing is byte-oriented
//! and side-effect free; all I/O stays in `source`.
//!
//! Invariants:
//! - No decoder reads past the captured bytes of its record.
//! - The file byte order is detected once and applied to every record.
//! - A malformed record never ends the run; only the container can.
//!
//! # Examples
//! ```no_run
//! use std::ops::ControlFlow;
//! use std::path::Path;
//!
//! use ptpscope_core::{DissectOptions, dissect_pcap_file};
//!
//! let options = DissectOptions {
//!     ptp_only: true,
//!     ..DissectOptions::default()
//! };
//! let summary = dissect_pcap_file(Path::new("capture.pcap"), &options, |_| {
//!     ControlFlow::Continue(())
//! })?;
//! println!("{summary}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod dissect;
pub mod endian;
pub mod protocols;
pub mod source;

pub use dissect::{
    DecodeContext, DissectError, DissectOptions, DissectSummary, Layer, Outcome, RecordDissection,
    dissect_pcap_file, dissect_record, dissect_source,
};
pub use endian::{ByteOrderMode, Endianness};
pub use protocols::ptp::PtpFieldOrder;
pub use source::{
    CaptureFileHeader, CaptureReader, CapturedRecord, PcapFileSource, ReaderOptions, RecordSource,
    SourceError,
};
