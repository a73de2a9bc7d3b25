//! Classic libpcap container reader.
//!
//! The 24-byte global header fixes the byte order of every container field
//! through its magic number; each record then carries a 16-byte header and
//! `caplen` bytes of frame data. Both are decoded with `pcap_parser`; this
//! module adds the acceptance checks on top. Reading is streaming: one record
//! is held in memory at a time.

pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::{
    CaptureFileHeader, CaptureReader, PcapFileSource, ReaderOptions, RecordHeader,
    parse_global_header, parse_record_header,
};
