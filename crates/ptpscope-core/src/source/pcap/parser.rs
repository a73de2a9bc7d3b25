use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use pcap_parser::nom::{self, IResult, number, sequence::tuple};
use pcap_parser::{
    LegacyPcapBlock, Linktype, PcapError, parse_pcap_frame, parse_pcap_frame_be, parse_pcap_header,
};
use serde::{Serialize, Serializer};

use crate::endian::{ByteOrderMode, Endianness, PCAP_MAGIC, PCAP_MAGIC_SWAPPED};
use crate::source::{CapturedRecord, RecordSource, SourceError};

use super::layout;
use super::reader::{read_up_to, skip_bytes};

type FrameParser = fn(&[u8]) -> IResult<&[u8], LegacyPcapBlock<'_>, PcapError<&[u8]>>;

/// Reader behaviour that is not dictated by the file itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Accept captures whose link type is not Ethernet.
    pub allow_non_ethernet: bool,
}

/// Decoded 24-byte global header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CaptureFileHeader {
    /// Magic number as stored, read in host order.
    pub magic: u32,
    pub version_major: u16,
    pub version_minor: u16,
    pub thiszone: i32,
    pub sigfigs: u32,
    pub snaplen: u32,
    #[serde(serialize_with = "serialize_linktype")]
    pub linktype: Linktype,
    pub byte_order: ByteOrderMode,
}

impl CaptureFileHeader {
    pub fn file_endianness(&self) -> Endianness {
        self.byte_order.file_endianness()
    }

    pub fn is_ethernet(&self) -> bool {
        self.linktype == Linktype::ETHERNET
    }

    fn frame_parser(&self) -> FrameParser {
        match self.file_endianness() {
            Endianness::Big => parse_pcap_frame_be,
            Endianness::Little => parse_pcap_frame,
        }
    }
}

fn serialize_linktype<S: Serializer>(linktype: &Linktype, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i32(linktype.0)
}

/// Decoded 16-byte record header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub ts_sec: u32,
    pub ts_frac: u32,
    pub caplen: u32,
    pub origlen: u32,
}

/// Decode the global header and classify the file byte order.
///
/// Only the microsecond magic number is accepted, in either byte order.
///
/// # Errors
/// - `SourceError::Format` when the magic number is not recognised.
/// - `SourceError::TruncatedFile` when fewer than 24 bytes are given.
/// - `SourceError::UnsupportedVersion` for major versions below 2.
///
/// # Examples
/// ```
/// use ptpscope_core::source::pcap::parse_global_header;
///
/// let mut raw = Vec::new();
/// raw.extend_from_slice(&0xa1b2_c3d4u32.to_le_bytes());
/// raw.extend_from_slice(&2u16.to_le_bytes());
/// raw.extend_from_slice(&4u16.to_le_bytes());
/// raw.extend_from_slice(&[0; 8]);
/// raw.extend_from_slice(&65535u32.to_le_bytes());
/// raw.extend_from_slice(&1u32.to_le_bytes());
/// let header = parse_global_header(&raw).unwrap();
/// assert_eq!((header.version_major, header.version_minor), (2, 4));
/// assert_eq!(header.snaplen, 65535);
/// ```
pub fn parse_global_header(bytes: &[u8]) -> Result<CaptureFileHeader, SourceError> {
    let stored_magic = bytes
        .get(layout::MAGIC_RANGE)
        .and_then(|raw| raw.try_into().ok())
        .map(u32::from_ne_bytes)
        .unwrap_or_default();

    let (_, header) = parse_pcap_header(bytes).map_err(|err| match err {
        nom::Err::Incomplete(_) => SourceError::TruncatedFile {
            context: "global header",
            needed: layout::GLOBAL_HEADER_LEN,
            actual: bytes.len(),
        },
        nom::Err::Error(_) | nom::Err::Failure(_) => SourceError::Format {
            magic: stored_magic,
        },
    })?;

    // Nanosecond and modified-format magics carry other record semantics.
    let file_order = match header.magic_number {
        PCAP_MAGIC => Endianness::Little,
        PCAP_MAGIC_SWAPPED => Endianness::Big,
        _ => {
            return Err(SourceError::Format {
                magic: stored_magic,
            });
        }
    };

    if header.version_major < layout::MIN_VERSION_MAJOR {
        return Err(SourceError::UnsupportedVersion {
            major: header.version_major,
            minor: header.version_minor,
        });
    }

    Ok(CaptureFileHeader {
        magic: stored_magic,
        version_major: header.version_major,
        version_minor: header.version_minor,
        thiszone: header.thiszone,
        sigfigs: header.sigfigs,
        snaplen: header.snaplen,
        linktype: header.network,
        byte_order: ByteOrderMode::for_file(file_order),
    })
}

fn record_fields(
    bytes: &[u8],
    order: number::Endianness,
) -> IResult<&[u8], (u32, u32, u32, u32)> {
    let field = number::complete::u32::<&[u8], nom::error::Error<&[u8]>>(order);
    tuple((field, field, field, field))(bytes)
}

/// Decode a record header in the file's byte order.
///
/// # Errors
/// Returns `SourceError::TruncatedFile` when fewer than 16 bytes are given.
pub fn parse_record_header(bytes: &[u8], mode: ByteOrderMode) -> Result<RecordHeader, SourceError> {
    let order = match mode.file_endianness() {
        Endianness::Big => number::Endianness::Big,
        Endianness::Little => number::Endianness::Little,
    };
    let (_, (ts_sec, ts_frac, caplen, origlen)) =
        record_fields(bytes, order).map_err(|_| SourceError::TruncatedFile {
            context: "record header",
            needed: layout::RECORD_HEADER_LEN,
            actual: bytes.len(),
        })?;
    Ok(RecordHeader {
        ts_sec,
        ts_frac,
        caplen,
        origlen,
    })
}

/// Streaming record reader over any byte source.
///
/// One record is buffered at a time. Records whose captured length exceeds
/// their original length are skipped without being buffered.
pub struct CaptureReader<R> {
    inner: R,
    header: CaptureFileHeader,
    parse_frame: FrameParser,
    frame: Vec<u8>,
    records_read: u64,
    finished: bool,
}

impl<R: Read> CaptureReader<R> {
    /// Read and validate the global header.
    ///
    /// # Errors
    /// Any error of [`parse_global_header`], I/O errors, and
    /// `SourceError::UnsupportedLinkType` when the capture is not Ethernet and
    /// `options.allow_non_ethernet` is unset.
    pub fn new(mut inner: R, options: &ReaderOptions) -> Result<Self, SourceError> {
        let mut raw = Vec::with_capacity(layout::GLOBAL_HEADER_LEN);
        read_up_to(&mut inner, layout::GLOBAL_HEADER_LEN, &mut raw)?;
        let header = parse_global_header(&raw)?;

        if !header.is_ethernet() {
            if !options.allow_non_ethernet {
                return Err(SourceError::UnsupportedLinkType {
                    linktype: header.linktype.0,
                });
            }
            tracing::warn!(
                linktype = header.linktype.0,
                "capture link type is not Ethernet; decoding what is possible"
            );
        }

        tracing::info!(
            version = %format_args!("{}.{}", header.version_major, header.version_minor),
            byte_order = ?header.byte_order,
            snaplen = header.snaplen,
            linktype = header.linktype.0,
            "opened pcap capture"
        );

        Ok(Self {
            inner,
            parse_frame: header.frame_parser(),
            header,
            frame: Vec::new(),
            records_read: 0,
            finished: false,
        })
    }

    pub fn header(&self) -> &CaptureFileHeader {
        &self.header
    }

    pub fn byte_order(&self) -> ByteOrderMode {
        self.header.byte_order
    }

    /// Number of record headers consumed so far, skipped records included.
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    fn read_record(&mut self) -> Result<Option<CapturedRecord>, SourceError> {
        if self.finished {
            return Ok(None);
        }

        self.frame.clear();
        let got = read_up_to(&mut self.inner, layout::RECORD_HEADER_LEN, &mut self.frame)?;
        if got == 0 {
            self.finished = true;
            return Ok(None);
        }
        if got < layout::RECORD_HEADER_LEN {
            self.finished = true;
            return Err(SourceError::TruncatedFile {
                context: "record header",
                needed: layout::RECORD_HEADER_LEN,
                actual: got,
            });
        }

        let record = parse_record_header(&self.frame, self.header.byte_order)?;
        self.records_read += 1;
        let index = self.records_read;
        let caplen = record.caplen as usize;

        if record.caplen > record.origlen {
            let skipped = skip_bytes(&mut self.inner, u64::from(record.caplen))?;
            if skipped < u64::from(record.caplen) {
                self.finished = true;
                return Err(SourceError::TruncatedFile {
                    context: "record data",
                    needed: caplen,
                    actual: skipped as usize,
                });
            }
            tracing::warn!(
                index,
                caplen = record.caplen,
                origlen = record.origlen,
                "skipping record with captured length above original length"
            );
            return Err(SourceError::TruncatedRecord {
                index,
                caplen: record.caplen,
                origlen: record.origlen,
            });
        }

        if caplen > layout::MAX_CAPTURED_LEN {
            self.finished = true;
            return Err(SourceError::OversizedRecord {
                index,
                caplen: record.caplen,
                limit: layout::MAX_CAPTURED_LEN,
            });
        }

        let got = read_up_to(&mut self.inner, caplen, &mut self.frame)?;
        if got < caplen {
            self.finished = true;
            return Err(SourceError::TruncatedFile {
                context: "record data",
                needed: caplen,
                actual: got,
            });
        }

        let (_, block) = (self.parse_frame)(&self.frame).map_err(|_| SourceError::TruncatedFile {
            context: "record data",
            needed: layout::RECORD_HEADER_LEN + caplen,
            actual: self.frame.len(),
        })?;

        Ok(Some(CapturedRecord {
            index,
            ts_sec: block.ts_sec,
            ts_frac: block.ts_usec,
            caplen: block.caplen,
            origlen: block.origlen,
            data: block.data.to_vec(),
        }))
    }
}

impl<R: Read> RecordSource for CaptureReader<R> {
    fn header(&self) -> &CaptureFileHeader {
        &self.header
    }

    fn next_record(&mut self) -> Result<Option<CapturedRecord>, SourceError> {
        self.read_record()
    }
}

/// A [`CaptureReader`] over a buffered file.
pub struct PcapFileSource {
    inner: CaptureReader<BufReader<File>>,
}

impl PcapFileSource {
    pub fn open(path: &Path, options: &ReaderOptions) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        let reader = BufReader::with_capacity(layout::READ_BUFFER_SIZE, file);
        let inner = CaptureReader::new(reader, options)?;
        Ok(Self { inner })
    }

    pub fn records_read(&self) -> u64 {
        self.inner.records_read()
    }
}

impl RecordSource for PcapFileSource {
    fn header(&self) -> &CaptureFileHeader {
        self.inner.header()
    }

    fn next_record(&mut self) -> Result<Option<CapturedRecord>, SourceError> {
        self.inner.next_record()
    }
}
