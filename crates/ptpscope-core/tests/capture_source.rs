use std::fs;
use std::io::Cursor;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use etherparse::PacketBuilder;
use ptpscope_core::{
    ByteOrderMode, CaptureReader, Endianness, PcapFileSource, ReaderOptions, RecordSource,
    SourceError,
};

struct Record<'a> {
    ts_sec: u32,
    ts_usec: u32,
    caplen: u32,
    origlen: u32,
    data: &'a [u8],
}

impl<'a> Record<'a> {
    fn whole(ts_sec: u32, data: &'a [u8]) -> Self {
        Self {
            ts_sec,
            ts_usec: 125,
            caplen: data.len() as u32,
            origlen: data.len() as u32,
            data,
        }
    }
}

fn put_u16(out: &mut Vec<u8>, value: u16, order: Endianness) {
    match order {
        Endianness::Big => out.extend_from_slice(&value.to_be_bytes()),
        Endianness::Little => out.extend_from_slice(&value.to_le_bytes()),
    }
}

fn put_u32(out: &mut Vec<u8>, value: u32, order: Endianness) {
    match order {
        Endianness::Big => out.extend_from_slice(&value.to_be_bytes()),
        Endianness::Little => out.extend_from_slice(&value.to_le_bytes()),
    }
}

fn capture(order: Endianness, linktype: u32, records: &[Record<'_>]) -> Vec<u8> {
    let mut out = Vec::new();
    put_u32(&mut out, 0xa1b2_c3d4, order);
    put_u16(&mut out, 2, order);
    put_u16(&mut out, 4, order);
    put_u32(&mut out, 0, order);
    put_u32(&mut out, 0, order);
    put_u32(&mut out, 65_535, order);
    put_u32(&mut out, linktype, order);
    for record in records {
        put_u32(&mut out, record.ts_sec, order);
        put_u32(&mut out, record.ts_usec, order);
        put_u32(&mut out, record.caplen, order);
        put_u32(&mut out, record.origlen, order);
        out.extend_from_slice(record.data);
    }
    out
}

fn udp_frame(payload: &[u8]) -> Vec<u8> {
    let builder = PacketBuilder::ethernet2([1, 2, 3, 4, 5, 6], [7, 8, 9, 10, 11, 12])
        .ipv4([192, 168, 0, 1], [192, 168, 0, 2], 64)
        .udp(5000, 5001);
    let mut packet = Vec::<u8>::with_capacity(builder.size(payload.len()));
    builder.write(&mut packet, payload).unwrap();
    packet
}

fn temp_path(name: &str) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("ptpscope_{name}_{unique}.pcap"))
}

fn read_all<S: RecordSource>(source: &mut S) -> Vec<ptpscope_core::CapturedRecord> {
    let mut records = Vec::new();
    while let Some(record) = source.next_record().unwrap() {
        records.push(record);
    }
    records
}

#[test]
fn both_byte_orders_yield_the_same_records() {
    let frame = udp_frame(&[1, 2, 3, 4]);
    let records = [Record::whole(1_700_000_000, &frame), Record::whole(1_700_000_001, &frame)];

    let big = capture(Endianness::Big, 1, &records);
    let little = capture(Endianness::Little, 1, &records);

    let mut big_reader = CaptureReader::new(Cursor::new(big), &ReaderOptions::default()).unwrap();
    let mut little_reader =
        CaptureReader::new(Cursor::new(little), &ReaderOptions::default()).unwrap();

    assert_ne!(big_reader.byte_order(), little_reader.byte_order());
    let expected_native = if cfg!(target_endian = "little") {
        little_reader.byte_order()
    } else {
        big_reader.byte_order()
    };
    assert_eq!(expected_native, ByteOrderMode::Native);

    let big_records = read_all(&mut big_reader);
    let little_records = read_all(&mut little_reader);
    assert_eq!(big_records.len(), 2);
    assert_eq!(big_records, little_records);
    assert_eq!(big_records[0].ts_sec, 1_700_000_000);
    assert_eq!(big_records[0].ts_frac, 125);
    assert_eq!(big_records[1].data, frame);
}

#[test]
fn skipped_record_does_not_end_the_file() {
    let frame = udp_frame(&[9; 8]);
    let bogus = Record {
        ts_sec: 2,
        ts_usec: 0,
        caplen: frame.len() as u32,
        origlen: 10,
        data: &frame,
    };
    let bytes = capture(
        Endianness::Little,
        1,
        &[Record::whole(1, &frame), bogus, Record::whole(3, &frame)],
    );

    let mut reader = CaptureReader::new(Cursor::new(bytes), &ReaderOptions::default()).unwrap();
    assert_eq!(reader.next_record().unwrap().unwrap().index, 1);
    let err = reader.next_record().unwrap_err();
    assert!(matches!(err, SourceError::TruncatedRecord { index: 2, .. }));
    assert!(!err.is_fatal());
    let third = reader.next_record().unwrap().unwrap();
    assert_eq!(third.index, 3);
    assert_eq!(third.ts_sec, 3);
    assert!(reader.next_record().unwrap().is_none());
}

#[test]
fn file_source_reads_from_disk() {
    let frame = udp_frame(&[0xaa; 16]);
    let path = temp_path("file_source");
    fs::write(&path, capture(Endianness::Big, 1, &[Record::whole(10, &frame)])).unwrap();

    let mut source = PcapFileSource::open(&path, &ReaderOptions::default()).unwrap();
    let records = read_all(&mut source);
    let _ = fs::remove_file(&path);

    assert_eq!(source.header().version_major, 2);
    assert_eq!(source.header().snaplen, 65_535);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].data, frame);
    assert_eq!(source.records_read(), 1);
}

#[test]
fn bad_magic_yields_no_records() {
    let path = temp_path("bad_magic");
    let mut bytes = capture(Endianness::Little, 1, &[]);
    bytes[..4].copy_from_slice(&[0x0a, 0x0d, 0x0d, 0x0a]);
    fs::write(&path, bytes).unwrap();

    let err = match PcapFileSource::open(&path, &ReaderOptions::default()) {
        Ok(_) => panic!("expected bad magic to be rejected"),
        Err(err) => err,
    };
    let _ = fs::remove_file(&path);
    assert!(matches!(err, SourceError::Format { .. }));
    assert!(err.to_string().contains("magic"));
}

#[test]
fn short_global_header_is_truncated() {
    let bytes = capture(Endianness::Little, 1, &[]);
    let err = CaptureReader::new(Cursor::new(&bytes[..12]), &ReaderOptions::default())
        .err()
        .unwrap();
    assert!(matches!(
        err,
        SourceError::TruncatedFile {
            needed: 24,
            actual: 12,
            ..
        }
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let path = temp_path("missing");
    let err = match PcapFileSource::open(&path, &ReaderOptions::default()) {
        Ok(_) => panic!("expected missing file to fail"),
        Err(err) => err,
    };
    assert!(matches!(err, SourceError::Io(_)));
}

#[test]
fn non_ethernet_link_type_is_opt_in() {
    let bytes = capture(Endianness::Little, 228, &[]);
    let err = CaptureReader::new(Cursor::new(bytes.clone()), &ReaderOptions::default())
        .err()
        .unwrap();
    assert!(matches!(err, SourceError::UnsupportedLinkType { linktype: 228 }));

    let options = ReaderOptions {
        allow_non_ethernet: true,
    };
    let mut reader = CaptureReader::new(Cursor::new(bytes), &options).unwrap();
    assert!(reader.next_record().unwrap().is_none());
}
