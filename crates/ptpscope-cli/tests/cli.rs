use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("ptpscope"))
}

fn sync_frame(dst_port: u16, sequence_id: u16) -> Vec<u8> {
    let mut ptp = vec![0u8; 44];
    ptp[1] = 0x02;
    ptp[2..4].copy_from_slice(&44u16.to_be_bytes());
    ptp[6..8].copy_from_slice(&0x0200u16.to_be_bytes());
    ptp[20..28].copy_from_slice(&[0x00, 0x1b, 0x19, 0xff, 0xfe, 0x00, 0x00, 0x01]);
    ptp[28..30].copy_from_slice(&1u16.to_be_bytes());
    ptp[30..32].copy_from_slice(&sequence_id.to_be_bytes());
    ptp[34..40].copy_from_slice(&[0x00, 0x00, 0x65, 0x53, 0xf1, 0x00]);
    ptp[40..44].copy_from_slice(&42u32.to_be_bytes());

    let mut udp = Vec::new();
    udp.extend_from_slice(&319u16.to_be_bytes());
    udp.extend_from_slice(&dst_port.to_be_bytes());
    udp.extend_from_slice(&((8 + ptp.len()) as u16).to_be_bytes());
    udp.extend_from_slice(&0u16.to_be_bytes());
    udp.extend_from_slice(&ptp);

    let mut ip = vec![0x45, 0x00];
    ip.extend_from_slice(&((20 + udp.len()) as u16).to_be_bytes());
    ip.extend_from_slice(&[0, 0, 0x40, 0, 1, 17, 0, 0]);
    ip.extend_from_slice(&[192, 168, 1, 10]);
    ip.extend_from_slice(&[224, 0, 1, 129]);
    ip.extend_from_slice(&udp);

    let mut frame = vec![0x01, 0x00, 0x5e, 0x00, 0x01, 0x81, 0x00, 0x1b, 0x19, 0, 0, 1];
    frame.extend_from_slice(&0x0800u16.to_be_bytes());
    frame.extend_from_slice(&ip);
    frame
}

fn capture(linktype: u32, records: &[(&[u8], u32)]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&0xa1b2_c3d4u32.to_le_bytes());
    out.extend_from_slice(&2u16.to_le_bytes());
    out.extend_from_slice(&4u16.to_le_bytes());
    out.extend_from_slice(&[0; 8]);
    out.extend_from_slice(&65_535u32.to_le_bytes());
    out.extend_from_slice(&linktype.to_le_bytes());
    for (i, (data, origlen)) in records.iter().enumerate() {
        out.extend_from_slice(&(1_700_000_000 + i as u32).to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out.extend_from_slice(&origlen.to_le_bytes());
        out.extend_from_slice(data);
    }
    out
}

fn write_capture(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("write capture");
    path
}

fn sample_capture(dir: &Path) -> PathBuf {
    let sync = sync_frame(319, 1);
    let other = sync_frame(5353, 2);
    let cut = &sync[..30];
    write_capture(
        dir,
        "sample.pcap",
        &capture(
            1,
            &[
                (&sync, sync.len() as u32),
                (&other, other.len() as u32),
                (cut, sync.len() as u32),
            ],
        ),
    )
}

#[test]
fn help_supports_dissect_and_decode() {
    cmd()
        .arg("pcap")
        .arg("dissect")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("--ptp-only"));
    cmd()
        .arg("pcap")
        .arg("decode")
        .arg("--help")
        .assert()
        .success();
}

#[test]
fn missing_input_argument_is_a_usage_error() {
    cmd().arg("pcap").arg("dissect").assert().code(2);
}

#[test]
fn missing_input_shows_error_and_hint() {
    let temp = TempDir::new().expect("tempdir");
    let missing = temp.path().join("missing.pcap");

    cmd()
        .arg("pcap")
        .arg("dissect")
        .arg(missing)
        .assert()
        .code(2)
        .stderr(contains("error:").and(contains("hint:")));
}

#[test]
fn text_output_reports_layers_and_summary() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample_capture(temp.path());

    cmd()
        .arg("pcap")
        .arg("dissect")
        .arg(input)
        .assert()
        .success()
        .stdout(
            contains("3 records read, 2 fully decoded")
                .and(contains("PTP v2.0 Sync domain 0 seq 1"))
                .and(contains("origin timestamp 1700000000.000000042"))
                .and(contains("[two_step]"))
                .and(contains("stopped at transport: UDP destination port 5353 is not PTP"))
                .and(contains("FAILED at network: truncated IPv4 header")),
        );
}

#[test]
fn json_output_is_one_object_per_line() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample_capture(temp.path());

    let assert = cmd()
        .arg("pcap")
        .arg("dissect")
        .arg(input)
        .arg("--format")
        .arg("json")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let lines: Vec<Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("valid json line"))
        .collect();

    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0]["capture"]["version_major"], 2);
    assert_eq!(lines[1]["ptp"]["header"]["sequence_id"], 1);
    assert_eq!(lines[1]["ptp"]["body"]["kind"], "sync");
    assert_eq!(lines[2]["outcome"]["status"], "stopped");
    assert_eq!(lines[3]["outcome"]["error"]["kind"], "truncated_ip_header");
    assert_eq!(lines[4]["summary"]["records_read"], 3);
    assert_eq!(lines[4]["summary"]["records_decoded"], 2);
}

#[test]
fn ptp_only_writes_to_output_file() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample_capture(temp.path());
    let output = temp.path().join("out").join("ptp.jsonl");

    cmd()
        .arg("pcap")
        .arg("dissect")
        .arg(&input)
        .arg("--ptp-only")
        .arg("--format")
        .arg("json")
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicates::str::is_empty());

    let written = std::fs::read_to_string(&output).expect("output file");
    let records: Vec<Value> = written
        .lines()
        .map(|line| serde_json::from_str(line).expect("valid json line"))
        .filter(|value: &Value| value.get("record").is_some())
        .collect();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["record"]["index"], 1);
}

#[test]
fn output_must_differ_from_input() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample_capture(temp.path());

    cmd()
        .arg("pcap")
        .arg("dissect")
        .arg(&input)
        .arg("-o")
        .arg(&input)
        .assert()
        .code(2)
        .stderr(contains("output path must differ from input"));
}

#[test]
fn bad_magic_is_rejected_with_hint() {
    let temp = TempDir::new().expect("tempdir");
    let mut bytes = capture(1, &[]);
    bytes[..4].copy_from_slice(&[0x0a, 0x0d, 0x0d, 0x0a]);
    let input = write_capture(temp.path(), "capture.pcapng", &bytes);

    cmd()
        .arg("pcap")
        .arg("dissect")
        .arg(input)
        .assert()
        .code(2)
        .stderr(contains("magic").and(contains("pcapng is not supported")));
}

#[test]
fn non_ethernet_link_type_needs_flag() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_capture(temp.path(), "raw.pcap", &capture(101, &[]));

    cmd()
        .arg("pcap")
        .arg("dissect")
        .arg(&input)
        .assert()
        .code(2)
        .stderr(contains("--allow-non-ethernet"));

    cmd()
        .arg("pcap")
        .arg("dissect")
        .arg(&input)
        .arg("--allow-non-ethernet")
        .assert()
        .success()
        .stdout(contains("0 records read, 0 fully decoded"));
}

#[test]
fn truncated_file_fails_after_writing_output() {
    let temp = TempDir::new().expect("tempdir");
    let sync = sync_frame(319, 1);
    let mut bytes = capture(1, &[(&sync, sync.len() as u32)]);
    bytes.extend_from_slice(&[0u8; 9]);
    let input = write_capture(temp.path(), "cut.pcap", &bytes);

    cmd()
        .arg("pcap")
        .arg("dissect")
        .arg(input)
        .assert()
        .code(2)
        .stdout(contains("1 records read, 1 fully decoded"))
        .stderr(contains("error:").and(contains("truncated")));
}

#[test]
fn glob_with_single_match_is_accepted() {
    let temp = TempDir::new().expect("tempdir");
    sample_capture(temp.path());
    let pattern = temp.path().join("*.pcap");

    cmd()
        .arg("pcap")
        .arg("dissect")
        .arg(pattern)
        .arg("-q")
        .assert()
        .success()
        .stdout(contains("3 records read"));
}

#[test]
fn glob_with_several_matches_is_rejected() {
    let temp = TempDir::new().expect("tempdir");
    sample_capture(temp.path());
    write_capture(temp.path(), "second.pcap", &capture(1, &[]));
    let pattern = temp.path().join("*.pcap");

    cmd()
        .arg("pcap")
        .arg("dissect")
        .arg(pattern)
        .assert()
        .code(2)
        .stderr(contains("multiple files match pattern"));
}
