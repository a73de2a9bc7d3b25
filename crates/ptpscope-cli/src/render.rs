use std::io::{self, Write};

use clap::ValueEnum;
use ptpscope_core::dissect::{NetworkLayer, Outcome, RecordDissection};
use ptpscope_core::protocols::ethernet::{EthernetFrame, ethertype_name};
use ptpscope_core::protocols::ip::protocol_name;
use ptpscope_core::protocols::ptp::{PtpBody, PtpHeader, PtpMessage};
use ptpscope_core::{CaptureFileHeader, DissectSummary};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Indented, human-readable text
    #[default]
    Text,
    /// One JSON object per record, then a summary object
    Json,
}

pub struct Renderer<W: Write> {
    out: W,
    format: OutputFormat,
}

#[derive(Serialize)]
struct SummaryLine<'a> {
    summary: &'a DissectSummary,
}

#[derive(Serialize)]
struct CaptureLine<'a> {
    capture: &'a CaptureFileHeader,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    pub fn capture(&mut self, header: &CaptureFileHeader) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(
                self.out,
                "pcap {}.{}, {:?} byte order, snaplen {}, link type {}",
                header.version_major,
                header.version_minor,
                header.file_endianness(),
                header.snaplen,
                header.linktype.0
            ),
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, &CaptureLine { capture: header })?;
                writeln!(self.out)
            }
        }
    }

    pub fn record(&mut self, dissection: &RecordDissection<'_>) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => write_text_record(&mut self.out, dissection),
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, dissection)?;
                writeln!(self.out)
            }
        }
    }

    pub fn finish(mut self, summary: &DissectSummary) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => write_text_summary(&mut self.out, summary)?,
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, &SummaryLine { summary })?;
                writeln!(self.out)?;
            }
        }
        self.out.flush()
    }
}

fn write_text_record<W: Write>(out: &mut W, d: &RecordDissection<'_>) -> io::Result<()> {
    let record = &d.record;
    write!(out, "#{}", record.index)?;
    match &record.timestamp {
        Some(ts) => write!(out, " {ts}")?,
        None => write!(out, " {}.{:06}", record.ts_sec, record.ts_frac)?,
    }
    writeln!(out, " caplen={} origlen={}", record.caplen, record.origlen)?;

    if let Some(frame) = &d.link {
        write_ethernet(out, frame)?;
    }

    match &d.network {
        Some(NetworkLayer::Ipv4(ip)) => writeln!(
            out,
            "  IPv4 {} -> {} proto {}{} ttl {} len {} id {:#06x}{}",
            ip.source,
            ip.destination,
            ip.protocol,
            name_suffix(protocol_name(ip.protocol)),
            ip.ttl,
            ip.total_length,
            ip.identification,
            if ip.dont_fragment { " DF" } else { "" }
        )?,
        Some(NetworkLayer::Ipv6(ip)) => writeln!(
            out,
            "  IPv6 {} -> {} next {}{} hop {} len {} flow {:#07x}",
            ip.source,
            ip.destination,
            ip.next_header,
            name_suffix(protocol_name(ip.next_header)),
            ip.hop_limit,
            ip.payload_length,
            ip.flow_label
        )?,
        Some(NetworkLayer::Arp(arp)) => writeln!(
            out,
            "  ARP {} {} ({}) -> {} ({})",
            arp.operation_name().unwrap_or("operation"),
            arp.sender_ip,
            arp.sender_mac,
            arp.target_ip,
            arp.target_mac
        )?,
        None => {}
    }

    if let Some(udp) = &d.transport {
        writeln!(
            out,
            "  UDP {} -> {} len {} checksum {:#06x}",
            udp.source_port, udp.destination_port, udp.length, udp.checksum
        )?;
    }

    if let Some(ptp) = &d.ptp {
        write_ptp(out, ptp)?;
    }

    match &d.outcome {
        Outcome::Complete => writeln!(out, "  => complete"),
        Outcome::Stopped { layer, reason } => writeln!(out, "  => stopped at {layer}: {reason}"),
        Outcome::Failed { layer, error } => writeln!(out, "  => FAILED at {layer}: {error}"),
    }
}

fn write_ethernet<W: Write>(out: &mut W, frame: &EthernetFrame<'_>) -> io::Result<()> {
    write!(
        out,
        "  Ethernet {} -> {} type {:#06x}{}",
        frame.source,
        frame.destination,
        frame.payload_type,
        name_suffix(ethertype_name(frame.payload_type))
    )?;
    if let Some(vlan) = &frame.vlan {
        write!(
            out,
            " vlan {} prio {}{}",
            vlan.vlan_id,
            vlan.priority,
            if vlan.dei { " dei" } else { "" }
        )?;
    }
    writeln!(out)
}

fn write_ptp<W: Write>(out: &mut W, ptp: &PtpMessage) -> io::Result<()> {
    let header = &ptp.header;
    let name = header
        .message_kind()
        .map(|kind| kind.name().to_string())
        .unwrap_or_else(|| format!("type {:#x}", header.message_type));
    writeln!(
        out,
        "  PTP v{}.{} {} domain {} seq {} from {}",
        header.version,
        header.minor_version,
        name,
        header.domain_number,
        header.sequence_id,
        header.source_port_identity
    )?;
    writeln!(
        out,
        "      flags {:#06x}{} correction {:.3} ns interval {}",
        header.flags,
        flag_list(header),
        header.correction_ns(),
        header.log_message_interval
    )?;

    match &ptp.body {
        Some(PtpBody::Sync { origin_timestamp })
        | Some(PtpBody::DelayReq { origin_timestamp })
        | Some(PtpBody::PdelayReq { origin_timestamp }) => {
            writeln!(out, "      origin timestamp {origin_timestamp}")
        }
        Some(PtpBody::FollowUp {
            precise_origin_timestamp,
        }) => writeln!(out, "      precise origin timestamp {precise_origin_timestamp}"),
        Some(PtpBody::DelayResp {
            receive_timestamp: ts,
            requesting_port_identity: port,
        })
        | Some(PtpBody::PdelayResp {
            request_receipt_timestamp: ts,
            requesting_port_identity: port,
        })
        | Some(PtpBody::PdelayRespFollowUp {
            response_origin_timestamp: ts,
            requesting_port_identity: port,
        }) => writeln!(out, "      timestamp {ts} requesting port {port}"),
        Some(PtpBody::Announce(announce)) => {
            let quality = &announce.grandmaster_clock_quality;
            writeln!(
                out,
                "      origin timestamp {} utc offset {} steps removed {} time source {:#04x}",
                announce.origin_timestamp,
                announce.current_utc_offset,
                announce.steps_removed,
                announce.time_source
            )?;
            writeln!(
                out,
                "      grandmaster {} priority {}/{} class {} accuracy {:#04x} variance {:#06x}",
                announce.grandmaster_identity,
                announce.grandmaster_priority1,
                announce.grandmaster_priority2,
                quality.clock_class,
                quality.clock_accuracy,
                quality.offset_scaled_log_variance
            )
        }
        Some(PtpBody::NotImplemented { message_type }) => {
            writeln!(out, "      {message_type} body not decoded")
        }
        Some(PtpBody::Unknown { message_type }) => {
            writeln!(out, "      unknown message type {message_type:#x}")
        }
        None => Ok(()),
    }
}

fn flag_list(header: &PtpHeader) -> String {
    let flags = [
        (header.alternate_master(), "alternate_master"),
        (header.two_step(), "two_step"),
        (header.unicast(), "unicast"),
        (header.leap61(), "leap61"),
        (header.leap59(), "leap59"),
        (header.utc_offset_valid(), "utc_offset_valid"),
        (header.ptp_timescale(), "ptp_timescale"),
        (header.time_traceable(), "time_traceable"),
        (header.frequency_traceable(), "frequency_traceable"),
    ];
    let set: Vec<&str> = flags
        .iter()
        .filter(|(on, _)| *on)
        .map(|(_, name)| *name)
        .collect();
    if set.is_empty() {
        String::new()
    } else {
        format!(" [{}]", set.join(" "))
    }
}

fn write_text_summary<W: Write>(out: &mut W, summary: &DissectSummary) -> io::Result<()> {
    writeln!(out, "{summary}")?;
    if summary.records_skipped > 0 {
        writeln!(out, "  skipped: {}", summary.records_skipped)?;
    }
    if summary.records_failed > 0 {
        let kinds: Vec<String> = summary
            .failures
            .iter()
            .map(|(kind, count)| format!("{kind} {count}"))
            .collect();
        writeln!(out, "  failed: {} ({})", summary.records_failed, kinds.join(", "))?;
    }
    if summary.ptp_messages > 0 {
        let types: Vec<String> = summary
            .message_types
            .iter()
            .map(|(name, count)| format!("{name} {count}"))
            .collect();
        writeln!(out, "  PTP messages: {} ({})", summary.ptp_messages, types.join(", "))?;
    }
    if let Some(note) = &summary.truncated_file {
        writeln!(out, "  truncated: {note}")?;
    }
    Ok(())
}

fn name_suffix(name: Option<&str>) -> String {
    name.map(|name| format!(" ({name})")).unwrap_or_default()
}
