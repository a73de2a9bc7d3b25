use std::fmt;

use pcap_parser::Linktype;
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::protocols::arp::{ArpPacket, parse_arp};
use crate::protocols::ethernet::{self, EthernetFrame, parse_ethernet};
use crate::protocols::ip::{self, Ipv4Header, Ipv6Header, parse_ipv4, parse_ipv6};
use crate::protocols::ptp::{MessageType, PtpBody, PtpMessage, parse_ptp_body, parse_ptp_header};
use crate::protocols::udp::{UdpHeader, parse_udp};
use crate::source::CapturedRecord;

use super::DecodeContext;
use super::error::{DissectError, Layer};

/// Record header fields as reported alongside the decoded layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordInfo {
    pub index: u64,
    pub ts_sec: u32,
    pub ts_frac: u32,
    /// RFC 3339 rendering of the capture time, when representable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub caplen: u32,
    pub origlen: u32,
}

impl RecordInfo {
    pub fn from_record(record: &CapturedRecord) -> Self {
        Self {
            index: record.index,
            ts_sec: record.ts_sec,
            ts_frac: record.ts_frac,
            timestamp: ts_to_rfc3339(record.ts_sec, record.ts_frac),
            caplen: record.caplen,
            origlen: record.origlen,
        }
    }
}

/// Record time as RFC 3339, with the fraction taken as microseconds.
pub fn ts_to_rfc3339(ts_sec: u32, ts_usec: u32) -> Option<String> {
    let nanos = i128::from(ts_sec) * 1_000_000_000 + i128::from(ts_usec) * 1_000;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
}

/// Decoded network-layer header.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NetworkLayer<'a> {
    Ipv4(Ipv4Header<'a>),
    Ipv6(Ipv6Header<'a>),
    Arp(ArpPacket),
}

/// Why decoding stopped before the application layer without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StopReason {
    LinkType { linktype: i32 },
    Ethertype { ethertype: u16 },
    IpVersion { version: u8 },
    IpProtocol { protocol: u8 },
    UdpPort { port: u16 },
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            StopReason::LinkType { linktype } => write!(f, "link type {linktype} not decoded"),
            StopReason::Ethertype { ethertype } => match ethernet::ethertype_name(ethertype) {
                Some(name) => write!(f, "ethertype {ethertype:#06x} ({name}) not decoded"),
                None => write!(f, "ethertype {ethertype:#06x} not decoded"),
            },
            StopReason::IpVersion { version } => write!(f, "IP version {version} not decoded"),
            StopReason::IpProtocol { protocol } => match ip::protocol_name(protocol) {
                Some(name) => write!(f, "IP protocol {protocol} ({name}) not decoded"),
                None => write!(f, "IP protocol {protocol} not decoded"),
            },
            StopReason::UdpPort { port } => write!(f, "UDP destination port {port} is not PTP"),
        }
    }
}

/// How far the chain got for one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Every layer present in the record was decoded.
    Complete,
    /// The chain reached a payload it does not decode.
    Stopped { layer: Layer, reason: StopReason },
    /// A decoder rejected its input; layers below it are still reported.
    Failed { layer: Layer, error: DissectError },
}

impl Outcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }
}

/// Everything decoded from one captured record.
#[derive(Debug, Clone, Serialize)]
pub struct RecordDissection<'a> {
    pub record: RecordInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<EthernetFrame<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkLayer<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport: Option<UdpHeader<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ptp: Option<PtpMessage>,
    pub outcome: Outcome,
}

impl RecordDissection<'_> {
    /// Decoded PTP message type, when the body was recognised.
    pub fn ptp_message_type(&self) -> Option<MessageType> {
        self.ptp.as_ref().and_then(|ptp| ptp.header.message_kind())
    }
}

/// Run one record through link → network → transport → PTP.
///
/// Never fails as a whole: decoder errors end up in [`Outcome::Failed`]
/// with every layer decoded before the failure kept.
pub fn dissect_record<'a>(
    record: &'a CapturedRecord,
    context: &DecodeContext,
) -> RecordDissection<'a> {
    let mut dissection = RecordDissection {
        record: RecordInfo::from_record(record),
        link: None,
        network: None,
        transport: None,
        ptp: None,
        outcome: Outcome::Complete,
    };

    dissection.outcome = match decode_link(&record.data, context, &mut dissection) {
        Ok(None) => Outcome::Complete,
        Ok(Some((layer, reason))) => {
            tracing::debug!(index = record.index, %layer, %reason, "decoding stopped");
            Outcome::Stopped { layer, reason }
        }
        Err(error) => {
            tracing::warn!(
                index = record.index,
                layer = %error.layer(),
                kind = error.kind(),
                "{error}"
            );
            Outcome::Failed {
                layer: error.layer(),
                error,
            }
        }
    };
    dissection
}

/// `None` when the chain ran to its natural end.
type Step = Result<Option<(Layer, StopReason)>, DissectError>;

fn decode_link<'a>(data: &'a [u8], context: &DecodeContext, out: &mut RecordDissection<'a>) -> Step {
    match context.linktype {
        Linktype::ETHERNET => {
            let frame = parse_ethernet(data)?;
            let (payload_type, payload) = (frame.payload_type, frame.payload);
            out.link = Some(frame);
            match payload_type {
                ethernet::layout::ETHERTYPE_IPV4 => decode_ipv4(payload, context, out),
                ethernet::layout::ETHERTYPE_IPV6 => decode_ipv6(payload, context, out),
                ethernet::layout::ETHERTYPE_ARP => {
                    out.network = Some(NetworkLayer::Arp(parse_arp(payload)?));
                    Ok(None)
                }
                ethernet::layout::ETHERTYPE_PTP => decode_ptp(payload, context, out),
                ethertype => Ok(Some((Layer::Link, StopReason::Ethertype { ethertype }))),
            }
        }
        Linktype::RAW => match ip::parser::peek_version(data) {
            Some(6) => decode_ipv6(data, context, out),
            Some(4) | None => decode_ipv4(data, context, out),
            Some(version) => Ok(Some((Layer::Link, StopReason::IpVersion { version }))),
        },
        Linktype::IPV4 => decode_ipv4(data, context, out),
        Linktype::IPV6 => decode_ipv6(data, context, out),
        linktype => Ok(Some((
            Layer::Link,
            StopReason::LinkType {
                linktype: linktype.0,
            },
        ))),
    }
}

fn decode_ipv4<'a>(packet: &'a [u8], context: &DecodeContext, out: &mut RecordDissection<'a>) -> Step {
    let header = parse_ipv4(packet)?;
    let (protocol, payload) = (header.protocol, header.payload);
    out.network = Some(NetworkLayer::Ipv4(header));
    decode_transport(protocol, payload, context, out)
}

fn decode_ipv6<'a>(packet: &'a [u8], context: &DecodeContext, out: &mut RecordDissection<'a>) -> Step {
    let header = parse_ipv6(packet)?;
    let (next_header, payload) = (header.next_header, header.payload);
    out.network = Some(NetworkLayer::Ipv6(header));
    decode_transport(next_header, payload, context, out)
}

fn decode_transport<'a>(
    protocol: u8,
    payload: &'a [u8],
    context: &DecodeContext,
    out: &mut RecordDissection<'a>,
) -> Step {
    if protocol != ip::layout::PROTOCOL_UDP {
        return Ok(Some((Layer::Network, StopReason::IpProtocol { protocol })));
    }

    let udp = parse_udp(payload)?;
    let (carries_ptp, port, payload) = (udp.carries_ptp(), udp.destination_port, udp.payload);
    out.transport = Some(udp);
    if !carries_ptp {
        return Ok(Some((Layer::Transport, StopReason::UdpPort { port })));
    }
    decode_ptp(payload, context, out)
}

fn decode_ptp(message: &[u8], context: &DecodeContext, out: &mut RecordDissection<'_>) -> Step {
    let header = parse_ptp_header(message, context.ptp_order)?;
    let body = parse_ptp_body(&header, message, context.ptp_order);
    out.ptp = Some(PtpMessage {
        header,
        body: body.as_ref().ok().copied(),
    });
    if let Ok(PtpBody::NotImplemented { message_type }) = body {
        tracing::debug!(index = out.record.index, %message_type, "PTP body not decoded");
    }
    body.map(|_| None).map_err(DissectError::from)
}
