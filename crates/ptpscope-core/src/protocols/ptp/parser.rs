use std::fmt;

use serde::{Serialize, Serializer};

use crate::endian::Endianness;
use crate::protocols::common::ShortRead;

use super::error::PtpError;
use super::layout;
use super::reader::{PtpReader, body_offset, body_range};

/// Message types with a defined meaning in IEEE 1588-2008.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Sync,
    DelayReq,
    PdelayReq,
    PdelayResp,
    FollowUp,
    DelayResp,
    PdelayRespFollowUp,
    Announce,
    Signaling,
    Management,
}

impl MessageType {
    pub fn from_code(code: u8) -> Option<Self> {
        let message_type = match code {
            layout::MSG_SYNC => MessageType::Sync,
            layout::MSG_DELAY_REQ => MessageType::DelayReq,
            layout::MSG_PDELAY_REQ => MessageType::PdelayReq,
            layout::MSG_PDELAY_RESP => MessageType::PdelayResp,
            layout::MSG_FOLLOW_UP => MessageType::FollowUp,
            layout::MSG_DELAY_RESP => MessageType::DelayResp,
            layout::MSG_PDELAY_RESP_FOLLOW_UP => MessageType::PdelayRespFollowUp,
            layout::MSG_ANNOUNCE => MessageType::Announce,
            layout::MSG_SIGNALING => MessageType::Signaling,
            layout::MSG_MANAGEMENT => MessageType::Management,
            _ => return None,
        };
        Some(message_type)
    }

    pub fn code(self) -> u8 {
        match self {
            MessageType::Sync => layout::MSG_SYNC,
            MessageType::DelayReq => layout::MSG_DELAY_REQ,
            MessageType::PdelayReq => layout::MSG_PDELAY_REQ,
            MessageType::PdelayResp => layout::MSG_PDELAY_RESP,
            MessageType::FollowUp => layout::MSG_FOLLOW_UP,
            MessageType::DelayResp => layout::MSG_DELAY_RESP,
            MessageType::PdelayRespFollowUp => layout::MSG_PDELAY_RESP_FOLLOW_UP,
            MessageType::Announce => layout::MSG_ANNOUNCE,
            MessageType::Signaling => layout::MSG_SIGNALING,
            MessageType::Management => layout::MSG_MANAGEMENT,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MessageType::Sync => "Sync",
            MessageType::DelayReq => "Delay_Req",
            MessageType::PdelayReq => "Pdelay_Req",
            MessageType::PdelayResp => "Pdelay_Resp",
            MessageType::FollowUp => "Follow_Up",
            MessageType::DelayResp => "Delay_Resp",
            MessageType::PdelayRespFollowUp => "Pdelay_Resp_Follow_Up",
            MessageType::Announce => "Announce",
            MessageType::Signaling => "Signaling",
            MessageType::Management => "Management",
        }
    }

    /// Bytes required after the common header, or `None` for message types
    /// whose body is not decoded.
    pub fn body_len(self) -> Option<usize> {
        match self {
            MessageType::Sync
            | MessageType::DelayReq
            | MessageType::PdelayReq
            | MessageType::FollowUp => Some(layout::TIMESTAMP_BODY_LEN),
            MessageType::PdelayResp | MessageType::DelayResp | MessageType::PdelayRespFollowUp => {
                Some(layout::PORT_BODY_LEN)
            }
            MessageType::Announce => Some(layout::ANNOUNCE_BODY_LEN),
            MessageType::Signaling | MessageType::Management => None,
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Eight-byte clock identity, rendered as colon-separated lowercase hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClockIdentity(pub [u8; 8]);

impl fmt::Display for ClockIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl Serialize for ClockIdentity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PortIdentity {
    pub clock_identity: ClockIdentity,
    pub port_number: u16,
}

impl fmt::Display for PortIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.clock_identity, self.port_number)
    }
}

/// 48-bit seconds plus 32-bit nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct PtpTimestamp {
    pub seconds: u64,
    pub nanoseconds: u32,
}

impl fmt::Display for PtpTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.seconds, self.nanoseconds)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClockQuality {
    pub clock_class: u8,
    pub clock_accuracy: u8,
    pub offset_scaled_log_variance: u16,
}

/// Common header shared by every PTP message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PtpHeader {
    pub transport_specific: u8,
    pub message_type: u8,
    pub version: u8,
    pub minor_version: u8,
    pub message_length: u16,
    pub domain_number: u8,
    pub flags: u16,
    pub correction_field: i64,
    pub source_port_identity: PortIdentity,
    pub sequence_id: u16,
    pub control_field: u8,
    pub log_message_interval: i8,
}

impl PtpHeader {
    pub fn message_kind(&self) -> Option<MessageType> {
        MessageType::from_code(self.message_type)
    }

    /// Correction field converted from 2^-16 ns units.
    pub fn correction_ns(&self) -> f64 {
        self.correction_field as f64 / layout::CORRECTION_SCALE
    }

    fn flag(&self, mask: u16) -> bool {
        self.flags & mask != 0
    }

    pub fn alternate_master(&self) -> bool {
        self.flag(layout::FLAG_ALTERNATE_MASTER)
    }

    pub fn two_step(&self) -> bool {
        self.flag(layout::FLAG_TWO_STEP)
    }

    pub fn unicast(&self) -> bool {
        self.flag(layout::FLAG_UNICAST)
    }

    pub fn leap61(&self) -> bool {
        self.flag(layout::FLAG_LEAP61)
    }

    pub fn leap59(&self) -> bool {
        self.flag(layout::FLAG_LEAP59)
    }

    pub fn utc_offset_valid(&self) -> bool {
        self.flag(layout::FLAG_UTC_OFFSET_VALID)
    }

    pub fn ptp_timescale(&self) -> bool {
        self.flag(layout::FLAG_PTP_TIMESCALE)
    }

    pub fn time_traceable(&self) -> bool {
        self.flag(layout::FLAG_TIME_TRACEABLE)
    }

    pub fn frequency_traceable(&self) -> bool {
        self.flag(layout::FLAG_FREQUENCY_TRACEABLE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnnounceBody {
    pub origin_timestamp: PtpTimestamp,
    pub current_utc_offset: i16,
    pub grandmaster_priority1: u8,
    pub grandmaster_clock_quality: ClockQuality,
    pub grandmaster_priority2: u8,
    pub grandmaster_identity: ClockIdentity,
    pub steps_removed: u16,
    pub time_source: u8,
}

/// Message-specific part of a PTP message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PtpBody {
    Sync {
        origin_timestamp: PtpTimestamp,
    },
    DelayReq {
        origin_timestamp: PtpTimestamp,
    },
    PdelayReq {
        origin_timestamp: PtpTimestamp,
    },
    FollowUp {
        precise_origin_timestamp: PtpTimestamp,
    },
    PdelayResp {
        request_receipt_timestamp: PtpTimestamp,
        requesting_port_identity: PortIdentity,
    },
    DelayResp {
        receive_timestamp: PtpTimestamp,
        requesting_port_identity: PortIdentity,
    },
    PdelayRespFollowUp {
        response_origin_timestamp: PtpTimestamp,
        requesting_port_identity: PortIdentity,
    },
    Announce(AnnounceBody),
    /// Recognised message type whose body is not decoded.
    NotImplemented { message_type: MessageType },
    /// Message type code with no defined meaning.
    Unknown { message_type: u8 },
}

/// A decoded PTP message.
///
/// `body` is `None` only when the chain kept the header of a message whose
/// body turned out to be truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PtpMessage {
    pub header: PtpHeader,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<PtpBody>,
}

/// Decode the 34-byte common header.
///
/// # Errors
/// Returns `PtpError::TruncatedHeader` when fewer than 34 bytes are present.
pub fn parse_ptp_header(message: &[u8], order: Endianness) -> Result<PtpHeader, PtpError> {
    let reader = PtpReader::new(message, order);
    read_header(&reader).map_err(PtpError::header)
}

fn read_header(reader: &PtpReader<'_>) -> Result<PtpHeader, ShortRead> {
    reader.require_len(layout::COMMON_HEADER_LEN)?;

    let first = reader.read_u8(layout::TRANSPORT_MESSAGE_TYPE_OFFSET)?;
    let version = reader.read_u8(layout::VERSION_OFFSET)?;

    Ok(PtpHeader {
        transport_specific: first >> 4,
        message_type: first & 0x0f,
        version: version & 0x0f,
        minor_version: version >> 4,
        message_length: reader.read_u16(layout::MESSAGE_LENGTH_RANGE)?,
        domain_number: reader.read_u8(layout::DOMAIN_NUMBER_OFFSET)?,
        flags: reader.read_u16(layout::FLAGS_RANGE)?,
        correction_field: reader.read_u64(layout::CORRECTION_RANGE)? as i64,
        source_port_identity: read_port_identity(reader, layout::SOURCE_PORT_IDENTITY_RANGE.start)?,
        sequence_id: reader.read_u16(layout::SEQUENCE_ID_RANGE)?,
        control_field: reader.read_u8(layout::CONTROL_FIELD_OFFSET)?,
        log_message_interval: reader.read_i8(layout::LOG_MESSAGE_INTERVAL_OFFSET)?,
    })
}

/// Decode the body selected by `header.message_type`.
///
/// `message` is the whole PTP message, common header included.
///
/// # Errors
/// Returns `PtpError::TruncatedMessage` when the message is shorter than the
/// common header plus the body length of its type. Signaling, Management and
/// unknown types never fail.
pub fn parse_ptp_body(
    header: &PtpHeader,
    message: &[u8],
    order: Endianness,
) -> Result<PtpBody, PtpError> {
    let Some(kind) = header.message_kind() else {
        return Ok(PtpBody::Unknown {
            message_type: header.message_type,
        });
    };

    let reader = PtpReader::new(message, order);
    read_body(&reader, kind).map_err(|short| PtpError::message(kind.name(), short))
}

fn read_body(reader: &PtpReader<'_>, kind: MessageType) -> Result<PtpBody, ShortRead> {
    if let Some(body_len) = kind.body_len() {
        reader.require_len(layout::COMMON_HEADER_LEN + body_len)?;
    }

    let body = match kind {
        MessageType::Signaling | MessageType::Management => {
            PtpBody::NotImplemented { message_type: kind }
        }
        MessageType::Sync => PtpBody::Sync {
            origin_timestamp: read_timestamp(reader)?,
        },
        MessageType::DelayReq => PtpBody::DelayReq {
            origin_timestamp: read_timestamp(reader)?,
        },
        MessageType::PdelayReq => PtpBody::PdelayReq {
            origin_timestamp: read_timestamp(reader)?,
        },
        MessageType::FollowUp => PtpBody::FollowUp {
            precise_origin_timestamp: read_timestamp(reader)?,
        },
        MessageType::PdelayResp => PtpBody::PdelayResp {
            request_receipt_timestamp: read_timestamp(reader)?,
            requesting_port_identity: read_requesting_port(reader)?,
        },
        MessageType::DelayResp => PtpBody::DelayResp {
            receive_timestamp: read_timestamp(reader)?,
            requesting_port_identity: read_requesting_port(reader)?,
        },
        MessageType::PdelayRespFollowUp => PtpBody::PdelayRespFollowUp {
            response_origin_timestamp: read_timestamp(reader)?,
            requesting_port_identity: read_requesting_port(reader)?,
        },
        MessageType::Announce => PtpBody::Announce(read_announce(reader, read_timestamp(reader)?)?),
    };
    Ok(body)
}

/// Decode a complete PTP message: common header and body.
///
/// # Errors
/// Fails with `PtpError::TruncatedHeader` or `PtpError::TruncatedMessage`;
/// see [`parse_ptp_header`] and [`parse_ptp_body`].
///
/// # Examples
/// ```
/// use ptpscope_core::endian::Endianness;
/// use ptpscope_core::protocols::ptp::{PtpBody, parse_ptp};
///
/// let mut message = vec![0u8; 44];
/// message[1] = 0x02;
/// message[34..40].copy_from_slice(&[0, 0, 0x65, 0x4a, 0x1b, 0x00]);
/// message[40..44].copy_from_slice(&500u32.to_be_bytes());
/// let ptp = parse_ptp(&message, Endianness::Big).unwrap();
/// assert_eq!(ptp.header.version, 2);
/// match ptp.body {
///     Some(PtpBody::Sync { origin_timestamp }) => {
///         assert_eq!(origin_timestamp.seconds, 0x654a_1b00);
///         assert_eq!(origin_timestamp.nanoseconds, 500);
///     }
///     other => panic!("unexpected body: {other:?}"),
/// }
/// ```
pub fn parse_ptp(message: &[u8], order: Endianness) -> Result<PtpMessage, PtpError> {
    let header = parse_ptp_header(message, order)?;
    let body = parse_ptp_body(&header, message, order)?;
    Ok(PtpMessage {
        header,
        body: Some(body),
    })
}

fn read_port_identity(reader: &PtpReader<'_>, start: usize) -> Result<PortIdentity, ShortRead> {
    let clock_identity = ClockIdentity(reader.read_clock_identity(start)?);
    let port_start = start + layout::CLOCK_IDENTITY_LEN;
    let port_number = reader.read_u16(port_start..port_start + 2)?;
    Ok(PortIdentity {
        clock_identity,
        port_number,
    })
}

fn read_timestamp(reader: &PtpReader<'_>) -> Result<PtpTimestamp, ShortRead> {
    Ok(PtpTimestamp {
        seconds: reader.read_u48(body_range(layout::TIMESTAMP_SECONDS_RANGE))?,
        nanoseconds: reader.read_u32(body_range(layout::TIMESTAMP_NANOSECONDS_RANGE))?,
    })
}

fn read_requesting_port(reader: &PtpReader<'_>) -> Result<PortIdentity, ShortRead> {
    read_port_identity(
        reader,
        body_range(layout::REQUESTING_PORT_IDENTITY_RANGE).start,
    )
}

fn read_announce(
    reader: &PtpReader<'_>,
    origin_timestamp: PtpTimestamp,
) -> Result<AnnounceBody, ShortRead> {
    Ok(AnnounceBody {
        origin_timestamp,
        current_utc_offset: reader.read_u16(body_range(layout::CURRENT_UTC_OFFSET_RANGE))? as i16,
        grandmaster_priority1: reader.read_u8(body_offset(layout::GRANDMASTER_PRIORITY1_OFFSET))?,
        grandmaster_clock_quality: ClockQuality {
            clock_class: reader.read_u8(body_offset(layout::GRANDMASTER_CLOCK_CLASS_OFFSET))?,
            clock_accuracy: reader.read_u8(body_offset(layout::GRANDMASTER_CLOCK_ACCURACY_OFFSET))?,
            offset_scaled_log_variance: reader
                .read_u16(body_range(layout::GRANDMASTER_VARIANCE_RANGE))?,
        },
        grandmaster_priority2: reader.read_u8(body_offset(layout::GRANDMASTER_PRIORITY2_OFFSET))?,
        grandmaster_identity: ClockIdentity(
            reader.read_clock_identity(body_offset(layout::GRANDMASTER_IDENTITY_RANGE.start))?,
        ),
        steps_removed: reader.read_u16(body_range(layout::STEPS_REMOVED_RANGE))?,
        time_source: reader.read_u8(body_offset(layout::TIME_SOURCE_OFFSET))?,
    })
}
