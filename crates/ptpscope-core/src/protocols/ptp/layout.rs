use std::ops::Range;

pub const TRANSPORT_MESSAGE_TYPE_OFFSET: usize = 0;
pub const VERSION_OFFSET: usize = 1;
pub const MESSAGE_LENGTH_RANGE: Range<usize> = 2..4;
pub const DOMAIN_NUMBER_OFFSET: usize = 4;
pub const FLAGS_RANGE: Range<usize> = 6..8;
pub const CORRECTION_RANGE: Range<usize> = 8..16;
pub const SOURCE_PORT_IDENTITY_RANGE: Range<usize> = 20..30;
pub const SEQUENCE_ID_RANGE: Range<usize> = 30..32;
pub const CONTROL_FIELD_OFFSET: usize = 32;
pub const LOG_MESSAGE_INTERVAL_OFFSET: usize = 33;
pub const COMMON_HEADER_LEN: usize = 34;

// Body fields, relative to the end of the common header.
pub const TIMESTAMP_SECONDS_RANGE: Range<usize> = 0..6;
pub const TIMESTAMP_NANOSECONDS_RANGE: Range<usize> = 6..10;
pub const REQUESTING_PORT_IDENTITY_RANGE: Range<usize> = 10..20;

pub const CURRENT_UTC_OFFSET_RANGE: Range<usize> = 10..12;
pub const GRANDMASTER_PRIORITY1_OFFSET: usize = 13;
pub const GRANDMASTER_CLOCK_CLASS_OFFSET: usize = 14;
pub const GRANDMASTER_CLOCK_ACCURACY_OFFSET: usize = 15;
pub const GRANDMASTER_VARIANCE_RANGE: Range<usize> = 16..18;
pub const GRANDMASTER_PRIORITY2_OFFSET: usize = 18;
pub const GRANDMASTER_IDENTITY_RANGE: Range<usize> = 19..27;
pub const STEPS_REMOVED_RANGE: Range<usize> = 27..29;
pub const TIME_SOURCE_OFFSET: usize = 29;

pub const TIMESTAMP_BODY_LEN: usize = 10;
pub const PORT_BODY_LEN: usize = 20;
pub const ANNOUNCE_BODY_LEN: usize = 30;

pub const CLOCK_IDENTITY_LEN: usize = 8;

pub const MSG_SYNC: u8 = 0x0;
pub const MSG_DELAY_REQ: u8 = 0x1;
pub const MSG_PDELAY_REQ: u8 = 0x2;
pub const MSG_PDELAY_RESP: u8 = 0x3;
pub const MSG_FOLLOW_UP: u8 = 0x8;
pub const MSG_DELAY_RESP: u8 = 0x9;
pub const MSG_PDELAY_RESP_FOLLOW_UP: u8 = 0xa;
pub const MSG_ANNOUNCE: u8 = 0xb;
pub const MSG_SIGNALING: u8 = 0xc;
pub const MSG_MANAGEMENT: u8 = 0xd;

// flagField bits; the first octet is the high byte.
pub const FLAG_ALTERNATE_MASTER: u16 = 0x0100;
pub const FLAG_TWO_STEP: u16 = 0x0200;
pub const FLAG_UNICAST: u16 = 0x0400;
pub const FLAG_LEAP61: u16 = 0x0001;
pub const FLAG_LEAP59: u16 = 0x0002;
pub const FLAG_UTC_OFFSET_VALID: u16 = 0x0004;
pub const FLAG_PTP_TIMESCALE: u16 = 0x0008;
pub const FLAG_TIME_TRACEABLE: u16 = 0x0010;
pub const FLAG_FREQUENCY_TRACEABLE: u16 = 0x0020;

/// Correction field unit: nanoseconds multiplied by 2^16.
pub const CORRECTION_SCALE: f64 = 65536.0;
