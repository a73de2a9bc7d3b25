use std::ops::Range;

pub const HARDWARE_TYPE_RANGE: Range<usize> = 0..2;
pub const PROTOCOL_TYPE_RANGE: Range<usize> = 2..4;
pub const HARDWARE_LEN_OFFSET: usize = 4;
pub const PROTOCOL_LEN_OFFSET: usize = 5;
pub const OPERATION_RANGE: Range<usize> = 6..8;
pub const SENDER_MAC_RANGE: Range<usize> = 8..14;
pub const SENDER_IP_RANGE: Range<usize> = 14..18;
pub const TARGET_MAC_RANGE: Range<usize> = 18..24;
pub const TARGET_IP_RANGE: Range<usize> = 24..28;

pub const ETHERNET_IPV4_LEN: usize = 28;

pub const OPERATION_REQUEST: u16 = 1;
pub const OPERATION_REPLY: u16 = 2;
