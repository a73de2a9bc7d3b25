use etherparse::IpNumber;

pub const VERSION_OFFSET: usize = 0;

pub const PROTOCOL_ICMP: u8 = IpNumber::ICMP.0;
pub const PROTOCOL_TCP: u8 = IpNumber::TCP.0;
pub const PROTOCOL_UDP: u8 = IpNumber::UDP.0;
pub const PROTOCOL_ICMPV6: u8 = IpNumber::IPV6_ICMP.0;
