//! Protocol decoding modules.
//!
//! Each protocol follows a layered structure:
//! - `layout`: byte offsets, ranges and well-known numbers (source of truth)
//! - `parser`: domain-level decoding (no direct byte indexing)
//! - `error`: explicit, actionable errors
//!
//! Ethernet, IPv4/IPv6 and UDP headers are sliced by `etherparse`. ARP and
//! PTP have no `etherparse` counterpart and decode through the bounds-checked
//! readers in `common` and `ptp::reader`, which also apply the PTP field byte
//! order.
//!
//! Parsers are pure and contain no I/O. They decode one header and return the
//! bytes that follow it; the [`crate::dissect`] chain decides which parser runs
//! next.

pub mod arp;
pub(crate) mod common;
pub mod ethernet;
pub mod ip;
pub mod ptp;
pub mod udp;
