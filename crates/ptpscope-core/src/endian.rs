//! Byte-order detection and swap primitives.
//!
//! Capture files may be written in either byte order; the magic number at the
//! start of the file tells whether stored multi-byte fields match the host or
//! are swapped. That decision is a [`ByteOrderMode`], made once per file and
//! carried in the capture header.
//!
//! Protocol fields inside captured frames are read through [`Endianness`].
//! Reads start from network order and go through the swap primitives when
//! the requested order is little-endian.

use serde::Serialize;

/// Magic number of a microsecond-resolution pcap file, as read in file order.
pub const PCAP_MAGIC: u32 = 0xa1b2_c3d4;
/// The same magic number read in the opposite order.
pub const PCAP_MAGIC_SWAPPED: u32 = 0xd4c3_b2a1;

/// Explicit byte order of a multi-byte field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Endianness {
    Big,
    Little,
}

impl Endianness {
    /// Byte order of the machine running the decoder.
    pub const fn host() -> Self {
        if cfg!(target_endian = "little") {
            Endianness::Little
        } else {
            Endianness::Big
        }
    }

    pub const fn swapped(self) -> Self {
        match self {
            Endianness::Big => Endianness::Little,
            Endianness::Little => Endianness::Big,
        }
    }
}

/// Whether multi-byte container fields must be swapped relative to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ByteOrderMode {
    Native,
    Swapped,
}

impl ByteOrderMode {
    /// Mode for a file written in `order`, relative to the running host.
    ///
    /// # Examples
    /// ```
    /// use ptpscope_core::endian::{ByteOrderMode, Endianness};
    ///
    /// let mode = ByteOrderMode::for_file(Endianness::host());
    /// assert_eq!(mode, ByteOrderMode::Native);
    /// assert_eq!(mode.file_endianness(), Endianness::host());
    /// ```
    pub fn for_file(order: Endianness) -> Self {
        if order == Endianness::host() {
            ByteOrderMode::Native
        } else {
            ByteOrderMode::Swapped
        }
    }

    /// Byte order the file was written in.
    pub fn file_endianness(self) -> Endianness {
        match self {
            ByteOrderMode::Native => Endianness::host(),
            ByteOrderMode::Swapped => Endianness::host().swapped(),
        }
    }
}

pub fn swap_u16(value: u16) -> u16 {
    value.swap_bytes()
}

pub fn swap_u32(value: u32) -> u32 {
    value.swap_bytes()
}

pub fn swap_u64(value: u64) -> u64 {
    value.swap_bytes()
}

/// Reverse the low 48 bits of `value`; the upper 16 bits must be zero.
pub fn swap_u48(value: u64) -> u64 {
    (value & 0xffff_ffff_ffff).swap_bytes() >> 16
}

/// Assemble a 48-bit unsigned value from six bytes in the given order.
///
/// # Examples
/// ```
/// use ptpscope_core::endian::{Endianness, read_u48};
///
/// let raw = [0x00, 0x00, 0x00, 0x01, 0x02, 0x03];
/// assert_eq!(read_u48(raw, Endianness::Big), 0x010203);
/// assert_eq!(read_u48(raw, Endianness::Little), 0x0302_0100_0000);
/// ```
pub fn read_u48(raw: [u8; 6], order: Endianness) -> u64 {
    let value = raw
        .iter()
        .fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte));
    match order {
        Endianness::Big => value,
        Endianness::Little => swap_u48(value),
    }
}

pub fn read_u16(raw: [u8; 2], order: Endianness) -> u16 {
    let value = u16::from_be_bytes(raw);
    match order {
        Endianness::Big => value,
        Endianness::Little => swap_u16(value),
    }
}

pub fn read_u32(raw: [u8; 4], order: Endianness) -> u32 {
    let value = u32::from_be_bytes(raw);
    match order {
        Endianness::Big => value,
        Endianness::Little => swap_u32(value),
    }
}

pub fn read_u64(raw: [u8; 8], order: Endianness) -> u64 {
    let value = u64::from_be_bytes(raw);
    match order {
        Endianness::Big => value,
        Endianness::Little => swap_u64(value),
    }
}
