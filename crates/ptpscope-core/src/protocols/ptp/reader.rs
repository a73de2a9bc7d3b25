use std::ops::Range;

use crate::endian::{self, Endianness};
use crate::protocols::common::{ByteReader, ShortRead};

use super::layout;

/// PTP field reader: bounds checks plus the resolved field byte order.
pub(crate) struct PtpReader<'a> {
    inner: ByteReader<'a>,
    order: Endianness,
}

impl<'a> PtpReader<'a> {
    pub fn new(message: &'a [u8], order: Endianness) -> Self {
        Self {
            inner: ByteReader::new(message),
            order,
        }
    }

    pub fn require_len(&self, needed: usize) -> Result<(), ShortRead> {
        self.inner.require_len(needed)
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, ShortRead> {
        self.inner.read_u8(offset)
    }

    pub fn read_i8(&self, offset: usize) -> Result<i8, ShortRead> {
        Ok(self.inner.read_u8(offset)? as i8)
    }

    pub fn read_u16(&self, range: Range<usize>) -> Result<u16, ShortRead> {
        Ok(endian::read_u16(self.inner.read_array(range)?, self.order))
    }

    pub fn read_u32(&self, range: Range<usize>) -> Result<u32, ShortRead> {
        Ok(endian::read_u32(self.inner.read_array(range)?, self.order))
    }

    pub fn read_u48(&self, range: Range<usize>) -> Result<u64, ShortRead> {
        Ok(endian::read_u48(self.inner.read_array(range)?, self.order))
    }

    pub fn read_u64(&self, range: Range<usize>) -> Result<u64, ShortRead> {
        Ok(endian::read_u64(self.inner.read_array(range)?, self.order))
    }

    pub fn read_clock_identity(&self, start: usize) -> Result<[u8; 8], ShortRead> {
        self.inner
            .read_array(start..start + layout::CLOCK_IDENTITY_LEN)
    }
}

/// Shift a body-relative range so it indexes the whole message.
pub(crate) fn body_range(range: Range<usize>) -> Range<usize> {
    range.start + layout::COMMON_HEADER_LEN..range.end + layout::COMMON_HEADER_LEN
}

pub(crate) fn body_offset(offset: usize) -> usize {
    offset + layout::COMMON_HEADER_LEN
}
