use std::ops::Range;

/// A read that would have gone past the end of the available bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ShortRead {
    pub needed: usize,
    pub actual: usize,
}

/// Bounds-checked access to a borrowed byte slice.
///
/// Protocol readers wrap this and convert `ShortRead` into their own
/// truncation errors.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ByteReader<'a> {
    bytes: &'a [u8],
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub fn require_len(&self, needed: usize) -> Result<(), ShortRead> {
        if self.bytes.len() < needed {
            return Err(ShortRead {
                needed,
                actual: self.bytes.len(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, ShortRead> {
        self.bytes.get(offset).copied().ok_or(ShortRead {
            needed: offset + 1,
            actual: self.bytes.len(),
        })
    }

    pub fn read_slice(&self, range: Range<usize>) -> Result<&'a [u8], ShortRead> {
        self.bytes.get(range.clone()).ok_or(ShortRead {
            needed: range.end,
            actual: self.bytes.len(),
        })
    }

    pub fn read_array<const N: usize>(&self, range: Range<usize>) -> Result<[u8; N], ShortRead> {
        let end = range.end;
        let bytes = self.read_slice(range)?;
        bytes.try_into().map_err(|_| ShortRead {
            needed: end,
            actual: self.bytes.len(),
        })
    }

    pub fn read_u16_be(&self, range: Range<usize>) -> Result<u16, ShortRead> {
        Ok(u16::from_be_bytes(self.read_array(range)?))
    }
}
