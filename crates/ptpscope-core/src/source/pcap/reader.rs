use std::io::{self, Read};

/// Append up to `limit` bytes from `reader` to `buf`.
///
/// Returns the number of bytes appended; anything below `limit` means the
/// input ended.
///
/// # Errors
/// Propagates I/O errors other than `Interrupted`.
pub fn read_up_to<R: Read>(reader: &mut R, limit: usize, buf: &mut Vec<u8>) -> io::Result<usize> {
    reader.by_ref().take(limit as u64).read_to_end(buf)
}

/// Discard up to `count` bytes from `reader` without buffering them.
///
/// Returns the number of bytes discarded.
///
/// # Errors
/// Propagates I/O errors other than `Interrupted`.
pub fn skip_bytes<R: Read>(reader: &mut R, count: u64) -> io::Result<u64> {
    io::copy(&mut reader.by_ref().take(count), &mut io::sink())
}
