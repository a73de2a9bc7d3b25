use std::ops::Range;

pub const GLOBAL_HEADER_LEN: usize = 24;
pub const MAGIC_RANGE: Range<usize> = 0..4;
pub const RECORD_HEADER_LEN: usize = 16;

pub const MIN_VERSION_MAJOR: u16 = 2;

/// Upper bound on a single record allocation.
pub const MAX_CAPTURED_LEN: usize = 16 * 1024 * 1024;

pub const READ_BUFFER_SIZE: usize = 64 * 1024;
