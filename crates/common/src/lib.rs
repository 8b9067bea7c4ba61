//! Shared constants and small value types used across the diff-dd crates.
//!
//! Keeping these in one place means the wire format (`format`), the engine
//! that decides where to split records (`diffengine`), and the CLI all agree
//! on the same numbers without copy-pasting literals.

use std::num::NonZeroU32;

use thiserror::Error;

/// The file signature written at the start of every v2 diff image.
///
/// Exactly 13 ASCII bytes, no terminator.
pub const FILE_SIGNATURE: &[u8] = b"diff-dd image";

/// The version byte that follows [`FILE_SIGNATURE`] in a v2 diff image.
pub const FILE_VERSION: u8 = 2;

/// Size in bytes of a v2 record header: `offset: u64 | size: u32`.
///
/// This doubles as the coalescing gap threshold `G`: merging two diffs only
/// pays for itself when the gap between them is smaller than the header
/// overhead of emitting a second record.
pub const RECORD_HEADER_SIZE: usize = std::mem::size_of::<u64>() + std::mem::size_of::<u32>();

/// Default page size / buffered I/O capacity used when the CLI caller does
/// not override it with `-B`.
pub const DEFAULT_BUFFER_SIZE: u32 = 4 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum CommonError {
    #[error("buffer size must be strictly positive")]
    ZeroBufferSize,
}

/// A validated, strictly-positive buffer/page size.
///
/// The page size for the paged reader, the capacity of the buffered
/// reader/writer, and the cap on a single diff record's payload are all the
/// same number in this tool, so we give it one named type instead of passing
/// a bare `u32` around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BufferSize(NonZeroU32);

impl BufferSize {
    pub fn new(value: u32) -> Result<Self, CommonError> {
        NonZeroU32::new(value)
            .map(BufferSize)
            .ok_or(CommonError::ZeroBufferSize)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    pub fn as_usize(self) -> usize {
        self.0.get() as usize
    }
}

impl Default for BufferSize {
    fn default() -> Self {
        // Safety net for literal construction; DEFAULT_BUFFER_SIZE is a
        // compile-time non-zero constant.
        BufferSize::new(DEFAULT_BUFFER_SIZE).expect("default buffer size is non-zero")
    }
}

impl std::fmt::Display for BufferSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl TryFrom<u32> for BufferSize {
    type Error = CommonError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        BufferSize::new(value)
    }
}
