use std::io::{ErrorKind, Read};

use crate::error::{FormatError, FormatResult};

/// One entry of the legacy v1 diff format: a little-endian offset followed
/// by a fixed `sector_size`-byte payload. This predates the v2 header and
/// big-endian records and is kept only for the CLI's `--legacy` path and
/// for tests; nothing in the v2 `restore` path depends on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct V1Record {
    pub offset: u64,
    pub data: Vec<u8>,
}

pub struct V1Reader<R: Read> {
    inner: R,
    sector_size: usize,
}

impl<R: Read> V1Reader<R> {
    pub fn new(inner: R, sector_size: usize) -> Self {
        V1Reader { inner, sector_size }
    }

    /// Returns the next record, or `None` on clean end of file. A short
    /// read partway through an entry is `TruncatedRecord`.
    pub fn next_record(&mut self) -> FormatResult<Option<V1Record>> {
        let mut offset_bytes = [0u8; 8];
        match self.inner.read(&mut offset_bytes) {
            Ok(0) => return Ok(None),
            Ok(n) if n < offset_bytes.len() => {
                self.inner.read_exact(&mut offset_bytes[n..]).map_err(|e| {
                    if e.kind() == ErrorKind::UnexpectedEof {
                        FormatError::TruncatedRecord
                    } else {
                        FormatError::Io(e)
                    }
                })?;
            }
            Ok(_) => {}
            Err(e) => return Err(FormatError::Io(e)),
        }
        let offset = u64::from_le_bytes(offset_bytes);

        let mut data = vec![0u8; self.sector_size];
        self.inner.read_exact(&mut data).map_err(|e| {
            if e.kind() == ErrorKind::UnexpectedEof {
                FormatError::TruncatedRecord
            } else {
                FormatError::Io(e)
            }
        })?;

        Ok(Some(V1Record { offset, data }))
    }
}
