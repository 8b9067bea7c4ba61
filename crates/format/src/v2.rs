use std::io::{Read, Write};

use common::{FILE_SIGNATURE, FILE_VERSION};
use diffengine::RecordPart;
use log::trace;

use crate::error::{FormatError, FormatResult};

/// Writes a v2 diff image: the fixed header, then one record per
/// `write_diff_record` call, in strictly increasing offset order (the
/// caller's responsibility — the writer does not check it).
pub struct Writer<W: Write> {
    inner: stream_io::Writer<W>,
}

impl<W: Write> Writer<W> {
    pub fn open(stream: W, capacity: usize) -> FormatResult<Self> {
        let mut inner = stream_io::Writer::new(stream, capacity);
        inner.write(FILE_SIGNATURE)?;
        inner.write(&[FILE_VERSION])?;
        Ok(Writer { inner })
    }

    /// Writes one record: a 12-byte big-endian header followed by the
    /// concatenation of `parts`, whose lengths must sum to `size`.
    pub fn write_diff_record(
        &mut self,
        offset: u64,
        size: u32,
        parts: &[RecordPart],
    ) -> FormatResult<()> {
        debug_assert_eq!(
            parts.iter().map(RecordPart::len).sum::<usize>(),
            size as usize
        );
        self.inner.write(&offset.to_be_bytes())?;
        self.inner.write(&size.to_be_bytes())?;
        for part in parts {
            self.inner.write(part.as_slice())?;
        }
        trace!("wrote record offset={offset} size={size} in {} part(s)", parts.len());
        Ok(())
    }

    /// Flushes the underlying writer, surfacing any pending I/O error.
    pub fn finish(self) -> FormatResult<()> {
        Ok(self.inner.finish()?)
    }
}

/// Reads a v2 diff image record by record.
pub struct Reader<R: Read> {
    reader: stream_io::Reader<R>,
    eof: bool,
}

impl<R: Read> Reader<R> {
    pub fn open(stream: R, capacity: usize) -> FormatResult<Self> {
        let mut reader = stream_io::Reader::new(stream, capacity, 1)?;

        let mut signature = [0u8; 13];
        if reader.read(&mut signature)? != signature.len() || signature != *FILE_SIGNATURE {
            return Err(FormatError::BadSignature);
        }

        let mut version = [0u8; 1];
        if reader.read(&mut version)? != 1 || version[0] != FILE_VERSION {
            return Err(FormatError::BadVersion);
        }

        Ok(Reader { reader, eof: false })
    }

    /// Sticky once set: once either `read_offset` or `read_size` observes a
    /// short read, the reader is considered finished.
    pub fn eof(&self) -> bool {
        self.eof
    }

    pub fn read_offset(&mut self) -> FormatResult<u64> {
        let mut buf = [0u8; 8];
        let n = self.reader.read(&mut buf)?;
        if n < buf.len() {
            self.eof = true;
        }
        Ok(u64::from_be_bytes(buf))
    }

    pub fn read_size(&mut self) -> FormatResult<u32> {
        let mut buf = [0u8; 4];
        let n = self.reader.read(&mut buf)?;
        if n < buf.len() {
            self.eof = true;
        }
        Ok(u32::from_be_bytes(buf))
    }

    /// Returns up to `n` bytes of the current record's payload, zero-copy.
    /// An empty result before `n` bytes have been requested in total means
    /// the stream ended mid-record; the caller (the restore engine) is
    /// responsible for treating that as `TruncatedRecord`.
    pub fn read_record_data(&mut self, n: usize) -> FormatResult<RecordPart> {
        let view = self.reader.try_read(n)?;
        let (data, offset, len) = view.into_parts();
        Ok(RecordPart::from_raw(data, offset, len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diffengine::RecordPart;
    use std::io::Cursor;
    use std::sync::Arc;

    #[test]
    fn header_round_trips() {
        let mut buf = Vec::new();
        {
            let writer = Writer::open(&mut buf, 64).unwrap();
            writer.finish().unwrap();
        }
        assert_eq!(&buf[..13], FILE_SIGNATURE);
        assert_eq!(buf[13], FILE_VERSION);

        let reader = Reader::open(Cursor::new(buf), 64).unwrap();
        assert!(!reader.eof());
    }

    #[test]
    fn rejects_bad_signature() {
        let mut bytes = b"not-diff-image".to_vec();
        bytes.push(2);
        let err = Reader::open(Cursor::new(bytes), 64).unwrap_err();
        assert!(matches!(err, FormatError::BadSignature));
    }

    #[test]
    fn rejects_bad_version() {
        let mut bytes = FILE_SIGNATURE.to_vec();
        bytes.push(99);
        let err = Reader::open(Cursor::new(bytes), 64).unwrap_err();
        assert!(matches!(err, FormatError::BadVersion));
    }

    #[test]
    fn record_uses_big_endian_header() {
        let mut buf = Vec::new();
        {
            let mut writer = Writer::open(&mut buf, 64).unwrap();
            let payload: Arc<[u8]> = Arc::from(vec![0xAAu8, 0xBB, 0xCC, 0xDD]);
            let part = RecordPart::from_raw(payload, 0, 4);
            writer.write_diff_record(0x0102030405060708, 4, &[part]).unwrap();
            writer.finish().unwrap();
        }
        let record_start = 14; // 13-byte signature + 1-byte version
        assert_eq!(
            &buf[record_start..record_start + 8],
            &[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08]
        );
        assert_eq!(&buf[record_start + 8..record_start + 12], &[0, 0, 0, 4]);
        assert_eq!(&buf[record_start + 12..record_start + 16], &[0xAA, 0xBB, 0xCC, 0xDD]);
    }

    #[test]
    fn multi_part_record_writes_parts_in_order() {
        let mut buf = Vec::new();
        {
            let mut writer = Writer::open(&mut buf, 64).unwrap();
            let a: Arc<[u8]> = Arc::from(vec![1u8, 2]);
            let b: Arc<[u8]> = Arc::from(vec![3u8, 4]);
            let parts = vec![
                RecordPart::from_raw(a, 0, 2),
                RecordPart::from_raw(b, 0, 2),
            ];
            writer.write_diff_record(0, 4, &parts).unwrap();
            writer.finish().unwrap();
        }
        let payload_start = 14 + 12;
        assert_eq!(&buf[payload_start..payload_start + 4], &[1, 2, 3, 4]);
    }

    #[test]
    fn reads_offset_size_and_payload_back() {
        let mut buf = Vec::new();
        {
            let mut writer = Writer::open(&mut buf, 64).unwrap();
            let payload: Arc<[u8]> = Arc::from(vec![9u8, 8, 7]);
            let part = RecordPart::from_raw(payload, 0, 3);
            writer.write_diff_record(42, 3, &[part]).unwrap();
            writer.finish().unwrap();
        }
        let mut reader = Reader::open(Cursor::new(buf), 64).unwrap();
        let offset = reader.read_offset().unwrap();
        assert_eq!(offset, 42);
        let size = reader.read_size().unwrap();
        assert_eq!(size, 3);
        let part = reader.read_record_data(size as usize).unwrap();
        assert_eq!(part.as_slice(), &[9, 8, 7]);
        assert!(!reader.eof());

        // No more records: reading the next offset hits clean EOF.
        let _ = reader.read_offset().unwrap();
        assert!(reader.eof());
    }
}
