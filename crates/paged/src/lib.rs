//! Reads a byte stream as a sequence of fixed-size, zero-copy pages.
//!
//! A [`Page`] is a thin window (stream offset range + a slice) into one of
//! the underlying [`stream_io::Reader`]'s rotating buffers. Two pages can be
//! alive at once (the diff engine keeps the "current" and "next" page side
//! by side while looking for a diff boundary), which is exactly why the
//! reader underneath is configured with two buffer slots.

use std::io::Read;
use std::sync::Arc;

use common::BufferSize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PagedError {
    #[error(transparent)]
    StreamIo(#[from] stream_io::StreamIoError),
}

pub type PagedResult<T> = Result<T, PagedError>;

/// A window into a page-sized chunk of the stream, `[start, end)`.
///
/// Cheap to clone: it shares the backing buffer via `Arc`, it does not copy
/// bytes.
#[derive(Debug, Clone)]
pub struct Page {
    data: Arc<[u8]>,
    data_offset: usize,
    start: u64,
    end: u64,
}

impl Page {
    /// An empty, bufferless page signalling end-of-stream at `pos`.
    pub fn empty_at(pos: u64) -> Self {
        Page {
            data: Arc::from([]),
            data_offset: 0,
            start: pos,
            end: pos,
        }
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn size(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn as_slice(&self) -> &[u8] {
        let len = (self.end - self.start) as usize;
        &self.data[self.data_offset..self.data_offset + len]
    }

    /// Byte at stream offset `pos`, which must fall within `[start, end)`.
    pub fn byte_at(&self, pos: u64) -> u8 {
        debug_assert!(pos >= self.start && pos < self.end);
        self.as_slice()[(pos - self.start) as usize]
    }

    /// Shares `len` bytes starting `rel_offset` bytes into this page's
    /// range, as a clone of the backing `Arc` plus an offset/length pair.
    /// Lets callers outside this crate (the diff engine) build their own
    /// zero-copy views without reaching into private fields.
    pub fn slice_parts(&self, rel_offset: usize, len: usize) -> (Arc<[u8]>, usize, usize) {
        debug_assert!(rel_offset + len <= (self.end - self.start) as usize);
        (Arc::clone(&self.data), self.data_offset + rel_offset, len)
    }
}

impl PartialEq for Page {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start
            && self.end == other.end
            && Arc::ptr_eq(&self.data, &other.data)
            && self.data_offset == other.data_offset
    }
}

/// Reads a byte stream page by page, `page_size` bytes at a time.
///
/// The final page of a stream may be shorter than `page_size`; the page
/// after that is empty ([`Page::is_empty`]) and marks end of stream.
pub struct PagedStreamReader<R: Read> {
    reader: stream_io::Reader<R>,
    page_size: usize,
    offset: u64,
}

impl<R: Read> PagedStreamReader<R> {
    pub fn new(inner: R, page_size: BufferSize) -> PagedResult<Self> {
        let reader = stream_io::Reader::new(inner, page_size.as_usize(), 2)?;
        Ok(PagedStreamReader {
            reader,
            page_size: page_size.as_usize(),
            offset: 0,
        })
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Returns the next page. An empty page signals end of stream; callers
    /// should stop calling once they see one.
    pub fn get_next_page(&mut self) -> PagedResult<Page> {
        let view = self.reader.try_read(self.page_size)?;
        let start = self.offset;
        let end = start + view.len() as u64;
        self.offset = end;
        let (data, data_offset, _len) = view.into_parts();
        Ok(Page {
            data,
            data_offset,
            start,
            end,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn page_size(n: u32) -> BufferSize {
        BufferSize::new(n).unwrap()
    }

    #[test]
    fn splits_stream_into_equal_pages() {
        let data: Vec<u8> = (0u8..20).collect();
        let mut reader = PagedStreamReader::new(Cursor::new(data.clone()), page_size(8)).unwrap();

        let p0 = reader.get_next_page().unwrap();
        assert_eq!((p0.start(), p0.end()), (0, 8));
        assert_eq!(p0.as_slice(), &data[0..8]);

        let p1 = reader.get_next_page().unwrap();
        assert_eq!((p1.start(), p1.end()), (8, 16));

        let p2 = reader.get_next_page().unwrap();
        assert_eq!((p2.start(), p2.end()), (16, 20));
        assert!(!p2.is_empty());

        let p3 = reader.get_next_page().unwrap();
        assert!(p3.is_empty());
    }

    #[test]
    fn empty_stream_yields_empty_first_page() {
        let mut reader = PagedStreamReader::new(Cursor::new(Vec::<u8>::new()), page_size(4)).unwrap();
        let p0 = reader.get_next_page().unwrap();
        assert!(p0.is_empty());
        assert_eq!(p0.start(), 0);
    }

    #[test]
    fn two_live_pages_share_nothing_once_both_filled() {
        let data: Vec<u8> = (0u8..32).collect();
        let mut reader = PagedStreamReader::new(Cursor::new(data), page_size(8)).unwrap();
        let first = reader.get_next_page().unwrap();
        let second = reader.get_next_page().unwrap();
        assert_ne!(first.as_slice(), second.as_slice());
        assert_eq!(first.start(), 0);
        assert_eq!(second.start(), 8);
    }
}
