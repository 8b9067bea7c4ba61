use std::sync::Arc;

use paged::Page;

/// A contiguous, as-yet-unserialized byte range of the new stream that
/// differs from the base stream, plus the page(s) that back it.
///
/// A non-empty `Diff` holds either one page (the common case) or two
/// adjacent pages (when coalescing stitched a diff across a page boundary).
#[derive(Debug, Clone, PartialEq)]
pub struct Diff {
    pub(crate) pages: [Option<Page>; 2],
    pub(crate) start: u64,
    pub(crate) end: u64,
}

/// One contiguous slice of a [`Diff`]'s payload, still backed by the
/// originating page's buffer rather than copied out.
#[derive(Debug, Clone)]
pub struct RecordPart {
    data: Arc<[u8]>,
    offset: usize,
    len: usize,
}

impl RecordPart {
    /// Builds a part directly from a shared buffer, an offset into it, and
    /// a length. Used by the format codec's reader, which hands back
    /// views from its own underlying buffer rather than a `Page`.
    pub fn from_raw(data: Arc<[u8]>, offset: usize, len: usize) -> Self {
        RecordPart { data, offset, len }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data[self.offset..self.offset + self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Diff {
    pub fn empty_at(pos: u64) -> Self {
        Diff {
            pages: [None, None],
            start: pos,
            end: pos,
        }
    }

    pub(crate) fn single_page(page: Page, start: u64, end: u64) -> Self {
        Diff {
            pages: [Some(page), None],
            start,
            end,
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

    /// The diff's bytes, split across however many pages back them.
    pub fn get_data(&self) -> Vec<RecordPart> {
        let mut parts = Vec::with_capacity(2);
        for page in self.pages.iter().flatten() {
            let lo = self.start.max(page.start());
            let hi = self.end.min(page.end());
            if lo < hi {
                let page_start_index = (lo - page.start()) as usize;
                let len = (hi - lo) as usize;
                let (data, offset, len) = page.slice_parts(page_start_index, len);
                parts.push(RecordPart { data, offset, len });
            }
        }
        parts
    }
}
