use std::io::Read;
use std::sync::Arc;

use log::trace;

use crate::error::{StreamIoError, StreamIoResult};
use crate::view::View;

/// A single round-robin buffer slot.
struct Slot {
    data: Arc<[u8]>,
    /// Number of valid bytes at the front of `data`. Zero means the
    /// underlying stream hit EOF the last time this slot was filled.
    filled: usize,
    /// Read cursor within `data[..filled]`.
    offset: usize,
}

impl Slot {
    fn new(capacity: usize) -> Self {
        Slot {
            data: Arc::from(vec![0u8; capacity].into_boxed_slice()),
            filled: 0,
            offset: capacity,
        }
    }

    fn remaining(&self) -> usize {
        self.filled - self.offset
    }
}

/// Buffered, retry-bounded reader over an arbitrary byte stream.
///
/// Holds `buffer_count` rotating buffers of `capacity` bytes each. A
/// `buffer_count` of 1 behaves like a conventional single-buffer reader; the
/// paged reader asks for 2 so that a page it has already handed out (via
/// [`Reader::try_read`]) keeps its backing storage alive while the next page
/// is being filled into the other slot.
pub struct Reader<R> {
    inner: R,
    capacity: usize,
    slots: Vec<Slot>,
    current: usize,
}

impl<R: Read> Reader<R> {
    pub fn new(inner: R, capacity: usize, buffer_count: usize) -> StreamIoResult<Self> {
        if capacity == 0 {
            return Err(StreamIoError::Alloc(capacity));
        }
        let buffer_count = buffer_count.max(1);
        let slots = (0..buffer_count).map(|_| Slot::new(capacity)).collect();
        let mut reader = Reader {
            inner,
            capacity,
            slots,
            current: buffer_count - 1,
        };
        reader.refill_next_buffer()?;
        Ok(reader)
    }

    /// Rotates to the next slot and fills it with (at most) one underlying
    /// read call. Does nothing once a slot has already come back empty,
    /// since that is how EOF is recorded.
    fn refill_next_buffer(&mut self) -> StreamIoResult<()> {
        if self.slots[self.current].filled == 0 && self.slots[self.current].offset == 0 {
            // The previous refill already hit EOF; stay put.
            return Ok(());
        }
        let next = (self.current + 1) % self.slots.len();
        let slot = &mut self.slots[next];
        let buf = Arc::get_mut(&mut slot.data).expect(
            "buffered reader slot still has an outstanding view; caller held a View too long",
        );
        let n = self.inner.read(buf)?;
        trace!("refilled buffer slot {} with {} bytes", next, n);
        slot.filled = n;
        slot.offset = 0;
        self.current = next;
        Ok(())
    }

    fn read_current(&mut self, n: usize) -> View {
        let slot = &mut self.slots[self.current];
        let size = n.min(slot.remaining());
        let view = View::new(Arc::clone(&slot.data), slot.offset, size);
        slot.offset += size;
        view
    }

    /// Returns a zero-copy view of up to `n` bytes from the reader's current
    /// buffer. May be shorter than `n` even before EOF: it never crosses a
    /// buffer boundary, and never performs more than one underlying read.
    pub fn try_read(&mut self, n: usize) -> StreamIoResult<View> {
        if n == 0 {
            return Ok(View::empty());
        }
        if self.slots[self.current].remaining() == 0 {
            self.refill_next_buffer()?;
            if self.slots[self.current].filled == 0 {
                return Ok(View::empty());
            }
        }
        Ok(self.read_current(n))
    }

    /// Copies up to `dst.len()` bytes into `dst`, returning the actual count.
    /// Returns `0` iff end-of-stream is reached; retries internally at most
    /// once after a zero-yielding underlying read before declaring EOF.
    pub fn read(&mut self, dst: &mut [u8]) -> StreamIoResult<usize> {
        let mut done = 0;
        let mut retries = 0;
        while done < dst.len() && retries < 2 {
            let view = self.try_read(dst.len() - done)?;
            if view.is_empty() {
                retries += 1;
                continue;
            }
            retries = 0;
            let len = view.len();
            dst[done..done + len].copy_from_slice(view.as_slice());
            done += len;
        }
        Ok(done)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_full_buffer_in_one_go() {
        let data = b"hello world".to_vec();
        let mut reader = Reader::new(Cursor::new(data.clone()), 64, 1).unwrap();
        let mut out = vec![0u8; data.len()];
        let n = reader.read(&mut out).unwrap();
        assert_eq!(n, data.len());
        assert_eq!(out, data);
    }

    #[test]
    fn reports_clean_eof_as_zero() {
        let mut reader = Reader::new(Cursor::new(b"hi".to_vec()), 64, 1).unwrap();
        let mut out = [0u8; 2];
        assert_eq!(reader.read(&mut out).unwrap(), 2);
        let mut out2 = [0u8; 8];
        assert_eq!(reader.read(&mut out2).unwrap(), 0);
    }

    #[test]
    fn small_capacity_spans_multiple_refills() {
        let data: Vec<u8> = (0u8..=255).collect();
        let mut reader = Reader::new(Cursor::new(data.clone()), 8, 1).unwrap();
        let mut out = vec![0u8; data.len()];
        let mut total = 0;
        loop {
            let n = reader.read(&mut out[total..]).unwrap();
            if n == 0 {
                break;
            }
            total += n;
        }
        assert_eq!(total, data.len());
        assert_eq!(out, data);
    }

    #[test]
    fn try_read_gives_zero_copy_view_into_same_buffer() {
        let data = b"abcdefgh".to_vec();
        let mut reader = Reader::new(Cursor::new(data), 8, 1).unwrap();
        let view1 = reader.try_read(4).unwrap();
        assert_eq!(view1.as_slice(), b"abcd");
        let view2 = reader.try_read(4).unwrap();
        assert_eq!(view2.as_slice(), b"efgh");
    }

    #[test]
    #[should_panic(expected = "outstanding view")]
    fn refill_panics_if_view_outlives_rotation() {
        // buffer_count = 2: holding a view from slot 0 across two refills
        // (back to slot 0) must panic, matching the use_count() assertion
        // in the original buffered stream implementation.
        let data = vec![0u8; 64];
        let mut reader = Reader::new(Cursor::new(data), 8, 2).unwrap();
        let held = reader.try_read(8).unwrap();
        let _ = reader.try_read(8).unwrap(); // fills slot 1, fine
        drop(reader.try_read(8)); // rotates back to slot 0, held still alive -> panic
        let _ = held;
    }
}
