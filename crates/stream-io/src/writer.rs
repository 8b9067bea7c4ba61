use std::io::Write;
use std::mem;

use log::{error, trace};

use crate::error::StreamIoResult;

/// Buffered writer with the "flush or go direct" policy from the original
/// backup tool: small writes accumulate in a buffer, a write that would
/// overflow it flushes first, and a write bigger than the whole buffer goes
/// straight to the underlying stream instead of being copied twice.
pub struct Writer<W: Write> {
    inner: W,
    buffer: Vec<u8>,
    capacity: usize,
}

impl<W: Write> Writer<W> {
    pub fn new(inner: W, capacity: usize) -> Self {
        Writer {
            inner,
            buffer: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn write(&mut self, data: &[u8]) -> StreamIoResult<()> {
        let free = self.capacity - self.buffer.len();
        if data.len() <= free {
            self.buffer.extend_from_slice(data);
            return Ok(());
        }
        self.flush_buffer()?;
        if data.len() <= self.capacity {
            self.buffer.extend_from_slice(data);
        } else {
            self.write_stream(data)?;
        }
        Ok(())
    }

    fn flush_buffer(&mut self) -> StreamIoResult<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let pending = mem::take(&mut self.buffer);
        let result = self.inner.write_all(&pending);
        // Keep the capacity we just gave up by taking the Vec.
        self.buffer = Vec::with_capacity(self.capacity);
        result?;
        Ok(())
    }

    fn write_stream(&mut self, data: &[u8]) -> StreamIoResult<()> {
        self.inner.write_all(data)?;
        Ok(())
    }

    /// Flushes any remaining buffered bytes and surfaces the first I/O
    /// error, if any. Prefer this over relying on `Drop` when the caller
    /// can still propagate an error.
    pub fn finish(mut self) -> StreamIoResult<()> {
        let result = self.flush_buffer();
        trace!("writer finished, {} bytes were pending", self.buffer.len());
        result
    }
}

impl<W: Write> Drop for Writer<W> {
    fn drop(&mut self) {
        if let Err(err) = self.flush_buffer() {
            error!("buffered writer lost {} bytes on drop: {err}", self.buffer.len());
        }
    }
}
