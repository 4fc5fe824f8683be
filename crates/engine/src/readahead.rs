//! crates/engine/src/readahead.rs
//!
//! Sliding input buffer with absolute-position tracking.

use std::io::{self, Read};

/// Bounded readahead over the encoder's input stream.
///
/// The buffer holds a contiguous run of not-yet-encoded input. `cursor`
/// marks the scan position within it and `abspos` the absolute input offset
/// of the buffer's first byte, so `abspos + cursor` is the absolute offset
/// being scanned. Capacity is twice the block length: after a
/// [`slide`](Self::slide) drops consumed bytes, fewer than one block
/// remains, leaving room for [`fill`](Self::fill) to bring in at least a
/// full block whenever the source has one.
#[derive(Debug)]
pub(crate) struct ReadaheadBuffer {
    buf: Vec<u8>,
    amount: usize,
    cursor: usize,
    abspos: u64,
}

impl ReadaheadBuffer {
    pub(crate) fn new(block_length: usize) -> Self {
        Self {
            buf: vec![0u8; block_length * 2],
            amount: 0,
            cursor: 0,
            abspos: 0,
        }
    }

    /// Reads from `source` into the free tail of the buffer.
    ///
    /// Keeps reading until the buffer is full or the source reports end of
    /// stream; a zero return therefore means the source is exhausted for
    /// this call.
    pub(crate) fn fill<R: Read>(&mut self, source: &mut R) -> io::Result<usize> {
        let mut total = 0;

        while self.amount < self.buf.len() {
            match source.read(&mut self.buf[self.amount..]) {
                Ok(0) => break,
                Ok(read) => {
                    self.amount += read;
                    total += read;
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }

        Ok(total)
    }

    /// Drops the consumed prefix, moving unread bytes to the front.
    pub(crate) fn slide(&mut self) {
        self.buf.copy_within(self.cursor..self.amount, 0);
        self.abspos += self.cursor as u64;
        self.amount -= self.cursor;
        self.cursor = 0;
    }

    /// Returns the number of unread bytes at the cursor.
    pub(crate) fn remaining(&self) -> usize {
        self.amount - self.cursor
    }

    /// Returns the absolute input offset of the cursor.
    pub(crate) fn abs_cursor(&self) -> u64 {
        self.abspos + self.cursor as u64
    }

    /// Returns the `len` unread bytes starting at the cursor.
    pub(crate) fn window(&self, len: usize) -> &[u8] {
        &self.buf[self.cursor..self.cursor + len]
    }

    /// Advances the cursor over `len` consumed bytes.
    pub(crate) fn advance(&mut self, len: usize) {
        debug_assert!(len <= self.remaining());
        self.cursor += len;
    }
}
