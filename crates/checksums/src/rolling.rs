//! crates/checksums/src/rolling.rs
//!
//! Rolling weak checksum over a sliding window of input bytes.

/// Bias folded into every byte before it enters the accumulators.
///
/// Signature construction and encoding must agree on this value; a mismatch
/// makes every weak probe miss and degrades the delta to pure literals.
pub const CHAR_OFFSET: u32 = 31;

/// Adler-style rolling checksum over the encoder's current window.
///
/// The first component (`s1`) accumulates the biased byte sum and the second
/// (`s2`) the sum of the running prefix sums. Both are truncated to 16 bits
/// after every operation; the packed 32-bit [`value`](Self::value) is what
/// signature records carry on the wire.
///
/// The checksum tracks its own window length so that the front byte can be
/// rotated out of a short trailing window as correctly as out of a full
/// block: removing the front byte of an `n`-byte window subtracts `n` times
/// its biased value from `s2`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RollingChecksum {
    s1: u32,
    s2: u32,
    len: usize,
}

impl RollingChecksum {
    /// Creates a new rolling checksum with zeroed state.
    #[must_use]
    pub const fn new() -> Self {
        Self { s1: 0, s2: 0, len: 0 }
    }

    /// Resets the checksum back to its initial state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Returns the number of bytes in the current window.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no bytes have been observed since the last reset.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Extends the window at the back with an additional slice of bytes.
    #[inline]
    pub fn update(&mut self, chunk: &[u8]) {
        let mut s1 = self.s1;
        let mut s2 = self.s2;

        // Wrapping additions are exact here: truncation to 16 bits commutes
        // with reduction modulo 2^32, so one mask at the end suffices.
        for &byte in chunk {
            s1 = s1.wrapping_add(u32::from(byte).wrapping_add(CHAR_OFFSET));
            s2 = s2.wrapping_add(s1);
        }

        self.s1 = s1 & 0xffff;
        self.s2 = s2 & 0xffff;
        self.len += chunk.len();
    }

    /// Recomputes the checksum from scratch over a fresh block.
    ///
    /// Equivalent to [`reset`](Self::reset) followed by
    /// [`update`](Self::update); used whenever the previous rolling state was
    /// invalidated, for example after the encoder skipped over a matched
    /// block.
    pub fn update_from_block(&mut self, block: &[u8]) {
        self.reset();
        self.update(block);
    }

    /// Grows the window by one byte at the back.
    #[inline]
    pub fn rotate_in(&mut self, incoming: u8) {
        let inn = u32::from(incoming).wrapping_add(CHAR_OFFSET);
        self.s1 = self.s1.wrapping_add(inn) & 0xffff;
        self.s2 = self.s2.wrapping_add(self.s1) & 0xffff;
        self.len += 1;
    }

    /// Drops the leading byte from the front of the window.
    ///
    /// The window must be non-empty, and `outgoing` must be the byte that
    /// currently leads it.
    #[inline]
    pub fn rotate_out(&mut self, outgoing: u8) {
        debug_assert!(self.len > 0, "cannot rotate a byte out of an empty window");
        let out = u32::from(outgoing).wrapping_add(CHAR_OFFSET);
        self.s1 = self.s1.wrapping_sub(out) & 0xffff;
        self.s2 = self.s2.wrapping_sub((self.len as u32).wrapping_mul(out)) & 0xffff;
        self.len -= 1;
    }

    /// Returns the checksum in its packed 32-bit wire representation.
    #[must_use]
    pub const fn value(&self) -> u32 {
        (self.s2 << 16) | (self.s1 & 0xffff)
    }
}
