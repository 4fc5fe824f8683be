//! crates/engine/src/encoder.rs
//!
//! The streaming encode loop.

use std::io::{Read, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, trace};

use checksums::RollingChecksum;
use checksums::strong::Md4;
use signature::{FileSignature, SignatureIndex};

use crate::emitter::CommandEmitter;
use crate::error::EncodeError;
use crate::literal::LiteralBuffer;
use crate::newsig::NewSigEmitter;
use crate::readahead::ReadaheadBuffer;
use crate::stats::EncodeStats;

/// Configurable front end to [`encode`].
///
/// The only knob today is cooperative cancellation; everything else about
/// an encode is determined by the signature stream it is given.
#[derive(Clone, Debug, Default)]
pub struct Encoder {
    cancel: Option<Arc<AtomicBool>>,
}

impl Encoder {
    /// Creates an encoder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a flag polled between input refills.
    ///
    /// Setting the flag makes the encode return [`EncodeError::Cancelled`]
    /// at its next refill. Output already written to the sink stays
    /// written; a cancelled delta is invalid and must be discarded by the
    /// caller.
    #[must_use]
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_deref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Encodes `input` against `signature`, writing the delta to `sink`.
    ///
    /// The signature stream is loaded in full before the first byte of
    /// output, so a rejected signature leaves the sink untouched. The input
    /// is then folded in one forward pass: each scan position either
    /// extends the pending literal run by one byte or, when the signature
    /// index confirms a block match, flushes that run and emits a copy. At
    /// every input offset that is a multiple of the block length the
    /// current window's checksums are recorded, and the collected records
    /// are emitted as a single signature command between the final data
    /// command and the eof record.
    ///
    /// Returns counters describing the produced delta.
    ///
    /// # Errors
    ///
    /// - [`EncodeError::Signature`] when the signature stream is
    ///   unsupported, truncated, or malformed.
    /// - [`EncodeError::Source`] / [`EncodeError::Sink`] when a stream
    ///   callback fails.
    /// - [`EncodeError::Cancelled`] when the installed cancel flag is
    ///   observed.
    ///
    /// On any error the delta written so far is unusable.
    pub fn encode<R, S, W>(
        &self,
        mut input: R,
        signature: S,
        sink: W,
    ) -> Result<EncodeStats, EncodeError>
    where
        R: Read,
        S: Read,
        W: Write,
    {
        let signature = FileSignature::read_from(signature)?;
        let index = SignatureIndex::from_signature(signature);
        let block_length = index.block_length().get() as usize;
        debug!(
            block_length,
            basis_blocks = index.block_count(),
            "loaded signature index"
        );

        let mut emitter = CommandEmitter::new(sink);
        emitter.write_header().map_err(EncodeError::Sink)?;

        let mut inbuf = ReadaheadBuffer::new(block_length);
        let mut literal = LiteralBuffer::new();
        let mut newsig = NewSigEmitter::new();
        let mut weak = RollingChecksum::new();
        let mut have_sum = false;

        loop {
            if self.is_cancelled() {
                return Err(EncodeError::Cancelled);
            }

            let read = inbuf.fill(&mut input).map_err(EncodeError::Source)?;
            let at_eof = read == 0;

            // At end of input every position is scanned down to the last
            // byte; before that, scanning stops while less than a full
            // block of readahead remains.
            loop {
                let scannable = if at_eof {
                    inbuf.remaining() > 0
                } else {
                    inbuf.remaining() >= block_length
                };
                if !scannable {
                    break;
                }
                let this_len = block_length.min(inbuf.remaining());

                if !have_sum {
                    weak.update_from_block(inbuf.window(this_len));
                    have_sum = true;
                    trace!(
                        weak = weak.value(),
                        offset = inbuf.abs_cursor(),
                        "seeded weak checksum"
                    );
                } else if weak.len() < this_len {
                    // The previous step rotated the departing byte out;
                    // rotating in the byte entering at the back completes
                    // the slide. In the shrinking end-of-input tail no byte
                    // enters and the sum already covers the window.
                    weak.rotate_in(inbuf.window(this_len)[this_len - 1]);
                }
                debug_assert_eq!(weak.len(), this_len);

                if inbuf.abs_cursor() % block_length as u64 == 0 {
                    newsig.push(weak.value(), Md4::digest(inbuf.window(this_len)));
                }

                if let Some(block) = index.find_match(weak.value(), inbuf.window(this_len)) {
                    let offset = block as u64 * block_length as u64;
                    trace!(block, offset, len = this_len, "matched basis block");

                    flush_literal(&mut emitter, &mut literal)?;
                    emitter
                        .emit_copy(offset, this_len)
                        .map_err(EncodeError::Sink)?;
                    inbuf.advance(this_len);

                    // The skipped block invalidates the rolling state; the
                    // next scan position reseeds from scratch.
                    weak.reset();
                    have_sum = false;
                } else {
                    let byte = inbuf.window(1)[0];
                    literal.push(byte);
                    weak.rotate_out(byte);
                    inbuf.advance(1);
                }
            }

            if at_eof {
                break;
            }
            inbuf.slide();
        }

        flush_literal(&mut emitter, &mut literal)?;
        emitter
            .emit_signature(newsig.blocks())
            .map_err(EncodeError::Sink)?;
        emitter.emit_eof().map_err(EncodeError::Sink)?;

        let stats = emitter.stats();
        debug!(
            lit_cmds = stats.lit_cmds,
            lit_bytes = stats.lit_bytes,
            sig_cmds = stats.sig_cmds,
            sig_bytes = stats.sig_bytes,
            copy_cmds = stats.copy_cmds,
            copy_bytes = stats.copy_bytes,
            "delta encoding complete"
        );
        Ok(stats)
    }
}

/// Encodes `input` against `signature` with default settings.
///
/// See [`Encoder::encode`] for the full contract.
///
/// # Errors
///
/// As for [`Encoder::encode`].
pub fn encode<R, S, W>(input: R, signature: S, sink: W) -> Result<EncodeStats, EncodeError>
where
    R: Read,
    S: Read,
    W: Write,
{
    Encoder::new().encode(input, signature, sink)
}

fn flush_literal<W: Write>(
    emitter: &mut CommandEmitter<W>,
    literal: &mut LiteralBuffer,
) -> Result<(), EncodeError> {
    if literal.is_empty() {
        return Ok(());
    }
    emitter
        .emit_literal(literal.bytes())
        .map_err(EncodeError::Sink)?;
    literal.clear();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;
    use std::num::NonZeroU32;

    use signature::write_signature;

    fn sign(data: &[u8], block_length: u32) -> Vec<u8> {
        let mut stream = Vec::new();
        write_signature(
            Cursor::new(data.to_vec()),
            &mut stream,
            NonZeroU32::new(block_length).expect("block length"),
        )
        .expect("sign");
        stream
    }

    #[test]
    fn identical_input_encodes_to_pure_copies() {
        let data = b"abcdefgh";
        let mut delta = Vec::new();
        let stats = encode(
            Cursor::new(data.to_vec()),
            Cursor::new(sign(data, 4)),
            &mut delta,
        )
        .expect("encode");

        assert_eq!(stats.lit_bytes, 0);
        assert_eq!(stats.copy_cmds, 2);
        assert_eq!(stats.copy_bytes, 8);
    }

    #[test]
    fn checksum_reseeds_after_each_copy() {
        // Alternating matched and unmatched blocks force the rolling state
        // through the copy -> reseed -> copy transition repeatedly.
        let basis = b"aaaabbbb";
        let input = b"aaaaXXXXbbbbYYYY";
        let mut delta = Vec::new();
        let stats = encode(
            Cursor::new(input.to_vec()),
            Cursor::new(sign(basis, 4)),
            &mut delta,
        )
        .expect("encode");

        assert_eq!(stats.copy_cmds, 2);
        assert_eq!(stats.copy_bytes, 8);
        assert_eq!(stats.lit_bytes, 8);
    }

    #[test]
    fn signature_records_follow_copy_jumps() {
        // A copy advances the cursor by a whole block; the positions it
        // lands on are still block-aligned and must keep producing records.
        let data = b"abcdefgh";
        let mut delta = Vec::new();
        let stats = encode(
            Cursor::new(data.to_vec()),
            Cursor::new(sign(data, 4)),
            &mut delta,
        )
        .expect("encode");

        assert_eq!(stats.sig_cmds, 1);
        // Two blocks scanned, two records of 20 bytes each.
        assert_eq!(stats.sig_bytes, 40);
    }

    #[test]
    fn cancellation_is_observed_before_reading_input() {
        let flag = Arc::new(AtomicBool::new(true));
        let encoder = Encoder::new().with_cancel_flag(Arc::clone(&flag));

        let mut delta = Vec::new();
        let err = encoder
            .encode(
                Cursor::new(b"payload".to_vec()),
                Cursor::new(sign(b"", 4)),
                &mut delta,
            )
            .expect_err("cancelled");
        assert!(matches!(err, EncodeError::Cancelled));
    }

    #[test]
    fn input_larger_than_readahead_is_fully_consumed() {
        // Force many fill/slide cycles with a block length much smaller
        // than the input.
        let data: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
        let mut delta = Vec::new();
        let stats = encode(
            Cursor::new(data.clone()),
            Cursor::new(sign(&data, 16)),
            &mut delta,
        )
        .expect("encode");

        assert_eq!(stats.lit_bytes + stats.copy_bytes, data.len() as u64);
        assert_eq!(stats.lit_bytes, 0);
    }
}
