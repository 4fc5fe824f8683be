//! crates/engine/src/newsig.rs
//!
//! Deferred signature of the stream being encoded.

use signature::{STRONG_SUM_LENGTH, SignatureBlock};

/// Collects signature records for the new stream as the scan passes block
/// boundaries.
///
/// Records arrive in input order, one per visited offset that is a multiple
/// of the block length, and leave the encoder as a single signature command
/// once the input is exhausted.
#[derive(Debug, Default)]
pub(crate) struct NewSigEmitter {
    blocks: Vec<SignatureBlock>,
}

impl NewSigEmitter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, weak: u32, strong: [u8; STRONG_SUM_LENGTH]) {
        self.blocks.push(SignatureBlock::new(weak, strong));
    }

    pub(crate) fn blocks(&self) -> &[SignatureBlock] {
        &self.blocks
    }
}
