//! crates/signature/src/index.rs
//!
//! Weak-keyed lookup over a signature's records.

use std::collections::HashMap;
use std::num::NonZeroU32;

use checksums::strong::Md4;

use crate::block::SignatureBlock;
use crate::file::FileSignature;

/// Immutable probe index over a file signature.
///
/// Built once from a parsed [`FileSignature`] and queried for every
/// candidate window the encoder scans. The weak sum narrows the search to a
/// handful of records in expected constant time; the strong sum confirms or
/// rejects each of them.
#[derive(Clone, Debug)]
pub struct SignatureIndex {
    block_length: NonZeroU32,
    blocks: Vec<SignatureBlock>,
    lookup: HashMap<u32, Vec<usize>>,
}

impl SignatureIndex {
    /// Builds the index from a parsed signature.
    #[must_use]
    pub fn from_signature(signature: FileSignature) -> Self {
        let block_length = signature.block_length();
        let blocks = signature.into_blocks();

        let mut lookup: HashMap<u32, Vec<usize>> = HashMap::new();
        for (index, block) in blocks.iter().enumerate() {
            lookup.entry(block.weak()).or_default().push(index);
        }

        Self {
            block_length,
            blocks,
            lookup,
        }
    }

    /// Returns the block length the signature was computed with.
    #[must_use]
    pub const fn block_length(&self) -> NonZeroU32 {
        self.block_length
    }

    /// Returns the number of records in the index.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Returns `true` when the signature carried no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Looks up the block matching a scanned window.
    ///
    /// `weak` must be the rolling checksum of `window`, which may be
    /// shorter than one block when the encoder scans a trailing tail. The
    /// strong sum is only computed when at least one record shares the weak
    /// sum. Among several confirming records the lowest block index wins,
    /// keeping the emitted copy offsets deterministic.
    #[must_use]
    pub fn find_match(&self, weak: u32, window: &[u8]) -> Option<usize> {
        debug_assert!(window.len() <= self.block_length.get() as usize);

        let candidates = self.lookup.get(&weak)?;
        let strong = Md4::digest(window);
        candidates
            .iter()
            .copied()
            .find(|&index| self.blocks[index].strong() == &strong)
    }
}
