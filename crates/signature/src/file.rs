//! crates/signature/src/file.rs
//!
//! Parsing a signature stream into its header and records.

use std::io::Read;
use std::num::NonZeroU32;

use protocol::{SIG_MAGIC, read_u32, read_u32_or_eof};

use crate::block::SignatureBlock;
use crate::error::SignatureError;
use crate::STRONG_SUM_LENGTH;

/// A parsed signature: the block length it was computed with and one record
/// per block of the signed file.
///
/// The record list may be empty; an empty file signs to a bare header, and
/// an encoder probing such a signature simply never finds a match.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileSignature {
    block_length: NonZeroU32,
    blocks: Vec<SignatureBlock>,
}

impl FileSignature {
    /// Parses a complete signature stream.
    ///
    /// Consumes the reader to end of stream; records after the header are
    /// expected to tile it exactly.
    ///
    /// # Errors
    ///
    /// - [`SignatureError::UnsupportedVersion`] when the magic differs from
    ///   [`SIG_MAGIC`].
    /// - [`SignatureError::Truncated`] when the stream ends inside a header
    ///   field.
    /// - [`SignatureError::InvalidBlockLength`] when the advertised block
    ///   length is zero or negative.
    /// - [`SignatureError::Malformed`] when the stream ends part-way
    ///   through a record.
    /// - [`SignatureError::Io`] for any other reader failure.
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self, SignatureError> {
        let found =
            read_u32(&mut reader).map_err(|err| SignatureError::from_header_io(err, "magic"))?;
        if found != SIG_MAGIC {
            return Err(SignatureError::UnsupportedVersion {
                found,
                expected: SIG_MAGIC,
            });
        }

        let raw = read_u32(&mut reader)
            .map_err(|err| SignatureError::from_header_io(err, "block length"))?
            as i32;
        let block_length = u32::try_from(raw)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or(SignatureError::InvalidBlockLength {
                value: i64::from(raw),
            })?;

        let blocks = read_records(&mut reader)?;

        Ok(Self {
            block_length,
            blocks,
        })
    }

    /// Returns the block length the signature was computed with.
    #[must_use]
    pub const fn block_length(&self) -> NonZeroU32 {
        self.block_length
    }

    /// Returns the signature records in file order.
    #[must_use]
    pub fn blocks(&self) -> &[SignatureBlock] {
        &self.blocks
    }

    /// Consumes the signature and returns its records.
    #[must_use]
    pub fn into_blocks(self) -> Vec<SignatureBlock> {
        self.blocks
    }
}

/// Reads bare `(weak, strong)` records until end of stream.
///
/// This is the headerless record layout shared by the signature stream body
/// and the signature payload embedded in a delta stream.
///
/// # Errors
///
/// Returns [`SignatureError::Malformed`] when the stream ends part-way
/// through a record and [`SignatureError::Io`] for any other reader
/// failure.
pub fn read_records<R: Read>(mut reader: R) -> Result<Vec<SignatureBlock>, SignatureError> {
    let mut blocks = Vec::new();

    while let Some(weak) =
        read_u32_or_eof(&mut reader).map_err(SignatureError::from_record_io)?
    {
        let mut strong = [0u8; STRONG_SUM_LENGTH];
        reader
            .read_exact(&mut strong)
            .map_err(SignatureError::from_record_io)?;
        blocks.push(SignatureBlock::new(weak, strong));
    }

    Ok(blocks)
}
