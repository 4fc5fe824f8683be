//! crates/signature/src/writer.rs
//!
//! Producing signature streams and bare records.

use std::io::{self, Read, Write};
use std::num::NonZeroU32;

use checksums::RollingChecksum;
use checksums::strong::Md4;
use protocol::{SIG_MAGIC, write_u32};

use crate::block::SignatureBlock;

/// Writes one bare `(weak, strong)` record.
///
/// This is the record layout shared by the signature stream body and the
/// signature payload embedded in a delta stream.
///
/// # Errors
///
/// Propagates any error reported by the underlying writer.
pub fn write_record<W: Write + ?Sized>(
    writer: &mut W,
    block: &SignatureBlock,
) -> io::Result<()> {
    write_u32(writer, block.weak())?;
    writer.write_all(block.strong())
}

/// Incremental producer of a headed signature stream.
///
/// Construction writes the header; each [`push`](Self::push) appends one
/// record. Dropping the writer finishes the stream, since the record list
/// is delimited by end of stream rather than by a count.
#[derive(Debug)]
pub struct SignatureWriter<W> {
    writer: W,
}

impl<W: Write> SignatureWriter<W> {
    /// Starts a signature stream by writing its header.
    ///
    /// # Errors
    ///
    /// Returns [`io::ErrorKind::InvalidInput`] when `block_length` does not
    /// fit the signed 32-bit header field, and otherwise propagates writer
    /// errors.
    pub fn new(mut writer: W, block_length: NonZeroU32) -> io::Result<Self> {
        if block_length.get() > i32::MAX as u32 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "signature block length exceeds the signed 32-bit header field",
            ));
        }

        write_u32(&mut writer, SIG_MAGIC)?;
        write_u32(&mut writer, block_length.get())?;
        Ok(Self { writer })
    }

    /// Appends one record to the stream.
    ///
    /// # Errors
    ///
    /// Propagates any error reported by the underlying writer.
    pub fn push(&mut self, block: &SignatureBlock) -> io::Result<()> {
        write_record(&mut self.writer, block)
    }

    /// Consumes the writer and returns the underlying sink.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Signs an entire input stream, block by block.
///
/// Reads `reader` to end of stream and writes a complete signature
/// (header plus one record per block) to `writer`. A final block shorter
/// than `block_length` is signed over exactly its remaining bytes. Returns
/// the number of input bytes signed.
///
/// # Errors
///
/// Propagates reader and writer errors, including the
/// [`io::ErrorKind::InvalidInput`] raised for an oversized block length.
pub fn write_signature<R: Read, W: Write>(
    mut reader: R,
    writer: W,
    block_length: NonZeroU32,
) -> io::Result<u64> {
    let mut out = SignatureWriter::new(writer, block_length)?;
    let mut buffer = vec![0u8; block_length.get() as usize];
    let mut total: u64 = 0;

    loop {
        let filled = read_block(&mut reader, &mut buffer)?;
        if filled == 0 {
            break;
        }

        let block = &buffer[..filled];
        let mut weak = RollingChecksum::new();
        weak.update(block);
        out.push(&SignatureBlock::new(weak.value(), Md4::digest(block)))?;

        total += filled as u64;
        if filled < buffer.len() {
            break;
        }
    }

    Ok(total)
}

/// Fills `buffer` from `reader`, stopping early only at end of stream.
fn read_block<R: Read>(reader: &mut R, buffer: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;

    while filled < buffer.len() {
        match reader.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(read) => filled += read,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }

    Ok(filled)
}
