//! crates/engine/src/emitter.rs
//!
//! Serialisation of delta commands onto the output sink.

use std::io::{self, Write};

use protocol::{DELTA_MAGIC, OP_COPY, OP_EOF, OP_LITERAL, OP_SIGNATURE, write_u8, write_u32};
use signature::{STRONG_SUM_LENGTH, SignatureBlock, write_record};

use crate::stats::EncodeStats;

/// Serialised width of one `(weak, strong)` record.
const RECORD_LEN: usize = 4 + STRONG_SUM_LENGTH;

/// Writes delta command records and keeps the running [`EncodeStats`].
///
/// The rest of the encoder treats command layout as opaque: it hands this
/// type literal runs, copy ranges and signature records, and this type owns
/// the opcodes and field framing they become on the wire.
#[derive(Debug)]
pub(crate) struct CommandEmitter<W> {
    sink: W,
    stats: EncodeStats,
}

impl<W: Write> CommandEmitter<W> {
    pub(crate) fn new(sink: W) -> Self {
        Self {
            sink,
            stats: EncodeStats::default(),
        }
    }

    /// Opens the delta stream with its magic.
    pub(crate) fn write_header(&mut self) -> io::Result<()> {
        write_u32(&mut self.sink, DELTA_MAGIC)
    }

    /// Emits one literal command carrying `bytes`.
    pub(crate) fn emit_literal(&mut self, bytes: &[u8]) -> io::Result<()> {
        write_u8(&mut self.sink, OP_LITERAL)?;
        write_u32(&mut self.sink, wire_len(bytes.len() as u64, "literal length")?)?;
        self.sink.write_all(bytes)?;

        self.stats.lit_cmds += 1;
        self.stats.lit_bytes += bytes.len() as u64;
        Ok(())
    }

    /// Emits one copy command for `len` bytes at basis offset `offset`.
    pub(crate) fn emit_copy(&mut self, offset: u64, len: usize) -> io::Result<()> {
        write_u8(&mut self.sink, OP_COPY)?;
        write_u32(&mut self.sink, wire_len(offset, "copy offset")?)?;
        write_u32(&mut self.sink, wire_len(len as u64, "copy length")?)?;

        self.stats.copy_cmds += 1;
        self.stats.copy_bytes += len as u64;
        Ok(())
    }

    /// Emits one signature command carrying `blocks` as bare records.
    pub(crate) fn emit_signature(&mut self, blocks: &[SignatureBlock]) -> io::Result<()> {
        let payload_len = blocks.len() as u64 * RECORD_LEN as u64;

        write_u8(&mut self.sink, OP_SIGNATURE)?;
        write_u32(&mut self.sink, wire_len(payload_len, "signature length")?)?;
        for block in blocks {
            write_record(&mut self.sink, block)?;
        }

        self.stats.sig_cmds += 1;
        self.stats.sig_bytes += payload_len;
        Ok(())
    }

    /// Emits the sentinel record concluding the stream.
    pub(crate) fn emit_eof(&mut self) -> io::Result<()> {
        write_u8(&mut self.sink, OP_EOF)
    }

    pub(crate) fn stats(&self) -> EncodeStats {
        self.stats
    }
}

/// Narrows a length or offset into the 32-bit wire field carrying it.
fn wire_len(value: u64, what: &'static str) -> io::Result<u32> {
    u32::try_from(value).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{what} {value} exceeds the 32-bit wire field"),
        )
    })
}
