//! crates/engine/src/apply.rs
//!
//! Applying a delta stream to a basis file.

use std::cmp::min;
use std::io::{self, Read, Seek, SeekFrom, Write};

use thiserror::Error;
use tracing::debug;

use protocol::{DELTA_MAGIC, OP_COPY, OP_EOF, OP_LITERAL, OP_SIGNATURE, read_u8, read_u32};
use signature::{SignatureBlock, SignatureError, read_records};

/// Errors raised while applying a delta stream.
#[derive(Debug, Error)]
pub enum ApplyError {
    /// The stream opened with a magic other than [`DELTA_MAGIC`].
    #[error("unsupported delta version {found:#010x}, expected {expected:#010x}")]
    UnsupportedVersion {
        /// Magic value actually present in the stream.
        found: u32,
        /// Magic value this implementation understands.
        expected: u32,
    },
    /// The stream carried an opcode this implementation does not know.
    #[error("unknown delta opcode {opcode:#04x}")]
    UnknownCommand {
        /// The unrecognised opcode byte.
        opcode: u8,
    },
    /// The stream ended before its eof record.
    #[error("delta stream ended before its eof record")]
    Truncated,
    /// A copy command addressed bytes past the end of the basis file.
    #[error("delta copy of {len} bytes at offset {offset} reads past the end of the basis")]
    CopyOutOfRange {
        /// Basis offset the copy started at.
        offset: u64,
        /// Length the copy asked for.
        len: u64,
    },
    /// The embedded signature payload could not be parsed.
    #[error("embedded signature payload is invalid: {0}")]
    Signature(
        #[from]
        #[source]
        SignatureError,
    ),
    /// Underlying I/O failure on the basis, delta, or output stream.
    #[error("i/o failure while applying delta: {0}")]
    Io(#[source] io::Error),
}

impl ApplyError {
    /// Classifies an I/O error raised while reading the delta stream.
    fn from_delta_io(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            ApplyError::Truncated
        } else {
            ApplyError::Io(err)
        }
    }
}

/// Result of a successful [`apply_delta`].
#[derive(Clone, Debug)]
pub struct ApplyOutcome {
    /// Number of bytes written to the output, i.e. the size of the
    /// reconstructed file.
    pub bytes_written: u64,
    /// The embedded signature of the reconstructed file, ready to drive the
    /// next encoding round.
    pub new_signature: Vec<SignatureBlock>,
}

/// Applies a delta stream to `basis`, writing the reconstructed file to
/// `output`.
///
/// Literal payloads stream through a bounded scratch buffer and copy
/// commands are served by seeking the basis, so neither side of the
/// reconstruction is materialised in memory. Signature commands may appear
/// anywhere before the eof record and are concatenated; their combined
/// payload is parsed and returned once the stream concludes.
///
/// # Errors
///
/// - [`ApplyError::UnsupportedVersion`] when the magic differs from
///   [`DELTA_MAGIC`].
/// - [`ApplyError::Truncated`] when the stream ends before its eof record.
/// - [`ApplyError::UnknownCommand`] for an unrecognised opcode.
/// - [`ApplyError::CopyOutOfRange`] when a copy addresses bytes the basis
///   does not have.
/// - [`ApplyError::Signature`] when the embedded signature payload does not
///   parse.
/// - [`ApplyError::Io`] for any other stream failure.
pub fn apply_delta<B, D, W>(
    mut basis: B,
    mut delta: D,
    mut output: W,
) -> Result<ApplyOutcome, ApplyError>
where
    B: Read + Seek,
    D: Read,
    W: Write,
{
    let found = read_u32(&mut delta).map_err(ApplyError::from_delta_io)?;
    if found != DELTA_MAGIC {
        return Err(ApplyError::UnsupportedVersion {
            found,
            expected: DELTA_MAGIC,
        });
    }

    let mut buffer = vec![0u8; 8 * 1024];
    let mut bytes_written: u64 = 0;
    let mut sig_payload: Vec<u8> = Vec::new();

    loop {
        let opcode = read_u8(&mut delta).map_err(ApplyError::from_delta_io)?;
        match opcode {
            OP_EOF => break,
            OP_LITERAL => {
                let len = read_u32(&mut delta).map_err(ApplyError::from_delta_io)?;
                let mut remaining = u64::from(len);
                while remaining > 0 {
                    let chunk = min(remaining, buffer.len() as u64) as usize;
                    delta
                        .read_exact(&mut buffer[..chunk])
                        .map_err(ApplyError::from_delta_io)?;
                    output.write_all(&buffer[..chunk]).map_err(ApplyError::Io)?;
                    remaining -= chunk as u64;
                }
                bytes_written += u64::from(len);
            }
            OP_COPY => {
                let offset = u64::from(read_u32(&mut delta).map_err(ApplyError::from_delta_io)?);
                let len = u64::from(read_u32(&mut delta).map_err(ApplyError::from_delta_io)?);

                basis
                    .seek(SeekFrom::Start(offset))
                    .map_err(ApplyError::Io)?;
                let mut remaining = len;
                while remaining > 0 {
                    let chunk = min(remaining, buffer.len() as u64) as usize;
                    basis.read_exact(&mut buffer[..chunk]).map_err(|err| {
                        if err.kind() == io::ErrorKind::UnexpectedEof {
                            ApplyError::CopyOutOfRange { offset, len }
                        } else {
                            ApplyError::Io(err)
                        }
                    })?;
                    output.write_all(&buffer[..chunk]).map_err(ApplyError::Io)?;
                    remaining -= chunk as u64;
                }
                bytes_written += len;
            }
            OP_SIGNATURE => {
                let len = read_u32(&mut delta).map_err(ApplyError::from_delta_io)? as usize;
                let start = sig_payload.len();
                sig_payload.resize(start + len, 0);
                delta
                    .read_exact(&mut sig_payload[start..])
                    .map_err(ApplyError::from_delta_io)?;
            }
            opcode => return Err(ApplyError::UnknownCommand { opcode }),
        }
    }

    let new_signature = read_records(sig_payload.as_slice())?;
    debug!(
        bytes_written,
        signature_records = new_signature.len(),
        "delta applied"
    );

    Ok(ApplyOutcome {
        bytes_written,
        new_signature,
    })
}
