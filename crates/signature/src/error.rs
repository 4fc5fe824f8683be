//! crates/signature/src/error.rs
//!
//! Errors raised while parsing a signature stream.

use std::io;

use thiserror::Error;

/// Errors raised while parsing a signature stream.
#[derive(Debug, Error)]
pub enum SignatureError {
    /// The stream opened with a magic other than [`protocol::SIG_MAGIC`].
    #[error("unsupported signature version {found:#010x}, expected {expected:#010x}")]
    UnsupportedVersion {
        /// Magic value actually present in the stream.
        found: u32,
        /// Magic value this implementation understands.
        expected: u32,
    },
    /// The stream ended inside one of the fixed header fields.
    #[error("truncated signature: stream ended inside the {field} field")]
    Truncated {
        /// Name of the header field that was cut off.
        field: &'static str,
    },
    /// The header advertised a block length that is not positive.
    #[error("signature block length {value} is not positive")]
    InvalidBlockLength {
        /// Raw value decoded from the header.
        value: i64,
    },
    /// The stream ended part-way through a `(weak, strong)` record.
    #[error("malformed signature: stream ended inside a record")]
    Malformed,
    /// Underlying I/O failure raised while reading the stream.
    #[error("failed to read signature stream: {0}")]
    Io(#[source] io::Error),
}

impl SignatureError {
    /// Classifies an I/O error raised while reading a record body.
    ///
    /// An unexpected end of stream inside a record is a framing defect of
    /// the stream itself, not an I/O failure of the transport.
    pub(crate) fn from_record_io(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            SignatureError::Malformed
        } else {
            SignatureError::Io(err)
        }
    }

    /// Classifies an I/O error raised while reading the header field `field`.
    pub(crate) fn from_header_io(err: io::Error, field: &'static str) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            SignatureError::Truncated { field }
        } else {
            SignatureError::Io(err)
        }
    }
}
