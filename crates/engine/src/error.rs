//! crates/engine/src/error.rs
//!
//! Errors fatal to a delta encode.

use std::io;

use thiserror::Error;

use signature::SignatureError;

/// Errors raised while encoding a delta.
///
/// Every variant is fatal: the delta written so far is unusable and must be
/// discarded by the caller.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The supplied signature stream could not be loaded.
    #[error("invalid signature for delta encoding: {0}")]
    Signature(
        #[from]
        #[source]
        SignatureError,
    ),
    /// The input source failed.
    #[error("failed to read encoder input: {0}")]
    Source(#[source] io::Error),
    /// The delta sink failed.
    #[error("failed to write delta stream: {0}")]
    Sink(#[source] io::Error),
    /// Cooperative cancellation was observed.
    #[error("delta encoding cancelled")]
    Cancelled,
}
