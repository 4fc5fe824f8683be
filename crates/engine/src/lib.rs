#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! Streaming delta encoder with embedded re-signing.
//!
//! [`encode`] reads a new version of a file and the signature of an old
//! version, and writes a delta token stream expressing the new version as
//! literal runs and copies out of the old one. The same pass computes the
//! signature of the new version and embeds it in the stream, so a recipient
//! that applies the delta can retain a fresh signature for the next round
//! without rereading anything.
//!
//! The encoder is a single forward fold: one bounded readahead buffer, one
//! rolling checksum, no seeking and no second pass over the input.
//! [`apply_delta`] is the receiving side, reconstructing the new version
//! from the old one plus the delta and handing back the embedded signature.

mod apply;
mod emitter;
mod encoder;
mod error;
mod literal;
mod newsig;
mod readahead;
mod stats;

pub use apply::{ApplyError, ApplyOutcome, apply_delta};
pub use encoder::{Encoder, encode};
pub use error::EncodeError;
pub use stats::EncodeStats;
