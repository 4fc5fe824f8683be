#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! Block signature streams and the probe index built from them.
//!
//! A signature describes one version of a file as a sequence of
//! `(weak, strong)` checksum records, one per block. This crate covers both
//! directions of that interface:
//!
//! - [`write_signature`] / [`SignatureWriter`] produce a signature stream
//!   for a file, block by block, short final block included.
//! - [`FileSignature::read_from`] parses a signature stream, and
//!   [`SignatureIndex::from_signature`] turns it into the weak-keyed lookup
//!   the encoder probes while scanning new input.
//!
//! The stream layout is a [`protocol::SIG_MAGIC`] header, the block length,
//! then bare records until end of stream; see the `protocol` crate for the
//! integer framing.

mod block;
mod error;
mod file;
mod index;
mod writer;

pub use block::SignatureBlock;
pub use error::SignatureError;
pub use file::{FileSignature, read_records};
pub use index::SignatureIndex;
pub use writer::{SignatureWriter, write_record, write_signature};

use checksums::strong::{Md4, StrongDigest};

/// Width in bytes of the strong sum carried by every signature record.
pub const STRONG_SUM_LENGTH: usize = Md4::DIGEST_LEN;
