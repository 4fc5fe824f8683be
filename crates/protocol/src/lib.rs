#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! Wire framing shared by the rdelta signature and delta streams.
//!
//! Both streams open with a four-byte big-endian magic and carry their
//! integer fields as 32-bit big-endian values. The delta stream is a
//! sequence of self-delimiting command records introduced by a one-byte
//! opcode; the byte layout of each record lives with its producer in the
//! `engine` crate, while the opcodes and magics are pinned here so that
//! producer and consumer cannot drift apart.

mod codec;

pub use codec::{read_u8, read_u32, read_u32_or_eof, write_u8, write_u32};

/// Magic opening a signature stream (`"rdS1"`).
pub const SIG_MAGIC: u32 = 0x7264_5331;

/// Magic opening a delta token stream (`"rdT1"`).
pub const DELTA_MAGIC: u32 = 0x7264_5431;

/// Sentinel opcode concluding a delta stream.
pub const OP_EOF: u8 = 0x00;

/// Opcode introducing a literal run: `[len: u32][len bytes]`.
pub const OP_LITERAL: u8 = 0x01;

/// Opcode introducing a basis copy: `[offset: u32][len: u32]`.
pub const OP_COPY: u8 = 0x02;

/// Opcode introducing an embedded signature: `[len: u32][len bytes]`.
pub const OP_SIGNATURE: u8 = 0x03;
