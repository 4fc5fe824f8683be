#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! Checksum primitives for the rdelta encoder.
//!
//! The crate exposes the rolling weak checksum used to probe candidate
//! blocks while scanning input, together with the strong digest that
//! confirms a weak match before a copy command is emitted. Higher layers
//! (the `signature` and `engine` crates) compose these primitives; nothing
//! in here performs I/O.

mod rolling;
pub mod strong;

pub use rolling::{CHAR_OFFSET, RollingChecksum};
