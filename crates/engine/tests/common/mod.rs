//! Shared helpers for the engine integration tests.

#![allow(dead_code)]

use std::io::Cursor;
use std::num::NonZeroU32;

use checksums::RollingChecksum;
use engine::EncodeStats;
use protocol::{DELTA_MAGIC, OP_COPY, OP_EOF, OP_LITERAL, OP_SIGNATURE};
use signature::{SignatureBlock, write_signature};

/// Signs `data` with the given block length, returning the signature stream.
pub fn sign(data: &[u8], block_length: u32) -> Vec<u8> {
    let mut stream = Vec::new();
    write_signature(
        Cursor::new(data.to_vec()),
        &mut stream,
        NonZeroU32::new(block_length).expect("block length"),
    )
    .expect("sign basis");
    stream
}

/// Encodes `new` against the signature stream `sig`, returning the delta
/// bytes and the reported stats.
pub fn encode_delta(new: &[u8], sig: &[u8]) -> (Vec<u8>, EncodeStats) {
    let mut delta = Vec::new();
    let stats = engine::encode(
        Cursor::new(new.to_vec()),
        Cursor::new(sig.to_vec()),
        &mut delta,
    )
    .expect("encode delta");
    (delta, stats)
}

/// Rolling weak checksum of `window`, as a signature record would carry it.
pub fn weak_of(window: &[u8]) -> u32 {
    let mut sum = RollingChecksum::new();
    sum.update(window);
    sum.value()
}

/// A decoded delta command, for structural assertions on encoder output.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    Literal(Vec<u8>),
    Copy { offset: u32, len: u32 },
    Signature(Vec<u8>),
    Eof,
}

/// Decodes a delta stream into its command list.
///
/// Panics on any framing defect; these tests only feed it encoder output.
pub fn commands(delta: &[u8]) -> Vec<Command> {
    let magic = u32::from_be_bytes(delta[..4].try_into().expect("magic"));
    assert_eq!(magic, DELTA_MAGIC, "delta stream must open with its magic");

    let mut commands = Vec::new();
    let mut pos = 4;
    loop {
        let opcode = delta[pos];
        pos += 1;
        match opcode {
            OP_EOF => {
                commands.push(Command::Eof);
                assert_eq!(pos, delta.len(), "eof must conclude the stream");
                return commands;
            }
            OP_LITERAL => {
                let len = read_field(delta, &mut pos) as usize;
                commands.push(Command::Literal(delta[pos..pos + len].to_vec()));
                pos += len;
            }
            OP_COPY => {
                let offset = read_field(delta, &mut pos);
                let len = read_field(delta, &mut pos);
                commands.push(Command::Copy { offset, len });
            }
            OP_SIGNATURE => {
                let len = read_field(delta, &mut pos) as usize;
                commands.push(Command::Signature(delta[pos..pos + len].to_vec()));
                pos += len;
            }
            other => panic!("unknown opcode {other:#04x} at offset {}", pos - 1),
        }
    }
}

fn read_field(delta: &[u8], pos: &mut usize) -> u32 {
    let value = u32::from_be_bytes(delta[*pos..*pos + 4].try_into().expect("field"));
    *pos += 4;
    value
}

/// Returns `true` when `candidate` appears within `full` in order, allowing
/// gaps.
pub fn is_subsequence(candidate: &[SignatureBlock], full: &[SignatureBlock]) -> bool {
    let mut remaining = full.iter();
    candidate
        .iter()
        .all(|block| remaining.any(|other| other == block))
}
