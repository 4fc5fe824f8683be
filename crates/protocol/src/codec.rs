//! crates/protocol/src/codec.rs
//!
//! Fixed-width big-endian integer framing over byte streams.

use std::io::{self, Read, Write};

/// Writes a 32-bit big-endian integer.
///
/// # Errors
///
/// Propagates any error reported by the underlying writer.
pub fn write_u32<W: Write + ?Sized>(writer: &mut W, value: u32) -> io::Result<()> {
    writer.write_all(&value.to_be_bytes())
}

/// Reads a 32-bit big-endian integer.
///
/// # Errors
///
/// Returns [`io::ErrorKind::UnexpectedEof`] when the stream ends before all
/// four bytes arrive and otherwise propagates reader errors.
pub fn read_u32<R: Read + ?Sized>(reader: &mut R) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_be_bytes(buf))
}

/// Reads a 32-bit big-endian integer, treating a clean end of stream as
/// `None`.
///
/// Record-structured streams end exactly on a record boundary; this helper
/// lets callers distinguish that case from a field cut off mid-way.
///
/// # Errors
///
/// Returns [`io::ErrorKind::UnexpectedEof`] when the stream ends after one
/// to three bytes and otherwise propagates reader errors.
pub fn read_u32_or_eof<R: Read + ?Sized>(reader: &mut R) -> io::Result<Option<u32>> {
    let mut buf = [0u8; 4];
    let mut filled = 0;

    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) if filled == 0 => return Ok(None),
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "stream ended inside a 32-bit field",
                ));
            }
            Ok(read) => filled += read,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }

    Ok(Some(u32::from_be_bytes(buf)))
}

/// Writes a single byte.
///
/// # Errors
///
/// Propagates any error reported by the underlying writer.
pub fn write_u8<W: Write + ?Sized>(writer: &mut W, value: u8) -> io::Result<()> {
    writer.write_all(&[value])
}

/// Reads a single byte.
///
/// # Errors
///
/// Returns [`io::ErrorKind::UnexpectedEof`] on end of stream and otherwise
/// propagates reader errors.
pub fn read_u8<R: Read + ?Sized>(reader: &mut R) -> io::Result<u8> {
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf)?;
    Ok(buf[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn u32_round_trips_big_endian() {
        let mut buf = Vec::new();
        write_u32(&mut buf, 0x0102_0304).expect("write");
        assert_eq!(buf, [1, 2, 3, 4]);

        let mut cursor = Cursor::new(buf);
        assert_eq!(read_u32(&mut cursor).expect("read"), 0x0102_0304);
    }

    #[test]
    fn read_u32_reports_short_input() {
        let mut cursor = Cursor::new(vec![1, 2]);
        let err = read_u32(&mut cursor).expect_err("short read");
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn read_u32_or_eof_accepts_clean_boundary() {
        let mut cursor = Cursor::new(Vec::new());
        assert_eq!(read_u32_or_eof(&mut cursor).expect("read"), None);
    }

    #[test]
    fn read_u32_or_eof_rejects_partial_field() {
        let mut cursor = Cursor::new(vec![0xab, 0xcd, 0xef]);
        let err = read_u32_or_eof(&mut cursor).expect_err("partial field");
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn read_u32_or_eof_survives_one_byte_reads() {
        struct TrickleReader {
            data: Vec<u8>,
            pos: usize,
        }

        impl Read for TrickleReader {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                if self.pos == self.data.len() || buf.is_empty() {
                    return Ok(0);
                }
                buf[0] = self.data[self.pos];
                self.pos += 1;
                Ok(1)
            }
        }

        let mut reader = TrickleReader {
            data: vec![0xde, 0xad, 0xbe, 0xef],
            pos: 0,
        };
        assert_eq!(read_u32_or_eof(&mut reader).expect("read"), Some(0xdead_beef));
        assert_eq!(read_u32_or_eof(&mut reader).expect("read"), None);
    }

    #[test]
    fn u8_round_trips() {
        let mut buf = Vec::new();
        write_u8(&mut buf, 0x7f).expect("write");
        let mut cursor = Cursor::new(buf);
        assert_eq!(read_u8(&mut cursor).expect("read"), 0x7f);
    }
}
