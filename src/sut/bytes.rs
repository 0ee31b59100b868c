//! Byte writer primitives shared by every `.sut` sub-container encoder.
//!
//! Thin wrappers around [`byteorder`] plus the couple of encodings the
//! container formats need that `byteorder` doesn't give us for free:
//! null-terminated UTF-16LE strings and fixed-width ASCII octal fields
//! (TAR headers).

use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{self, Write};

/// Appends `value` as a little-endian `u32`.
pub fn push_u32_le(buf: &mut Vec<u8>, value: u32) {
    buf.write_u32::<LittleEndian>(value)
        .expect("writing to a Vec<u8> cannot fail");
}

/// Appends `value` as a little-endian `f32`.
pub fn push_f32_le(buf: &mut Vec<u8>, value: f32) {
    buf.write_f32::<LittleEndian>(value)
        .expect("writing to a Vec<u8> cannot fail");
}

/// Encodes `s` as UTF-16LE, each code unit little-endian, terminated by a
/// two-byte zero. This is the string encoding every text field inside a
/// `BrushPatternImageArray` blob uses.
pub fn push_utf16le_cstr(buf: &mut Vec<u8>, s: &str) {
    for unit in s.encode_utf16() {
        buf.write_u16::<LittleEndian>(unit)
            .expect("writing to a Vec<u8> cannot fail");
    }
    buf.write_u16::<LittleEndian>(0)
        .expect("writing to a Vec<u8> cannot fail");
}

/// Right-pads `value`'s octal representation with leading zeros to `width`
/// digits, followed by a single NUL. Used for TAR's octal-text numeric
/// header fields (mode, uid, gid, size, mtime).
///
/// `width` is the field width including the trailing NUL (e.g. 8 for mode,
/// 12 for size), matching the USTAR layout in §4.3.
pub fn octal_field(value: u64, width: usize) -> io::Result<Vec<u8>> {
    let digits = width - 1;
    let text = format!("{:0width$o}", value, width = digits);
    if text.len() > digits {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("value {value} does not fit in {digits} octal digits"),
        ));
    }
    let mut field = text.into_bytes();
    field.push(0);
    Ok(field)
}

/// Writes `bytes` followed by zero padding out to `width`, truncating
/// names that are too long to fit (TAR's 100-byte name field).
pub fn fixed_ascii_field(bytes: &[u8], width: usize) -> Vec<u8> {
    let mut field = vec![0u8; width];
    let n = bytes.len().min(width);
    field[..n].copy_from_slice(&bytes[..n]);
    field
}

/// Pads `buf` with zero bytes until its length is a multiple of `block`.
pub fn pad_to_multiple(buf: &mut Vec<u8>, block: usize) {
    let remainder = buf.len() % block;
    if remainder != 0 {
        buf.extend(std::iter::repeat(0u8).take(block - remainder));
    }
}

/// Appends a buffer whose own writer already produced a `Vec<u8>`,
/// purely to keep call sites reading as a sequence of "push" steps.
pub fn push_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    buf.write_all(bytes)
        .expect("writing to a Vec<u8> cannot fail");
}
