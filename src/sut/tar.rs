//! Minimal USTAR writer (C3).
//!
//! Only what the `.sut` containers need: one or more named members, each
//! with a size, an mtime, and payload bytes, framed by the standard
//! 512-byte USTAR header and terminated by two zero blocks. No symlinks,
//! no GNU/PAX long-name extensions — member names here are always short
//! (`texture.png`, `material_0.layer`, `material.xml`).

use super::bytes::{fixed_ascii_field, octal_field, pad_to_multiple};
use thiserror::Error;

const BLOCK: usize = 512;
const NAME_FIELD_WIDTH: usize = 100;

#[derive(Debug, Error)]
pub enum TarError {
    #[error("TAR member name {0:?} is longer than the 100-byte USTAR name field")]
    NameTooLong(String),
    #[error("TAR member size {0} does not fit in the 12-byte octal size field")]
    SizeTooLarge(u64),
}

/// One file to place inside the archive.
pub struct TarMember<'a> {
    pub name: &'a str,
    pub mtime: u64,
    pub data: &'a [u8],
}

impl<'a> TarMember<'a> {
    pub fn new(name: &'a str, mtime: u64, data: &'a [u8]) -> Self {
        Self { name, mtime, data }
    }
}

/// Serializes `members` into a USTAR byte stream.
pub fn write_tar(members: &[TarMember<'_>]) -> Result<Vec<u8>, TarError> {
    let mut out = Vec::new();
    for member in members {
        if member.name.len() > NAME_FIELD_WIDTH {
            return Err(TarError::NameTooLong(member.name.to_string()));
        }
        write_header(&mut out, member)?;
        out.extend_from_slice(member.data);
        pad_to_multiple(&mut out, BLOCK);
    }
    out.extend(std::iter::repeat(0u8).take(BLOCK * 2));
    Ok(out)
}

fn write_header(out: &mut Vec<u8>, member: &TarMember<'_>) -> Result<(), TarError> {
    let size = member.data.len() as u64;

    let mut header = [0u8; BLOCK];
    header[0..100].copy_from_slice(&fixed_ascii_field(member.name.as_bytes(), 100));
    put_field(&mut header, 100, octal_field(0o644, 8).map_err(|_| TarError::SizeTooLarge(size))?);
    put_field(&mut header, 108, octal_field(0, 8).map_err(|_| TarError::SizeTooLarge(size))?);
    put_field(&mut header, 116, octal_field(0, 8).map_err(|_| TarError::SizeTooLarge(size))?);
    put_field(
        &mut header,
        124,
        octal_field(size, 12).map_err(|_| TarError::SizeTooLarge(size))?,
    );
    put_field(
        &mut header,
        136,
        octal_field(member.mtime, 12).map_err(|_| TarError::SizeTooLarge(size))?,
    );
    // checksum field: six spaces + two more while computing
    header[148..156].copy_from_slice(b"        ");
    header[156] = b'0'; // regular file
    header[257..263].copy_from_slice(b"ustar\0");
    header[263] = b'0';
    header[264] = b'0';

    let checksum: u32 = header.iter().map(|&b| b as u32).sum();
    let checksum_field = octal_field(checksum as u64, 7).map_err(|_| TarError::SizeTooLarge(size))?;
    header[148..148 + 7].copy_from_slice(&checksum_field);
    header[155] = b' ';

    out.extend_from_slice(&header);
    Ok(())
}

fn put_field(header: &mut [u8; BLOCK], offset: usize, field: Vec<u8>) {
    header[offset..offset + field.len()].copy_from_slice(&field);
}

/// Reads back the members of a USTAR archive this writer produced.
///
/// Only used by tests asserting the round-trip property in spec.md §8
/// ("decoding a CLYA blob ... yields back the original PNG bytes
/// byte-for-byte") — the shipped artifact is read by CSP, not by this
/// crate.
pub fn read_tar(data: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut members = Vec::new();
    let mut offset = 0;

    while offset + BLOCK <= data.len() {
        let header = &data[offset..offset + BLOCK];
        if header.iter().all(|&b| b == 0) {
            break;
        }

        let name = ascii_field_to_string(&header[0..100]);
        let size = octal_field_to_u64(&header[124..136]);

        offset += BLOCK;
        let payload = data[offset..offset + size as usize].to_vec();
        members.push((name, payload));

        let padded = size.div_ceil(BLOCK as u64) * BLOCK as u64;
        offset += padded as usize;
    }

    members
}

fn ascii_field_to_string(field: &[u8]) -> String {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..end]).into_owned()
}

fn octal_field_to_u64(field: &[u8]) -> u64 {
    let end = field
        .iter()
        .position(|&b| b == 0 || b == b' ')
        .unwrap_or(field.len());
    u64::from_str_radix(std::str::from_utf8(&field[..end]).unwrap_or("0"), 8).unwrap_or(0)
}
