//! `BrushPatternImageArray` encoder (C6) — the format-critical, mixed
//! endianness BLOB stored on every `Variant` row.
//!
//! Two shapes, both little-endian throughout (spec.md §4.6, §9 — the
//! endianness is deliberate and must not be "corrected"):
//!
//! - **Empty**: a fixed 16-byte record meaning "no attached image".
//! - **With image**: the same 16-byte header (now carrying the real
//!   payload length), a material reference string, a type/flags pair,
//!   the brush's display name, and the raw PNG bytes, verbatim.
//!
//! The `0x00000014` flag word in the type/flags pair is copied from
//! observed valid files; its meaning is undocumented by the vendor and
//! this encoder does not attempt to interpret it (spec.md §9 Open
//! Question).

use super::bytes::{push_u32_le, push_utf16le_cstr};

const HEADER_A: u32 = 8;
const HEADER_B: u32 = 1;
const HEADER_D: u32 = 0x84;
const TYPE_FLAG: u32 = 0x0000_0002;
const UNDOCUMENTED_FLAG: u32 = 0x0000_0014;

/// Builds the empty-shape BLOB: no attached image.
pub fn encode_empty() -> Vec<u8> {
    let mut buf = Vec::with_capacity(16);
    push_u32_le(&mut buf, HEADER_A);
    push_u32_le(&mut buf, HEADER_B);
    push_u32_le(&mut buf, 0);
    push_u32_le(&mut buf, HEADER_D);
    buf
}

/// Builds the with-image shape BLOB referencing `material_uuid`'s
/// `MaterialFile` row and re-embedding `png` verbatim.
pub fn encode_with_image(material_uuid: &str, brush_name: &str, png: &[u8]) -> Vec<u8> {
    let material_ref = format!(".:12:45:{material_uuid}:data:material_0.layer");

    let mut body = Vec::new();
    push_utf16le_cstr(&mut body, &material_ref);
    push_u32_le(&mut body, TYPE_FLAG);
    push_u32_le(&mut body, UNDOCUMENTED_FLAG);
    push_utf16le_cstr(&mut body, brush_name);
    body.extend_from_slice(png);

    let mut buf = Vec::with_capacity(16 + body.len());
    push_u32_le(&mut buf, HEADER_A);
    push_u32_le(&mut buf, HEADER_B);
    push_u32_le(&mut buf, body.len() as u32);
    push_u32_le(&mut buf, HEADER_D);
    buf.extend_from_slice(&body);
    buf
}
