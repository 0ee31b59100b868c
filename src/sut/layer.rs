//! `CLYA` layer container encoder (C4).
//!
//! `CLYA` is the framing CSP puts around a single raster layer: a 12-byte
//! little-endian header (magic, format version, TAR payload length)
//! followed by a USTAR archive holding exactly one `texture.png` member.

use super::bytes::push_u32_le;
use super::tar::{read_tar, write_tar, TarError, TarMember};

const MAGIC: &[u8; 4] = b"CLYA";
const VERSION: u32 = 0x0001_0000;

/// Wraps `png` in a `CLYA`-framed TAR containing one `texture.png` member.
pub fn encode_clya_layer(png: &[u8], mtime: u64) -> Result<Vec<u8>, TarError> {
    let tar = write_tar(&[TarMember::new("texture.png", mtime, png)])?;

    let mut out = Vec::with_capacity(12 + tar.len());
    out.extend_from_slice(MAGIC);
    push_u32_le(&mut out, VERSION);
    push_u32_le(&mut out, tar.len() as u32);
    out.extend_from_slice(&tar);
    Ok(out)
}

/// Recovers the original `texture.png` bytes from a `CLYA` blob produced
/// by [`encode_clya_layer`]. Used by tests to assert the round-trip
/// property in spec.md §8; CSP itself is the only production consumer of
/// this container, so no decoder is needed outside tests.
pub fn decode_clya_layer(clya: &[u8]) -> Option<Vec<u8>> {
    if clya.len() < 12 || &clya[0..4] != MAGIC {
        return None;
    }
    let tar_len = u32::from_le_bytes(clya[8..12].try_into().ok()?) as usize;
    let tar = clya.get(12..12 + tar_len)?;
    read_tar(tar)
        .into_iter()
        .find(|(name, _)| name == "texture.png")
        .map(|(_, data)| data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_matches_spec_layout() {
        let png = b"not really a png but bytes are bytes";
        let clya = encode_clya_layer(png, 1_700_000_000).unwrap();

        assert_eq!(&clya[0..4], MAGIC);
        assert_eq!(
            u32::from_le_bytes(clya[4..8].try_into().unwrap()),
            VERSION
        );
        let tar_len = u32::from_le_bytes(clya[8..12].try_into().unwrap()) as usize;
        assert_eq!(clya.len(), 12 + tar_len);
    }

    #[test]
    fn embedded_tar_round_trips_the_png_bytes() {
        let png = b"\x89PNG\r\n\x1a\nfake-but-distinctive-payload";
        let clya = encode_clya_layer(png, 0).unwrap();
        let tar = &clya[12..];
        // texture.png name occupies the first 100 bytes of the TAR header,
        // payload begins at byte 512.
        assert_eq!(&tar[0..11], b"texture.png");
        assert_eq!(&tar[512..512 + png.len()], png);
    }

    #[test]
    fn is_pure_given_the_same_mtime() {
        let png = b"abc";
        let a = encode_clya_layer(png, 42).unwrap();
        let b = encode_clya_layer(png, 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn decode_round_trips_the_original_png_bytes() {
        let png = b"\x89PNG\r\n\x1a\noriginal-pixel-data".to_vec();
        let clya = encode_clya_layer(&png, 7).unwrap();
        assert_eq!(decode_clya_layer(&clya), Some(png));
    }

    #[test]
    fn decode_rejects_bad_magic() {
        assert_eq!(decode_clya_layer(b"NOPE________"), None);
    }
}
