//! Image normalizer (external collaborator, spec.md §1).
//!
//! Accepts arbitrary PNG/JPEG bytes and returns `{width, height,
//! png_bytes}` as single-channel grayscale, with the long edge clamped to
//! 2048px and the short edge required to be at least 32px. Uses the same
//! `image` crate and `Lanczos3` resize filter the teacher already reaches
//! for when downsizing ORA thumbnails (`file/ora.rs::resize_thumbnail_if_needed`).

use crate::error::ForgeError;
use image::imageops::FilterType;
use image::{GrayImage, ImageFormat};
use std::io::Cursor;

pub const MAX_DIMENSION: u32 = 2048;
pub const MIN_DIMENSION: u32 = 32;

/// A normalized, single-channel grayscale brush-tip image ready to hand
/// to the `.sut` builder.
pub struct NormalizedImage {
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

/// Normalizes one image's raw bytes (PNG or JPEG).
///
/// Returns [`ForgeError::Normalize`] when the image can't be decoded or
/// is too small to ever satisfy the minimum dimension, even after
/// resizing down from an oversized source.
pub fn normalize_image(bytes: &[u8]) -> Result<NormalizedImage, ForgeError> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| ForgeError::Normalize(format!("unrecognized image data: {e}")))?;
    let gray: GrayImage = decoded.into_luma8();

    let (width, height) = gray.dimensions();
    if width.min(height) < MIN_DIMENSION {
        return Err(ForgeError::Normalize(format!(
            "image is {width}x{height}, smaller than the {MIN_DIMENSION}px minimum"
        )));
    }

    let gray = if width.max(height) > MAX_DIMENSION {
        let scale = MAX_DIMENSION as f32 / width.max(height) as f32;
        let new_width = ((width as f32) * scale).round().max(1.0) as u32;
        let new_height = ((height as f32) * scale).round().max(1.0) as u32;
        image::imageops::resize(&gray, new_width, new_height, FilterType::Lanczos3)
    } else {
        gray
    };

    let (width, height) = gray.dimensions();
    if width.min(height) < MIN_DIMENSION {
        return Err(ForgeError::Normalize(format!(
            "image's aspect ratio shrinks below the {MIN_DIMENSION}px minimum once its long edge is clamped to {MAX_DIMENSION}px"
        )));
    }

    let mut png = Cursor::new(Vec::new());
    gray.write_to(&mut png, ImageFormat::Png)?;

    Ok(NormalizedImage {
        width,
        height,
        png: png.into_inner(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_png(img: &GrayImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn passes_through_an_already_valid_grayscale_image() {
        let img = GrayImage::from_pixel(64, 64, image::Luma([0]));
        let bytes = encode_png(&img);
        let normalized = normalize_image(&bytes).unwrap();
        assert_eq!((normalized.width, normalized.height), (64, 64));
    }

    #[test]
    fn downsizes_oversized_images_to_the_2048_cap() {
        let img = GrayImage::from_pixel(4000, 4000, image::Luma([128]));
        let bytes = encode_png(&img);
        let normalized = normalize_image(&bytes).unwrap();
        assert_eq!(normalized.width, MAX_DIMENSION);
        assert_eq!(normalized.height, MAX_DIMENSION);
    }

    #[test]
    fn rejects_images_below_the_minimum_dimension() {
        let img = GrayImage::from_pixel(16, 16, image::Luma([0]));
        let bytes = encode_png(&img);
        assert!(normalize_image(&bytes).is_err());
    }

    #[test]
    fn rejects_garbage_bytes() {
        assert!(normalize_image(b"not an image").is_err());
    }

    #[test]
    fn converts_color_images_to_grayscale() {
        let img = image::RgbImage::from_pixel(100, 100, image::Rgb([200, 10, 10]));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        let normalized = normalize_image(&buf.into_inner()).unwrap();
        // single channel PNG decodes back to a GrayImage
        let decoded = image::load_from_memory(&normalized.png).unwrap();
        assert_eq!(decoded.color(), image::ColorType::L8);
    }
}
