//! Archive demultiplexer (external collaborator, spec.md §1).
//!
//! Turns `.zip`/`.brushset` bytes into a flat stream of raw image entries
//! (name + bytes), skipping directories, non-image members, and any
//! member whose path would escape the archive root. Grounded on the
//! teacher's zip handling in `file/ora.rs`, which already reads and
//! writes zip archives the same way.

use crate::error::ForgeError;
use std::io::{Cursor, Read};
use std::path::{Component, Path};
use zip::ZipArchive;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// One image file pulled out of an archive.
pub struct ArchiveEntry {
    /// File stem (no extension, no directory), used to derive a brush
    /// name.
    pub stem: String,
    pub bytes: Vec<u8>,
}

/// Extracts every image member from a `.zip` or `.brushset` archive.
pub fn extract_images(bytes: &[u8]) -> Result<Vec<ArchiveEntry>, ForgeError> {
    let mut zip = ZipArchive::new(Cursor::new(bytes))?;
    let mut entries = Vec::new();

    for index in 0..zip.len() {
        let mut file = zip.by_index(index)?;
        if file.is_dir() {
            continue;
        }

        let name = file.name().to_string();
        if !is_safe_member_path(&name) {
            tracing::warn!("skipping unsafe archive member path: {name}");
            continue;
        }
        if !has_image_extension(&name) {
            continue;
        }

        let mut bytes = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut bytes)?;
        entries.push(ArchiveEntry {
            stem: file_stem(&name),
            bytes,
        });
    }

    Ok(entries)
}

fn is_safe_member_path(name: &str) -> bool {
    let path = Path::new(name);
    path.is_relative()
        && !path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
}

fn has_image_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn file_stem(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name)
        .to_string()
}
