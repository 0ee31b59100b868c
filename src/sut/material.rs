//! MaterialFile `FileData` builder (C5).
//!
//! Every brush with an attached tip image gets one `MaterialFile` row
//! whose `FileData` BLOB is a two-member TAR: the `CLYA`-framed layer
//! (C4) named `material_0.layer`, and a minimal `material.xml`
//! describing it.

use super::layer::encode_clya_layer;
use super::tar::{write_tar, TarError, TarMember};

/// Builds the `MaterialFile.FileData` TAR for one brush-tip image.
pub fn build_material_file_data(
    png: &[u8],
    material_uuid: &str,
    brush_name: &str,
    mtime: u64,
) -> Result<Vec<u8>, TarError> {
    let layer = encode_clya_layer(png, mtime)?;
    let xml = build_material_xml(brush_name, material_uuid);

    write_tar(&[
        TarMember::new("material_0.layer", mtime, &layer),
        TarMember::new("material.xml", mtime, xml.as_bytes()),
    ])
}

fn build_material_xml(name: &str, uuid: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><material version=\"1\"><name>{}</name><uuid>{}</uuid><type>brush_shape</type></material>",
        escape_xml_text(name),
        uuid,
    )
}

/// Escapes `&`, `<`, `>` and strips control characters, per spec.md §4.5.
fn escape_xml_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_control() {
            continue;
        }
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
    out
}
