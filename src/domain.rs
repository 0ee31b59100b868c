//! Request-level domain types: the logical entities of spec.md §3,
//! expressed as plain `serde`-derived structs following the house style
//! of `file/types.rs::ProjectData`/`LayerData`.

use serde::{Deserialize, Serialize};

/// One normalized, ready-to-embed brush-tip image plus its display name.
#[derive(Debug, Clone)]
pub struct BrushInput {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

impl BrushInput {
    /// `NodeName` is stored at full length; only the eventual download
    /// filename is truncated (spec.md §4.9 tie-breaks).
    pub fn new(name: impl Into<String>, width: u32, height: u32, png: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            png,
        }
    }
}

/// The six tunable brush parameters from spec.md §3, with their defaults.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageOptions {
    pub size: f32,
    pub opacity: u8,
    pub hardness: u8,
    pub spacing: f32,
    pub angle: f32,
    #[serde(rename = "sizePressure")]
    pub size_pressure: bool,
    #[serde(rename = "opacityPressure")]
    pub opacity_pressure: bool,
}

impl Default for PackageOptions {
    fn default() -> Self {
        Self {
            size: 50.0,
            opacity: 100,
            hardness: 50,
            spacing: 10.0,
            angle: 0.0,
            size_pressure: false,
            opacity_pressure: false,
        }
    }
}

/// A full build request: package metadata plus ordered brush inputs.
/// Order is preserved in the output tool palette (spec.md §3).
#[derive(Debug, Clone)]
pub struct PackageRequest {
    pub package_name: String,
    pub author_name: String,
    pub options: PackageOptions,
    pub brushes: Vec<BrushInput>,
}
