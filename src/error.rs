//! Crate-level error type, mirroring the taxonomy in spec.md §7.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForgeError {
    /// Tier 1 — input rejected before the core ever runs.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Tier 2 — an individual image failed to normalize; the caller
    /// decides whether to skip it or (if none remain) escalate to
    /// `InvalidInput`.
    #[error("image normalization failed: {0}")]
    Normalize(String),

    /// Tier 3 — a byte-writer invariant was violated. Should never
    /// trigger in practice; fails the whole build.
    #[error("sut container encoding error: {0}")]
    Encoding(#[from] crate::sut::tar::TarError),

    /// Tier 4 — scratch storage or SQLite commit failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),
}

pub type ForgeResult<T> = Result<T, ForgeError>;
